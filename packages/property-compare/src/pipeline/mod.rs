//! The comparison pipeline.
//!
//! Stages, in the order a session runs them:
//! - Fetch (URL validation + scrape)
//! - Format (AI structuring with heuristic fallback)
//! - Compare (search, candidate backfill, AI ranking)

pub mod compare;
pub mod fallback;
pub mod fetch;
pub mod format;
pub mod prompts;

pub use compare::{build_search_query, compare_listings};
pub use fallback::extract_partial;
pub use fetch::{fetch_listing, is_supported_portal, validate_listing_url};
pub use format::format_listing;
pub use prompts::{
    format_rank_prompt, format_structure_prompt, RANK_PROMPT, STRUCTURE_PROMPT,
};

use crate::error::Result;
use crate::traits::{ListingScraper, ListingSearcher, PropertyAi};
use crate::types::{CompareConfig, ComparisonResult, PropertyRecord, UserPreferences};

/// The three external capabilities plus tunables, bundled so callers hold
/// one value instead of four.
pub struct Pipeline<S, A, W> {
    scraper: S,
    ai: A,
    searcher: W,
    config: CompareConfig,
}

impl<S, A, W> Pipeline<S, A, W>
where
    S: ListingScraper,
    A: PropertyAi,
    W: ListingSearcher,
{
    /// Create a pipeline with default configuration.
    pub fn new(scraper: S, ai: A, searcher: W) -> Self {
        Self {
            scraper,
            ai,
            searcher,
            config: CompareConfig::default(),
        }
    }

    /// Replace the configuration.
    pub fn with_config(mut self, config: CompareConfig) -> Self {
        self.config = config;
        self
    }

    /// The active configuration.
    pub fn config(&self) -> &CompareConfig {
        &self.config
    }

    /// Fetch a listing URL and structure it into a record.
    pub async fn fetch_and_format(&self, url: &str) -> Result<PropertyRecord> {
        let raw = fetch::fetch_listing(&self.scraper, url, &self.config).await?;
        format::format_listing(&self.ai, &raw).await
    }

    /// Compare a reference record against the market.
    pub async fn compare(
        &self,
        reference: &PropertyRecord,
        prefs: &UserPreferences,
    ) -> Result<ComparisonResult> {
        compare::compare_listings(
            &self.scraper,
            &self.ai,
            &self.searcher,
            &self.config,
            reference,
            prefs,
        )
        .await
    }
}
