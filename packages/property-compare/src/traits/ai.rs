//! AI trait for the two LLM operations the pipeline needs.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{
    comparison::RankingResponse, listing::ListingFields, listing::PropertyRecord,
    preferences::UserPreferences,
};

/// LLM operations behind the pipeline.
///
/// Implementations wrap a provider (OpenAI) and own prompting and reply
/// parsing; the pipeline only sees typed results.
#[async_trait]
pub trait PropertyAi: Send + Sync {
    /// Structure a scraped listing page into typed fields.
    ///
    /// Errors here send the formatter down the heuristic fallback path,
    /// except credential failures, which stay fatal.
    async fn format_listing(&self, content: &str, url: &str) -> Result<ListingFields>;

    /// Rank candidate listings against the reference and write the expert
    /// recommendation.
    ///
    /// `max_alternatives` caps how many ranked entries to ask for; the
    /// reply may rank fewer if candidates are weak.
    async fn rank_alternatives(
        &self,
        reference: &PropertyRecord,
        candidates: &[PropertyRecord],
        prefs: &UserPreferences,
        max_alternatives: usize,
    ) -> Result<RankingResponse>;
}
