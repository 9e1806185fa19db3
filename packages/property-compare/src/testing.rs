//! Mock implementations for testing.
//!
//! Scriptable stand-ins for the scraper and AI capabilities, so pipeline
//! and session behavior can be tested without network access. The search
//! mock lives next to its trait in `traits::searcher`.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::error::{CompareError, Result};
use crate::traits::{ListingScraper, PropertyAi};
use crate::types::{
    ListingFields, PropertyRecord, RankedChoice, RankingResponse, RawListing, UserPreferences,
};

/// Failure kinds a mock can be scripted to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptedFailure {
    /// Credential rejection. Fatal for the session.
    Credential,

    /// Service unavailable. Retryable.
    Unavailable,
}

impl ScriptedFailure {
    fn into_scrape_error(self, url: &str) -> CompareError {
        match self {
            ScriptedFailure::Credential => CompareError::Credential {
                service: "firecrawl".to_string(),
            },
            ScriptedFailure::Unavailable => CompareError::Fetch {
                url: url.to_string(),
                reason: "scripted failure".to_string(),
            },
        }
    }

    fn into_ai_error(self) -> CompareError {
        match self {
            ScriptedFailure::Credential => CompareError::Credential {
                service: "openai".to_string(),
            },
            ScriptedFailure::Unavailable => CompareError::Ai("scripted failure".to_string()),
        }
    }
}

#[derive(Clone)]
struct ScriptedPage {
    content: String,
    title: Option<String>,
}

/// Mock scraper serving scripted pages.
///
/// Unknown URLs fail with a retryable fetch error. Every call is recorded
/// so tests can assert how often a page was fetched.
#[derive(Clone, Default)]
pub struct MockScraper {
    pages: Arc<RwLock<HashMap<String, ScriptedPage>>>,
    failures: Arc<RwLock<HashMap<String, ScriptedFailure>>>,
    calls: Arc<RwLock<Vec<String>>>,
}

impl MockScraper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script a page for a URL.
    pub fn with_page(self, url: &str, content: &str) -> Self {
        self.pages.write().unwrap().insert(
            url.to_string(),
            ScriptedPage {
                content: content.to_string(),
                title: None,
            },
        );
        self
    }

    /// Script a page with a scraper-reported title.
    pub fn with_titled_page(self, url: &str, title: &str, content: &str) -> Self {
        self.pages.write().unwrap().insert(
            url.to_string(),
            ScriptedPage {
                content: content.to_string(),
                title: Some(title.to_string()),
            },
        );
        self
    }

    /// Script a failure for a URL.
    pub fn with_failure(self, url: &str, failure: ScriptedFailure) -> Self {
        self.failures.write().unwrap().insert(url.to_string(), failure);
        self
    }

    /// URLs scraped, in call order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.read().unwrap().clone()
    }

    /// How many times a URL was scraped.
    pub fn scrape_count(&self, url: &str) -> usize {
        self.calls
            .read()
            .unwrap()
            .iter()
            .filter(|called| *called == url)
            .count()
    }
}

#[async_trait]
impl ListingScraper for MockScraper {
    async fn scrape(&self, url: &str) -> Result<RawListing> {
        self.calls.write().unwrap().push(url.to_string());

        if let Some(failure) = self.failures.read().unwrap().get(url).copied() {
            return Err(failure.into_scrape_error(url));
        }

        let pages = self.pages.read().unwrap();
        let Some(page) = pages.get(url) else {
            return Err(CompareError::Fetch {
                url: url.to_string(),
                reason: "no scripted page".to_string(),
            });
        };

        let mut raw = RawListing::new(url, page.content.clone());
        raw.title = page.title.clone();
        Ok(raw)
    }
}

/// Calls a `MockAi` has served, for assertion in tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockAiCall {
    FormatListing { url: String },
    RankAlternatives { candidate_count: usize },
}

/// Mock AI with per-URL structuring replies and an optional ranking reply.
///
/// Unscripted structuring calls return empty fields; unscripted ranking
/// calls rank the candidates in the order given.
#[derive(Clone, Default)]
pub struct MockAi {
    listings: Arc<RwLock<HashMap<String, ListingFields>>>,
    listing_failures: Arc<RwLock<HashMap<String, ScriptedFailure>>>,
    fail_all_listings: Arc<RwLock<Option<ScriptedFailure>>>,
    ranking: Arc<RwLock<Option<RankingResponse>>>,
    rank_failure: Arc<RwLock<Option<ScriptedFailure>>>,
    calls: Arc<RwLock<Vec<MockAiCall>>>,
}

impl MockAi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script the structuring reply for a URL.
    pub fn with_listing(self, url: &str, fields: ListingFields) -> Self {
        self.listings.write().unwrap().insert(url.to_string(), fields);
        self
    }

    /// Script a structuring failure for a URL.
    pub fn with_listing_failure(self, url: &str, failure: ScriptedFailure) -> Self {
        self.listing_failures
            .write()
            .unwrap()
            .insert(url.to_string(), failure);
        self
    }

    /// Fail every structuring call.
    pub fn with_all_listings_failing(self, failure: ScriptedFailure) -> Self {
        *self.fail_all_listings.write().unwrap() = Some(failure);
        self
    }

    /// Script the ranking reply.
    pub fn with_ranking(self, response: RankingResponse) -> Self {
        *self.ranking.write().unwrap() = Some(response);
        self
    }

    /// Fail the ranking call.
    pub fn with_rank_failure(self, failure: ScriptedFailure) -> Self {
        *self.rank_failure.write().unwrap() = Some(failure);
        self
    }

    /// Calls served, in order.
    pub fn calls(&self) -> Vec<MockAiCall> {
        self.calls.read().unwrap().clone()
    }

    /// Forget recorded calls.
    pub fn clear_calls(&self) {
        self.calls.write().unwrap().clear();
    }
}

fn default_ranking(
    candidates: &[PropertyRecord],
    prefs: &UserPreferences,
    max_alternatives: usize,
) -> RankingResponse {
    RankingResponse {
        ranking: candidates
            .iter()
            .take(max_alternatives)
            .enumerate()
            .map(|(i, candidate)| RankedChoice {
                url: candidate.source_url.clone(),
                rank: (i + 1) as u8,
                rationale: format!("Fits the stated {} purpose", prefs.purpose),
            })
            .collect(),
        recommendation: "## Expert Recommendation\n\nDefault mock analysis.".to_string(),
    }
}

#[async_trait]
impl PropertyAi for MockAi {
    async fn format_listing(&self, _content: &str, url: &str) -> Result<ListingFields> {
        self.calls.write().unwrap().push(MockAiCall::FormatListing {
            url: url.to_string(),
        });

        if let Some(failure) = *self.fail_all_listings.read().unwrap() {
            return Err(failure.into_ai_error());
        }
        if let Some(failure) = self.listing_failures.read().unwrap().get(url).copied() {
            return Err(failure.into_ai_error());
        }
        if let Some(fields) = self.listings.read().unwrap().get(url) {
            return Ok(fields.clone());
        }
        Ok(ListingFields::default())
    }

    async fn rank_alternatives(
        &self,
        _reference: &PropertyRecord,
        candidates: &[PropertyRecord],
        prefs: &UserPreferences,
        max_alternatives: usize,
    ) -> Result<RankingResponse> {
        self.calls.write().unwrap().push(MockAiCall::RankAlternatives {
            candidate_count: candidates.len(),
        });

        if let Some(failure) = *self.rank_failure.read().unwrap() {
            return Err(failure.into_ai_error());
        }
        if let Some(response) = self.ranking.read().unwrap().clone() {
            return Ok(response);
        }
        Ok(default_ranking(candidates, prefs, max_alternatives))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{BudgetRange, Purpose};

    #[tokio::test]
    async fn test_mock_scraper_serves_scripted_page() {
        let scraper = MockScraper::new()
            .with_titled_page("https://example.com/a", "Casa Indah 2", "RM 650,000");

        let raw = scraper.scrape("https://example.com/a").await.unwrap();

        assert_eq!(raw.url, "https://example.com/a");
        assert_eq!(raw.content, "RM 650,000");
        assert_eq!(raw.title.as_deref(), Some("Casa Indah 2"));
    }

    #[tokio::test]
    async fn test_mock_scraper_unknown_url_fails_retryably() {
        let scraper = MockScraper::new();

        let err = scraper.scrape("https://example.com/missing").await.unwrap_err();

        assert!(matches!(err, CompareError::Fetch { .. }));
        assert!(!err.is_fatal());
    }

    #[tokio::test]
    async fn test_mock_scraper_counts_calls() {
        let scraper = MockScraper::new().with_page("https://example.com/a", "x");

        scraper.scrape("https://example.com/a").await.unwrap();
        scraper.scrape("https://example.com/a").await.unwrap();

        assert_eq!(scraper.scrape_count("https://example.com/a"), 2);
        assert_eq!(scraper.calls().len(), 2);
    }

    #[tokio::test]
    async fn test_scripted_credential_failure_is_fatal() {
        let scraper = MockScraper::new()
            .with_failure("https://example.com/a", ScriptedFailure::Credential);

        let err = scraper.scrape("https://example.com/a").await.unwrap_err();
        assert!(err.is_fatal());
    }

    #[tokio::test]
    async fn test_mock_ai_defaults_to_empty_fields() {
        let ai = MockAi::new();

        let fields = ai.format_listing("content", "https://example.com/a").await.unwrap();

        assert!(fields.title.is_none());
        assert_eq!(
            ai.calls(),
            vec![MockAiCall::FormatListing {
                url: "https://example.com/a".to_string()
            }]
        );
    }

    #[tokio::test]
    async fn test_mock_ai_default_ranking_follows_candidate_order() {
        let ai = MockAi::new();
        let reference = PropertyRecord::partial("https://example.com/ref");
        let candidates = vec![
            PropertyRecord::partial("https://example.com/a"),
            PropertyRecord::partial("https://example.com/b"),
            PropertyRecord::partial("https://example.com/c"),
        ];
        let prefs = UserPreferences::new(
            Purpose::RentalInvestment,
            BudgetRange::new(500_000, 700_000),
        );

        let response = ai
            .rank_alternatives(&reference, &candidates, &prefs, 2)
            .await
            .unwrap();

        assert_eq!(response.ranking.len(), 2);
        assert_eq!(response.ranking[0].url, "https://example.com/a");
        assert_eq!(response.ranking[0].rank, 1);
        assert!(response.ranking[0].rationale.contains("rental investment"));
    }

    #[tokio::test]
    async fn test_mock_ai_fail_all_listings() {
        let ai = MockAi::new().with_all_listings_failing(ScriptedFailure::Credential);

        let err = ai.format_listing("content", "https://example.com/a").await.unwrap_err();
        assert!(matches!(err, CompareError::Credential { .. }));
    }
}
