use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Request body for the `/scrape` endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct ScrapeRequest {
    pub url: String,
    pub formats: Vec<String>,
}

/// Response envelope for the `/scrape` endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct ScrapeResponse {
    pub success: bool,
    #[serde(default)]
    pub data: Option<ScrapeData>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScrapeData {
    pub markdown: Option<String>,
    pub metadata: Option<PageMetadata>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PageMetadata {
    pub title: Option<String>,
    #[serde(rename = "sourceURL")]
    pub source_url: Option<String>,
}

/// A scraped page in markdown form.
#[derive(Debug, Clone)]
pub struct ScrapedPage {
    /// Canonical URL reported by Firecrawl, falling back to the requested one.
    pub url: String,
    pub markdown: String,
    pub title: Option<String>,
    pub fetched_at: DateTime<Utc>,
}
