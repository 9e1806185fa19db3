//! Pure Firecrawl REST API client.
//!
//! A minimal client for the Firecrawl scraping API. Takes a page URL and
//! returns the rendered page as markdown; JavaScript rendering and anti-bot
//! handling happen on the Firecrawl side.
//!
//! # Example
//!
//! ```rust,ignore
//! use firecrawl_client::FirecrawlClient;
//!
//! let client = FirecrawlClient::new("your-api-key".into());
//!
//! let page = client.scrape("https://www.iproperty.com.my/sale/...").await?;
//! println!("{}", page.markdown);
//! ```

pub mod error;
pub mod types;

pub use error::{FirecrawlError, Result};
pub use types::ScrapedPage;

use chrono::Utc;
use types::{ScrapeRequest, ScrapeResponse};

const BASE_URL: &str = "https://api.firecrawl.dev/v1";

pub struct FirecrawlClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl FirecrawlClient {
    pub fn new(api_key: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            base_url: BASE_URL.to_string(),
        }
    }

    /// Create from the `FIRECRAWL_API_KEY` environment variable.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("FIRECRAWL_API_KEY")
            .map_err(|_| FirecrawlError::Config("FIRECRAWL_API_KEY not set".to_string()))?;
        Ok(Self::new(api_key))
    }

    /// Override the API base URL (self-hosted instances, tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Scrape a single URL, returning the rendered page as markdown.
    pub async fn scrape(&self, url: &str) -> Result<ScrapedPage> {
        tracing::debug!(url, "Requesting Firecrawl scrape");

        let request = ScrapeRequest {
            url: url.to_string(),
            formats: vec!["markdown".to_string()],
        };

        let resp = self
            .client
            .post(format!("{}/scrape", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(FirecrawlError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let scrape: ScrapeResponse = resp.json().await?;

        if !scrape.success {
            return Err(FirecrawlError::Api {
                status: status.as_u16(),
                message: scrape
                    .error
                    .unwrap_or_else(|| "scrape reported failure".to_string()),
            });
        }

        let data = scrape.data.ok_or_else(|| FirecrawlError::EmptyContent {
            url: url.to_string(),
        })?;

        let markdown = match data.markdown {
            Some(md) if !md.trim().is_empty() => md,
            _ => {
                return Err(FirecrawlError::EmptyContent {
                    url: url.to_string(),
                })
            }
        };

        let (title, source_url) = match data.metadata {
            Some(meta) => (meta.title, meta.source_url),
            None => (None, None),
        };

        tracing::info!(url, chars = markdown.len(), "Firecrawl scrape completed");

        Ok(ScrapedPage {
            url: source_url.unwrap_or_else(|| url.to_string()),
            markdown,
            title,
            fetched_at: Utc::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_override() {
        let client =
            FirecrawlClient::new("test-key".to_string()).with_base_url("http://localhost:3002/v1");
        assert_eq!(client.base_url, "http://localhost:3002/v1");
    }

    #[test]
    fn test_scrape_response_with_metadata() {
        let body = r##"{
            "success": true,
            "data": {
                "markdown": "# Casa Indah 2\n\nRM 650,000",
                "metadata": {
                    "title": "Casa Indah 2 | iProperty",
                    "sourceURL": "https://www.iproperty.com.my/sale/casa-indah-2"
                }
            }
        }"##;

        let resp: ScrapeResponse = serde_json::from_str(body).unwrap();
        assert!(resp.success);

        let data = resp.data.unwrap();
        assert!(data.markdown.unwrap().contains("RM 650,000"));
        assert_eq!(
            data.metadata.unwrap().source_url.as_deref(),
            Some("https://www.iproperty.com.my/sale/casa-indah-2")
        );
    }

    #[test]
    fn test_scrape_response_reporting_failure() {
        let body = r#"{"success": false, "error": "Invalid API key"}"#;

        let resp: ScrapeResponse = serde_json::from_str(body).unwrap();
        assert!(!resp.success);
        assert!(resp.data.is_none());
        assert_eq!(resp.error.as_deref(), Some("Invalid API key"));
    }
}
