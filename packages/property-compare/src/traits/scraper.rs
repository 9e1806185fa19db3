//! Listing scraper trait.
//!
//! Abstracts over how listing pages become markdown. The production
//! implementation is the Firecrawl client; tests use `MockScraper` from
//! [`crate::testing`].

use async_trait::async_trait;

use crate::error::{CompareError, Result};
use crate::types::listing::RawListing;

/// Fetches a listing page and returns it as markdown.
#[async_trait]
pub trait ListingScraper: Send + Sync {
    /// Fetch one page. Network and API failures surface as
    /// [`CompareError::Fetch`]; a rejected API key surfaces as
    /// [`CompareError::Credential`].
    async fn scrape(&self, url: &str) -> Result<RawListing>;
}

#[async_trait]
impl ListingScraper for firecrawl_client::FirecrawlClient {
    async fn scrape(&self, url: &str) -> Result<RawListing> {
        let page = firecrawl_client::FirecrawlClient::scrape(self, url)
            .await
            .map_err(|e| map_firecrawl_error(url, e))?;

        let mut listing = RawListing::new(page.url, page.markdown);
        listing.fetched_at = page.fetched_at;
        if let Some(title) = page.title {
            listing = listing.with_title(title);
        }
        Ok(listing)
    }
}

fn map_firecrawl_error(url: &str, err: firecrawl_client::FirecrawlError) -> CompareError {
    match err {
        firecrawl_client::FirecrawlError::Api {
            status: 401 | 403, ..
        } => CompareError::Credential {
            service: "firecrawl".to_string(),
        },
        other => CompareError::Fetch {
            url: url.to_string(),
            reason: other.to_string(),
        },
    }
}
