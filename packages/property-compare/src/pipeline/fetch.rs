//! Listing URL validation and page fetching.

use tracing::{info, warn};
use url::Url;

use crate::error::{CompareError, Result};
use crate::traits::ListingScraper;
use crate::types::{CompareConfig, RawListing};

/// Parse and validate a listing URL.
///
/// Only absolute http/https URLs with a host are accepted; everything else
/// is rejected before a scrape is attempted.
pub fn validate_listing_url(raw_url: &str) -> Result<Url> {
    let trimmed = raw_url.trim();

    let url = Url::parse(trimmed).map_err(|_| CompareError::InvalidUrl {
        url: trimmed.to_string(),
    })?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(CompareError::InvalidUrl {
            url: trimmed.to_string(),
        });
    }

    if url.host_str().is_none() {
        return Err(CompareError::InvalidUrl {
            url: trimmed.to_string(),
        });
    }

    Ok(url)
}

/// Whether the URL's host is one of the configured listing portals.
///
/// Matches the portal domain itself and any subdomain of it.
pub fn is_supported_portal(url: &Url, config: &CompareConfig) -> bool {
    let Some(host) = url.host_str() else {
        return false;
    };

    config
        .supported_portals
        .iter()
        .any(|portal| host == portal || host.ends_with(&format!(".{}", portal)))
}

/// Fetch a listing page.
///
/// Unknown hosts still get fetched; they just log a warning since the
/// downstream extraction quality is unpredictable there. An empty page is a
/// fetch failure: nothing downstream can work with it.
pub async fn fetch_listing<S>(
    scraper: &S,
    raw_url: &str,
    config: &CompareConfig,
) -> Result<RawListing>
where
    S: ListingScraper + ?Sized,
{
    let url = validate_listing_url(raw_url)?;

    if !is_supported_portal(&url, config) {
        warn!("{} is not a known listing portal, results may be incomplete", url);
    }

    let raw = scraper.scrape(url.as_str()).await?;

    if raw.content.trim().is_empty() {
        return Err(CompareError::Fetch {
            url: url.to_string(),
            reason: "scraper returned an empty page".to_string(),
        });
    }

    info!("Fetched {} ({} bytes)", url, raw.content.len());
    Ok(raw)
}
