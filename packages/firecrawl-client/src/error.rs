//! Error types for the Firecrawl client.

use thiserror::Error;

/// Result type for Firecrawl client operations.
pub type Result<T> = std::result::Result<T, FirecrawlError>;

/// Firecrawl client errors.
#[derive(Debug, Error)]
pub enum FirecrawlError {
    /// Configuration error (missing API key, invalid settings)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Network error (connection failed, timeout, undecodable body)
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// API error (non-2xx response, or a 2xx envelope reporting failure)
    #[error("Firecrawl API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// The scrape succeeded but returned no usable content.
    #[error("No content returned for {url}")]
    EmptyContent { url: String },
}
