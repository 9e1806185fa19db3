//! Typed errors for the comparison pipeline.
//!
//! Uses `thiserror` for library errors (not `anyhow`) to keep the failure
//! classes explicit: fetch failures leave the current step retryable,
//! structuring failures degrade to the fallback path, credential failures
//! end the session.

use thiserror::Error;

/// Errors that can occur during comparison operations.
#[derive(Debug, Error)]
pub enum CompareError {
    /// Listing page could not be fetched (network failure, scraping API
    /// failure, empty page)
    #[error("fetch failed for {url}: {reason}")]
    Fetch { url: String, reason: String },

    /// AI service unavailable or returned an unusable reply
    #[error("AI service error: {0}")]
    Ai(String),

    /// Web search failed
    #[error("search error: {0}")]
    Search(String),

    /// API key rejected by an upstream service
    #[error("credential rejected by {service}")]
    Credential { service: String },

    /// Invalid listing URL
    #[error("invalid URL: {url}")]
    InvalidUrl { url: String },

    /// Preferences failed validation
    #[error("invalid preferences: {reason}")]
    InvalidPreferences { reason: String },

    /// Operation not allowed in the current session state
    #[error("{operation} not allowed while {state}")]
    InvalidState {
        operation: &'static str,
        state: &'static str,
    },

    /// JSON parsing error
    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// Configuration error
    #[error("config error: {0}")]
    Config(String),
}

impl CompareError {
    /// Credential failures end the session. Everything else leaves the
    /// current step retryable.
    pub fn is_fatal(&self) -> bool {
        matches!(self, CompareError::Credential { .. })
    }
}

/// Result type alias for comparison operations.
pub type Result<T> = std::result::Result<T, CompareError>;
