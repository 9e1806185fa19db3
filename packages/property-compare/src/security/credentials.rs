//! API key handling with secure memory.
//!
//! The pipeline holds keys for three upstream services (OpenAI, Tavily,
//! Firecrawl). Wrapping them keeps a mistyped `{:?}` in a log line from
//! leaking a key.

use secrecy::{ExposeSecret, SecretBox};
use std::fmt;

/// An API key that won't be logged or displayed.
///
/// Backed by `secrecy::SecretBox`, so the key is zeroized on drop and
/// redacted in `Debug` and `Display` output.
pub struct SecretString(SecretBox<str>);

impl SecretString {
    /// Wrap a key.
    pub fn new(value: impl Into<String>) -> Self {
        Self(SecretBox::new(Box::from(value.into().as_str())))
    }

    /// Expose the key for use in a request.
    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }
}

impl Clone for SecretString {
    fn clone(&self) -> Self {
        Self::new(self.expose().to_string())
    }
}

impl fmt::Debug for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

impl fmt::Display for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}
