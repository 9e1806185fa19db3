//! Environment configuration for the CLI.

use anyhow::{Context, Result};
use property_compare::ai::DEFAULT_MODEL;

/// API credentials and model choice, read from the environment after
/// `.env` has been applied.
pub struct CliConfig {
    pub openai_api_key: String,
    pub firecrawl_api_key: String,
    pub tavily_api_key: String,
    pub openai_model: String,
}

impl CliConfig {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            openai_api_key: std::env::var("OPENAI_API_KEY")
                .context("OPENAI_API_KEY must be set")?,
            firecrawl_api_key: std::env::var("FIRECRAWL_API_KEY")
                .context("FIRECRAWL_API_KEY must be set")?,
            tavily_api_key: std::env::var("TAVILY_API_KEY")
                .context("TAVILY_API_KEY must be set")?,
            openai_model: std::env::var("OPENAI_MODEL")
                .unwrap_or_else(|_| DEFAULT_MODEL.to_string()),
        })
    }
}
