//! OpenAI implementation of the property AI trait.
//!
//! # Example
//!
//! ```rust,ignore
//! use property_compare::ai::OpenAi;
//!
//! let ai = OpenAi::new("sk-...").with_model("gpt-4o");
//! ```

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::error::{CompareError, Result};
use crate::pipeline::prompts;
use crate::security::SecretString;
use crate::traits::PropertyAi;
use crate::types::{ListingFields, PropertyRecord, RankingResponse, UserPreferences};

/// Default chat model.
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Listing pages can be huge; only this many characters reach the model.
const MAX_CONTENT_CHARS: usize = 12_000;

/// OpenAI-backed `PropertyAi` implementation.
#[derive(Clone)]
pub struct OpenAi {
    client: Client,
    api_key: SecretString,
    model: String,
    base_url: String,
}

impl OpenAi {
    /// Create a client with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: SecretString::new(api_key),
            model: DEFAULT_MODEL.to_string(),
            base_url: "https://api.openai.com/v1".to_string(),
        }
    }

    /// Create from environment variable `OPENAI_API_KEY`.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("OPENAI_API_KEY")
            .map_err(|_| CompareError::Config("OPENAI_API_KEY not set".to_string()))?;
        Ok(Self::new(api_key))
    }

    /// Set the chat model (default: gpt-4o-mini).
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set a custom base URL (for Azure, proxies, etc.).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Get the current model name.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Make a chat completion request.
    async fn chat(&self, system: &str, user: &str) -> Result<String> {
        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: system.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: user.to_string(),
                },
            ],
            temperature: Some(0.0),
            max_tokens: Some(4096),
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .header(
                "Authorization",
                format!("Bearer {}", self.api_key.expose()),
            )
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| CompareError::Ai(e.to_string()))?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED
            || status == reqwest::StatusCode::FORBIDDEN
        {
            return Err(CompareError::Credential {
                service: "openai".to_string(),
            });
        }
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(CompareError::Ai(format!(
                "OpenAI API error ({}): {}",
                status, error_text
            )));
        }

        let chat_response: ChatResponse = response
            .json()
            .await
            .map_err(|e| CompareError::Ai(e.to_string()))?;

        chat_response
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| CompareError::Ai("No response from OpenAI".to_string()))
    }
}

#[async_trait]
impl PropertyAi for OpenAi {
    async fn format_listing(&self, content: &str, url: &str) -> Result<ListingFields> {
        let truncated = truncate_to_chars(content, MAX_CONTENT_CHARS);
        let user = prompts::format_structure_prompt(url, truncated);
        let reply = self.chat(prompts::STRUCTURE_PROMPT, &user).await?;
        parse_reply(&reply)
    }

    async fn rank_alternatives(
        &self,
        reference: &PropertyRecord,
        candidates: &[PropertyRecord],
        prefs: &UserPreferences,
        max_alternatives: usize,
    ) -> Result<RankingResponse> {
        let user = prompts::format_rank_prompt(reference, candidates, prefs, max_alternatives);
        let reply = self.chat(prompts::RANK_PROMPT, &user).await?;
        parse_reply(&reply)
    }
}

/// Cut text to at most `max` characters without splitting a char.
fn truncate_to_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Parse a model reply as JSON, stripping a markdown code fence if the
/// model wrapped its output despite instructions.
fn parse_reply<T: serde::de::DeserializeOwned>(reply: &str) -> Result<T> {
    serde_json::from_str(reply)
        .or_else(|_| {
            let stripped = reply
                .trim()
                .trim_start_matches("```json")
                .trim_start_matches("```")
                .trim_end_matches("```")
                .trim();
            serde_json::from_str(stripped)
        })
        .map_err(|e| CompareError::Ai(format!("Failed to parse model reply: {}", e)))
}

// Request/Response types

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: Option<f32>,
    max_tokens: Option<u32>,
}

#[derive(Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    content: String,
}
