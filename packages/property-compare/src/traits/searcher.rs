//! Listing search trait for discovering comparable properties.
//!
//! The comparator needs candidate listing URLs from somewhere. This trait
//! abstracts over search providers; the production implementation is
//! Tavily, and `MockSearcher` serves scripted hits in tests.

use async_trait::async_trait;
use url::Url;

use crate::error::{CompareError, Result};
use crate::security::SecretString;

/// A discovered listing URL from web search.
#[derive(Debug, Clone)]
pub struct SearchHit {
    /// The discovered URL.
    pub url: Url,

    /// Title of the page (if the search API reported one).
    pub title: Option<String>,

    /// Snippet/description from the search results.
    pub snippet: Option<String>,

    /// Relevance score (0.0-1.0, if provided by the search API).
    pub score: Option<f32>,
}

impl SearchHit {
    /// Create a new hit from a URL.
    pub fn new(url: Url) -> Self {
        Self {
            url,
            title: None,
            snippet: None,
            score: None,
        }
    }

    /// Create from a URL string.
    pub fn from_url(url: &str) -> Option<Self> {
        Url::parse(url).ok().map(Self::new)
    }

    /// Add a title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Add a snippet.
    pub fn with_snippet(mut self, snippet: impl Into<String>) -> Self {
        self.snippet = Some(snippet.into());
        self
    }

    /// Add a relevance score.
    pub fn with_score(mut self, score: f32) -> Self {
        self.score = Some(score);
        self
    }
}

/// Web search over listing portals.
#[async_trait]
pub trait ListingSearcher: Send + Sync {
    /// Search for listings relevant to the query, up to `limit` hits.
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<SearchHit>>;
}

/// Mock searcher for testing.
///
/// Serves hits scripted per query, falling back to a default set so tests
/// don't have to predict the generated query text.
#[derive(Default)]
pub struct MockSearcher {
    hits: std::sync::RwLock<std::collections::HashMap<String, Vec<SearchHit>>>,
    default_hits: std::sync::RwLock<Vec<SearchHit>>,
}

impl MockSearcher {
    /// Create a new mock searcher with no hits.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add hits for an exact query.
    pub fn with_hits(self, query: &str, hits: Vec<SearchHit>) -> Self {
        self.hits.write().unwrap().insert(query.to_string(), hits);
        self
    }

    /// Set the hits returned for any query without a scripted entry.
    pub fn with_default_hits(self, hits: Vec<SearchHit>) -> Self {
        *self.default_hits.write().unwrap() = hits;
        self
    }

    /// Set default hits from URL strings.
    pub fn with_default_urls(self, urls: &[&str]) -> Self {
        let hits: Vec<_> = urls.iter().filter_map(|u| SearchHit::from_url(u)).collect();
        self.with_default_hits(hits)
    }
}

#[async_trait]
impl ListingSearcher for MockSearcher {
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<SearchHit>> {
        let mut hits = self
            .hits
            .read()
            .unwrap()
            .get(query)
            .cloned()
            .unwrap_or_else(|| self.default_hits.read().unwrap().clone());
        hits.truncate(limit);
        Ok(hits)
    }
}

/// Tavily-backed listing searcher.
pub struct TavilySearcher {
    api_key: SecretString,
    client: reqwest::Client,
}

impl TavilySearcher {
    /// Create a new Tavily searcher.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: SecretString::new(api_key),
            client: reqwest::Client::new(),
        }
    }

    /// Create from the `TAVILY_API_KEY` environment variable.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("TAVILY_API_KEY")
            .map_err(|_| CompareError::Config("TAVILY_API_KEY not set".to_string()))?;
        Ok(Self::new(api_key))
    }
}

#[async_trait]
impl ListingSearcher for TavilySearcher {
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<SearchHit>> {
        #[derive(serde::Serialize)]
        struct Request {
            query: String,
            search_depth: String,
            max_results: usize,
        }

        #[derive(serde::Deserialize)]
        struct Response {
            results: Vec<TavilyResult>,
        }

        #[derive(serde::Deserialize)]
        struct TavilyResult {
            url: String,
            title: Option<String>,
            content: Option<String>,
            score: Option<f32>,
        }

        let request = Request {
            query: query.to_string(),
            search_depth: "basic".to_string(),
            max_results: limit,
        };

        let response = self
            .client
            .post("https://api.tavily.com/search")
            .header("Content-Type", "application/json")
            .header("Authorization", format!("Bearer {}", self.api_key.expose()))
            .json(&request)
            .send()
            .await
            .map_err(|e| CompareError::Search(e.to_string()))?;

        let status = response.status();
        if status.as_u16() == 401 || status.as_u16() == 403 {
            return Err(CompareError::Credential {
                service: "tavily".to_string(),
            });
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CompareError::Search(format!(
                "Tavily API error ({}): {}",
                status, body
            )));
        }

        let tavily_response: Response = response
            .json()
            .await
            .map_err(|e| CompareError::Search(e.to_string()))?;

        let hits = tavily_response
            .results
            .into_iter()
            .filter_map(|r| {
                let url = parse_hit_url(&r.url)?;
                let mut hit = SearchHit::new(url);
                if let Some(title) = r.title {
                    hit = hit.with_title(title);
                }
                if let Some(content) = r.content {
                    hit = hit.with_snippet(content);
                }
                if let Some(score) = r.score {
                    hit = hit.with_score(score);
                }
                Some(hit)
            })
            .collect();

        Ok(hits)
    }
}

/// Parse a search result URL, completing scheme-less links to `https`.
///
/// Providers occasionally return bare hosts (`www.iproperty.com.my/...`) or
/// protocol-relative links (`//...`). A bare path can only be completed when
/// the link itself names its portal; anything else that fails to parse is
/// dropped rather than surfaced as an error.
fn parse_hit_url(raw: &str) -> Option<Url> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    let completed = if raw.starts_with("http://") || raw.starts_with("https://") {
        raw.to_string()
    } else if let Some(rest) = raw.strip_prefix("//") {
        format!("https://{}", rest)
    } else if raw.starts_with('/') {
        if raw.contains("iproperty") {
            format!("https://www.iproperty.com.my{}", raw)
        } else if raw.contains("propertyguru") {
            format!("https://www.propertyguru.com.my{}", raw)
        } else {
            return None;
        }
    } else {
        format!("https://{}", raw)
    };
    let url = Url::parse(&completed).ok()?;
    url.host_str()?;
    Some(url)
}
