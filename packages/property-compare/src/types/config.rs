//! Pipeline configuration.

use serde::{Deserialize, Serialize};

/// Tunables for the comparison pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompareConfig {
    /// How many ranked alternatives to ask for. Default: 2.
    pub max_alternatives: usize,

    /// How many search hits to consider before backfill. Default: 8.
    pub search_limit: usize,

    /// Hosts treated as supported listing portals. Other hosts still get
    /// fetched; they just trigger an extraction-quality warning.
    pub supported_portals: Vec<String>,
}

impl Default for CompareConfig {
    fn default() -> Self {
        Self {
            max_alternatives: 2,
            search_limit: 8,
            supported_portals: vec![
                "iproperty.com.my".to_string(),
                "propertyguru.com.my".to_string(),
            ],
        }
    }
}

impl CompareConfig {
    /// Create a config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set how many alternatives to rank.
    pub fn with_max_alternatives(mut self, max: usize) -> Self {
        self.max_alternatives = max;
        self
    }

    /// Set how many search hits to consider.
    pub fn with_search_limit(mut self, limit: usize) -> Self {
        self.search_limit = limit;
        self
    }

    /// Replace the supported portal list.
    pub fn with_supported_portals(
        mut self,
        portals: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        self.supported_portals = portals.into_iter().map(|p| p.into()).collect();
        self
    }

    /// How many candidates to backfill before ranking. Gives the ranker
    /// some slack beyond the requested alternative count.
    pub fn backfill_target(&self) -> usize {
        self.max_alternatives.max(1) * 2
    }
}
