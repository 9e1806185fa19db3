//! Comparison output types.

use serde::{Deserialize, Serialize};

use super::listing::PropertyRecord;

/// One alternative listing, ranked against the reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedAlternative {
    pub record: PropertyRecord,

    /// 1 = strongest alternative.
    pub rank: u8,

    /// Why this listing fits the stated preferences.
    pub rationale: String,
}

/// Outcome of a full comparison run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonResult {
    pub reference: PropertyRecord,

    /// Ordered best-first. May be empty, in which case `notice` says why.
    pub alternatives: Vec<RankedAlternative>,

    /// Markdown expert analysis.
    pub recommendation: String,

    /// Soft outcome note (e.g. nothing comparable found). An empty
    /// `alternatives` with a notice is a normal result, not a failure.
    pub notice: Option<String>,
}

impl ComparisonResult {
    /// A result with no alternatives and an explanatory notice.
    pub fn empty(reference: PropertyRecord, notice: impl Into<String>) -> Self {
        Self {
            reference,
            alternatives: vec![],
            recommendation: String::new(),
            notice: Some(notice.into()),
        }
    }
}

/// Parse target for the ranking reply.
#[derive(Debug, Clone, Deserialize)]
pub struct RankingResponse {
    #[serde(default)]
    pub ranking: Vec<RankedChoice>,

    /// Markdown expert analysis of the reference against the market.
    pub recommendation: String,
}

/// One entry in the model's ranking. `url` ties the entry back to a
/// fetched candidate record.
#[derive(Debug, Clone, Deserialize)]
pub struct RankedChoice {
    pub url: String,
    pub rank: u8,
    pub rationale: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_result_carries_notice() {
        let reference = PropertyRecord::partial("https://example.com/ref");
        let result = ComparisonResult::empty(reference, "no comparable listings found");

        assert!(result.alternatives.is_empty());
        assert_eq!(
            result.notice.as_deref(),
            Some("no comparable listings found")
        );
    }

    #[test]
    fn test_ranking_response_parses() {
        let json = r###"{
            "ranking": [
                {"url": "https://example.com/b", "rank": 1, "rationale": "closer to the LRT"},
                {"url": "https://example.com/c", "rank": 2, "rationale": "cheaper per sqft"}
            ],
            "recommendation": "## Market Value\n..."
        }"###;

        let parsed: RankingResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.ranking.len(), 2);
        assert_eq!(parsed.ranking[0].rank, 1);
        assert!(parsed.recommendation.starts_with("## Market Value"));
    }

    #[test]
    fn test_ranking_response_tolerates_missing_ranking() {
        let json = r#"{"recommendation": "nothing to rank"}"#;

        let parsed: RankingResponse = serde_json::from_str(json).unwrap();
        assert!(parsed.ranking.is_empty());
    }
}
