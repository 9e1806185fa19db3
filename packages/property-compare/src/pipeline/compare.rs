//! Comparison stage: find alternatives, structure them, rank them.

use std::collections::HashSet;
use tracing::{info, warn};

use crate::error::Result;
use crate::pipeline::{fetch, format};
use crate::traits::{ListingScraper, ListingSearcher, PropertyAi, SearchHit};
use crate::types::{
    CompareConfig, ComparisonResult, PropertyRecord, RankedAlternative, RankedChoice,
    TenurePreference, UserPreferences,
};

/// Build the web-search query for alternatives to the reference listing.
///
/// Known reference attributes narrow the search; unknown ones simply do not
/// appear. The portal list is appended as `site:` filters.
pub fn build_search_query(
    reference: &PropertyRecord,
    prefs: &UserPreferences,
    config: &CompareConfig,
) -> String {
    let mut parts: Vec<String> = Vec::new();

    if let Some(bedrooms) = reference.bedrooms {
        parts.push(format!("{}-bedroom", bedrooms));
    }

    parts.push(
        reference
            .property_type
            .clone()
            .unwrap_or_else(|| "property".to_string()),
    );

    if let Some(kind) = reference.listing_kind {
        parts.push(kind.to_string().to_lowercase());
    }

    match &reference.location {
        Some(location) => parts.push(location.clone()),
        None => parts.push("Malaysia".to_string()),
    }

    parts.push(format!("under RM{}", prefs.budget.max_myr));

    if prefs.tenure_preference == TenurePreference::FreeholdOnly {
        parts.push("freehold".to_string());
    }
    if prefs.near_transit {
        parts.push("near LRT MRT".to_string());
    }
    if prefs.near_international_schools {
        parts.push("near international school".to_string());
    }

    let sites = config
        .supported_portals
        .iter()
        .map(|portal| format!("site:{}", portal))
        .collect::<Vec<_>>()
        .join(" OR ");
    if !sites.is_empty() {
        parts.push(sites);
    }

    parts.join(" ")
}

/// Run a full comparison of the reference listing against the market.
///
/// Search, fetch, and structuring failures on individual candidates are
/// skipped. Finding nothing comparable is a soft outcome: the result comes
/// back with no alternatives and a notice rather than an error. Only
/// credential failures abort the run.
pub async fn compare_listings<S, A, W>(
    scraper: &S,
    ai: &A,
    searcher: &W,
    config: &CompareConfig,
    reference: &PropertyRecord,
    prefs: &UserPreferences,
) -> Result<ComparisonResult>
where
    S: ListingScraper + ?Sized,
    A: PropertyAi + ?Sized,
    W: ListingSearcher + ?Sized,
{
    let query = build_search_query(reference, prefs, config);
    info!("Searching for alternatives: {}", query);

    let hits = searcher.search(&query, config.search_limit).await?;
    let candidate_urls = filter_candidate_urls(&hits, &reference.source_url);
    info!(
        "{} candidate URLs from {} search hits",
        candidate_urls.len(),
        hits.len()
    );

    let candidates = backfill_candidates(scraper, ai, config, &candidate_urls).await?;

    if candidates.is_empty() {
        warn!("No alternative listings could be retrieved");
        return Ok(ComparisonResult::empty(
            reference.clone(),
            "No comparable listings could be retrieved right now. \
             The reference property summary is still available.",
        ));
    }

    let response = ai
        .rank_alternatives(reference, &candidates, prefs, config.max_alternatives)
        .await?;

    let alternatives = resolve_ranking(response.ranking, &candidates, config.max_alternatives);
    let notice = if alternatives.is_empty() {
        Some("The ranking step produced no usable alternatives.".to_string())
    } else {
        None
    };

    info!(
        "Comparison finished with {} ranked alternatives",
        alternatives.len()
    );

    Ok(ComparisonResult {
        reference: reference.clone(),
        alternatives,
        recommendation: response.recommendation,
        notice,
    })
}

/// Drop the reference listing itself and duplicate hits, keeping search
/// order otherwise.
fn filter_candidate_urls(hits: &[SearchHit], reference_url: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut urls = Vec::new();

    for hit in hits {
        let url = hit.url.as_str();
        if same_listing(url, reference_url) {
            continue;
        }
        if seen.insert(normalize_listing_url(url).to_string()) {
            urls.push(url.to_string());
        }
    }

    urls
}

fn same_listing(a: &str, b: &str) -> bool {
    normalize_listing_url(a) == normalize_listing_url(b)
}

/// Strip scheme and trailing slash so model-echoed links still match.
fn normalize_listing_url(url: &str) -> &str {
    let url = url.trim();
    let url = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
        .unwrap_or(url);
    url.trim_end_matches('/')
}

/// Fetch and structure candidate URLs until the backfill target is met.
///
/// Non-fatal failures skip the candidate; credential failures abort.
async fn backfill_candidates<S, A>(
    scraper: &S,
    ai: &A,
    config: &CompareConfig,
    urls: &[String],
) -> Result<Vec<PropertyRecord>>
where
    S: ListingScraper + ?Sized,
    A: PropertyAi + ?Sized,
{
    let target = config.backfill_target();
    let mut candidates = Vec::new();

    for url in urls {
        if candidates.len() >= target {
            break;
        }

        let raw = match fetch::fetch_listing(scraper, url, config).await {
            Ok(raw) => raw,
            Err(err) if err.is_fatal() => return Err(err),
            Err(err) => {
                warn!("Skipping candidate {}: {}", url, err);
                continue;
            }
        };

        // Structuring degrades to the heuristic fallback internally, so an
        // error here is already fatal.
        let record = format::format_listing(ai, &raw).await?;
        candidates.push(record);
    }

    Ok(candidates)
}

/// Map ranked URLs back to candidate records, best rank first.
///
/// Entries pointing at listings we never fetched are dropped. Since the
/// candidate set never contains the reference, the output cannot either.
fn resolve_ranking(
    choices: Vec<RankedChoice>,
    candidates: &[PropertyRecord],
    max_alternatives: usize,
) -> Vec<RankedAlternative> {
    let mut seen = HashSet::new();
    let mut alternatives = Vec::new();

    for choice in choices {
        if !seen.insert(normalize_listing_url(&choice.url).to_string()) {
            continue;
        }

        let Some(record) = candidates
            .iter()
            .find(|candidate| same_listing(&candidate.source_url, &choice.url))
        else {
            warn!("Ranking referenced an unknown listing: {}", choice.url);
            continue;
        };

        alternatives.push(RankedAlternative {
            record: record.clone(),
            rank: choice.rank,
            rationale: choice.rationale,
        });
    }

    alternatives.sort_by_key(|alternative| alternative.rank);
    alternatives.truncate(max_alternatives);
    alternatives
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{BudgetRange, ListingKind, Purpose};

    fn reference() -> PropertyRecord {
        let mut record = PropertyRecord::partial("https://www.iproperty.com.my/sale/ref");
        record.bedrooms = Some(3);
        record.property_type = Some("condominium".to_string());
        record.listing_kind = Some(ListingKind::Sale);
        record.location = Some("Kota Damansara".to_string());
        record
    }

    fn prefs() -> UserPreferences {
        UserPreferences::new(
            Purpose::RentalInvestment,
            BudgetRange::new(500_000, 700_000),
        )
    }

    #[test]
    fn test_query_uses_known_reference_fields() {
        let query = build_search_query(&reference(), &prefs(), &CompareConfig::default());

        assert!(query.contains("3-bedroom condominium for sale Kota Damansara"));
        assert!(query.contains("under RM700000"));
        assert!(query.contains("site:iproperty.com.my OR site:propertyguru.com.my"));
    }

    #[test]
    fn test_query_falls_back_to_generic_terms() {
        let bare = PropertyRecord::partial("https://www.iproperty.com.my/sale/ref");
        let query = build_search_query(&bare, &prefs(), &CompareConfig::default());

        assert!(query.starts_with("property Malaysia under RM700000"));
        assert!(!query.contains("null"));
    }

    #[test]
    fn test_query_reflects_preference_flags() {
        let prefs = prefs()
            .with_tenure_preference(TenurePreference::FreeholdOnly)
            .with_near_transit(true)
            .with_near_international_schools(true);

        let query = build_search_query(&reference(), &prefs, &CompareConfig::default());

        assert!(query.contains("freehold"));
        assert!(query.contains("near LRT MRT"));
        assert!(query.contains("near international school"));
    }

    #[test]
    fn test_filter_drops_reference_and_duplicates() {
        let hits = vec![
            SearchHit::from_url("https://www.iproperty.com.my/sale/ref/").unwrap(),
            SearchHit::from_url("https://www.iproperty.com.my/sale/alt-1").unwrap(),
            SearchHit::from_url("https://www.iproperty.com.my/sale/alt-1/").unwrap(),
            SearchHit::from_url("https://www.iproperty.com.my/sale/alt-2").unwrap(),
        ];

        let urls = filter_candidate_urls(&hits, "https://www.iproperty.com.my/sale/ref");

        assert_eq!(
            urls,
            vec![
                "https://www.iproperty.com.my/sale/alt-1",
                "https://www.iproperty.com.my/sale/alt-2",
            ]
        );
    }

    #[test]
    fn test_resolve_ranking_orders_and_drops_unknowns() {
        let mut alt_1 = PropertyRecord::partial("https://www.iproperty.com.my/sale/alt-1");
        alt_1.price_myr = Some(600_000);
        let alt_2 = PropertyRecord::partial("https://www.iproperty.com.my/sale/alt-2");
        let candidates = vec![alt_1, alt_2];

        let choices = vec![
            RankedChoice {
                url: "https://www.iproperty.com.my/sale/alt-2".to_string(),
                rank: 2,
                rationale: "further from transit".to_string(),
            },
            RankedChoice {
                url: "https://www.iproperty.com.my/sale/invented".to_string(),
                rank: 3,
                rationale: "does not exist".to_string(),
            },
            RankedChoice {
                url: "https://www.iproperty.com.my/sale/alt-1/".to_string(),
                rank: 1,
                rationale: "better rental yield".to_string(),
            },
        ];

        let ranked = resolve_ranking(choices, &candidates, 2);

        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].rank, 1);
        assert_eq!(ranked[0].record.price_myr, Some(600_000));
        assert_eq!(ranked[1].rank, 2);
    }

    #[test]
    fn test_resolve_ranking_truncates_to_limit() {
        let candidates: Vec<PropertyRecord> = (1..=4)
            .map(|i| {
                PropertyRecord::partial(format!("https://www.iproperty.com.my/sale/alt-{}", i))
            })
            .collect();

        let choices: Vec<RankedChoice> = (1..=4)
            .map(|i| RankedChoice {
                url: format!("https://www.iproperty.com.my/sale/alt-{}", i),
                rank: i as u8,
                rationale: "fits".to_string(),
            })
            .collect();

        let ranked = resolve_ranking(choices, &candidates, 2);
        assert_eq!(ranked.len(), 2);
    }

    #[test]
    fn test_resolve_ranking_matches_scheme_less_echoes() {
        let candidates = vec![PropertyRecord::partial(
            "https://www.propertyguru.com.my/property-listing/casa-indah-2-77",
        )];

        let choices = vec![RankedChoice {
            url: "www.propertyguru.com.my/property-listing/casa-indah-2-77".to_string(),
            rank: 1,
            rationale: "closer to the LRT".to_string(),
        }];

        let ranked = resolve_ranking(choices, &candidates, 2);
        assert_eq!(ranked.len(), 1);
        assert_eq!(
            ranked[0].record.source_url,
            "https://www.propertyguru.com.my/property-listing/casa-indah-2-77"
        );
    }
}
