//! Integration tests for the full comparison flow.
//!
//! These tests drive the session state machine over scripted mocks:
//! 1. Submit a reference listing URL
//! 2. Submit buyer preferences
//! 3. Inspect the ranked comparison result
//!
//! No network access; the scraper, AI, and search capabilities are all
//! scripted.

use property_compare::pipeline::fetch_listing;
use property_compare::testing::{MockAi, MockAiCall, MockScraper, ScriptedFailure};
use property_compare::{
    BudgetRange, CompareConfig, CompareError, Completeness, ListingFields, ListingKind,
    MockSearcher, Pipeline, Purpose, RankedChoice, RankingResponse, Session, Tenure,
    UserPreferences,
};

const REF_URL: &str = "https://www.iproperty.com.my/property/casa-indah-2/sale-1001";
const ALT_1_URL: &str = "https://www.propertyguru.com.my/listing/vista-damansara-2002";
const ALT_2_URL: &str = "https://www.iproperty.com.my/property/palm-spring-3003/sale-3003";

const REF_PAGE: &str = "# Casa Indah 2, Kota Damansara\n\n\
    3-bedroom condominium for sale near the LRT.\n\
    RM 650,000 | 3 Beds | 2 Baths | 1,250 sq ft | Freehold\n\
    Facilities: swimming pool, gym, security";

fn reference_fields() -> ListingFields {
    ListingFields {
        title: Some("Casa Indah 2".to_string()),
        location: Some("Kota Damansara".to_string()),
        price_myr: Some(650_000),
        listing_kind: Some(ListingKind::Sale),
        property_type: Some("condominium".to_string()),
        bedrooms: Some(3),
        bathrooms: Some(2),
        built_up_sqft: Some(1_250),
        tenure: Some(Tenure::Freehold),
        facilities: vec!["swimming pool".to_string(), "gym".to_string()],
        ..Default::default()
    }
}

fn investment_prefs() -> UserPreferences {
    UserPreferences::new(
        Purpose::RentalInvestment,
        BudgetRange::new(500_000, 700_000),
    )
    .with_near_transit(true)
}

/// Scraper with the reference page and both alternative pages scripted.
fn full_scraper() -> MockScraper {
    MockScraper::new()
        .with_page(REF_URL, REF_PAGE)
        .with_page(ALT_1_URL, "# Vista Damansara\n\nRM 620,000 | 3 Beds | 1,180 sq ft")
        .with_page(ALT_2_URL, "# Palm Spring\n\nRM 680,000 | 3 Beds | 1,300 sq ft")
}

/// AI with structuring replies for all three pages and a scripted ranking.
fn full_ai() -> MockAi {
    MockAi::new()
        .with_listing(REF_URL, reference_fields())
        .with_listing(
            ALT_1_URL,
            ListingFields {
                title: Some("Vista Damansara".to_string()),
                price_myr: Some(620_000),
                bedrooms: Some(3),
                built_up_sqft: Some(1_180),
                ..Default::default()
            },
        )
        .with_listing(
            ALT_2_URL,
            ListingFields {
                title: Some("Palm Spring".to_string()),
                price_myr: Some(680_000),
                bedrooms: Some(3),
                built_up_sqft: Some(1_300),
                ..Default::default()
            },
        )
        .with_ranking(RankingResponse {
            ranking: vec![
                RankedChoice {
                    url: ALT_1_URL.to_string(),
                    rank: 1,
                    rationale: "Lower entry price and comparable size give it the \
                                stronger rental yield for an investment buyer"
                        .to_string(),
                },
                RankedChoice {
                    url: ALT_2_URL.to_string(),
                    rank: 2,
                    rationale: "Bigger built-up, but the premium stretches the \
                                investment budget"
                        .to_string(),
                },
            ],
            recommendation: "## Market Value Assessment\n\nPriced near the area median.\n\n\
                             ## Property Comparison\n\nVista Damansara undercuts it.\n\n\
                             ## Investment Potential\n\nSolid rental pool near the LRT.\n\n\
                             ## Expert Recommendation\n\nNegotiate toward RM 630k."
                .to_string(),
        })
}

fn full_session() -> Session<MockScraper, MockAi, MockSearcher> {
    let searcher = MockSearcher::new().with_default_urls(&[ALT_1_URL, ALT_2_URL, REF_URL]);
    Session::new(Pipeline::new(full_scraper(), full_ai(), searcher))
}

// ---------------------------------------------------------------------------
// Structuring and fallback
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_structuring_failure_recovers_price_as_partial() {
    let scraper = MockScraper::new().with_page(REF_URL, "Asking price RM 450,000, freehold unit");
    let ai = MockAi::new().with_listing_failure(REF_URL, ScriptedFailure::Unavailable);
    let mut session = Session::new(Pipeline::new(scraper, ai, MockSearcher::new()));

    let record = session.submit_url(REF_URL).await.unwrap();

    assert_eq!(record.completeness, Completeness::Partial);
    assert_eq!(record.price_myr, Some(450_000));
    assert_eq!(record.tenure, Some(Tenure::Freehold));
    // Degraded, but the session still advanced.
    assert_eq!(session.state().name(), "awaiting_preferences");
}

#[tokio::test]
async fn test_rent_listing_inferred_from_monthly_price() {
    let scraper =
        MockScraper::new().with_page(REF_URL, "Fully furnished studio, RM 2,300 /mo, KLCC view");
    let ai = MockAi::new().with_listing_failure(REF_URL, ScriptedFailure::Unavailable);
    let mut session = Session::new(Pipeline::new(scraper, ai, MockSearcher::new()));

    let record = session.submit_url(REF_URL).await.unwrap();

    assert_eq!(record.listing_kind, Some(ListingKind::Rent));
    assert_eq!(record.price_myr, Some(2_300));
}

#[tokio::test]
async fn test_credential_failure_is_fatal_not_partial() {
    let scraper = MockScraper::new().with_page(REF_URL, REF_PAGE);
    let ai = MockAi::new().with_all_listings_failing(ScriptedFailure::Credential);
    let mut session = Session::new(Pipeline::new(scraper, ai, MockSearcher::new()));

    let err = session.submit_url(REF_URL).await.unwrap_err();

    assert!(matches!(err, CompareError::Credential { .. }));
    assert!(err.is_fatal());
    // No partial record was produced and the session did not advance.
    assert_eq!(session.state().name(), "awaiting_url");
    assert!(session.reference().is_none());
}

// ---------------------------------------------------------------------------
// Fetching
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_repeat_fetch_is_idempotent() {
    let scraper = full_scraper();
    let config = CompareConfig::default();

    let first = fetch_listing(&scraper, REF_URL, &config).await.unwrap();
    let second = fetch_listing(&scraper, REF_URL, &config).await.unwrap();

    assert_eq!(first.content_hash(), second.content_hash());
    assert_eq!(scraper.scrape_count(REF_URL), 2);

    // Same structural outcome end to end as well.
    let ai = full_ai();
    let pipeline = Pipeline::new(scraper, ai, MockSearcher::new());
    let record_a = pipeline.fetch_and_format(REF_URL).await.unwrap();
    let record_b = pipeline.fetch_and_format(REF_URL).await.unwrap();

    assert_eq!(record_a, record_b);
    assert_eq!(record_a.populated_fields(), record_b.populated_fields());
}

#[tokio::test]
async fn test_invalid_url_rejected_before_scraping() {
    let scraper = MockScraper::new();
    let mut session = Session::new(Pipeline::new(
        scraper.clone(),
        MockAi::new(),
        MockSearcher::new(),
    ));

    let err = session.submit_url("not a url").await.unwrap_err();

    assert!(matches!(err, CompareError::InvalidUrl { .. }));
    assert!(scraper.calls().is_empty());
}

// ---------------------------------------------------------------------------
// Comparison
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_end_to_end_investment_comparison() {
    let mut session = full_session();

    let record = session.submit_url(REF_URL).await.unwrap();
    assert_eq!(record.completeness, Completeness::Structured);
    assert_eq!(record.price_myr, Some(650_000));
    assert_eq!(record.tenure, Some(Tenure::Freehold));
    assert_eq!(record.property_type.as_deref(), Some("condominium"));
    assert_eq!(record.bedrooms, Some(3));

    let result = session.submit_preferences(investment_prefs()).await.unwrap();

    assert!(!result.alternatives.is_empty());
    assert!(result.notice.is_none());
    assert_eq!(result.alternatives[0].rank, 1);
    assert!(result.alternatives[0].rationale.contains("investment"));
    assert!(result.recommendation.contains("## Expert Recommendation"));
    assert_eq!(session.state().name(), "showing_result");
}

#[tokio::test]
async fn test_reference_url_excluded_from_candidates() {
    let mut session = full_session();
    session.submit_url(REF_URL).await.unwrap();

    let result = session.submit_preferences(investment_prefs()).await.unwrap();

    for alternative in &result.alternatives {
        assert_ne!(alternative.record.source_url, REF_URL);
    }
    assert_eq!(result.reference.source_url, REF_URL);
}

#[tokio::test]
async fn test_reference_not_refetched_during_backfill() {
    let scraper = full_scraper();
    let searcher = MockSearcher::new().with_default_urls(&[REF_URL, ALT_1_URL, ALT_2_URL]);
    let mut session = Session::new(Pipeline::new(scraper.clone(), full_ai(), searcher));

    session.submit_url(REF_URL).await.unwrap();
    session.submit_preferences(investment_prefs()).await.unwrap();

    // Once for step one; the search hit pointing back at it was dropped.
    assert_eq!(scraper.scrape_count(REF_URL), 1);
}

#[tokio::test]
async fn test_no_search_hits_is_soft_outcome() {
    let scraper = MockScraper::new().with_page(REF_URL, REF_PAGE);
    let ai = MockAi::new().with_listing(REF_URL, reference_fields());
    let mut session = Session::new(Pipeline::new(scraper, ai.clone(), MockSearcher::new()));

    session.submit_url(REF_URL).await.unwrap();
    let result = session.submit_preferences(investment_prefs()).await.unwrap();

    assert!(result.alternatives.is_empty());
    assert!(result.notice.is_some());
    assert_eq!(session.state().name(), "showing_result");

    // The ranking step never ran.
    assert!(!ai
        .calls()
        .iter()
        .any(|call| matches!(call, MockAiCall::RankAlternatives { .. })));
}

#[tokio::test]
async fn test_unreachable_candidates_are_skipped() {
    // Only one of the two candidate pages is reachable.
    let scraper = MockScraper::new()
        .with_page(REF_URL, REF_PAGE)
        .with_page(ALT_1_URL, "# Vista Damansara\n\nRM 620,000")
        .with_failure(ALT_2_URL, ScriptedFailure::Unavailable);
    let searcher = MockSearcher::new().with_default_urls(&[ALT_1_URL, ALT_2_URL]);
    let mut session = Session::new(Pipeline::new(scraper, full_ai(), searcher));

    session.submit_url(REF_URL).await.unwrap();
    let result = session.submit_preferences(investment_prefs()).await.unwrap();

    assert_eq!(result.alternatives.len(), 1);
    assert_eq!(result.alternatives[0].record.source_url, ALT_1_URL);
}

#[tokio::test]
async fn test_empty_required_facilities_comparison_succeeds() {
    let mut session = full_session();
    session.submit_url(REF_URL).await.unwrap();

    let prefs = investment_prefs();
    assert!(prefs.required_facilities.is_empty());

    let result = session.submit_preferences(prefs).await.unwrap();
    assert!(!result.alternatives.is_empty());
}

// ---------------------------------------------------------------------------
// Session flow
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_reset_equivalence_from_every_state() {
    // Fresh session result, as the baseline.
    let mut baseline = full_session();
    baseline.submit_url(REF_URL).await.unwrap();
    let baseline_record = baseline.reference().unwrap().clone();

    // Reset from awaiting_url.
    let mut session = full_session();
    session.reset();
    assert_eq!(session.state().name(), "awaiting_url");

    // Reset from awaiting_preferences.
    session.submit_url(REF_URL).await.unwrap();
    session.reset();
    assert_eq!(session.state().name(), "awaiting_url");
    assert!(session.reference().is_none());

    // Reset from showing_result.
    session.submit_url(REF_URL).await.unwrap();
    session.submit_preferences(investment_prefs()).await.unwrap();
    session.reset();
    assert_eq!(session.state().name(), "awaiting_url");
    assert!(session.result().is_none());

    // A reset session behaves like a fresh one.
    let record = session.submit_url(REF_URL).await.unwrap();
    assert_eq!(record, baseline_record);
}

#[tokio::test]
async fn test_refine_keeps_reference_discards_result() {
    let mut session = full_session();
    session.submit_url(REF_URL).await.unwrap();
    let first = session.submit_preferences(investment_prefs()).await.unwrap();
    assert!(!first.alternatives.is_empty());

    session.refine().unwrap();

    assert_eq!(session.state().name(), "awaiting_preferences");
    assert_eq!(session.reference().unwrap().source_url, REF_URL);
    assert!(session.result().is_none());

    // Different criteria this time; the reference is reused, not refetched.
    let own_stay = UserPreferences::new(Purpose::OwnStay, BudgetRange::new(550_000, 700_000));
    let second = session.submit_preferences(own_stay).await.unwrap();
    assert_eq!(second.reference.source_url, REF_URL);
}
