//! Heuristic field extraction for when the primary structuring path fails.
//!
//! Best-effort regex and keyword sifting over the raw markdown. Produces
//! `Partial` records: whatever these patterns recover is kept, everything
//! else stays unknown. Listing pages on Malaysian portals are regular
//! enough that price, bed/bath counts, and tenure usually survive.

use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

use crate::types::listing::{Furnishing, ListingKind, PropertyRecord, RawListing, Tenure};

static RE_PRICE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"RM\s*([\d,]+)").unwrap());
static RE_RENT_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)/\s*mo\b|per\s+month|monthly\s+rent|for\s+rent").unwrap());
static RE_SALE_MARKER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)for\s+sale").unwrap());
static RE_BEDROOMS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(\d+)[\s-]*bed(?:room)?s?\b").unwrap());
static RE_BATHROOMS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(\d+)[\s-]*bath(?:room)?s?\b").unwrap());
static RE_SQFT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)([\d,]+)\s*sq\.?\s*ft\b").unwrap());
static RE_TITLE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^#\s+(.+)$").unwrap());
static RE_IMAGE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"https?://\S+?\.(?:jpg|jpeg|png|gif|webp)\b").unwrap());

/// Facility keywords scanned for, in canonical casing.
const FACILITY_KEYWORDS: &[&str] = &[
    "swimming pool",
    "gym",
    "security",
    "parking",
    "playground",
    "bbq",
    "sauna",
    "tennis court",
    "squash court",
    "mini market",
    "surau",
    "jogging track",
    "club house",
];

/// Property type keywords in precedence order; the canonical name is kept.
const PROPERTY_TYPE_KEYWORDS: &[(&str, &str)] = &[
    ("condominium", "condominium"),
    ("condo", "condominium"),
    ("serviced residence", "serviced residence"),
    ("apartment", "apartment"),
    ("semi-detached", "semi-detached"),
    ("semi-d", "semi-detached"),
    ("terrace", "terrace"),
    ("bungalow", "bungalow"),
    ("townhouse", "townhouse"),
    ("studio", "studio"),
    ("flat", "flat"),
];

/// Build a `Partial` record from whatever the heuristics recover.
pub fn extract_partial(raw: &RawListing) -> PropertyRecord {
    let content = raw.content.as_str();
    let lower = content.to_lowercase();

    let mut record = PropertyRecord::partial(&raw.url);
    record.title = first_heading(content).or_else(|| raw.title.clone());
    record.price_myr = extract_price(content);
    record.listing_kind = infer_listing_kind(content);
    record.property_type = extract_property_type(&lower);
    record.bedrooms = first_capture(&RE_BEDROOMS, content).and_then(|s| s.parse().ok());
    record.bathrooms = first_capture(&RE_BATHROOMS, content).and_then(|s| s.parse().ok());
    record.built_up_sqft =
        first_capture(&RE_SQFT, content).and_then(|s| s.replace(',', "").parse().ok());
    record.tenure = extract_tenure(&lower);
    record.furnishing = extract_furnishing(&lower);
    record.facilities = extract_facilities(&lower);
    record.main_image = RE_IMAGE.find(content).map(|m| m.as_str().to_string());

    debug!(
        "Heuristic extraction recovered {} fields from {}",
        record.populated_fields().len(),
        raw.url
    );

    record
}

fn first_capture(re: &Regex, content: &str) -> Option<String> {
    re.captures(content)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}

fn first_heading(content: &str) -> Option<String> {
    first_capture(&RE_TITLE, content).map(|t| t.trim().to_string())
}

/// First `RM` amount that parses to a positive integer.
fn extract_price(content: &str) -> Option<u64> {
    RE_PRICE
        .captures_iter(content)
        .filter_map(|c| c.get(1))
        .filter_map(|m| m.as_str().replace(',', "").parse::<u64>().ok())
        .find(|&price| price > 0)
}

/// Rent/sale markers in the page text. No marker means unknown; a price
/// alone never decides this.
fn infer_listing_kind(content: &str) -> Option<ListingKind> {
    if RE_RENT_MARKER.is_match(content) {
        Some(ListingKind::Rent)
    } else if RE_SALE_MARKER.is_match(content) {
        Some(ListingKind::Sale)
    } else {
        None
    }
}

fn extract_property_type(lower: &str) -> Option<String> {
    PROPERTY_TYPE_KEYWORDS
        .iter()
        .find(|(keyword, _)| lower.contains(keyword))
        .map(|(_, canonical)| canonical.to_string())
}

/// Tenure keyword, but only when unambiguous.
fn extract_tenure(lower: &str) -> Option<Tenure> {
    match (lower.contains("freehold"), lower.contains("leasehold")) {
        (true, false) => Some(Tenure::Freehold),
        (false, true) => Some(Tenure::Leasehold),
        _ => None,
    }
}

fn extract_furnishing(lower: &str) -> Option<Furnishing> {
    if lower.contains("unfurnished") {
        Some(Furnishing::Unfurnished)
    } else if lower.contains("partially furnished")
        || lower.contains("partly furnished")
        || lower.contains("semi-furnished")
        || lower.contains("semi furnished")
    {
        Some(Furnishing::PartiallyFurnished)
    } else if lower.contains("fully furnished") {
        Some(Furnishing::FullyFurnished)
    } else {
        None
    }
}

fn extract_facilities(lower: &str) -> Vec<String> {
    FACILITY_KEYWORDS
        .iter()
        .filter(|keyword| lower.contains(*keyword))
        .map(|keyword| keyword.to_string())
        .collect()
}
