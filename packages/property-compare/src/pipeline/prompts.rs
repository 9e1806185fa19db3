//! Prompt templates for AI operations.

use crate::types::{PropertyRecord, UserPreferences};

/// System prompt for structuring a listing page into fields.
pub const STRUCTURE_PROMPT: &str = r#"You are a data extraction assistant for Malaysian property listings.

Extract the fields below from the listing page content. Respond with a single JSON object in exactly this shape:

{
  "title": string or null,
  "location": string or null,
  "price_myr": integer or null,
  "listing_kind": "sale" or "rent" or null,
  "property_type": string or null,
  "bedrooms": integer or null,
  "bathrooms": integer or null,
  "built_up_sqft": integer or null,
  "tenure": "freehold" or "leasehold" or null,
  "furnishing": "unfurnished" or "partially_furnished" or "fully_furnished" or null,
  "facilities": [string, ...],
  "agent": {"name": string or null, "phone": string or null} or null,
  "main_image": string or null
}

Rules:
- price_myr is the asking price in Malaysian Ringgit as a whole number with no currency symbol and no separators. For rental listings use the monthly rent.
- Use null for every field the page does not state. Never guess and never substitute a typical value.
- facilities is an empty array when the page lists none.
- main_image is the URL of the first listing photo, when one appears.
- Output the JSON object only. No commentary, no code fences."#;

/// User-message template for the structuring call.
pub const STRUCTURE_USER_TEMPLATE: &str = r#"Listing URL: {url}

Listing page content:
{content}"#;

/// System prompt for ranking alternatives and writing the recommendation.
pub const RANK_PROMPT: &str = r###"You are a Malaysian property advisor helping a buyer weigh a shortlisted property against market alternatives.

You will be given the reference property, the buyer's stated preferences, and a set of alternative properties. Rank the alternatives by how well they serve the buyer's stated purpose and constraints, then write an expert recommendation.

Respond with a single JSON object in exactly this shape:

{
  "ranking": [
    {"url": "<alternative URL>", "rank": 1, "rationale": "<one or two sentences tied to the buyer's purpose>"}
  ],
  "recommendation": "<markdown report>"
}

Rules:
- Rank only the alternatives. The reference property must never appear in the ranking.
- rank 1 is the best fit for the buyer. Do not exceed the requested number of alternatives.
- Every rationale must connect the property to the buyer's stated purpose, not just restate its specs.
- A field marked unknown is unknown. Do not treat it as zero or as a flaw.
- The recommendation is a markdown report with these sections: "## Market Value Assessment", "## Property Comparison", "## Investment Potential", and "## Expert Recommendation" covering pros, cons, negotiation tips, and a final verdict.
- Output the JSON object only. No commentary, no code fences."###;

/// User-message template for the ranking call.
pub const RANK_USER_TEMPLATE: &str = r#"Reference property:
{reference}

Buyer preferences:
{preferences}

Alternative properties:
{alternatives}

Rank the top {max_alternatives} alternatives."#;

/// Build the structuring user message.
pub fn format_structure_prompt(url: &str, content: &str) -> String {
    STRUCTURE_USER_TEMPLATE
        .replace("{url}", url)
        .replace("{content}", content)
}

/// Build the ranking user message.
///
/// Records are rendered field-by-field and only populated fields appear, so
/// a partial record reads as short rather than as a page of "null".
pub fn format_rank_prompt(
    reference: &PropertyRecord,
    candidates: &[PropertyRecord],
    prefs: &UserPreferences,
    max_alternatives: usize,
) -> String {
    let alternatives = candidates
        .iter()
        .enumerate()
        .map(|(i, record)| format!("Alternative {}:\n{}", i + 1, describe_record(record)))
        .collect::<Vec<_>>()
        .join("\n\n");

    RANK_USER_TEMPLATE
        .replace("{reference}", &describe_record(reference))
        .replace("{preferences}", &describe_preferences(prefs))
        .replace("{alternatives}", &alternatives)
        .replace("{max_alternatives}", &max_alternatives.to_string())
}

/// Render a record as one line per populated field.
fn describe_record(record: &PropertyRecord) -> String {
    let mut lines = vec![format!("URL: {}", record.source_url)];

    if let Some(title) = &record.title {
        lines.push(format!("Title: {}", title));
    }
    if let Some(location) = &record.location {
        lines.push(format!("Location: {}", location));
    }
    if let Some(price) = record.price_myr {
        lines.push(format!("Price: RM {}", price));
    }
    if let Some(kind) = record.listing_kind {
        lines.push(format!("Listing: {}", kind));
    }
    if let Some(property_type) = &record.property_type {
        lines.push(format!("Type: {}", property_type));
    }
    if let Some(bedrooms) = record.bedrooms {
        lines.push(format!("Bedrooms: {}", bedrooms));
    }
    if let Some(bathrooms) = record.bathrooms {
        lines.push(format!("Bathrooms: {}", bathrooms));
    }
    if let Some(sqft) = record.built_up_sqft {
        lines.push(format!("Built-up: {} sq ft", sqft));
    }
    if let Some(price_per_sqft) = record.price_per_sqft() {
        lines.push(format!("Price per sq ft: RM {}", price_per_sqft));
    }
    if let Some(tenure) = record.tenure {
        lines.push(format!("Tenure: {}", tenure));
    }
    if let Some(furnishing) = record.furnishing {
        lines.push(format!("Furnishing: {}", furnishing));
    }
    if !record.facilities.is_empty() {
        lines.push(format!("Facilities: {}", record.facilities.join(", ")));
    }
    if record.is_partial() {
        lines.push("Data quality: partial, unlisted fields are unknown".to_string());
    }

    lines.join("\n")
}

/// Render the buyer's preferences, skipping anything they did not set.
fn describe_preferences(prefs: &UserPreferences) -> String {
    let mut lines = vec![
        format!("Purpose: {}", prefs.purpose),
        format!("Occupants: {}", prefs.occupants),
        format!(
            "Budget: RM {} to RM {}",
            prefs.budget.min_myr, prefs.budget.max_myr
        ),
        format!(
            "Location flexibility: {}/10 (0 = exact area only)",
            prefs.location_flexibility
        ),
        format!("Tenure: {}", prefs.tenure_preference),
    ];

    if let Some(furnishing) = prefs.furnishing_preference {
        lines.push(format!("Furnishing: {}", furnishing));
    }
    if prefs.near_transit {
        lines.push("Must be near LRT/MRT transit".to_string());
    }
    if prefs.near_international_schools {
        lines.push("Must be near international schools".to_string());
    }
    if !prefs.required_facilities.is_empty() {
        lines.push(format!(
            "Required facilities: {}",
            prefs.required_facilities.join(", ")
        ));
    }

    lines.join("\n")
}
