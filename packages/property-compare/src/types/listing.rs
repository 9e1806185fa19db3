//! Listing data types: raw scrapes and normalized property records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

/// A freshly scraped listing page, before any structuring.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawListing {
    /// Source URL of the listing.
    pub url: String,

    /// Page content as markdown.
    pub content: String,

    /// Page title reported by the scraper.
    pub title: Option<String>,

    /// When the page was fetched.
    pub fetched_at: DateTime<Utc>,
}

impl RawListing {
    /// Create a new raw listing fetched now.
    pub fn new(url: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            content: content.into(),
            title: None,
            fetched_at: Utc::now(),
        }
    }

    /// Set the page title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Content hash for change detection across repeated fetches.
    ///
    /// SHA-256 over normalized text (lowercased, punctuation stripped,
    /// whitespace collapsed) so cosmetic re-rendering of the same listing
    /// hashes identically.
    pub fn content_hash(&self) -> String {
        let normalized = self
            .content
            .to_lowercase()
            .chars()
            .filter(|c| c.is_alphanumeric() || c.is_whitespace())
            .collect::<String>()
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ");

        let mut hasher = Sha256::new();
        hasher.update(normalized.as_bytes());
        format!("{:x}", hasher.finalize())
    }
}

/// Which path produced a `PropertyRecord`.
///
/// `Structured` records come from the primary LLM structuring path and carry
/// every field the page stated. `Partial` records come from the heuristic
/// fallback and are best-effort; consumers must check this tag before
/// relying on specific fields being present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Completeness {
    Structured,
    Partial,
}

/// Malaysian land-ownership classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tenure {
    Freehold,
    Leasehold,
}

impl fmt::Display for Tenure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tenure::Freehold => f.write_str("Freehold"),
            Tenure::Leasehold => f.write_str("Leasehold"),
        }
    }
}

/// Whether the listing offers the property for sale or for rent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListingKind {
    Sale,
    Rent,
}

impl fmt::Display for ListingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ListingKind::Sale => f.write_str("For Sale"),
            ListingKind::Rent => f.write_str("For Rent"),
        }
    }
}

/// Furnishing level stated by the listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Furnishing {
    Unfurnished,
    PartiallyFurnished,
    FullyFurnished,
}

impl fmt::Display for Furnishing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Furnishing::Unfurnished => f.write_str("Unfurnished"),
            Furnishing::PartiallyFurnished => f.write_str("Partially Furnished"),
            Furnishing::FullyFurnished => f.write_str("Fully Furnished"),
        }
    }
}

/// Listing agent details, when the page shows them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentContact {
    pub name: Option<String>,
    pub phone: Option<String>,
}

/// Parse target for the primary structuring reply.
///
/// Field-for-field what the structuring prompt asks the model to emit.
/// Every field is nullable so absent page data stays absent.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListingFields {
    pub title: Option<String>,
    pub location: Option<String>,
    pub price_myr: Option<u64>,
    pub listing_kind: Option<ListingKind>,
    pub property_type: Option<String>,
    pub bedrooms: Option<u8>,
    pub bathrooms: Option<u8>,
    pub built_up_sqft: Option<u32>,
    pub tenure: Option<Tenure>,
    pub furnishing: Option<Furnishing>,
    #[serde(default)]
    pub facilities: Vec<String>,
    pub agent: Option<AgentContact>,
    pub main_image: Option<String>,
}

/// A normalized property listing.
///
/// Every field is optional because a missing field means the page did not
/// state it. Never zero, never a default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyRecord {
    pub title: Option<String>,

    /// Area or neighbourhood as the page states it.
    pub location: Option<String>,

    /// Asking price in Malaysian Ringgit (monthly rent for rental listings).
    pub price_myr: Option<u64>,

    pub listing_kind: Option<ListingKind>,

    /// Property category as the portal states it (condominium, terrace, ...).
    pub property_type: Option<String>,

    pub bedrooms: Option<u8>,

    pub bathrooms: Option<u8>,

    /// Built-up area in square feet.
    pub built_up_sqft: Option<u32>,

    pub tenure: Option<Tenure>,

    pub furnishing: Option<Furnishing>,

    #[serde(default)]
    pub facilities: Vec<String>,

    pub agent: Option<AgentContact>,

    /// First listing photo, when one could be identified.
    pub main_image: Option<String>,

    /// The listing page this record was extracted from.
    pub source_url: String,

    /// Which extraction path produced the record.
    pub completeness: Completeness,
}

impl PropertyRecord {
    /// Build a structured record from primary-path fields.
    pub fn from_fields(fields: ListingFields, source_url: impl Into<String>) -> Self {
        Self {
            title: fields.title,
            location: fields.location,
            price_myr: fields.price_myr,
            listing_kind: fields.listing_kind,
            property_type: fields.property_type,
            bedrooms: fields.bedrooms,
            bathrooms: fields.bathrooms,
            built_up_sqft: fields.built_up_sqft,
            tenure: fields.tenure,
            furnishing: fields.furnishing,
            facilities: fields.facilities,
            agent: fields.agent,
            main_image: fields.main_image,
            source_url: source_url.into(),
            completeness: Completeness::Structured,
        }
    }

    /// Empty partial record, to be filled by fallback heuristics.
    pub fn partial(source_url: impl Into<String>) -> Self {
        Self {
            title: None,
            location: None,
            price_myr: None,
            listing_kind: None,
            property_type: None,
            bedrooms: None,
            bathrooms: None,
            built_up_sqft: None,
            tenure: None,
            furnishing: None,
            facilities: vec![],
            agent: None,
            main_image: None,
            source_url: source_url.into(),
            completeness: Completeness::Partial,
        }
    }

    /// Whether this record came from the fallback path.
    pub fn is_partial(&self) -> bool {
        self.completeness == Completeness::Partial
    }

    /// Price per square foot, when both inputs are known.
    pub fn price_per_sqft(&self) -> Option<u64> {
        match (self.price_myr, self.built_up_sqft) {
            (Some(price), Some(sqft)) if sqft > 0 => {
                Some((price as f64 / sqft as f64).round() as u64)
            }
            _ => None,
        }
    }

    /// Names of the fields this record actually carries.
    ///
    /// Drives prompt construction: only populated fields are described to
    /// the model, so partial records never claim knowledge they lack.
    pub fn populated_fields(&self) -> Vec<&'static str> {
        let mut fields = Vec::new();
        if self.title.is_some() {
            fields.push("title");
        }
        if self.location.is_some() {
            fields.push("location");
        }
        if self.price_myr.is_some() {
            fields.push("price_myr");
        }
        if self.listing_kind.is_some() {
            fields.push("listing_kind");
        }
        if self.property_type.is_some() {
            fields.push("property_type");
        }
        if self.bedrooms.is_some() {
            fields.push("bedrooms");
        }
        if self.bathrooms.is_some() {
            fields.push("bathrooms");
        }
        if self.built_up_sqft.is_some() {
            fields.push("built_up_sqft");
        }
        if self.tenure.is_some() {
            fields.push("tenure");
        }
        if self.furnishing.is_some() {
            fields.push("furnishing");
        }
        if !self.facilities.is_empty() {
            fields.push("facilities");
        }
        if self.agent.is_some() {
            fields.push("agent");
        }
        if self.main_image.is_some() {
            fields.push("main_image");
        }
        fields
    }
}
