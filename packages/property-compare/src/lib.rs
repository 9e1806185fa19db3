//! Property Listing Comparison Library
//!
//! Takes one Malaysian property listing URL, structures it into a normalized
//! record, and weighs it against comparable listings found on the market,
//! ending in a ranked shortlist plus an expert-style recommendation.
//!
//! # Design Philosophy
//!
//! - Prompt-driven structuring with a heuristic fallback: a listing the
//!   model cannot parse still becomes a (partial) record
//! - Missing data stays missing - no field is ever defaulted or guessed
//! - Soft outcomes over errors: an empty market search is a result with a
//!   notice, not a failure
//! - Traits at the seams (scraper, AI, search) so every stage runs against
//!   mocks in tests
//!
//! # Usage
//!
//! ```rust,ignore
//! use firecrawl_client::FirecrawlClient;
//! use property_compare::ai::OpenAi;
//! use property_compare::traits::TavilySearcher;
//! use property_compare::{Pipeline, Session, UserPreferences};
//!
//! let pipeline = Pipeline::new(
//!     FirecrawlClient::from_env()?,
//!     OpenAi::from_env()?,
//!     TavilySearcher::from_env()?,
//! );
//! let mut session = Session::new(pipeline);
//!
//! let reference = session.submit_url("https://www.iproperty.com.my/...").await?;
//! let result = session.submit_preferences(prefs).await?;
//! ```
//!
//! # Modules
//!
//! - [`traits`] - Core trait abstractions (scraper, AI, search)
//! - [`types`] - Listing, preference, and comparison data types
//! - [`pipeline`] - Fetch, format, and compare stages plus prompts
//! - [`session`] - The three-step session state machine
//! - [`ai`] - OpenAI implementation of the AI trait
//! - [`security`] - Credential handling
//! - [`testing`] - Mock implementations for testing

pub mod ai;
pub mod error;
pub mod pipeline;
pub mod security;
pub mod session;
pub mod testing;
pub mod traits;
pub mod types;

// Re-export core types at crate root
pub use error::{CompareError, Result};
pub use traits::{
    ListingScraper, ListingSearcher, MockSearcher, PropertyAi, SearchHit, TavilySearcher,
};
pub use types::{
    AgentContact, BudgetRange, CompareConfig, ComparisonResult, Completeness, Furnishing,
    ListingFields, ListingKind, PropertyRecord, Purpose, RankedAlternative, RankedChoice,
    RankingResponse, RawListing, Tenure, TenurePreference, UserPreferences,
};

// Re-export the pipeline facade and the session machine
pub use pipeline::{build_search_query, Pipeline};
pub use session::{Session, SessionState};

pub use security::SecretString;
