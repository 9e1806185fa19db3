//! Data-shape contracts shared across the pipeline.

pub mod comparison;
pub mod config;
pub mod listing;
pub mod preferences;

pub use comparison::{ComparisonResult, RankedAlternative, RankedChoice, RankingResponse};
pub use config::CompareConfig;
pub use listing::{
    AgentContact, Completeness, Furnishing, ListingFields, ListingKind, PropertyRecord,
    RawListing, Tenure,
};
pub use preferences::{BudgetRange, Purpose, TenurePreference, UserPreferences};
