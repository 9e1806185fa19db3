//! Buyer preference types collected before comparison.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::listing::Furnishing;
use crate::error::{CompareError, Result};

/// Why the buyer is looking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Purpose {
    RentalInvestment,
    OwnStay,
    VacationHome,
    Mixed,
}

impl fmt::Display for Purpose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Purpose::RentalInvestment => f.write_str("rental investment"),
            Purpose::OwnStay => f.write_str("own stay"),
            Purpose::VacationHome => f.write_str("vacation home"),
            Purpose::Mixed => f.write_str("mixed use"),
        }
    }
}

/// Tenure appetite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TenurePreference {
    NoPreference,
    FreeholdOnly,
    LeaseholdAcceptable,
}

impl fmt::Display for TenurePreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TenurePreference::NoPreference => f.write_str("no preference"),
            TenurePreference::FreeholdOnly => f.write_str("freehold only"),
            TenurePreference::LeaseholdAcceptable => f.write_str("leasehold acceptable"),
        }
    }
}

/// Budget band in Malaysian Ringgit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetRange {
    pub min_myr: u64,
    pub max_myr: u64,
}

impl BudgetRange {
    pub fn new(min_myr: u64, max_myr: u64) -> Self {
        Self { min_myr, max_myr }
    }
}

/// Everything the buyer told us before comparison.
///
/// Assembled once, validated, then treated as immutable for the rest of the
/// comparison run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserPreferences {
    pub purpose: Purpose,

    /// How many people will live there (1-20).
    pub occupants: u8,

    pub budget: BudgetRange,

    /// 0 = exact area only, 10 = anywhere reasonable.
    pub location_flexibility: u8,

    pub tenure_preference: TenurePreference,

    pub furnishing_preference: Option<Furnishing>,

    /// Needs to be near LRT/MRT.
    pub near_transit: bool,

    pub near_international_schools: bool,

    #[serde(default)]
    pub required_facilities: Vec<String>,
}

impl UserPreferences {
    /// Create preferences with the required inputs; everything else starts
    /// at a neutral value.
    pub fn new(purpose: Purpose, budget: BudgetRange) -> Self {
        Self {
            purpose,
            occupants: 1,
            budget,
            location_flexibility: 5,
            tenure_preference: TenurePreference::NoPreference,
            furnishing_preference: None,
            near_transit: false,
            near_international_schools: false,
            required_facilities: vec![],
        }
    }

    /// Set the household size.
    pub fn with_occupants(mut self, occupants: u8) -> Self {
        self.occupants = occupants;
        self
    }

    /// Set location flexibility (0-10).
    pub fn with_location_flexibility(mut self, flexibility: u8) -> Self {
        self.location_flexibility = flexibility;
        self
    }

    /// Set the tenure preference.
    pub fn with_tenure_preference(mut self, preference: TenurePreference) -> Self {
        self.tenure_preference = preference;
        self
    }

    /// Set the furnishing preference.
    pub fn with_furnishing_preference(mut self, furnishing: Furnishing) -> Self {
        self.furnishing_preference = Some(furnishing);
        self
    }

    /// Require proximity to LRT/MRT.
    pub fn with_near_transit(mut self, near_transit: bool) -> Self {
        self.near_transit = near_transit;
        self
    }

    /// Require proximity to international schools.
    pub fn with_near_international_schools(mut self, near_schools: bool) -> Self {
        self.near_international_schools = near_schools;
        self
    }

    /// Set the facilities the buyer will not go without.
    pub fn with_required_facilities(
        mut self,
        facilities: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        self.required_facilities = facilities.into_iter().map(|f| f.into()).collect();
        self
    }

    /// Check ranges before the comparison stage consumes the preferences.
    pub fn validate(&self) -> Result<()> {
        if self.budget.max_myr == 0 {
            return Err(CompareError::InvalidPreferences {
                reason: "maximum budget must be greater than zero".to_string(),
            });
        }
        if self.budget.min_myr > self.budget.max_myr {
            return Err(CompareError::InvalidPreferences {
                reason: "minimum budget exceeds maximum".to_string(),
            });
        }
        if self.occupants == 0 || self.occupants > 20 {
            return Err(CompareError::InvalidPreferences {
                reason: "occupants must be between 1 and 20".to_string(),
            });
        }
        if self.location_flexibility > 10 {
            return Err(CompareError::InvalidPreferences {
                reason: "location flexibility must be between 0 and 10".to_string(),
            });
        }
        Ok(())
    }
}
