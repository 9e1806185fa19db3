//! Interactive preference collection.

use anyhow::Result;
use dialoguer::{theme::ColorfulTheme, Confirm, Input, Select};
use property_compare::{BudgetRange, Furnishing, Purpose, TenurePreference, UserPreferences};

/// Walk the buyer through the preference questions.
///
/// Range checks happen in `UserPreferences::validate` when the answers are
/// submitted, so a bad value reports once and the questions repeat.
pub fn collect_preferences() -> Result<UserPreferences> {
    let theme = ColorfulTheme::default();

    let purposes = [
        "Rental investment",
        "Own stay",
        "Vacation home",
        "Mixed use",
    ];
    let purpose = match Select::with_theme(&theme)
        .with_prompt("What is the property for?")
        .items(&purposes)
        .default(0)
        .interact()?
    {
        0 => Purpose::RentalInvestment,
        1 => Purpose::OwnStay,
        2 => Purpose::VacationHome,
        _ => Purpose::Mixed,
    };

    let occupants: u8 = Input::with_theme(&theme)
        .with_prompt("How many people will live there (1-20)")
        .default(1)
        .interact_text()?;

    let min_myr: u64 = Input::with_theme(&theme)
        .with_prompt("Minimum budget (RM)")
        .default(0)
        .interact_text()?;

    let max_myr: u64 = Input::with_theme(&theme)
        .with_prompt("Maximum budget (RM)")
        .interact_text()?;

    let location_flexibility: u8 = Input::with_theme(&theme)
        .with_prompt("Location flexibility (0 = exact area only, 10 = anywhere reasonable)")
        .default(5)
        .interact_text()?;

    let tenures = ["No preference", "Freehold only", "Leasehold acceptable"];
    let tenure_preference = match Select::with_theme(&theme)
        .with_prompt("Tenure preference")
        .items(&tenures)
        .default(0)
        .interact()?
    {
        1 => TenurePreference::FreeholdOnly,
        2 => TenurePreference::LeaseholdAcceptable,
        _ => TenurePreference::NoPreference,
    };

    let furnishings = [
        "No preference",
        "Unfurnished",
        "Partially furnished",
        "Fully furnished",
    ];
    let furnishing = match Select::with_theme(&theme)
        .with_prompt("Furnishing preference")
        .items(&furnishings)
        .default(0)
        .interact()?
    {
        1 => Some(Furnishing::Unfurnished),
        2 => Some(Furnishing::PartiallyFurnished),
        3 => Some(Furnishing::FullyFurnished),
        _ => None,
    };

    let near_transit = Confirm::with_theme(&theme)
        .with_prompt("Needs to be near LRT/MRT?")
        .default(false)
        .interact()?;

    let near_international_schools = Confirm::with_theme(&theme)
        .with_prompt("Needs to be near international schools?")
        .default(false)
        .interact()?;

    let facilities_raw: String = Input::with_theme(&theme)
        .with_prompt("Required facilities, comma separated (leave empty for none)")
        .allow_empty(true)
        .interact_text()?;

    let mut prefs = UserPreferences::new(purpose, BudgetRange::new(min_myr, max_myr))
        .with_occupants(occupants)
        .with_location_flexibility(location_flexibility)
        .with_tenure_preference(tenure_preference)
        .with_near_transit(near_transit)
        .with_near_international_schools(near_international_schools)
        .with_required_facilities(parse_facilities(&facilities_raw));

    if let Some(furnishing) = furnishing {
        prefs = prefs.with_furnishing_preference(furnishing);
    }

    Ok(prefs)
}

fn parse_facilities(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|facility| facility.trim().to_lowercase())
        .filter(|facility| !facility.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_facilities_trims_and_drops_empties() {
        assert_eq!(
            parse_facilities(" Swimming Pool, gym ,, "),
            vec!["swimming pool", "gym"]
        );
        assert!(parse_facilities("").is_empty());
        assert!(parse_facilities(" , ").is_empty());
    }
}
