//! Terminal rendering for records and comparison results.

use console::style;
use property_compare::{ComparisonResult, PropertyRecord};

/// Print a record as a field grid. Unknown fields show as "unknown" rather
/// than being hidden, so a partial record is visibly partial.
pub fn print_record(record: &PropertyRecord) {
    println!();
    let title = record.title.as_deref().unwrap_or("Untitled listing");
    println!("{}", style(title).cyan().bold());
    println!("{}", style(&record.source_url).dim());
    println!();

    print_field("Price", record.price_myr.map(|p| format!("RM {}", group_digits(p))));
    print_field("Listing", record.listing_kind.map(|k| k.to_string()));
    print_field("Type", record.property_type.clone());
    print_field("Location", record.location.clone());
    print_field("Bedrooms", record.bedrooms.map(|b| b.to_string()));
    print_field("Bathrooms", record.bathrooms.map(|b| b.to_string()));
    print_field(
        "Built-up",
        record
            .built_up_sqft
            .map(|s| format!("{} sq ft", group_digits(s as u64))),
    );
    print_field(
        "Price / sq ft",
        record
            .price_per_sqft()
            .map(|p| format!("RM {}", group_digits(p))),
    );
    print_field("Tenure", record.tenure.map(|t| t.to_string()));
    print_field("Furnishing", record.furnishing.map(|f| f.to_string()));
    if !record.facilities.is_empty() {
        print_field("Facilities", Some(record.facilities.join(", ")));
    }
    if let Some(agent) = &record.agent {
        let contact = [agent.name.as_deref(), agent.phone.as_deref()]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join(", ");
        if !contact.is_empty() {
            print_field("Agent", Some(contact));
        }
    }

    if record.is_partial() {
        println!();
        println!(
            "{}",
            style(
                "Partial data: automatic structuring failed, showing what \
                 pattern matching recovered."
            )
            .yellow()
        );
    }
}

/// Print the ranked alternatives and the expert recommendation.
pub fn print_result(result: &ComparisonResult) {
    println!();
    println!("{}", style("Comparison result").cyan().bold());

    if let Some(notice) = &result.notice {
        println!();
        println!("{}", style(notice).yellow());
    }

    for alternative in &result.alternatives {
        let title = alternative
            .record
            .title
            .as_deref()
            .unwrap_or("Untitled listing");
        println!();
        println!(
            "  {} {}",
            style(format!("#{}", alternative.rank)).green().bold(),
            style(title).bold()
        );
        let specs = spec_line(&alternative.record);
        if !specs.is_empty() {
            println!("     {}", specs);
        }
        println!("     {}", alternative.rationale);
        println!("     {}", style(&alternative.record.source_url).dim());
    }

    if !result.recommendation.is_empty() {
        println!();
        println!("{}", style("─".repeat(60)).dim());
        println!("{}", result.recommendation);
        println!("{}", style("─".repeat(60)).dim());
    }
}

fn print_field(label: &str, value: Option<String>) {
    match value {
        Some(value) => println!("  {:<14} {}", label, style(value).cyan()),
        None => println!("  {:<14} {}", label, style("unknown").dim()),
    }
}

/// One-line spec summary of a record, populated fields only.
fn spec_line(record: &PropertyRecord) -> String {
    let mut parts = Vec::new();
    if let Some(price) = record.price_myr {
        parts.push(format!("RM {}", group_digits(price)));
    }
    if let Some(bedrooms) = record.bedrooms {
        parts.push(format!("{} bed", bedrooms));
    }
    if let Some(bathrooms) = record.bathrooms {
        parts.push(format!("{} bath", bathrooms));
    }
    if let Some(sqft) = record.built_up_sqft {
        parts.push(format!("{} sq ft", group_digits(sqft as u64)));
    }
    if let Some(tenure) = record.tenure {
        parts.push(tenure.to_string());
    }
    parts.join(" | ")
}

/// Thousands separators for Ringgit amounts.
fn group_digits(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    grouped
}
