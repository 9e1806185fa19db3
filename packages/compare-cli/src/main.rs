//! Interactive property comparison CLI.
//!
//! Three steps: paste a listing URL, answer the preference questions, read
//! the ranked comparison. `--url` preseeds step one.

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use dialoguer::{theme::ColorfulTheme, Input, Select};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use firecrawl_client::FirecrawlClient;
use property_compare::ai::OpenAi;
use property_compare::pipeline::{is_supported_portal, validate_listing_url};
use property_compare::{
    CompareConfig, CompareError, Pipeline, Session, SessionState, TavilySearcher,
};

mod config;
mod preferences;
mod render;

use config::CliConfig;

#[derive(Parser)]
#[command(name = "compare")]
#[command(about = "Compare a Malaysian property listing against the market")]
#[command(version)]
struct Cli {
    /// Listing URL to preseed step one
    #[arg(long)]
    url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let cli = Cli::parse();
    let config = CliConfig::from_env()?;
    let compare_config = CompareConfig::default();

    let pipeline = Pipeline::new(
        FirecrawlClient::new(config.firecrawl_api_key),
        OpenAi::new(config.openai_api_key).with_model(config.openai_model),
        TavilySearcher::new(config.tavily_api_key),
    )
    .with_config(compare_config.clone());
    let mut session = Session::new(pipeline);

    print_banner();

    let mut preseeded_url = cli.url;

    loop {
        match session.state() {
            SessionState::AwaitingUrl => {
                let url = match preseeded_url.take() {
                    Some(url) => url,
                    None => Input::with_theme(&ColorfulTheme::default())
                        .with_prompt("Listing URL (iProperty / PropertyGuru)")
                        .interact_text()?,
                };

                if let Ok(parsed) = validate_listing_url(&url) {
                    if !is_supported_portal(&parsed, &compare_config) {
                        println!(
                            "{} {}",
                            "Note:".yellow().bold(),
                            "that doesn't look like an iProperty or PropertyGuru listing."
                        );
                    }
                }

                println!("{}", "Fetching and structuring the listing...".dimmed());
                match session.submit_url(&url).await {
                    Ok(record) => render::print_record(&record),
                    Err(err) => handle_step_error(err)?,
                }
            }
            SessionState::AwaitingPreferences { .. } => {
                let prefs = preferences::collect_preferences()?;

                println!(
                    "{}",
                    "Searching the market and ranking alternatives...".dimmed()
                );
                match session.submit_preferences(prefs).await {
                    Ok(result) => render::print_result(&result),
                    Err(err) => handle_step_error(err)?,
                }
            }
            SessionState::ShowingResult { .. } => {
                let options = ["Start over with a new listing", "Refine criteria", "Exit"];
                let selection = Select::with_theme(&ColorfulTheme::default())
                    .with_prompt("Next")
                    .items(&options)
                    .default(0)
                    .interact()?;

                match selection {
                    0 => session.reset(),
                    1 => session.refine()?,
                    _ => break,
                }
            }
        }
    }

    println!("{}", "Goodbye!".bright_blue());
    Ok(())
}

/// Fatal errors end the run; anything else is reported and the current
/// step repeats.
fn handle_step_error(err: CompareError) -> Result<()> {
    if err.is_fatal() {
        return Err(err).context("API credentials were rejected; check your .env");
    }
    eprintln!("{} {}", "Problem:".yellow().bold(), err);
    eprintln!("{}", "You can try again.".dimmed());
    Ok(())
}

fn print_banner() {
    println!(
        "{}",
        "╔══════════════════════════════════════╗".bright_cyan()
    );
    println!(
        "{}",
        "║      PropertyCompare Malaysia        ║".bright_cyan()
    );
    println!(
        "{}",
        "╚══════════════════════════════════════╝".bright_cyan()
    );
    println!();
}
