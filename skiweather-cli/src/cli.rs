use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use inquire::{Password, PasswordDisplayMode, Text};
use std::path::PathBuf;
use tracing::info;

use skiweather_core::{
    Config, WorldWeatherProvider, chart,
    config::{DEFAULT_BASE_URL, DEFAULT_NUM_OF_DAYS, validate_num_of_days},
    fetch_forecast_table, table,
};

use crate::output;

/// Environment variable that overrides the stored API key.
const API_KEY_ENV: &str = "API_KEY";

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "skiweather", version, about = "Ski-resort weather forecasts")]
pub struct Cli {
    /// Log debug output to stderr (RUST_LOG takes precedence).
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the World Weather Online API key and defaults.
    Configure,

    /// Show the forecast for a location, optionally saving CSV and/or a chart.
    Show {
        /// Location name (city, zip code, resort name, ...).
        location: String,

        /// Number of forecast days; falls back to the configured default.
        #[arg(short, long)]
        days: Option<u32>,

        /// Write the flattened table to this CSV file.
        #[arg(long)]
        csv: Option<PathBuf>,

        /// Render the forecast chart (SVG) to this file.
        #[arg(long)]
        chart: Option<PathBuf>,
    },
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Show { location, days, csv, chart } => {
                show(&location, days, csv, chart).await
            }
        }
    }
}

fn configure() -> Result<()> {
    let mut cfg = Config::load()?;

    let api_key = Password::new("World Weather Online API key:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .prompt()
        .context("API key prompt aborted")?;

    let days = Text::new("Default number of forecast days:")
        .with_default(&cfg.num_of_days.unwrap_or(DEFAULT_NUM_OF_DAYS).to_string())
        .prompt()
        .context("Forecast days prompt aborted")?;
    let days: u32 = days.trim().parse().context("Number of days must be a whole number")?;
    validate_num_of_days(days)?;

    let base_url = Text::new("Forecast endpoint:")
        .with_default(cfg.base_url())
        .with_help_message("Press enter to keep the current endpoint")
        .prompt()
        .context("Endpoint prompt aborted")?;

    cfg.api_key = Some(api_key.trim().to_string());
    cfg.num_of_days = Some(days);
    cfg.base_url = endpoint_override(&base_url);

    let path = cfg.save()?;
    println!("Configuration saved to {}", path.display());
    Ok(())
}

/// Only non-default endpoints are stored.
fn endpoint_override(input: &str) -> Option<String> {
    let input = input.trim();
    (!input.is_empty() && input != DEFAULT_BASE_URL).then(|| input.to_string())
}

async fn show(
    location: &str,
    days: Option<u32>,
    csv: Option<PathBuf>,
    chart_path: Option<PathBuf>,
) -> Result<()> {
    let cfg = Config::load()?;
    let num_of_days = cfg.resolve_num_of_days(days)?;
    let client = cfg.client_config(std::env::var(API_KEY_ENV).ok())?;

    let provider = WorldWeatherProvider::new(client);
    let forecast = fetch_forecast_table(&provider, location, num_of_days)
        .await
        .with_context(|| format!("Could not get a forecast for '{location}'"))?;
    info!(location, days = forecast.len(), "forecast ready");

    print!("{}", output::render(location, &forecast));

    if let Some(path) = csv {
        table::write_csv(&forecast, &path)?;
        println!("CSV saved to {}", path.display());
    }
    if let Some(path) = chart_path {
        chart::render_chart(&forecast, &path)?;
        println!("Chart saved to {}", path.display());
    }

    Ok(())
}
