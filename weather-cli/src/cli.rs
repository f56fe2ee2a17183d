use std::sync::Arc;

use anyhow::{Context, bail};
use clap::{ArgAction, Parser, Subcommand};
use inquire::{Password, PasswordDisplayMode, Text};
use tracing::info;
use weather_core::{
    Config, FileStore, KeyValueStore, Location, MemoryStore, Phase, ScreenController, WeatherApi,
    client::client_from_config,
};

use crate::browse;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather", version, about = "Weather CLI")]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Configure the weatherapi.com API key and default city.
    Configure,

    /// Show the forecast once and exit.
    Show {
        /// City to show; the last selected city (or the default) if absent.
        city: Option<String>,

        /// Number of forecast days (1-14).
        #[arg(long)]
        days: Option<u8>,
    },

    /// Look up locations matching a name.
    Search {
        query: String,
    },

    /// Interactive weather screen.
    Browse {
        /// Do not read or store the last selected city.
        #[arg(long)]
        no_persist: bool,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Show { city, days } => show(city, days).await,
            Command::Search { query } => search(&query).await,
            Command::Browse { no_persist } => {
                let config = Config::load()?;
                let screen = ScreenController::new(
                    client_from_config(&config)?,
                    store(no_persist)?,
                    config.screen_settings(),
                );
                browse::run(screen).await
            }
        }
    }
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let api_key = Password::new("weatherapi.com API key:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;

    let default_city = Text::new("Default city:")
        .with_default(config.default_city())
        .prompt()
        .context("Failed to read default city")?;

    config.api_key = Some(api_key.trim().to_string());
    config.default_city = Some(default_city.trim().to_string());
    config.save()?;

    println!("Saved configuration to {}", Config::config_file_path()?.display());
    Ok(())
}

async fn show(city: Option<String>, days: Option<u8>) -> anyhow::Result<()> {
    let mut config = Config::load()?;
    if days.is_some() {
        config.forecast_days = days;
    }

    let settings = config.screen_settings();
    info!(city = city.as_deref(), days = settings.forecast_days, "showing forecast");

    let mut screen = ScreenController::new(client_from_config(&config)?, store(false)?, settings);

    match city {
        Some(name) => screen.select_location(Location {
            id: None,
            name,
            region: String::new(),
            country: String::new(),
        }),
        None => screen.mount(),
    }

    screen.settle().await;
    screen.flush_writes().await;

    if let Phase::Failed { message } = &screen.state().phase {
        bail!("Could not load forecast: {message}");
    }

    print!("{}", screen.view());
    Ok(())
}

async fn search(query: &str) -> anyhow::Result<()> {
    let config = Config::load()?;
    let api = client_from_config(&config)?;

    let locations = api.search_locations(query.trim()).await?;
    info!(query, count = locations.len(), "location search finished");
    if locations.is_empty() {
        println!("No locations match '{query}'.");
    }
    for location in locations {
        println!("{} ({})", location.label(), location.region);
    }
    Ok(())
}

fn store(no_persist: bool) -> anyhow::Result<Arc<dyn KeyValueStore>> {
    if no_persist {
        return Ok(Arc::new(MemoryStore::new()));
    }
    Ok(Arc::new(FileStore::new(Config::state_file_path()?)))
}
