use anyhow::Context;
use clap::{Parser, Subcommand};
use inquire::{Password, Select};
use tracing::debug;
use weatherboard_core::{
    Config, Coordinates, Dashboard, Language, UnitSystem,
    provider::{FixedLocation, Geolocator, NoGeolocation, source_from_config},
};

use crate::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weatherboard", version, about = "Weather dashboard in the terminal")]
pub struct Cli {
    /// Log debug output to stderr (RUST_LOG takes precedence).
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the API key, unit system and language.
    Configure,

    /// Show the weather for a city, or for your position when omitted.
    Show {
        /// City name.
        city: Option<String>,

        /// Five daily summaries instead of today's hourly view.
        #[arg(long)]
        five_day: bool,

        /// Override the configured unit system (standard, metric, imperial).
        #[arg(long)]
        units: Option<String>,

        /// Override the configured language code, e.g. "en" or "pt_br".
        #[arg(long)]
        lang: Option<String>,

        /// Position to use when no city is given.
        #[arg(long, requires = "lon", allow_hyphen_values = true)]
        lat: Option<f64>,

        #[arg(long, requires = "lat", allow_hyphen_values = true)]
        lon: Option<f64>,

        /// Print the view as JSON.
        #[arg(long)]
        json: bool,
    },

    /// List supported language codes.
    Languages,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => configure()?,
            Command::Show {
                city,
                five_day,
                units,
                lang,
                lat,
                lon,
                json,
            } => {
                let config = Config::load()?;

                let mut settings = config.request_settings()?;
                if let Some(units) = units.as_deref() {
                    settings.set_units(units)?;
                }
                if let Some(lang) = lang.as_deref() {
                    settings.set_language(lang)?;
                }
                debug!(?settings, policy = ?config.bucket_policy(), "resolved request settings");

                let locator: Box<dyn Geolocator> = match (lat, lon) {
                    (Some(lat), Some(lon)) => Box::new(FixedLocation(Coordinates::new(lat, lon))),
                    _ => Box::new(NoGeolocation),
                };

                let dashboard = Dashboard::new(source_from_config(&config)?, locator, settings)
                    .with_fallback(config.fallback_location())
                    .with_bucket_policy(config.bucket_policy());

                let view = if five_day {
                    dashboard.five_day_forecast(city.as_deref()).await?
                } else {
                    dashboard.daily_forecast(city.as_deref()).await?
                };

                if json {
                    println!(
                        "{}",
                        serde_json::to_string_pretty(&view).context("Failed to serialize view")?
                    );
                } else {
                    print!("{}", render::view(&view));
                }
            }
            Command::Languages => {
                for lang in Language::all() {
                    println!("{:<6} {}", lang.code(), lang.name());
                }
            }
        }

        Ok(())
    }
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let api_key = Password::new("OpenWeather API key:")
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;
    config.set_api_key(api_key.trim().to_string());

    let units = Select::new("Unit system:", UnitSystem::all().to_vec())
        .with_starting_cursor(1)
        .prompt()
        .context("Failed to read unit system")?;
    config.set_units(units);

    let languages: Vec<Language> = Language::all().collect();
    let english = languages
        .iter()
        .position(|l| *l == Language::ENGLISH)
        .unwrap_or_default();
    let language = Select::new("Language:", languages)
        .with_starting_cursor(english)
        .prompt()
        .context("Failed to read language")?;
    config.set_language(language);

    config.save()?;
    println!(
        "Configuration saved to {}",
        Config::config_file_path()?.display()
    );

    Ok(())
}
