use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::{
    bucket::{BucketPolicy, DayAdvance, TrailingBucket},
    coords::Coordinates,
    error::CoreResult,
    language::Language,
    model::RequestSettings,
    units::UnitSystem,
};

/// Environment variable that overrides the stored API key.
pub const API_KEY_ENV: &str = "OPENWEATHER_API_KEY";

/// Five-day bucketing switches.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct ForecastConfig {
    /// Emit the partial last day instead of dropping it.
    #[serde(default)]
    pub flush_trailing_day: bool,
    /// Track the real calendar day of each point (correct across month ends).
    #[serde(default)]
    pub reread_calendar_day: bool,
}

/// Top-level configuration stored on disk.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    pub api_key: Option<String>,

    /// One of "standard", "metric", "imperial".
    pub units: Option<String>,

    /// Provider language code, e.g. "en" or "pt_br".
    pub language: Option<String>,

    /// Example TOML:
    /// [fallback_location]
    /// latitude = 49.842957
    /// longitude = 24.031111
    pub fallback_location: Option<Coordinates>,

    #[serde(default)]
    pub forecast: ForecastConfig,
}

impl Config {
    /// Stored unit system, `metric` when unset.
    pub fn units(&self) -> CoreResult<UnitSystem> {
        self.units
            .as_deref()
            .map(UnitSystem::try_from)
            .transpose()
            .map(Option::unwrap_or_default)
    }

    /// Stored language, English when unset.
    pub fn language(&self) -> CoreResult<Language> {
        self.language
            .as_deref()
            .map(Language::try_from)
            .transpose()
            .map(Option::unwrap_or_default)
    }

    pub fn request_settings(&self) -> CoreResult<RequestSettings> {
        Ok(RequestSettings::new(self.units()?, self.language()?))
    }

    pub fn set_units(&mut self, units: UnitSystem) {
        self.units = Some(units.as_str().to_string());
    }

    pub fn set_language(&mut self, language: Language) {
        self.language = Some(language.code().to_string());
    }

    pub fn set_api_key(&mut self, api_key: String) {
        self.api_key = Some(api_key);
    }

    /// API key from the environment, else from the file.
    pub fn resolved_api_key(&self) -> Option<String> {
        std::env::var(API_KEY_ENV)
            .ok()
            .filter(|k| !k.trim().is_empty())
            .or_else(|| self.api_key.clone())
    }

    pub fn fallback_location(&self) -> Coordinates {
        self.fallback_location.unwrap_or(Coordinates::FALLBACK)
    }

    pub fn bucket_policy(&self) -> BucketPolicy {
        BucketPolicy {
            day_advance: if self.forecast.reread_calendar_day {
                DayAdvance::Reread
            } else {
                DayAdvance::Increment
            },
            trailing: if self.forecast.flush_trailing_day {
                TrailingBucket::Flush
            } else {
                TrailingBucket::Drop
            },
        }
    }

    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            // First run: no config file, return empty.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_file_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "weatherboard", "weatherboard")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }
}
