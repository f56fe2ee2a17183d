use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use crate::client::weatherapi::WEATHERAPI_BASE;

pub const DEFAULT_CITY: &str = "Islamabad";
pub const DEFAULT_FORECAST_DAYS: u8 = 7;
pub const DEFAULT_SEARCH_DEBOUNCE_MS: u64 = 1200;

/// weatherapi.com serves at most 14 forecast days.
const MAX_FORECAST_DAYS: u8 = 14;

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// api_key = "..."
/// default_city = "Lahore"
/// forecast_days = 5
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    pub api_key: Option<String>,

    /// Override for the weather service endpoint, mostly for testing.
    pub base_url: Option<String>,

    /// City shown when nothing has been selected yet.
    pub default_city: Option<String>,

    pub forecast_days: Option<u8>,

    pub search_debounce_ms: Option<u64>,
}

/// The part of the configuration the screen controller runs with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScreenSettings {
    pub default_city: String,
    pub forecast_days: u8,
    pub search_debounce: Duration,
}

impl Default for ScreenSettings {
    fn default() -> Self {
        Self {
            default_city: DEFAULT_CITY.to_string(),
            forecast_days: DEFAULT_FORECAST_DAYS,
            search_debounce: Duration::from_millis(DEFAULT_SEARCH_DEBOUNCE_MS),
        }
    }
}

impl Config {
    /// Returns the API key, or an error telling the user how to set one.
    pub fn api_key(&self) -> Result<&str> {
        self.api_key.as_deref().filter(|k| !k.trim().is_empty()).ok_or_else(|| {
            anyhow!(
                "No API key configured for weatherapi.com.\n\
                 Hint: run `weather configure` and enter your API key."
            )
        })
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_deref().unwrap_or(WEATHERAPI_BASE)
    }

    pub fn default_city(&self) -> &str {
        self.default_city.as_deref().filter(|c| !c.trim().is_empty()).unwrap_or(DEFAULT_CITY)
    }

    pub fn forecast_days(&self) -> u8 {
        self.forecast_days.unwrap_or(DEFAULT_FORECAST_DAYS).clamp(1, MAX_FORECAST_DAYS)
    }

    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms.unwrap_or(DEFAULT_SEARCH_DEBOUNCE_MS))
    }

    pub fn screen_settings(&self) -> ScreenSettings {
        ScreenSettings {
            default_city: self.default_city().to_string(),
            forecast_days: self.forecast_days(),
            search_debounce: self.search_debounce(),
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
        Ok(project_dirs()?.config_dir().join("config.toml"))
    }

    /// Path to the key-value file holding the last selected city.
    pub fn state_file_path() -> Result<PathBuf> {
        Ok(project_dirs()?.data_dir().join("state.json"))
    }
}

fn project_dirs() -> Result<ProjectDirs> {
    ProjectDirs::from("dev", "weather-task", "weather-cli")
        .ok_or_else(|| anyhow!("Could not determine platform config directory"))
}
