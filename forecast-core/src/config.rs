use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::{error::ConfigError, units::TemperatureUnit};

pub const API_KEY_ENV: &str = "OPENWEATHER_API_KEY";
pub const WEATHER_BASE_URL_ENV: &str = "WEATHER_BASE_URL";
pub const GEO_BASE_URL_ENV: &str = "GEO_BASE_URL";

pub const DEFAULT_WEATHER_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";
pub const DEFAULT_GEO_BASE_URL: &str = "https://api.openweathermap.org/geo/1.0";

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// api_key = "..."
/// weather_base_url = "https://api.openweathermap.org/data/2.5"
/// geo_base_url = "https://api.openweathermap.org/geo/1.0"
/// default_unit = "fahrenheit"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    pub api_key: Option<String>,
    pub weather_base_url: Option<String>,
    pub geo_base_url: Option<String>,
    #[serde(default)]
    pub default_unit: TemperatureUnit,
}

/// Validated provider settings; every value is non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiSettings {
    pub api_key: String,
    pub weather_base_url: String,
    pub geo_base_url: String,
}

impl Config {
    /// Load config from disk (or an empty default on first run), then apply
    /// environment overrides.
    pub fn load() -> Result<Self> {
        let mut cfg = Self::load_from(&Self::config_file_path()?)?;
        cfg.apply_env(|key| std::env::var(key).ok());
        Ok(cfg)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::config_file_path()?;
        self.save_to(&path)?;
        Ok(path)
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

        tracing::info!(path = %path.display(), "configuration saved");
        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "forecast", "forecast-cli")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Non-empty values from `lookup` replace what the file provided.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(key) = read(API_KEY_ENV) {
            self.api_key = Some(key);
        }
        if let Some(url) = read(WEATHER_BASE_URL_ENV) {
            self.weather_base_url = Some(url);
        }
        if let Some(url) = read(GEO_BASE_URL_ENV) {
            self.geo_base_url = Some(url);
        }
    }

    /// Pre-fills the public provider URLs where none are set.
    pub fn with_defaults_for_missing_urls(mut self) -> Self {
        self.weather_base_url
            .get_or_insert_with(|| DEFAULT_WEATHER_BASE_URL.to_string());
        self.geo_base_url
            .get_or_insert_with(|| DEFAULT_GEO_BASE_URL.to_string());
        self
    }

    /// Fails fast when any required value is absent or blank.
    pub fn api_settings(&self) -> Result<ApiSettings, ConfigError> {
        Ok(ApiSettings {
            api_key: required(&self.api_key, "api_key", API_KEY_ENV)?,
            weather_base_url: required(
                &self.weather_base_url,
                "weather_base_url",
                WEATHER_BASE_URL_ENV,
            )?,
            geo_base_url: required(&self.geo_base_url, "geo_base_url", GEO_BASE_URL_ENV)?,
        })
    }
}

fn required(
    value: &Option<String>,
    field: &'static str,
    env: &'static str,
) -> Result<String, ConfigError> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(|v| v.trim_end_matches('/').to_string())
        .ok_or(ConfigError::Missing { field, env })
}
