//! Configuration loading — TOML file with environment variable overrides.
//!
//! Looks for `zonehub.toml` in the working directory unless a path is given.
//! Every field has a default so the file is optional. Environment variables
//! take precedence over file values.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use zonehub_app::services::color::ColorSettings;
use zonehub_app::services::color_temperature::ColorTemperatureSettings;
use zonehub_app::services::dim::DimSettings;
use zonehub_app::services::non_reporting::NonReportingSettings;
use zonehub_app::services::presence::PresenceSettings;
use zonehub_app::services::random_color::RandomColorSettings;
use zonehub_domain::cooldown::CooldownInterval;

const DEFAULT_PATH: &str = "zonehub.toml";

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub logging: LoggingConfig,
    /// Key-value store settings.
    pub storage: StorageConfig,
    /// Home snapshot loaded into the virtual hub.
    pub snapshot: SnapshotConfig,
    pub dim: DimSettings,
    pub color: ColorSettings,
    pub color_temperature: ColorTemperatureSettings,
    pub random_color: RandomColorSettings,
    pub non_reporting: NonReportingSettings,
    pub presence: PresenceSettings,
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`RUST_LOG` syntax).
    pub filter: String,
}

/// `SQLite` key-value store configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// `SQLite` connection URL or file path.
    pub database_url: String,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SnapshotConfig {
    /// JSON file describing zones, devices, users and flows.
    pub path: PathBuf,
}

impl Config {
    /// Load configuration from `path` (or `zonehub.toml` if present), then
    /// apply environment-variable overrides and validate.
    ///
    /// # Errors
    ///
    /// Returns an error if an explicit file is missing, a file is malformed,
    /// or a value is out of range.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_content(&std::fs::read_to_string(path)?)?,
            None => Self::from_file(DEFAULT_PATH)?,
        };
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => Self::from_content(&content),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    fn from_content(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(ConfigError::Parse)
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("ZONEHUB_SNAPSHOT") {
            self.snapshot.path = PathBuf::from(val);
        }
        if let Ok(val) = std::env::var("ZONEHUB_DATABASE_URL") {
            self.storage.database_url = val;
        }
        if let Ok(val) = std::env::var("ZONEHUB_LOG") {
            self.logging.filter = val;
        }
        if let Ok(val) = std::env::var("RUST_LOG") {
            self.logging.filter = val;
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.storage.database_url.is_empty() {
            return Err(ConfigError::Validation(
                "storage.database_url must not be empty".to_string(),
            ));
        }
        if self.snapshot.path.as_os_str().is_empty() {
            return Err(ConfigError::Validation(
                "snapshot.path must not be empty".to_string(),
            ));
        }
        if self.dim.fallback_threshold > 100 {
            return Err(ConfigError::Validation(format!(
                "dim.fallback_threshold must be a percentage, got {}",
                self.dim.fallback_threshold
            )));
        }
        CooldownInterval::new(
            self.random_color.interval_min,
            self.random_color.interval_max,
        )
        .map_err(|err| ConfigError::Validation(format!("random_color: {err}")))?;
        Ok(())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "zonehub=info,zonehub_app=info".to_string(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_url: "sqlite:zonehub.db?mode=rwc".to_string(),
        }
    }
}

impl Default for SnapshotConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("home.json"),
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML parse failure.
    #[error("failed to parse config file")]
    Parse(#[from] toml::de::Error),
    /// File I/O failure.
    #[error("failed to read config file")]
    Io(#[from] std::io::Error),
    /// Semantic validation failure.
    #[error("invalid configuration: {0}")]
    Validation(String),
}
