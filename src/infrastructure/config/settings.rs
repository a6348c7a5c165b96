//! Application configuration loading and validation.
//!
//! Provides the main [`Config`] struct that aggregates all application settings.
//! Configuration is loaded from a TOML file; `STRIKEBOOK_DATABASE` overrides
//! the database path.
//!
//! # Example
//!
//! ```no_run
//! use strikebook::infrastructure::config::settings::Config;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load("config.toml")?;
//!     config.init_logging();
//!     Ok(())
//! }
//! ```

use std::path::Path;

use serde::Deserialize;

use super::analytics::{AnalyticsConfig, MAX_HOURS};
use super::logging::LoggingConfig;
use crate::error::{ConfigError, Result};

/// Environment variable overriding [`Config::database`].
pub const DATABASE_ENV: &str = "STRIKEBOOK_DATABASE";

/// Main application configuration.
///
/// Load from a TOML file using [`Config::load`] or parse directly with
/// [`Config::parse_toml`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Config {
    /// Path to SQLite database file.
    ///
    /// Defaults to "strikebook.db" in the current directory.
    #[serde(default = "default_database_path")]
    pub database: String,

    /// Logging and tracing configuration.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Snapshot caching and scheduled recomputation.
    #[serde(default)]
    pub analytics: AnalyticsConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: default_database_path(),
            logging: LoggingConfig::default(),
            analytics: AnalyticsConfig::default(),
        }
    }
}

fn default_database_path() -> String {
    "strikebook.db".to_string()
}

impl Config {
    /// Parse configuration from TOML content.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML content is malformed or validation fails.
    pub fn parse_toml(content: &str) -> Result<Self> {
        let mut config: Self = toml::from_str(content).map_err(ConfigError::Parse)?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file cannot be read
    /// - The TOML content is malformed
    /// - Validation fails
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        Self::parse_toml(&content)
    }

    /// Load configuration from a TOML file, falling back to defaults when
    /// the file does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if an existing file cannot be read or is invalid.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        if path.as_ref().exists() {
            return Self::load(path);
        }
        let mut config = Self::default();
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(database) = std::env::var(DATABASE_ENV) {
            if !database.trim().is_empty() {
                self.database = database;
            }
        }
    }

    /// Validate configuration values.
    fn validate(&self) -> Result<()> {
        if self.database.trim().is_empty() {
            return Err(ConfigError::MissingField { field: "database" }.into());
        }
        if self.analytics.label.trim().is_empty() {
            return Err(ConfigError::MissingField { field: "label" }.into());
        }
        if self.analytics.freshness_hours == 0 || self.analytics.freshness_hours > MAX_HOURS {
            return Err(ConfigError::InvalidValue {
                field: "freshness_hours",
                reason: format!("must be between 1 and {MAX_HOURS}"),
            }
            .into());
        }
        if self.analytics.recalculate_interval_hours == 0
            || self.analytics.recalculate_interval_hours > MAX_HOURS
        {
            return Err(ConfigError::InvalidValue {
                field: "recalculate_interval_hours",
                reason: format!("must be between 1 and {MAX_HOURS}"),
            }
            .into());
        }
        match self.logging.format.as_str() {
            "pretty" | "json" => {}
            other => {
                return Err(ConfigError::InvalidValue {
                    field: "format",
                    reason: format!("expected \"pretty\" or \"json\", got {other:?}"),
                }
                .into());
            }
        }
        Ok(())
    }

    /// Initialize logging based on configuration.
    pub fn init_logging(&self) {
        self.logging.init();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn empty_file_uses_defaults() {
        let config = toml::from_str::<Config>("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.database, "strikebook.db");
        assert_eq!(config.logging.format, "pretty");
    }

    #[test]
    fn zero_freshness_is_rejected() {
        let config = Config {
            analytics: AnalyticsConfig {
                freshness_hours: 0,
                ..AnalyticsConfig::default()
            },
            ..Config::default()
        };
        let err = config.validate().unwrap_err();
        assert!(matches!(
            err,
            Error::Config(ConfigError::InvalidValue {
                field: "freshness_hours",
                ..
            })
        ));
    }

    #[test]
    fn blank_label_is_missing() {
        let config = Config {
            analytics: AnalyticsConfig {
                label: "  ".into(),
                ..AnalyticsConfig::default()
            },
            ..Config::default()
        };
        assert!(matches!(
            config.validate(),
            Err(Error::Config(ConfigError::MissingField { field: "label" }))
        ));
    }

    #[test]
    fn unknown_log_format_is_rejected() {
        let mut config = Config::default();
        config.logging.format = "xml".into();
        assert!(config.validate().is_err());
    }
}
