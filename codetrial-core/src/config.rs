//! Configuration loading and management
//!
//! Configuration is loaded from `~/.config/codetrial/config.toml`
//!
//! This module follows the XDG Base Directory Specification:
//! - Config: `$XDG_CONFIG_HOME/codetrial/` (~/.config/codetrial/)
//! - Data: `$XDG_DATA_HOME/codetrial/` (~/.local/share/codetrial/)
//! - State/Logs: `$XDG_STATE_HOME/codetrial/` (~/.local/state/codetrial/)

use crate::error::{Error, Result};
use serde::Deserialize;
use std::path::PathBuf;

/// Returns a best-effort home directory path.
fn home_dir() -> PathBuf {
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Returns XDG_CONFIG_HOME or ~/.config
fn xdg_config_home() -> PathBuf {
    std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".config"))
}

/// Returns XDG_DATA_HOME or ~/.local/share
fn xdg_data_home() -> PathBuf {
    std::env::var("XDG_DATA_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".local/share"))
}

/// Returns XDG_STATE_HOME or ~/.local/state
fn xdg_state_home() -> PathBuf {
    std::env::var("XDG_STATE_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".local/state"))
}

/// Main configuration struct
#[derive(Debug, Deserialize, Default)]
pub struct Config {
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Tool comparison configuration
    #[serde(default)]
    pub comparison: ComparisonConfig,

    /// Developer defaults
    #[serde(default)]
    pub developer: DeveloperConfig,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Tool comparison configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ComparisonConfig {
    /// Satisfaction-mean difference below which a comparison is a tie.
    ///
    /// A noise filter, not a significance test.
    #[serde(default = "default_preference_deadband")]
    pub preference_deadband: f64,
}

impl Default for ComparisonConfig {
    fn default() -> Self {
        Self {
            preference_deadband: default_preference_deadband(),
        }
    }
}

fn default_preference_deadband() -> f64 {
    0.5
}

/// Developer defaults
#[derive(Debug, Deserialize, Default)]
pub struct DeveloperConfig {
    /// Default developer id stamped on new sessions
    pub id: Option<String>,
}

impl Config {
    /// Load configuration from the default path
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();

        if !config_path.exists() {
            tracing::info!("No config file found at {:?}, using defaults", config_path);
            return Ok(Config::default());
        }

        Self::load_from(&config_path)
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &PathBuf) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("failed to read config file {:?}: {}", path, e)))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("failed to parse config: {}", e)))?;

        if config.comparison.preference_deadband < 0.0 {
            return Err(Error::Config(
                "comparison.preference_deadband must be >= 0".to_string(),
            ));
        }

        Ok(config)
    }

    /// Returns the default config file path
    ///
    /// `$XDG_CONFIG_HOME/codetrial/config.toml` (~/.config/codetrial/config.toml)
    pub fn config_path() -> PathBuf {
        xdg_config_home().join("codetrial").join("config.toml")
    }

    /// Returns the data directory path (for the SQLite database)
    ///
    /// `$XDG_DATA_HOME/codetrial/` (~/.local/share/codetrial/)
    pub fn data_dir() -> PathBuf {
        xdg_data_home().join("codetrial")
    }

    /// Returns the state directory path (for logs)
    ///
    /// `$XDG_STATE_HOME/codetrial/` (~/.local/state/codetrial/)
    pub fn state_dir() -> PathBuf {
        xdg_state_home().join("codetrial")
    }

    /// Returns the database file path
    ///
    /// `$XDG_DATA_HOME/codetrial/data.db` (~/.local/share/codetrial/data.db)
    pub fn database_path() -> PathBuf {
        Self::data_dir().join("data.db")
    }

    /// Returns the log file path
    ///
    /// `$XDG_STATE_HOME/codetrial/codetrial.log` (~/.local/state/codetrial/codetrial.log)
    pub fn log_path() -> PathBuf {
        Self::state_dir().join("codetrial.log")
    }

    /// Ensure XDG base directory environment variables are set.
    ///
    /// This is mainly for CLI binaries that want explicit, stable path behavior
    /// before invoking other components that read these env vars.
    pub fn ensure_xdg_env() {
        let home = home_dir();

        if std::env::var("XDG_DATA_HOME").is_err() {
            std::env::set_var("XDG_DATA_HOME", home.join(".local/share"));
        }

        if std::env::var("XDG_STATE_HOME").is_err() {
            std::env::set_var("XDG_STATE_HOME", home.join(".local/state"));
        }

        if std::env::var("XDG_CONFIG_HOME").is_err() {
            std::env::set_var("XDG_CONFIG_HOME", home.join(".config"));
        }
    }
}
