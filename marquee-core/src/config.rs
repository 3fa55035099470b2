//! Configuration loading and management
//!
//! Configuration is loaded from `~/.config/marquee/config.toml`
//!
//! This module follows the XDG Base Directory Specification:
//! - Config: `$XDG_CONFIG_HOME/marquee/` (~/.config/marquee/)
//! - Data: `$XDG_DATA_HOME/marquee/` (~/.local/share/marquee/)
//! - State/Logs: `$XDG_STATE_HOME/marquee/` (~/.local/state/marquee/)

use crate::error::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

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
    /// Analytics configuration
    #[serde(default)]
    pub analytics: AnalyticsConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Analytics configuration
#[derive(Debug, Deserialize, Clone)]
pub struct AnalyticsConfig {
    /// Fold series watch dates into the streak and `last_watched_date`.
    ///
    /// Off by default: series carry one "marked watched" date rather than
    /// per-episode dates, so only movies and episodes count as activity.
    #[serde(default)]
    pub include_series_dates: bool,

    /// Number of genres listed in a wrapped summary
    #[serde(default = "default_top_genres_count")]
    pub top_genres_count: usize,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            include_series_dates: false,
            top_genres_count: default_top_genres_count(),
        }
    }
}

impl AnalyticsConfig {
    /// Wrapped top-genre cardinality, never zero.
    pub fn top_genres(&self) -> usize {
        self.top_genres_count.max(1)
    }
}

fn default_top_genres_count() -> usize {
    5
}

/// Logging configuration
#[derive(Debug, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Maximum number of log files to keep
    #[serde(default = "default_max_log_files")]
    pub max_files: usize,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            max_files: default_max_log_files(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_max_log_files() -> usize {
    5
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
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("failed to read config file {:?}: {}", path, e)))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("failed to parse config: {}", e)))?;

        Ok(config)
    }

    /// Returns the default config file path
    ///
    /// `$XDG_CONFIG_HOME/marquee/config.toml` (~/.config/marquee/config.toml)
    pub fn config_path() -> PathBuf {
        xdg_config_home().join("marquee").join("config.toml")
    }

    /// Returns the data directory path (for SQLite database)
    ///
    /// `$XDG_DATA_HOME/marquee/` (~/.local/share/marquee/)
    pub fn data_dir() -> PathBuf {
        xdg_data_home().join("marquee")
    }

    /// Returns the state directory path (for logs)
    ///
    /// `$XDG_STATE_HOME/marquee/` (~/.local/state/marquee/)
    pub fn state_dir() -> PathBuf {
        xdg_state_home().join("marquee")
    }

    /// Returns the database file path
    ///
    /// `$XDG_DATA_HOME/marquee/data.db` (~/.local/share/marquee/data.db)
    pub fn database_path() -> PathBuf {
        Self::data_dir().join("data.db")
    }
}
