//! Configuration management for peerview.
//!
//! Loads configuration from ${PEERVIEW_HOME}/config.toml with sensible defaults.

use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Scheduling knobs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Rounds a single settle may take before it is cut short.
    pub max_rounds: usize,
    /// Sleep between settles in the host loop, in milliseconds.
    pub idle_poll_ms: u64,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            max_rounds: 64,
            idle_poll_ms: 100,
        }
    }
}

impl RuntimeConfig {
    pub fn idle_poll(&self) -> Duration {
        Duration::from_millis(self.idle_poll_ms)
    }
}

/// Application identity and outbound links.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Version compared against the latest published one.
    pub version: String,
    pub download_url: String,
    pub translate_url: String,
    pub bug_report_email: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            download_url: "https://www.manyver.se/download".to_string(),
            translate_url: "https://www.manyver.se/translations/".to_string(),
            bug_report_email: "contact@staltz.com".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// `tracing-subscriber` filter used when `RUST_LOG` is unset.
    pub filter: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: "warn".to_string(),
        }
    }
}

/// peerview configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub runtime: RuntimeConfig,
    pub app: AppConfig,
    pub log: LogConfig,
}

impl Config {
    /// Loads configuration from the default config path.
    ///
    /// Returns defaults if the file doesn't exist.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load() -> Result<Self> {
        Self::load_from(&paths::config_path())
    }

    /// Loads configuration from a specific path.
    ///
    /// Returns defaults if the file doesn't exist.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or contains invalid TOML.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Renders the default configuration as TOML.
    ///
    /// # Errors
    /// Returns an error if serialization fails.
    pub fn default_toml() -> Result<String> {
        toml::to_string_pretty(&Self::default()).context("Failed to render default config")
    }

    /// Writes the default configuration to `path`, creating parent dirs.
    ///
    /// # Errors
    /// Returns an error if the file already exists or cannot be written.
    pub fn init(path: &Path) -> Result<()> {
        if path.exists() {
            anyhow::bail!("Config file already exists at {}", path.display());
        }

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config dir {}", parent.display()))?;
        }

        fs::write(path, Self::default_toml()?)
            .with_context(|| format!("Failed to write config file: {}", path.display()))
    }
}

pub mod paths {
    //! Path resolution for peerview configuration.
    //!
    //! PEERVIEW_HOME resolution order:
    //! 1. PEERVIEW_HOME environment variable (if set)
    //! 2. ~/.config/peerview (default)
    //! 3. ./.peerview when no home directory can be determined

    use std::path::PathBuf;

    /// Returns the peerview home directory.
    pub fn peerview_home() -> PathBuf {
        if let Ok(home) = std::env::var("PEERVIEW_HOME") {
            return PathBuf::from(home);
        }

        dirs::home_dir().map_or_else(
            || PathBuf::from(".peerview"),
            |h| h.join(".config").join("peerview"),
        )
    }

    /// Returns the path to the config.toml file.
    pub fn config_path() -> PathBuf {
        peerview_home().join("config.toml")
    }
}
