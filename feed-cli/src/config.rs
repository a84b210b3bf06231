//! Configuration loading for feed-cli.
//!
//! Configuration is loaded from a TOML file (default: `feed.toml`). Every
//! field has a default, so the file and each of its sections are optional.

use feed_client::HttpSourceConfig;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default configuration file, looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "feed.toml";

/// Root configuration for feed-cli.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Posts server configuration.
    #[serde(default)]
    pub source: SourceConfig,
    /// Logging configuration.
    #[serde(default)]
    pub log: LogConfig,
}

/// Posts server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct SourceConfig {
    /// Scheme, host and port (default: http://10.0.2.2:9999).
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Path prefix in front of `/posts` (default: /api/slow).
    #[serde(default = "default_api_prefix")]
    pub api_prefix: String,
    /// Connect timeout in seconds (default: 30).
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// Filter used when `RUST_LOG` is not set (default: info).
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

// Default value functions
fn default_base_url() -> String {
    feed_client::source::DEFAULT_BASE_URL.to_string()
}

fn default_api_prefix() -> String {
    feed_client::source::DEFAULT_API_PREFIX.to_string()
}

fn default_connect_timeout_secs() -> u64 {
    feed_client::source::DEFAULT_CONNECT_TIMEOUT.as_secs()
}

fn default_log_filter() -> String {
    "info".to_string()
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_prefix: default_api_prefix(),
            connect_timeout_secs: default_connect_timeout_secs(),
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
        }
    }
}

impl SourceConfig {
    /// Settings for the HTTP post source.
    pub fn to_http(&self) -> HttpSourceConfig {
        HttpSourceConfig::new(&self.base_url)
            .with_api_prefix(&self.api_prefix)
            .with_connect_timeout(Duration::from_secs(self.connect_timeout_secs))
    }
}

impl Config {
    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Load the explicit file if given, else `feed.toml` if present, else defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::from_file(path),
            None => {
                let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    Self::from_file(&default_path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read configuration file.
    #[error("failed to read config file {path}: {source}")]
    ReadError {
        /// Path to the configuration file.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
    /// Failed to parse configuration file.
    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        /// Path to the configuration file.
        path: PathBuf,
        /// Underlying TOML parse error.
        source: toml::de::Error,
    },
}
