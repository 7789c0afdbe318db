//! # Configuration Persistence
//!
//! Save and load client settings to/from disk.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use crate::router::DEFAULT_SIGN_IN_PATH;

/// Errors from changing or saving configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No user config directory on this platform.
    #[error("could not determine config directory")]
    NoConfigDir,

    /// Filesystem error.
    #[error("failed to write config: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("failed to serialize config: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Key is not a config setting.
    #[error("unknown config key '{0}' (expected one of: {keys})", keys = Config::KEYS.join(", "))]
    UnknownKey(String),

    /// Value does not fit the setting.
    #[error("invalid value '{value}' for {key}: {reason}")]
    InvalidValue {
        key: &'static str,
        value: String,
        reason: &'static str,
    },
}

/// Client configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL of the Khel backend.
    pub api_url: String,

    /// Where signed-out users are sent.
    pub sign_in_path: String,

    /// Per-request timeout, in seconds.
    pub request_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:8000".to_string(),
            sign_in_path: DEFAULT_SIGN_IN_PATH.to_string(),
            request_timeout_secs: 30,
        }
    }
}

impl Config {
    /// Settings accepted by [`set`](Self::set).
    pub const KEYS: [&'static str; 3] = ["api_url", "sign_in_path", "request_timeout_secs"];

    /// Returns the default config file path.
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("khel").join("config.json"))
    }

    /// Request timeout as a [`Duration`].
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Loads configuration from the default path, or returns defaults.
    pub fn load() -> Self {
        let Some(path) = Self::config_path() else {
            tracing::warn!("Could not determine config directory");
            return Self::default();
        };
        Self::load_from(&path)
    }

    /// Loads configuration from a file, or returns defaults if it is missing
    /// or unreadable.
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            tracing::debug!(?path, "Config file not found, using defaults");
            return Self::default();
        }

        match fs::read_to_string(path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(config) => {
                    tracing::info!(?path, "Loaded configuration");
                    config
                }
                Err(e) => {
                    tracing::warn!(?path, error = %e, "Failed to parse config, using defaults");
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!(?path, error = %e, "Failed to read config, using defaults");
                Self::default()
            }
        }
    }

    /// Updates one setting from its string form.
    ///
    /// # Errors
    ///
    /// * [`ConfigError::UnknownKey`] - key not in [`KEYS`](Self::KEYS)
    /// * [`ConfigError::InvalidValue`] - value rejected; the config is unchanged
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let value = value.trim();
        let invalid = |key: &'static str, reason: &'static str| ConfigError::InvalidValue {
            key,
            value: value.to_string(),
            reason,
        };

        match key {
            "api_url" => {
                if !(value.starts_with("http://") || value.starts_with("https://")) {
                    return Err(invalid("api_url", "expected an http(s) URL"));
                }
                self.api_url = value.trim_end_matches('/').to_string();
            }
            "sign_in_path" => {
                if !value.starts_with('/') {
                    return Err(invalid("sign_in_path", "expected a path starting with '/'"));
                }
                self.sign_in_path = value.to_string();
            }
            "request_timeout_secs" => {
                self.request_timeout_secs = value
                    .parse()
                    .ok()
                    .filter(|secs| *secs > 0)
                    .ok_or_else(|| {
                        invalid("request_timeout_secs", "expected a positive number of seconds")
                    })?;
            }
            other => return Err(ConfigError::UnknownKey(other.to_string())),
        }

        tracing::debug!(key, value, "Config updated");
        Ok(())
    }

    /// Saves configuration to a file, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = serde_json::to_string_pretty(self)?;
        fs::write(path, contents)?;

        tracing::info!(?path, "Saved configuration");
        Ok(())
    }
}
