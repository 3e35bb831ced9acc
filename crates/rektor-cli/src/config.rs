//! Configuration loading
//!
//! `rektor.toml` holds the Rekor endpoint and request timeout. A missing file
//! means the public instance with default settings; `REKTOR_BASE_URL`
//! overrides whatever the file says.

use std::path::Path;
use std::time::Duration;

use rektor::rekor::{RekorClient, DEFAULT_TIMEOUT, PUBLIC_REKOR_URL};
use serde::{Deserialize, Serialize};

/// Environment variable that overrides `api.base_url`
pub const BASE_URL_ENV: &str = "REKTOR_BASE_URL";

/// Top-level configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
}

/// Rekor endpoint settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ApiConfig {
    /// Base URL of the Rekor instance, without `/api/v1`
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    PUBLIC_REKOR_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT.as_secs()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Config {
    /// Load configuration from `path`, falling back to defaults when the file
    /// does not exist, then apply the environment override.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed, or if
    /// the resulting configuration is invalid.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        Self::load_with_override(path, std::env::var(BASE_URL_ENV).ok())
    }

    fn load_with_override(
        path: &Path,
        base_url: Option<String>,
    ) -> Result<Self, ConfigError> {
        let mut config = if path.exists() {
            tracing::debug!(path = %path.display(), "loading configuration");
            Self::from_file(path)?
        } else {
            tracing::debug!(path = %path.display(), "no configuration file, using defaults");
            Self::default()
        };

        config.apply_base_url_override(base_url);
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid or has unknown keys.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Replace the base URL when an override is present and non-empty
    pub fn apply_base_url_override(&mut self, value: Option<String>) {
        if let Some(url) = value.filter(|v| !v.trim().is_empty()) {
            tracing::debug!(%url, "base URL overridden from {}", BASE_URL_ENV);
            self.api.base_url = url;
        }
    }

    /// Check that the configuration can build a usable client.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] for a non-HTTP base URL or a zero
    /// timeout.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = self.api.base_url.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ConfigError::Validation(format!(
                "api.base_url must be an http(s) URL, got '{}'",
                self.api.base_url
            )));
        }
        if url.trim_end_matches('/').ends_with("/api/v1") {
            return Err(ConfigError::Validation(
                "api.base_url must not include the /api/v1 suffix".to_string(),
            ));
        }
        if self.api.timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "api.timeout_secs must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.api.timeout_secs)
    }

    /// Build a Rekor client for the configured endpoint
    pub fn client(&self) -> RekorClient {
        RekorClient::new(self.api.base_url.trim()).with_timeout(self.timeout())
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// I/O error reading configuration file.
    #[error("failed to read configuration file: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parsing error.
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),

    /// Semantically invalid configuration.
    #[error("invalid configuration: {0}")]
    Validation(String),
}
