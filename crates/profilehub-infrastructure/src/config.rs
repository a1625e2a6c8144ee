//! Client configuration.
//!
//! Configuration priority: environment variables > config.toml > defaults.
//! A missing config file is not an error.

use crate::paths::ProfileHubPaths;
use profilehub_core::{ProfileError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

const DEFAULT_API_URL: &str = "http://localhost:5000";
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_MESSAGE_DURATION_MS: u64 = 3000;
const DEFAULT_LOG_LEVEL: &str = "info";

pub const ENV_API_URL: &str = "PROFILEHUB_API_URL";
pub const ENV_TIMEOUT_SECS: &str = "PROFILEHUB_TIMEOUT_SECS";
pub const ENV_LOG: &str = "PROFILEHUB_LOG";

/// Settings for talking to the API gateway and presenting results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Base URL of the API gateway (`/users/*` and `/auth/*` live below it)
    pub api_url: String,
    /// Per-request timeout
    pub request_timeout_secs: u64,
    /// How long a transient message stays visible
    pub message_duration_ms: u64,
    /// Default tracing filter when `RUST_LOG` is not set
    pub log_level: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
            message_duration_ms: DEFAULT_MESSAGE_DURATION_MS,
            log_level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

impl ClientConfig {
    /// Loads `~/.config/profilehub/config.toml` and applies environment overrides.
    pub fn load() -> Result<Self> {
        let path = ProfileHubPaths::config_file().map_err(|e| ProfileError::config(e.to_string()))?;
        let mut config = Self::load_from_path(&path)?;
        config.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Reads a config file; a missing file yields the defaults.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!("No config file at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        tracing::debug!("Loaded client config from {}", path.display());
        Ok(config.normalized())
    }

    /// Applies overrides from `lookup` (normally the process environment).
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_API_URL).filter(|v| !v.trim().is_empty()) {
            self.api_url = url;
        }
        if let Some(raw) = lookup(ENV_TIMEOUT_SECS) {
            self.request_timeout_secs = raw.trim().parse().map_err(|_| {
                ProfileError::config(format!("{ENV_TIMEOUT_SECS} must be a whole number, got '{raw}'"))
            })?;
        }
        if let Some(level) = lookup(ENV_LOG).filter(|v| !v.trim().is_empty()) {
            self.log_level = level;
        }
        *self = std::mem::take(self).normalized();
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn message_duration(&self) -> Duration {
        Duration::from_millis(self.message_duration_ms)
    }

    fn normalized(mut self) -> Self {
        self.api_url = self.api_url.trim().trim_end_matches('/').to_string();
        self
    }
}
