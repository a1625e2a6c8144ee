//! Tracing subscriber setup.

use anyhow::{Result, anyhow};
use tracing_subscriber::EnvFilter;

/// Installs the global fmt subscriber.
///
/// `RUST_LOG` wins when set; otherwise `default_level` (e.g. `"info"` or
/// `"profilehub_application=debug"`) is used. Fails if a global subscriber
/// is already installed.
pub fn init_tracing(default_level: &str) -> Result<()> {
    let filter = build_filter(default_level)?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
        .map_err(|e| anyhow!("Failed to install tracing subscriber: {}", e))
}

fn build_filter(default_level: &str) -> Result<EnvFilter> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(default_level)
            .map_err(|e| anyhow!("Invalid log filter '{}': {}", default_level, e)),
    }
}
