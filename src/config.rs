//! Process configuration, resolved once at startup and passed down.

use std::env;
use std::path::PathBuf;

use thiserror::Error;

/// Monitored page when `SITEWATCH_TARGET_URL` is not set.
pub const DEFAULT_TARGET_URL: &str = "https://www.31sumai.com/attend/X2571/";

/// State file location when `SITEWATCH_STATE_FILE` is not set.
pub const DEFAULT_STATE_FILE: &str = "state.json";

/// Environment variable carrying the Discord webhook URL.
pub const WEBHOOK_ENV: &str = "DISCORD_WEBHOOK_URL";

/// Configuration errors are fatal before any network activity happens.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("environment variable {WEBHOOK_ENV} is not set")]
    MissingWebhookUrl,
}

/// Runtime configuration for one monitoring run.
#[derive(Debug, Clone)]
pub struct Config {
    /// Page whose visible content is being watched.
    pub target_url: String,
    /// Where the fingerprint baseline is persisted between runs.
    pub state_file: PathBuf,
    /// Discord webhook that receives change notifications.
    pub webhook_url: String,
}

impl Config {
    /// Resolve configuration from the process environment.
    ///
    /// The webhook URL is required; an empty value counts as missing. Target
    /// URL and state file fall back to the built-in defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        let webhook_url = env::var(WEBHOOK_ENV)
            .ok()
            .filter(|value| !value.is_empty())
            .ok_or(ConfigError::MissingWebhookUrl)?;

        Ok(Self {
            target_url: env::var("SITEWATCH_TARGET_URL")
                .unwrap_or_else(|_| DEFAULT_TARGET_URL.to_string()),
            state_file: state_file_from_env(),
            webhook_url,
        })
    }
}

/// State file path resolution that does not require the webhook variable.
///
/// Commands that only read local state (e.g. `status`) use this directly.
pub fn state_file_from_env() -> PathBuf {
    env::var("SITEWATCH_STATE_FILE")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_STATE_FILE))
}
