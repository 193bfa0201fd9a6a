use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

const DEFAULT_CATALOG_PATH: &str = "catalog.json";
const DEFAULT_ACTIVITY_POLL_SECS: u64 = 30;
const DEFAULT_LOG_FILTER: &str = "property_catalog=info";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{key} must be a positive number of seconds, got {value:?}")]
    InvalidInterval { key: &'static str, value: String },
}

/// Runtime settings, read from the environment (and `.env` when present)
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// JSON file holding the catalog (`CATALOG_PATH`)
    pub catalog_path: PathBuf,
    /// Polling period when the realtime channel is down (`ACTIVITY_POLL_SECS`)
    pub activity_poll_interval: Duration,
    /// `tracing` filter directives (`RUST_LOG`)
    pub log_filter: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            catalog_path: PathBuf::from(DEFAULT_CATALOG_PATH),
            activity_poll_interval: Duration::from_secs(DEFAULT_ACTIVITY_POLL_SECS),
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the config from any key lookup; unset or empty keys use defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut config = Config::default();

        if let Some(path) = get("CATALOG_PATH") {
            config.catalog_path = PathBuf::from(path);
        }

        if let Some(value) = get("ACTIVITY_POLL_SECS") {
            let secs = value
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .ok_or(ConfigError::InvalidInterval {
                    key: "ACTIVITY_POLL_SECS",
                    value: value.clone(),
                })?;
            config.activity_poll_interval = Duration::from_secs(secs);
        }

        if let Some(filter) = get("RUST_LOG") {
            config.log_filter = filter;
        }

        Ok(config)
    }
}
