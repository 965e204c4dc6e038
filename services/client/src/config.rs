//! services/client/src/config.rs
//!
//! Defines the client's configuration structure and loading logic.
//!
//! All configuration is loaded from environment variables at startup. The `.env`
//! file is used for local development.

use std::path::PathBuf;
use std::time::Duration;
use tracing::Level;

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub api_base_url: String,
    pub store_path: PathBuf,
    pub log_level: Level,
    pub request_timeout: Duration,
    pub error_debounce: chrono::Duration,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// It will look for a `.env` file in the current directory for development,
    /// but this is skipped in test environments to ensure tests are hermetic.
    pub fn from_env() -> Result<Self, ConfigError> {
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }

        // --- Remote API ---
        let mut api_base_url = std::env::var("FLORIPEDIA_API_URL")
            .unwrap_or_else(|_| "http://10.0.2.2:8000/api/v1/".to_string());
        if !api_base_url.starts_with("http://") && !api_base_url.starts_with("https://") {
            return Err(ConfigError::InvalidValue(
                "FLORIPEDIA_API_URL".to_string(),
                format!("'{}' is not an http(s) URL", api_base_url),
            ));
        }
        // Endpoint paths are joined relative to the base.
        if !api_base_url.ends_with('/') {
            api_base_url.push('/');
        }

        let request_timeout = parse_u64("FLORIPEDIA_TIMEOUT_SECS", 30)?;
        let request_timeout = Duration::from_secs(request_timeout);

        // --- Local State ---
        let store_path = std::env::var("FLORIPEDIA_STORE_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./floripedia_store"));

        let error_debounce = parse_u64("FLORIPEDIA_ERROR_DEBOUNCE_MS", 5000)?;
        let error_debounce = i64::try_from(error_debounce).map_err(|_| {
            ConfigError::InvalidValue(
                "FLORIPEDIA_ERROR_DEBOUNCE_MS".to_string(),
                format!("{} is out of range", error_debounce),
            )
        })?;
        let error_debounce = chrono::Duration::milliseconds(error_debounce);

        // --- Logging ---
        let log_level_str = std::env::var("RUST_LOG").unwrap_or_else(|_| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        Ok(Self {
            api_base_url,
            store_path,
            log_level,
            request_timeout,
            error_debounce,
        })
    }
}

fn parse_u64(var: &str, default: u64) -> Result<u64, ConfigError> {
    match std::env::var(var) {
        Ok(raw) => raw
            .trim()
            .parse::<u64>()
            .map_err(|e| ConfigError::InvalidValue(var.to_string(), e.to_string())),
        Err(_) => Ok(default),
    }
}
