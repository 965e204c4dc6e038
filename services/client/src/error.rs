//! services/client/src/error.rs
//!
//! Defines the primary error type for the client and its CLI.

use crate::config::ConfigError;
use floripedia_core::envelope::Failure;
use floripedia_core::filter::FilterError;
use floripedia_core::ports::PortError;

/// The primary error type for the `client` service.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Represents an error that occurred during configuration loading.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Represents an error that propagated up from one of the core ports.
    #[error("Service Port Error: {0}")]
    Port(#[from] PortError),

    /// A classified failure from a query, already shown to the user.
    #[error("{0}")]
    Failure(#[from] Failure),

    /// A filter value outside its axis's closed set.
    #[error("Filter error: {0}")]
    Filter(#[from] FilterError),

    /// Represents an error building the HTTP client.
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Output encoding error: {0}")]
    Json(#[from] serde_json::Error),

    /// A catch-all for any other unexpected errors.
    #[error("An unexpected internal error occurred: {0}")]
    Internal(String),
}
