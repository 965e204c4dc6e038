//! crates/floripedia_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the browser's core logic.
//! These traits form the boundary of the hexagonal architecture, keeping the core
//! independent of the HTTP client, the auth provider and the on-device storage.

use async_trait::async_trait;

use crate::domain::{PlantSummary, Token};
use crate::query::QueryParams;

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// The error type for all port operations.
/// Adapters report raw facts here (transport failure, HTTP status and body);
/// the core decides what they mean for the user.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PortError {
    /// No connectivity, unresolvable host or transport timeout.
    #[error("Network error: {0}")]
    Network(String),
    /// The remote answered with a non-2xx status.
    #[error("Request failed with status {code}")]
    Status { code: u16, body: String },
    /// The remote answered 2xx but the payload could not be decoded.
    #[error("Malformed response: {0}")]
    Decode(String),
    #[error("Storage error: {0}")]
    Storage(String),
    /// The request could not be built from the given input; nothing was sent.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

/// The remote plant encyclopedia API.
#[async_trait]
pub trait PlantApi: Send + Sync {
    // --- Browsing ---
    async fn fetch_plants(&self, query: &QueryParams) -> PortResult<Vec<PlantSummary>>;

    async fn count_plants(&self, query: &QueryParams) -> PortResult<u64>;

    async fn fetch_plant(&self, plant_id: &str) -> PortResult<PlantSummary>;

    // --- Favorites (requires identity) ---
    async fn fetch_favorites(&self, query: &QueryParams) -> PortResult<Vec<PlantSummary>>;

    /// Returns `true` when the plant is favorited after the toggle.
    async fn toggle_favorite(&self, plant_id: &str) -> PortResult<bool>;

    // --- Search ---
    async fn search_by_image(&self, image: &[u8]) -> PortResult<PlantSummary>;

    async fn recommend(&self, situation: &str) -> PortResult<PlantSummary>;
}

/// The authentication provider, reduced to what the data layer needs.
#[async_trait]
pub trait AuthProvider: Send + Sync {
    async fn current_token(&self) -> Option<Token>;

    async fn is_logged_in(&self) -> bool {
        self.current_token().await.is_some()
    }
}

/// Persistent key-value storage on the device.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> PortResult<Option<Vec<u8>>>;

    fn put(&self, key: &str, value: &[u8]) -> PortResult<()>;

    fn remove(&self, key: &str) -> PortResult<()>;
}
