pub mod auth_gate;
pub mod browser;
pub mod plant_query;
pub mod recency_store;
pub mod token;

pub use auth_gate::{classify, AuthGate, Disposition, MessageDebouncer, UiEvent};
pub use browser::{Browser, PlantPage};
pub use plant_query::PlantQueryService;
pub use recency_store::RecencyStore;
pub use token::TokenStore;
