pub mod http;
pub mod kv_store;

pub use http::HttpPlantApi;
pub use kv_store::{FileStore, MemoryStore};
