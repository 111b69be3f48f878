pub mod config;
pub mod error;
pub mod keys;
pub mod kv;
pub mod models;
pub mod openapi;
pub mod routes;
pub mod shortcode;
pub mod store;
pub mod validation;

// Re-export commonly used items for tests / external users
pub use routes::{config, AppState};
pub use store::{AdStore, ListingOrder, StoreError};
