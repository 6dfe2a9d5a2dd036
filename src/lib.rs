//! Storage API Library
//!
//! Stores, products and the prices/barcodes stores list them with, behind a
//! bearer-token protected HTTP API.

pub mod config;
pub mod core;
pub mod middleware;
pub mod modules;
pub mod state;

// Re-export commonly used types
pub use modules::auth;
pub use modules::products;
pub use modules::stores;
pub use state::AppState;
