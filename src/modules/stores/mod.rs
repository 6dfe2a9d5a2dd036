// Stores module

pub mod controllers;
pub mod models;
pub mod repositories;
pub mod services;

pub use models::{Store, StoreFilter, StoreProduct, StoreProductFilter, StoreType};
pub use services::StoreService;
