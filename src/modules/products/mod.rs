// Products module

pub mod controllers;
pub mod models;
pub mod repositories;
pub mod services;

pub use models::{Product, ProductFilter};
pub use services::ProductService;
