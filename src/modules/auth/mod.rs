// Auth module

pub mod controllers;
pub mod models;
pub mod repositories;
pub mod services;

pub use models::{LoginResponse, SeedData, User};
pub use repositories::UserRepository;
pub use services::{AuthService, Claims};
