mod auth_service;
pub mod password;
pub mod token;

pub use auth_service::AuthService;
pub use token::{issue_token, verify_token, Claims};
