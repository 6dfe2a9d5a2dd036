pub mod auth;
pub mod error_handler;
pub mod rate_limit;

pub use auth::{JwtAuth, ADMIN_ROLE};
pub use rate_limit::RateLimiter;
