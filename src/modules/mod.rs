use actix_web::web;

use crate::middleware::{error_handler, RateLimiter};

pub mod auth;
pub mod health;
pub mod products;
pub mod stores;

/// Register every route and extractor handler
///
/// `login_limiter` is shared by all workers so the login quota is per
/// process, not per worker.
pub fn configure(cfg: &mut web::ServiceConfig, login_limiter: RateLimiter) {
    error_handler::configure(cfg);
    health::configure(cfg);
    cfg.service(web::scope("/api").configure(|api| {
        auth::controllers::configure(api, login_limiter);
        products::controllers::configure(api);
        stores::controllers::configure(api);
    }));
}
