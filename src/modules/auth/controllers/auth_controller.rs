use actix_web::{web, HttpResponse};

use crate::core::ServiceFailure;
use crate::middleware::RateLimiter;
use crate::modules::auth::models::LoginRequest;
use crate::state::AppState;

/// Log in
///
/// POST /api/auth
pub async fn login(
    state: web::Data<AppState>,
    body: web::Json<LoginRequest>,
) -> Result<HttpResponse, ServiceFailure> {
    let request = body.into_inner();
    let response = state
        .auth_service()
        .login(
            request.username.as_deref().unwrap_or_default(),
            request.password.as_deref().unwrap_or_default(),
        )
        .await?;

    Ok(HttpResponse::Ok().json(response))
}

/// Configure auth routes behind the login rate limiter
pub fn configure(cfg: &mut web::ServiceConfig, limiter: RateLimiter) {
    cfg.service(
        web::resource("/auth")
            .wrap(limiter)
            .route(web::post().to(login)),
    );
}
