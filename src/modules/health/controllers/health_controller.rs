use actix_web::{web, HttpResponse, Responder};
use serde::{Deserialize, Serialize};

use crate::state::AppState;

/// Health check response structure
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
    pub version: String,
}

/// Readiness probe response structure
#[derive(Debug, Serialize, Deserialize)]
pub struct ReadinessResponse {
    pub ready: bool,
    pub checks: ReadinessChecks,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ReadinessChecks {
    pub storage: bool,
    pub image_directory: bool,
}

/// GET /health - Liveness probe
/// Does not check dependencies
pub async fn health_check() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// GET /ready - Readiness probe
/// Pings the backing store and checks the image directory exists
pub async fn readiness_check(state: web::Data<AppState>) -> impl Responder {
    let storage = match state.repositories.ping().await {
        Ok(()) => true,
        Err(e) => {
            tracing::error!(error = %e, "Storage readiness check failed");
            false
        }
    };
    let image_directory = tokio::fs::metadata(&state.image_dir)
        .await
        .map(|m| m.is_dir())
        .unwrap_or(false);

    let response = ReadinessResponse {
        ready: storage && image_directory,
        checks: ReadinessChecks {
            storage,
            image_directory,
        },
    };

    if response.ready {
        HttpResponse::Ok().json(response)
    } else {
        HttpResponse::ServiceUnavailable().json(response)
    }
}

/// Configure health check routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check))
        .route("/ready", web::get().to(readiness_check));
}
