//! Extractor error handlers
//!
//! Malformed bodies, query strings and path segments are reported in the
//! same `{"errors": ["INVALID_DATA"], ...}` shape as service failures.

use actix_web::{
    error::{JsonPayloadError, PathError, QueryPayloadError},
    web, Error, HttpRequest,
};

use crate::core::{ErrorCode, ServiceError, ServiceFailure};

fn invalid_data(kind: &str, message: String) -> Error {
    tracing::debug!(kind, error = %message, "Rejected request input");
    ServiceFailure::new(ServiceError::with_message(ErrorCode::InvalidData, message)).into()
}

pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> Error {
    invalid_data("json", err.to_string())
}

pub fn query_error_handler(err: QueryPayloadError, _req: &HttpRequest) -> Error {
    invalid_data("query", err.to_string())
}

pub fn path_error_handler(err: PathError, _req: &HttpRequest) -> Error {
    invalid_data("path", err.to_string())
}

/// Register the handlers above as extractor configuration
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .app_data(web::QueryConfig::default().error_handler(query_error_handler))
        .app_data(web::PathConfig::default().error_handler(path_error_handler));
}
