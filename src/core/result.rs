//! Uniform success/failure signaling for the service layer.
//!
//! Every service operation returns [`ServiceResult`]. Expected failures
//! (validation, not-found, conflicts) are built from an [`ErrorCode`];
//! infrastructure errors are folded in through `From<AppError>` so that `?`
//! inside a service never lets a store fault escape as anything but a failed
//! result.

use std::fmt;

use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde::Serialize;

use crate::core::error::AppError;

/// Result of a service operation; `T = ()` means "no payload"
pub type ServiceResult<T = ()> = std::result::Result<T, ServiceFailure>;

/// Closed vocabulary of failure codes exposed to clients
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    InvalidData,
    AlreadyInserted,
    InvalidProductId,
    InvalidStoreId,
    InvalidImageExtensions,
    InvalidImage,
    TooLargeImage,
    ProductIsAlreadyInStore,
    InvalidLoginAttempt,
    /// Unexpected store or file failure; always carries a message
    Error,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::InvalidData => "INVALID_DATA",
            ErrorCode::AlreadyInserted => "ALREADY_INSERTED",
            ErrorCode::InvalidProductId => "INVALID_PRODUCT_ID",
            ErrorCode::InvalidStoreId => "INVALID_STORE_ID",
            ErrorCode::InvalidImageExtensions => "INVALID_IMAGE_EXTENSIONS",
            ErrorCode::InvalidImage => "INVALID_IMAGE",
            ErrorCode::TooLargeImage => "TOO_LARGE_IMAGE",
            ErrorCode::ProductIsAlreadyInStore => "PRODUCT_IS_ALREADY_IN_STORE",
            ErrorCode::InvalidLoginAttempt => "INVALID_LOGIN_ATTEMPT",
            ErrorCode::Error => "ERROR",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single named error with an optional human-readable message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceError {
    pub code: ErrorCode,
    pub message: Option<String>,
}

impl ServiceError {
    pub fn new(code: ErrorCode) -> Self {
        Self {
            code,
            message: None,
        }
    }

    pub fn with_message(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: Some(message.into()),
        }
    }
}

impl From<ErrorCode> for ServiceError {
    fn from(code: ErrorCode) -> Self {
        ServiceError::new(code)
    }
}

/// Failed service outcome: an ordered, non-empty list of errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceFailure {
    errors: Vec<ServiceError>,
}

impl ServiceFailure {
    pub fn new(error: impl Into<ServiceError>) -> Self {
        Self {
            errors: vec![error.into()],
        }
    }

    pub fn errors(&self) -> &[ServiceError] {
        &self.errors
    }

    pub fn codes(&self) -> Vec<ErrorCode> {
        self.errors.iter().map(|e| e.code).collect()
    }

    /// Code of the first error; the list is never empty
    pub fn code(&self) -> ErrorCode {
        self.errors[0].code
    }
}

impl From<ErrorCode> for ServiceFailure {
    fn from(code: ErrorCode) -> Self {
        ServiceFailure::new(code)
    }
}

impl From<AppError> for ServiceFailure {
    fn from(err: AppError) -> Self {
        tracing::error!(error = %err, "Store operation failed");
        ServiceFailure::new(ServiceError::with_message(ErrorCode::Error, err.to_string()))
    }
}

impl fmt::Display for ServiceFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for error in &self.errors {
            if !first {
                f.write_str(", ")?;
            }
            first = false;
            match &error.message {
                Some(message) => write!(f, "{}: {}", error.code, message)?,
                None => write!(f, "{}", error.code)?,
            }
        }
        Ok(())
    }
}

impl std::error::Error for ServiceFailure {}

/// JSON body for every client-error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub errors: Vec<&'static str>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub messages: Vec<String>,
}

impl From<&ServiceFailure> for ErrorResponse {
    fn from(failure: &ServiceFailure) -> Self {
        Self {
            errors: failure.errors.iter().map(|e| e.code.as_str()).collect(),
            messages: failure
                .errors
                .iter()
                .filter_map(|e| e.message.clone())
                .collect(),
        }
    }
}

impl ResponseError for ServiceFailure {
    fn status_code(&self) -> StatusCode {
        StatusCode::BAD_REQUEST
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorResponse::from(self))
    }
}
