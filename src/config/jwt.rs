use super::parse_var;
use crate::core::{AppError, Result};
use std::env;

/// Minimum HS256 secret length in bytes
pub const MIN_SIGNING_KEY_LEN: usize = 32;

/// Bearer token settings
#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub signing_key: String,
    pub issuer: String,
    pub audience: String,
    pub expire_days: i64,
}

impl JwtConfig {
    /// Settings with the default issuer, audience and lifetime
    pub fn new(signing_key: impl Into<String>) -> Self {
        Self {
            signing_key: signing_key.into(),
            issuer: "storage-api".to_string(),
            audience: "storage-api".to_string(),
            expire_days: 7,
        }
    }

    pub fn from_env() -> Result<Self> {
        Ok(Self {
            signing_key: env::var("JWT_SIGNING_KEY")
                .map_err(|_| AppError::Configuration("JWT_SIGNING_KEY not set".to_string()))?,
            issuer: env::var("JWT_ISSUER").unwrap_or_else(|_| "storage-api".to_string()),
            audience: env::var("JWT_AUDIENCE").unwrap_or_else(|_| "storage-api".to_string()),
            expire_days: parse_var("JWT_EXPIRE_DAYS", "7")?,
        })
    }

    pub fn validate(&self) -> Result<()> {
        if self.signing_key.len() < MIN_SIGNING_KEY_LEN {
            return Err(AppError::Configuration(format!(
                "JWT_SIGNING_KEY must be at least {} bytes (got {})",
                MIN_SIGNING_KEY_LEN,
                self.signing_key.len()
            )));
        }

        if self.expire_days <= 0 {
            return Err(AppError::Configuration(
                "JWT_EXPIRE_DAYS must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}
