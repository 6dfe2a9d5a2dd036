use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Credential record
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct User {
    /// UUID v4 string
    pub id: String,
    pub username: String,
    /// PHC-formatted argon2 hash
    pub password_hash: String,
    pub role: Option<String>,
}

/// POST /api/auth body
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginResponse {
    pub username: String,
    pub token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    /// Token expiry, Unix seconds
    pub expiration: i64,
}

/// Users created or updated at startup
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SeedData {
    #[serde(default)]
    pub users: Vec<SeedUser>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SeedUser {
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub role: Option<String>,
}
