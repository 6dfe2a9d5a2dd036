use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::JwtConfig;
use crate::core::Result;
use crate::modules::auth::models::User;

/// Bearer token claims
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// User id
    pub sub: String,
    pub jti: String,
    /// Username
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    pub iss: String,
    pub aud: String,
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    pub fn has_role(&self, role: &str) -> bool {
        self.role.as_deref() == Some(role)
    }
}

/// Sign a token for `user`
pub fn issue_token(config: &JwtConfig, user: &User) -> Result<(String, Claims)> {
    let now = Utc::now();
    let claims = Claims {
        sub: user.id.clone(),
        jti: Uuid::new_v4().to_string(),
        name: user.username.clone(),
        role: user.role.clone(),
        iss: config.issuer.clone(),
        aud: config.audience.clone(),
        iat: now.timestamp(),
        exp: (now + Duration::days(config.expire_days)).timestamp(),
    };

    let token = encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(config.signing_key.as_bytes()),
    )?;

    Ok((token, claims))
}

/// Check signature, issuer, audience and expiry
pub fn verify_token(config: &JwtConfig, token: &str) -> Result<Claims> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[config.issuer.as_str()]);
    validation.set_audience(&[config.audience.as_str()]);

    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.signing_key.as_bytes()),
        &validation,
    )?;

    Ok(data.claims)
}
