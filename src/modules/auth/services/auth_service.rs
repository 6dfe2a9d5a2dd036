use std::sync::Arc;

use uuid::Uuid;

use crate::config::JwtConfig;
use crate::core::text::is_blank;
use crate::core::{AppError, ErrorCode, Result, ServiceResult};
use crate::modules::auth::models::{LoginResponse, SeedData, User};
use crate::modules::auth::repositories::UserRepository;

use super::password::{dummy_hash, hash_password, verify_password, MIN_PASSWORD_LEN};
use super::token::{issue_token, verify_token, Claims};

/// Credential checks and token issuance
pub struct AuthService {
    users: Arc<dyn UserRepository>,
    jwt: JwtConfig,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserRepository>, jwt: JwtConfig) -> Self {
        Self { users, jwt }
    }

    /// Exchange a username and password for a bearer token
    ///
    /// Unknown users and wrong passwords fail identically.
    pub async fn login(&self, username: &str, password: &str) -> ServiceResult<LoginResponse> {
        if is_blank(Some(username)) || password.is_empty() {
            return Err(ErrorCode::InvalidLoginAttempt.into());
        }

        let found = self.users.find_by_username(username).await?;
        let verified = verify_password(password, candidate_hash(found.as_ref()));
        let user = match found {
            Some(user) if verified => user,
            _ => {
                tracing::warn!(username = %username, "Invalid login attempt");
                return Err(ErrorCode::InvalidLoginAttempt.into());
            }
        };

        let (token, claims) = issue_token(&self.jwt, &user)?;
        tracing::info!(user_id = %user.id, username = %user.username, "User logged in");

        Ok(LoginResponse {
            username: user.username,
            token,
            role: user.role,
            expiration: claims.exp,
        })
    }

    pub fn verify(&self, token: &str) -> Result<Claims> {
        verify_token(&self.jwt, token)
    }

    /// Create missing users and align roles of existing ones
    pub async fn seed(&self, data: &SeedData) -> Result<()> {
        for seed in &data.users {
            if seed.password.len() < MIN_PASSWORD_LEN {
                return Err(AppError::Configuration(format!(
                    "Seed password for '{}' must be at least {} characters",
                    seed.username, MIN_PASSWORD_LEN
                )));
            }

            match self.users.find_by_username(&seed.username).await? {
                Some(existing) => {
                    if let Some(role) = seed.role.as_deref() {
                        if existing.role.as_deref() != Some(role) {
                            self.users.set_role(&existing.id, role).await?;
                            tracing::info!(username = %seed.username, role = %role, "Seeded role replaced");
                        }
                    }
                }
                None => {
                    let user = User {
                        id: Uuid::new_v4().to_string(),
                        username: seed.username.clone(),
                        password_hash: hash_password(&seed.password)?,
                        role: seed.role.clone(),
                    };
                    self.users.create(&user).await?;
                    tracing::info!(username = %user.username, "Seeded user created");
                }
            }
        }
        Ok(())
    }
}

fn candidate_hash(user: Option<&User>) -> &str {
    user.map_or(dummy_hash(), |user| user.password_hash.as_str())
}
