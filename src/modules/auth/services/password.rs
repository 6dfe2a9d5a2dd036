use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use std::sync::LazyLock;

use crate::core::{AppError, Result};

pub const MIN_PASSWORD_LEN: usize = 6;

static DUMMY_HASH: LazyLock<String> =
    LazyLock::new(|| hash_password("unused-login-placeholder").unwrap_or_default());

/// Hash checked in place of a missing user's so both login paths run argon2
pub fn dummy_hash() -> &'static str {
    DUMMY_HASH.as_str()
}

pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::internal(format!("Failed to hash password: {}", e)))?;
    Ok(hash.to_string())
}

/// False for a mismatch and for a hash that cannot be parsed
pub fn verify_password(password: &str, password_hash: &str) -> bool {
    PasswordHash::new(password_hash)
        .map(|parsed| {
            Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok()
        })
        .unwrap_or(false)
}
