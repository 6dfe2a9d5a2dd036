use async_trait::async_trait;
use sqlx::MySqlPool;

use crate::core::storage::mysql::map_write_error;
use crate::core::storage::MemoryDatabase;
use crate::core::{AppError, Result};
use crate::modules::auth::models::User;

/// Credential store used by login and seeding
///
/// Writes are immediate; users are not part of the staged repositories.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Exact username lookup
    async fn find_by_username(&self, username: &str) -> Result<Option<User>>;

    async fn create(&self, user: &User) -> Result<()>;

    /// Replace the user's role
    async fn set_role(&self, user_id: &str, role: &str) -> Result<()>;
}

pub struct MySqlUserRepository {
    pool: MySqlPool,
}

impl MySqlUserRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for MySqlUserRepository {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, username, password_hash, role FROM users WHERE username = ?",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn create(&self, user: &User) -> Result<()> {
        sqlx::query("INSERT INTO users (id, username, password_hash, role) VALUES (?, ?, ?, ?)")
            .bind(&user.id)
            .bind(&user.username)
            .bind(&user.password_hash)
            .bind(&user.role)
            .execute(&self.pool)
            .await
            .map_err(map_write_error)?;

        Ok(())
    }

    async fn set_role(&self, user_id: &str, role: &str) -> Result<()> {
        sqlx::query("UPDATE users SET role = ? WHERE id = ?")
            .bind(role)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}

pub struct MemoryUserRepository {
    db: MemoryDatabase,
}

impl MemoryUserRepository {
    pub fn new(db: MemoryDatabase) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserRepository for MemoryUserRepository {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>> {
        let tables = self.db.read().await;
        Ok(tables
            .users
            .iter()
            .find(|user| user.username == username)
            .cloned())
    }

    async fn create(&self, user: &User) -> Result<()> {
        let mut tables = self.db.write().await;
        if tables.users.iter().any(|u| u.username == user.username) {
            return Err(AppError::conflict(format!(
                "Duplicate entry '{}' for key 'users.ux_users_username'",
                user.username
            )));
        }
        tables.users.push(user.clone());
        Ok(())
    }

    async fn set_role(&self, user_id: &str, role: &str) -> Result<()> {
        let mut tables = self.db.write().await;
        if let Some(user) = tables.users.iter_mut().find(|u| u.id == user_id) {
            user.role = Some(role.to_string());
        }
        Ok(())
    }
}
