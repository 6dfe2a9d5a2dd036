//! Repository backends

pub mod memory;
pub mod mysql;

use std::sync::Arc;

use crate::config::DatabaseConfig;
use crate::core::traits::RepositoryFactory;
use crate::core::Result;

pub use memory::{MemoryDatabase, MemoryEntity, MemoryRepository, MemoryTables};
pub use mysql::{MySqlEntity, MySqlQuery, MySqlRepositories, MySqlRepository};

/// Scheme that selects the in-process backend
pub const MEMORY_URL: &str = "memory://";

/// Open the backend named by the database URL
///
/// MySQL pools are migrated before they are handed out.
pub async fn connect(config: &DatabaseConfig) -> Result<Arc<dyn RepositoryFactory>> {
    if config.url.starts_with(MEMORY_URL) {
        tracing::warn!("Using in-memory storage; data is lost on shutdown");
        return Ok(Arc::new(MemoryDatabase::new()));
    }

    let pool = config.create_pool().await?;
    let repositories = MySqlRepositories::new(pool);
    repositories.migrate().await?;
    tracing::info!("Database migrations applied");

    Ok(Arc::new(repositories))
}
