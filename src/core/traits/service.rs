use crate::core::Result;
use async_trait::async_trait;

/// Base service trait for business logic
#[async_trait]
pub trait Service: Send + Sync {
    /// Prepare resources the service needs before serving requests
    async fn initialize(&self) -> Result<()>;
}
