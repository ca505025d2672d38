use async_trait::async_trait;

use crate::error::CoreError;

/// Supplies bearer tokens for REST actions that request authentication.
#[async_trait]
pub trait TokenProvider: Send + Sync {
    async fn bearer_token(&self) -> Result<String, CoreError>;
}
