use async_trait::async_trait;

use crate::error::CoreError;

/// Persistence for encrypted key content.
#[async_trait]
pub trait KeyStore: Send + Sync {
    async fn key_exists(&self, name: &str) -> Result<bool, CoreError>;

    async fn add_key(&self, name: &str, content: &str) -> Result<(), CoreError>;

    async fn update_key(&self, name: &str, content: &str) -> Result<(), CoreError>;

    /// Stored content of `name`; NotFound when absent.
    async fn read_key_content(&self, name: &str) -> Result<String, CoreError>;
}
