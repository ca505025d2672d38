use std::collections::HashMap;

use async_trait::async_trait;

use crate::error::SecretError;

/// Secret store.
///
/// The envelope codec only calls this while it is being constructed.
#[async_trait]
pub trait SecretProvider: Send + Sync {
    /// Read all fields of the secret `name`. A missing secret is
    /// [`SecretError::NotFound`].
    async fn get_secret(&self, name: &str) -> Result<HashMap<String, String>, SecretError>;

    /// Create or replace the secret `name`.
    async fn store_secret(
        &self,
        name: &str,
        secrets: HashMap<String, String>,
    ) -> Result<(), SecretError>;
}
