//! Signing and verification key management.
//!
//! Key material is encrypted with the [`Crypto`] implementation before it
//! reaches the [`KeyStore`], under the name `<issuer>/<type>`.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use cronvault_protocols::{CoreError, CoreResult, Crypto, KeyData, KeyStore, KeyType, storage_name};
use tokio::sync::RwLock;
use tracing::{debug, info};

/// Stores and retrieves keys through an injected store and cipher.
pub struct KeyManager {
    store: Arc<dyn KeyStore>,
    crypto: Arc<dyn Crypto>,
}

impl KeyManager {
    pub fn new(store: Arc<dyn KeyStore>, crypto: Arc<dyn Crypto>) -> Self {
        Self { store, crypto }
    }

    /// Encrypt and persist `data`, replacing an existing key of the same
    /// issuer and type.
    pub async fn add_key(&self, data: &KeyData) -> CoreResult<()> {
        if data.issuer.trim().is_empty() {
            return Err(CoreError::contract_invalid("key issuer must not be empty"));
        }
        if data.key.is_empty() {
            return Err(CoreError::contract_invalid("key content must not be empty"));
        }

        let name = data.storage_name();
        let encrypted = self
            .crypto
            .encrypt(&data.key)
            .map_err(|e| e.context(format!("failed to encrypt key {}", name)))?;

        if self.store.key_exists(&name).await? {
            self.store.update_key(&name, &encrypted).await?;
            info!("Updated key {}", name);
        } else {
            self.store.add_key(&name, &encrypted).await?;
            info!("Added key {}", name);
        }
        Ok(())
    }

    /// Decrypted verification key of `issuer`.
    pub async fn verification_key_by_issuer(&self, issuer: &str) -> CoreResult<KeyData> {
        if issuer.trim().is_empty() {
            return Err(CoreError::contract_invalid("key issuer must not be empty"));
        }

        let name = storage_name(issuer, KeyType::Verification);
        let content = self.store.read_key_content(&name).await?;
        let plain = self
            .crypto
            .decrypt(&content)
            .map_err(|e| e.context(format!("failed to decrypt key {}", name)))?;
        let key = String::from_utf8(plain).map_err(|e| {
            CoreError::server(format!("decrypted key {} is not valid UTF-8", name)).with_source(e)
        })?;

        debug!("Loaded verification key of issuer {}", issuer);
        Ok(KeyData::new(issuer, KeyType::Verification, key))
    }
}

/// In-memory [`KeyStore`].
pub struct MemoryKeyStore {
    keys: RwLock<HashMap<String, String>>,
}

impl MemoryKeyStore {
    pub fn new() -> Self {
        Self {
            keys: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for MemoryKeyStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl KeyStore for MemoryKeyStore {
    async fn key_exists(&self, name: &str) -> Result<bool, CoreError> {
        Ok(self.keys.read().await.contains_key(name))
    }

    async fn add_key(&self, name: &str, content: &str) -> Result<(), CoreError> {
        let mut keys = self.keys.write().await;
        if keys.contains_key(name) {
            return Err(CoreError::conflict(format!("key {} already exists", name)));
        }
        keys.insert(name.to_string(), content.to_string());
        Ok(())
    }

    async fn update_key(&self, name: &str, content: &str) -> Result<(), CoreError> {
        let mut keys = self.keys.write().await;
        match keys.get_mut(name) {
            Some(existing) => {
                *existing = content.to_string();
                Ok(())
            }
            None => Err(CoreError::not_found(format!("key {} not found", name))),
        }
    }

    async fn read_key_content(&self, name: &str) -> Result<String, CoreError> {
        self.keys
            .read()
            .await
            .get(name)
            .cloned()
            .ok_or_else(|| CoreError::not_found(format!("key {} not found", name)))
    }
}

#[cfg(test)]
#[path = "keys_tests.rs"]
mod tests;
