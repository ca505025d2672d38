//! Integration tests for the envelope codec backed by a file secret store.

use std::sync::Arc;

use cronvault_crypto::{
    AES_KEY_FIELD, AES_SECRET_NAME, EnvelopeCodec, FileSecretProvider, KeyManager, KeySource,
    MemoryKeyStore,
};
use cronvault_protocols::{KeyData, KeyType, SecretProvider};
use tempfile::TempDir;

#[tokio::test]
async fn test_file_backed_key_survives_restart() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("secrets.json");

    let ciphertext = {
        let provider = FileSecretProvider::new(&path);
        let codec = EnvelopeCodec::with_secret_store(&provider).await.unwrap();
        assert_eq!(codec.primary_key_source(), KeySource::SecretStore);
        codec.encrypt(b"database password").unwrap()
    };

    let provider = FileSecretProvider::new(&path);
    let stored = provider.get_secret(AES_SECRET_NAME).await.unwrap();
    assert!(stored.contains_key(AES_KEY_FIELD));

    let codec = EnvelopeCodec::with_secret_store(&provider).await.unwrap();
    assert_eq!(codec.decrypt(&ciphertext).unwrap(), b"database password");
}

#[tokio::test]
async fn test_key_manager_over_secret_store_codec() {
    let dir = TempDir::new().unwrap();
    let provider = FileSecretProvider::new(dir.path().join("secrets.json"));
    let codec = EnvelopeCodec::with_secret_store(&provider).await.unwrap();

    let manager = KeyManager::new(Arc::new(MemoryKeyStore::new()), Arc::new(codec));
    manager
        .add_key(&KeyData::new("proxy", KeyType::Verification, "pubkey"))
        .await
        .unwrap();

    let key = manager.verification_key_by_issuer("proxy").await.unwrap();
    assert_eq!(key.key, "pubkey");
    assert_eq!(key.key_type, KeyType::Verification);
}
