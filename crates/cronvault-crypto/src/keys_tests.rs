use super::*;
use crate::EnvelopeCodec;
use cronvault_protocols::ErrorKind;

fn manager() -> (KeyManager, Arc<MemoryKeyStore>) {
    let store = Arc::new(MemoryKeyStore::new());
    let crypto = Arc::new(EnvelopeCodec::new());
    (KeyManager::new(store.clone(), crypto), store)
}

#[tokio::test]
async fn test_add_and_read_verification_key() {
    let (manager, store) = manager();
    let data = KeyData::new("issuer-a", KeyType::Verification, "-----BEGIN PUBLIC KEY-----");

    manager.add_key(&data).await.unwrap();

    let stored = store.read_key_content("issuer-a/verification").await.unwrap();
    assert_ne!(stored, data.key);

    let loaded = manager.verification_key_by_issuer("issuer-a").await.unwrap();
    assert_eq!(loaded, data);
}

#[tokio::test]
async fn test_add_key_replaces_existing() {
    let (manager, _store) = manager();

    manager
        .add_key(&KeyData::new("issuer-a", KeyType::Verification, "old"))
        .await
        .unwrap();
    manager
        .add_key(&KeyData::new("issuer-a", KeyType::Verification, "new"))
        .await
        .unwrap();

    let loaded = manager.verification_key_by_issuer("issuer-a").await.unwrap();
    assert_eq!(loaded.key, "new");
}

#[tokio::test]
async fn test_signing_key_is_not_a_verification_key() {
    let (manager, store) = manager();

    manager
        .add_key(&KeyData::new("issuer-a", KeyType::Signing, "private"))
        .await
        .unwrap();

    assert!(store.key_exists("issuer-a/signing").await.unwrap());
    let err = manager.verification_key_by_issuer("issuer-a").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn test_add_key_rejects_empty_fields() {
    let (manager, _store) = manager();

    let err = manager
        .add_key(&KeyData::new(" ", KeyType::Signing, "k"))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ContractInvalid);

    let err = manager
        .add_key(&KeyData::new("issuer", KeyType::Signing, ""))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ContractInvalid);

    let err = manager.verification_key_by_issuer("").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ContractInvalid);
}

#[tokio::test]
async fn test_memory_store_contract() {
    let store = MemoryKeyStore::new();

    store.add_key("a/signing", "x").await.unwrap();
    let err = store.add_key("a/signing", "y").await.unwrap_err();
    assert!(err.is_conflict());

    let err = store.update_key("b/signing", "y").await.unwrap_err();
    assert!(err.is_not_found());

    store.update_key("a/signing", "z").await.unwrap();
    assert_eq!(store.read_key_content("a/signing").await.unwrap(), "z");
}
