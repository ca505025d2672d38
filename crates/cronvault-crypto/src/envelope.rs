//! Envelope codec: versioned, key-source tagged ciphertexts.

use std::collections::HashMap;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use cronvault_protocols::{CoreError, CoreResult, Crypto, SecretError, SecretProvider};
use tracing::{debug, info};

use crate::cipher::{self, BLOCK_SIZE, NONCE_SIZE, TAG_SIZE};
use crate::key_source::{AesKey, KeySource, KeySourceRegistry};

/// Leading 4 bytes (big-endian) of every current-format envelope.
pub const FORMAT_MAGIC: u32 = 0x107E_CA18;

/// Compiled-in key, used for the `self` key source and for legacy envelopes.
pub const DEFAULT_KEY: &[u8; 32] = b"RO6gGYKocUahpdX15k9gYvbLuSxbKrPz";

/// Secret holding the generated key when the key source is `secret-store`.
pub const AES_SECRET_NAME: &str = "aes";

/// Field of [`AES_SECRET_NAME`] holding the base64 encoded key.
pub const AES_KEY_FIELD: &str = "key";

const MAGIC_SIZE: usize = 4;
const KEY_SOURCE_LEN_SIZE: usize = 4;
const MIN_ENVELOPE_SIZE: usize = MAGIC_SIZE + KEY_SOURCE_LEN_SIZE + NONCE_SIZE + TAG_SIZE;
const GENERATED_KEY_SIZE: usize = 32;

/// Encrypts under one primary key source and decrypts anything it has a key for.
#[derive(Debug, Clone)]
pub struct EnvelopeCodec {
    primary: KeySource,
    keys: KeySourceRegistry,
}

impl EnvelopeCodec {
    /// Codec keyed with [`DEFAULT_KEY`] under the `self` key source.
    pub fn new() -> Self {
        Self::self_managed(Self::default_key())
    }

    /// Codec using `key` for the `self` key source and for legacy envelopes.
    pub fn with_self_key(key: impl Into<Vec<u8>>) -> CoreResult<Self> {
        Ok(Self::self_managed(AesKey::new(key)?))
    }

    /// Codec whose primary key lives in the secret store.
    ///
    /// Reads field [`AES_KEY_FIELD`] of secret [`AES_SECRET_NAME`]. When the
    /// secret does not exist a random 32-byte key is generated and stored.
    /// [`DEFAULT_KEY`] stays registered for `self` envelopes and legacy input.
    pub async fn with_secret_store(provider: &dyn SecretProvider) -> CoreResult<Self> {
        Self::with_secret_store_and_self_key(provider, Self::default_key()).await
    }

    /// Like [`EnvelopeCodec::with_secret_store`] with a custom `self` key.
    pub async fn with_secret_store_and_self_key(
        provider: &dyn SecretProvider,
        self_key: AesKey,
    ) -> CoreResult<Self> {
        let store_key = load_or_generate_key(provider).await?;
        let keys = KeySourceRegistry::new()
            .with(KeySource::SelfManaged, self_key)
            .with(KeySource::SecretStore, store_key);

        Ok(Self {
            primary: KeySource::SecretStore,
            keys,
        })
    }

    fn self_managed(key: AesKey) -> Self {
        Self {
            primary: KeySource::SelfManaged,
            keys: KeySourceRegistry::new().with(KeySource::SelfManaged, key),
        }
    }

    fn default_key() -> AesKey {
        AesKey::from(*DEFAULT_KEY)
    }

    /// Key source new envelopes are written under.
    pub fn primary_key_source(&self) -> KeySource {
        self.primary
    }

    /// Encrypt `plaintext` into a base64 current-format envelope.
    pub fn encrypt(&self, plaintext: &[u8]) -> CoreResult<String> {
        let key = self.keys.resolve(self.primary)?;
        let nonce = cipher::random_bytes::<NONCE_SIZE>()?;
        let sealed = cipher::gcm_seal(key, &nonce, plaintext)?;

        let source = self.primary.as_str().as_bytes();
        let mut envelope = Vec::with_capacity(
            MAGIC_SIZE + KEY_SOURCE_LEN_SIZE + source.len() + NONCE_SIZE + sealed.len(),
        );
        envelope.extend_from_slice(&FORMAT_MAGIC.to_be_bytes());
        envelope.extend_from_slice(&(source.len() as u32).to_be_bytes());
        envelope.extend_from_slice(source);
        envelope.extend_from_slice(&nonce);
        envelope.extend_from_slice(&sealed);

        Ok(BASE64.encode(envelope))
    }

    /// Decrypt a base64 envelope in either the current or the legacy format.
    pub fn decrypt(&self, ciphertext: &str) -> CoreResult<Vec<u8>> {
        let buf = BASE64.decode(ciphertext.trim()).map_err(|e| {
            CoreError::contract_invalid("ciphertext is not valid base64").with_source(e)
        })?;

        if has_magic(&buf) {
            self.open_envelope(&buf)
        } else {
            debug!("Decrypting legacy envelope");
            self.open_legacy(&buf)
        }
    }

    fn open_envelope(&self, buf: &[u8]) -> CoreResult<Vec<u8>> {
        if buf.len() < MIN_ENVELOPE_SIZE {
            return Err(CoreError::contract_invalid("ciphertext too short"));
        }

        let header_end = MAGIC_SIZE + KEY_SOURCE_LEN_SIZE;
        let mut len_bytes = [0u8; KEY_SOURCE_LEN_SIZE];
        len_bytes.copy_from_slice(&buf[MAGIC_SIZE..header_end]);
        let source_len = u32::from_be_bytes(len_bytes) as usize;

        let source_end = header_end
            .checked_add(source_len)
            .filter(|end| {
                end.checked_add(NONCE_SIZE + TAG_SIZE)
                    .is_some_and(|min| min <= buf.len())
            })
            .ok_or_else(|| CoreError::contract_invalid("key source length exceeds ciphertext"))?;

        let source = std::str::from_utf8(&buf[header_end..source_end])
            .map_err(|e| CoreError::contract_invalid("key source is not valid UTF-8").with_source(e))?;
        let source: KeySource = source.parse()?;
        let key = self.keys.resolve(source)?;

        let nonce_end = source_end + NONCE_SIZE;
        cipher::gcm_open(key, &buf[source_end..nonce_end], &buf[nonce_end..])
    }

    fn open_legacy(&self, buf: &[u8]) -> CoreResult<Vec<u8>> {
        if buf.len() < BLOCK_SIZE {
            return Err(CoreError::contract_invalid("ciphertext too short"));
        }
        let key = self.keys.resolve(KeySource::SelfManaged)?;
        let (iv, body) = buf.split_at(BLOCK_SIZE);
        cipher::cbc_decrypt(key, iv, body)
    }
}

impl Default for EnvelopeCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl Crypto for EnvelopeCodec {
    fn encrypt(&self, plaintext: &str) -> Result<String, CoreError> {
        EnvelopeCodec::encrypt(self, plaintext.as_bytes())
    }

    fn decrypt(&self, ciphertext: &str) -> Result<Vec<u8>, CoreError> {
        EnvelopeCodec::decrypt(self, ciphertext)
    }
}

fn has_magic(buf: &[u8]) -> bool {
    buf.len() > MAGIC_SIZE && buf[..MAGIC_SIZE] == FORMAT_MAGIC.to_be_bytes()
}

async fn load_or_generate_key(provider: &dyn SecretProvider) -> CoreResult<AesKey> {
    match provider.get_secret(AES_SECRET_NAME).await {
        Ok(secret) => {
            if let Some(encoded) = secret.get(AES_KEY_FIELD).filter(|v| !v.is_empty()) {
                let bytes = BASE64.decode(encoded).map_err(|e| {
                    CoreError::server("stored AES key is not valid base64").with_source(e)
                })?;
                debug!("Loaded AES key from secret store");
                return AesKey::new(bytes).map_err(|e| e.context("stored AES key"));
            }
        }
        Err(SecretError::NotFound(_)) => {}
        Err(e) => {
            return Err(CoreError::from(e).context("failed to read AES key from secret store"));
        }
    }

    let generated = cipher::random_bytes::<GENERATED_KEY_SIZE>()?;
    let secret = HashMap::from([(AES_KEY_FIELD.to_string(), BASE64.encode(generated))]);
    provider
        .store_secret(AES_SECRET_NAME, secret)
        .await
        .map_err(|e| CoreError::from(e).context("failed to store generated AES key"))?;

    info!("Generated a new AES key in the secret store");
    Ok(AesKey::from(generated))
}

#[cfg(test)]
#[path = "envelope_tests.rs"]
mod tests;
