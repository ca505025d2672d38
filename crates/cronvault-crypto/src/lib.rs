//! # Cronvault Crypto
//!
//! Envelope encryption for secrets persisted at rest.
//!
//! Two on-wire formats are understood, both base64 encoded as a whole:
//!
//! ```text
//! current: [magic 0x107ECA18][u32 keySourceLen][keySource][12-byte nonce][AES-GCM ciphertext + 16-byte tag]
//! legacy:  [16-byte IV][AES-CBC ciphertext, PKCS#7 padded]
//! ```
//!
//! New ciphertexts are always written in the current format under the
//! codec's primary key. The embedded key source selects the decryption key,
//! so ciphertexts written under the compiled-in key stay readable after a
//! codec has moved to a secret-store managed key.
//!
//! ## Key Components
//!
//! - [`EnvelopeCodec`]: encrypt/decrypt, implements [`Crypto`](cronvault_protocols::Crypto)
//! - [`KeySourceRegistry`]: key source tag to key lookup
//! - [`MemorySecretProvider`], [`FileSecretProvider`]: secret stores
//! - [`KeyManager`]: encrypted signing/verification key persistence

mod cipher;
pub mod envelope;
pub mod key_source;
pub mod keys;
pub mod secret_store;

pub use envelope::{AES_KEY_FIELD, AES_SECRET_NAME, DEFAULT_KEY, EnvelopeCodec, FORMAT_MAGIC};
pub use key_source::{AesKey, KeySource, KeySourceRegistry};
pub use keys::{KeyManager, MemoryKeyStore};
pub use secret_store::{FileSecretProvider, MemorySecretProvider};
