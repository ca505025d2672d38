//! Key sources and the registry mapping them to key material.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use cronvault_protocols::{CoreError, CoreResult};

/// Where the key that decrypts an envelope comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeySource {
    /// The compiled-in (or configured) key.
    SelfManaged,
    /// A key read from, or generated into, the secret store.
    SecretStore,
}

impl KeySource {
    /// Tag written into the envelope.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::SelfManaged => "self",
            Self::SecretStore => "secret-store",
        }
    }
}

impl fmt::Display for KeySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for KeySource {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "self" => Ok(Self::SelfManaged),
            "secret-store" => Ok(Self::SecretStore),
            other => Err(CoreError::contract_invalid(format!(
                "unsupported key source: {:?}",
                other
            ))),
        }
    }
}

/// AES key material of 16, 24 or 32 bytes.
#[derive(Clone, PartialEq, Eq)]
pub struct AesKey(Vec<u8>);

impl AesKey {
    pub fn new(bytes: impl Into<Vec<u8>>) -> CoreResult<Self> {
        let bytes = bytes.into();
        match bytes.len() {
            16 | 24 | 32 => Ok(Self(bytes)),
            n => Err(CoreError::server(format!(
                "invalid AES key length: {} bytes, expected 16, 24 or 32",
                n
            ))),
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<[u8; 32]> for AesKey {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes.to_vec())
    }
}

impl fmt::Debug for AesKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AesKey(<{} bytes>)", self.0.len())
    }
}

/// Resolves the key for a key source. Immutable once the codec is built.
#[derive(Debug, Clone, Default)]
pub struct KeySourceRegistry {
    keys: HashMap<KeySource, AesKey>,
}

impl KeySourceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `key` for `source`, replacing any previous key.
    pub fn register(&mut self, source: KeySource, key: AesKey) {
        self.keys.insert(source, key);
    }

    pub fn with(mut self, source: KeySource, key: AesKey) -> Self {
        self.register(source, key);
        self
    }

    pub fn contains(&self, source: KeySource) -> bool {
        self.keys.contains_key(&source)
    }

    pub fn resolve(&self, source: KeySource) -> CoreResult<&AesKey> {
        self.keys.get(&source).ok_or_else(|| {
            CoreError::not_found(format!("no key available for key source {}", source))
        })
    }
}
