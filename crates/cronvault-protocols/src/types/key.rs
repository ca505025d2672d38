//! Signing and verification keys managed by the key-management flow.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Usage of a stored key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyType {
    Signing,
    Verification,
}

impl KeyType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Signing => "signing",
            Self::Verification => "verification",
        }
    }
}

impl fmt::Display for KeyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for KeyType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "signing" => Ok(Self::Signing),
            "verification" => Ok(Self::Verification),
            other => Err(CoreError::contract_invalid(format!(
                "unsupported key type: {}",
                other
            ))),
        }
    }
}

/// Plaintext key material as submitted by or returned to a caller.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyData {
    pub issuer: String,

    #[serde(rename = "type")]
    pub key_type: KeyType,

    pub key: String,
}

impl KeyData {
    pub fn new(issuer: impl Into<String>, key_type: KeyType, key: impl Into<String>) -> Self {
        Self {
            issuer: issuer.into(),
            key_type,
            key: key.into(),
        }
    }

    /// Name the key is persisted under: `<issuer>/<type>`.
    pub fn storage_name(&self) -> String {
        storage_name(&self.issuer, self.key_type)
    }
}

impl fmt::Debug for KeyData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyData")
            .field("issuer", &self.issuer)
            .field("key_type", &self.key_type)
            .field("key", &"<redacted>")
            .finish()
    }
}

/// Persistence name for the key of `issuer` with usage `key_type`.
pub fn storage_name(issuer: &str, key_type: KeyType) -> String {
    format!("{}/{}", issuer, key_type)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;

    #[test]
    fn test_key_type_parse() {
        assert_eq!("signing".parse::<KeyType>().unwrap(), KeyType::Signing);
        assert_eq!("verification".parse::<KeyType>().unwrap(), KeyType::Verification);
        let err = "symmetric".parse::<KeyType>().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ContractInvalid);
    }

    #[test]
    fn test_storage_name() {
        let data = KeyData::new("issuer-a", KeyType::Verification, "pem");
        assert_eq!(data.storage_name(), "issuer-a/verification");
    }

    #[test]
    fn test_debug_redacts_key() {
        let data = KeyData::new("issuer-a", KeyType::Signing, "super-secret");
        let debug = format!("{:?}", data);
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("issuer-a"));
    }

    #[test]
    fn test_key_data_wire_format() {
        let json = r#"{"issuer":"a","type":"verification","key":"k"}"#;
        let data: KeyData = serde_json::from_str(json).unwrap();
        assert_eq!(data.key_type, KeyType::Verification);
    }
}
