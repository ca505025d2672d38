use crate::error::CoreError;

/// Symmetric encryption of values persisted at rest.
pub trait Crypto: Send + Sync {
    /// Encrypt `plaintext`, returning base64 text.
    fn encrypt(&self, plaintext: &str) -> Result<String, CoreError>;

    /// Decrypt base64 text produced by [`Crypto::encrypt`].
    fn decrypt(&self, ciphertext: &str) -> Result<Vec<u8>, CoreError>;
}
