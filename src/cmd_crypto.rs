//! Encrypt/decrypt subcommand handlers and codec construction.

use tracing::info;

use cronvault_config::CryptoConfig;
use cronvault_crypto::{AesKey, DEFAULT_KEY, EnvelopeCodec, FileSecretProvider, KeySource};
use cronvault_protocols::{CoreError, CoreResult};

/// Build the envelope codec for the configured key source.
pub(crate) async fn build_codec(config: &CryptoConfig) -> CoreResult<EnvelopeCodec> {
    let self_key = match config.self_key.as_deref().filter(|k| !k.is_empty()) {
        Some(key) => AesKey::new(key.as_bytes().to_vec())
            .map_err(|e| e.context("crypto.self_key"))?,
        None => AesKey::from(*DEFAULT_KEY),
    };

    let codec = if config.uses_secret_store() {
        let path = config.secret_file.clone().ok_or_else(|| {
            CoreError::contract_invalid(
                "crypto.secret_file is required for the secret-store key source",
            )
        })?;
        let provider = FileSecretProvider::new(path);
        EnvelopeCodec::with_secret_store_and_self_key(&provider, self_key).await?
    } else {
        EnvelopeCodec::with_self_key(self_key.as_bytes().to_vec())?
    };

    info!(
        "Envelope codec ready (key source: {})",
        codec.primary_key_source()
    );
    Ok(codec)
}

/// Make sure the configured key is usable before any job runs. For the
/// secret-store key source this generates and stores the key on first start.
pub(crate) async fn provision_key(config: &CryptoConfig) -> CoreResult<KeySource> {
    let codec = build_codec(config).await?;
    Ok(codec.primary_key_source())
}

pub(crate) async fn encrypt(
    config: &CryptoConfig,
    plaintext: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let codec = build_codec(config).await?;
    println!("{}", codec.encrypt(plaintext.as_bytes())?);
    Ok(())
}

pub(crate) async fn decrypt(
    config: &CryptoConfig,
    ciphertext: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let codec = build_codec(config).await?;
    let plaintext = codec.decrypt(ciphertext)?;
    println!("{}", String::from_utf8_lossy(&plaintext));
    Ok(())
}
