//! AES primitives behind the envelope formats.
//!
//! GCM seals and opens current-format bodies; CBC only ever decrypts
//! legacy bodies. Key length selects AES-128, AES-192 or AES-256.

use aes::{Aes128, Aes192, Aes256};
use aes_gcm::aead::consts::U12;
use aes_gcm::aead::rand_core::RngCore;
use aes_gcm::aead::{Aead, AeadCore, KeyInit, Nonce, OsRng};
use aes_gcm::{Aes128Gcm, Aes256Gcm, AesGcm};
use cbc::cipher::block_padding::NoPadding;
use cbc::cipher::{BlockDecryptMut, KeyIvInit};
use cronvault_protocols::{CoreError, CoreResult};

use crate::key_source::AesKey;

type Aes192Gcm = AesGcm<Aes192, U12>;

pub(crate) const NONCE_SIZE: usize = 12;
pub(crate) const TAG_SIZE: usize = 16;
pub(crate) const BLOCK_SIZE: usize = 16;

/// Fill a buffer from the OS random source.
pub(crate) fn random_bytes<const N: usize>() -> CoreResult<[u8; N]> {
    let mut buf = [0u8; N];
    OsRng.try_fill_bytes(&mut buf).map_err(|e| {
        CoreError::server(format!("failed to read from the random source: {}", e))
    })?;
    Ok(buf)
}

fn invalid_key_length(len: usize) -> CoreError {
    CoreError::server(format!("invalid AES key length: {} bytes", len))
}

fn seal_with<C>(key: &[u8], nonce: &[u8; NONCE_SIZE], plaintext: &[u8]) -> CoreResult<Vec<u8>>
where
    C: KeyInit + Aead + AeadCore<NonceSize = U12>,
{
    let cipher = C::new_from_slice(key).map_err(|_| invalid_key_length(key.len()))?;
    cipher
        .encrypt(Nonce::<C>::from_slice(nonce), plaintext)
        .map_err(|_| CoreError::server("AES-GCM encryption failed"))
}

fn open_with<C>(key: &[u8], nonce: &[u8], sealed: &[u8]) -> CoreResult<Vec<u8>>
where
    C: KeyInit + Aead + AeadCore<NonceSize = U12>,
{
    let cipher = C::new_from_slice(key).map_err(|_| invalid_key_length(key.len()))?;
    cipher
        .decrypt(Nonce::<C>::from_slice(nonce), sealed)
        .map_err(|_| CoreError::server("message authentication failed"))
}

/// Encrypt and authenticate, returning ciphertext with the tag appended.
pub(crate) fn gcm_seal(
    key: &AesKey,
    nonce: &[u8; NONCE_SIZE],
    plaintext: &[u8],
) -> CoreResult<Vec<u8>> {
    let bytes = key.as_bytes();
    match bytes.len() {
        16 => seal_with::<Aes128Gcm>(bytes, nonce, plaintext),
        24 => seal_with::<Aes192Gcm>(bytes, nonce, plaintext),
        32 => seal_with::<Aes256Gcm>(bytes, nonce, plaintext),
        n => Err(invalid_key_length(n)),
    }
}

/// Verify the tag and decrypt. `nonce` must be [`NONCE_SIZE`] bytes.
pub(crate) fn gcm_open(key: &AesKey, nonce: &[u8], sealed: &[u8]) -> CoreResult<Vec<u8>> {
    if nonce.len() != NONCE_SIZE {
        return Err(CoreError::contract_invalid("invalid nonce length"));
    }
    let bytes = key.as_bytes();
    match bytes.len() {
        16 => open_with::<Aes128Gcm>(bytes, nonce, sealed),
        24 => open_with::<Aes192Gcm>(bytes, nonce, sealed),
        32 => open_with::<Aes256Gcm>(bytes, nonce, sealed),
        n => Err(invalid_key_length(n)),
    }
}

fn cbc_decrypt_with<C>(key: &[u8], iv: &[u8], buf: &mut [u8]) -> CoreResult<()>
where
    C: BlockDecryptMut + KeyIvInit,
{
    let decryptor = C::new_from_slices(key, iv).map_err(|_| invalid_key_length(key.len()))?;
    decryptor
        .decrypt_padded_mut::<NoPadding>(buf)
        .map_err(|_| CoreError::contract_invalid("ciphertext is not a multiple of the block size"))?;
    Ok(())
}

/// Decrypt a legacy CBC body and strip its PKCS#7 padding.
pub(crate) fn cbc_decrypt(key: &AesKey, iv: &[u8], body: &[u8]) -> CoreResult<Vec<u8>> {
    if iv.len() != BLOCK_SIZE {
        return Err(CoreError::contract_invalid("invalid IV length"));
    }
    if body.len() % BLOCK_SIZE != 0 {
        return Err(CoreError::contract_invalid(
            "ciphertext is not a multiple of the block size",
        ));
    }

    let mut buf = body.to_vec();
    let bytes = key.as_bytes();
    match bytes.len() {
        16 => cbc_decrypt_with::<cbc::Decryptor<Aes128>>(bytes, iv, &mut buf)?,
        24 => cbc_decrypt_with::<cbc::Decryptor<Aes192>>(bytes, iv, &mut buf)?,
        32 => cbc_decrypt_with::<cbc::Decryptor<Aes256>>(bytes, iv, &mut buf)?,
        n => return Err(invalid_key_length(n)),
    }

    let plain_len = pkcs7_unpad(&buf)?.len();
    buf.truncate(plain_len);
    Ok(buf)
}

/// Strip PKCS#7 padding. Every pad byte must equal the pad length.
pub(crate) fn pkcs7_unpad(data: &[u8]) -> CoreResult<&[u8]> {
    let invalid = || CoreError::contract_invalid("invalid padding");

    let &last = data.last().ok_or_else(invalid)?;
    let pad = last as usize;
    if pad == 0 || pad > BLOCK_SIZE || pad > data.len() {
        return Err(invalid());
    }

    let (plain, padding) = data.split_at(data.len() - pad);
    if padding.iter().any(|&b| b != last) {
        return Err(invalid());
    }
    Ok(plain)
}
