//! AES-256-GCM authenticated encryption with caller-supplied IVs.
//!
//! The vault persists its IV next to the ciphertext, so unlike a
//! nonce-prepending scheme the IV is an explicit argument here.  The
//! returned buffer is `ciphertext || 16-byte auth tag`.
//!
//! A (key, IV) pair must only ever encrypt the vault seed.

use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Nonce};

use crate::errors::{SecretaryError, Result};

use super::random_array;

/// Size of the AES-256-GCM IV in bytes.
pub const IV_LEN: usize = 12;

/// Size of the GCM authentication tag appended to every ciphertext.
pub const TAG_LEN: usize = 16;

/// Encrypt `plaintext` under a 32-byte `key` and a 12-byte `iv`.
pub fn encrypt(key: &[u8], iv: &[u8; IV_LEN], plaintext: &[u8]) -> Result<Vec<u8>> {
    let cipher = Aes256Gcm::new_from_slice(key)
        .map_err(|e| SecretaryError::Provider(format!("invalid key length: {e}")))?;

    cipher
        .encrypt(Nonce::from_slice(iv), plaintext)
        .map_err(|e| SecretaryError::Provider(format!("encryption error: {e}")))
}

/// Decrypt and authenticate data produced by `encrypt`.
///
/// A tag mismatch means the key (and therefore the passphrase) is
/// wrong or the ciphertext was tampered with.
pub fn decrypt(key: &[u8], iv: &[u8; IV_LEN], ciphertext: &[u8]) -> Result<Vec<u8>> {
    if ciphertext.len() < TAG_LEN {
        return Err(SecretaryError::Authentication);
    }

    let cipher = Aes256Gcm::new_from_slice(key)
        .map_err(|e| SecretaryError::Provider(format!("invalid key length: {e}")))?;

    cipher
        .decrypt(Nonce::from_slice(iv), ciphertext)
        .map_err(|_| SecretaryError::Authentication)
}

/// Draw a fresh random IV from the OS RNG.
pub fn generate_iv() -> Result<[u8; IV_LEN]> {
    random_array()
}
