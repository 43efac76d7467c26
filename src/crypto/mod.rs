//! Cryptographic primitives for Secretary.
//!
//! This module provides:
//! - AES-256-GCM encryption and decryption with explicit IVs (`encryption`)
//! - SHA-256 digests, spice and PBKDF2 key derivation (`kdf`)
//! - HKDF expansion and the zeroizing `MasterKey` (`keys`)
//! - OS-backed random bytes (below)

pub mod encryption;
pub mod kdf;
pub mod keys;

use rand::rngs::OsRng;
use rand::TryRngCore;
use zeroize::Zeroizing;

use crate::errors::{SecretaryError, Result};

// Re-export the most commonly used items so callers can write:
//   use crate::crypto::{encrypt, decrypt, derive_passphrase_key, ...};
pub use encryption::{decrypt, encrypt, generate_iv, IV_LEN, TAG_LEN};
pub use kdf::{
    derive_passphrase_key, derive_seed_key, digest, generate_salt, spice, string_bytes,
    BASE_ITERATION, DIGEST_LEN, SALT_LEN,
};
pub use keys::{expand_secret_bytes, MasterKey, MAX_EXPAND_LEN};

/// Fill a new buffer of `len` bytes from the OS RNG.
pub fn random_bytes(len: usize) -> Result<Zeroizing<Vec<u8>>> {
    let mut buf = Zeroizing::new(vec![0u8; len]);
    OsRng
        .try_fill_bytes(&mut buf)
        .map_err(|e| SecretaryError::Provider(format!("random source failed: {e}")))?;
    Ok(buf)
}

/// Fill a fixed-size array from the OS RNG.
pub(crate) fn random_array<const N: usize>() -> Result<[u8; N]> {
    let mut buf = [0u8; N];
    OsRng
        .try_fill_bytes(&mut buf)
        .map_err(|e| SecretaryError::Provider(format!("random source failed: {e}")))?;
    Ok(buf)
}
