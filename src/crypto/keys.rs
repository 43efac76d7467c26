//! Key material holders and HKDF-SHA256 expansion.
//!
//! The PBKDF2 output for an identity is used as HKDF input keying
//! material (IKM), with the vault salt as HKDF salt and the identity
//! context as `info`.  The expanded bytes are what the charset mapper
//! turns into a password.

use hkdf::Hkdf;
use sha2::Sha256;
use zeroize::{Zeroize, Zeroizing};

use crate::errors::{SecretaryError, Result};

/// Length of the master key (256 bits, for AES-256).
const KEY_LEN: usize = 32;

/// Largest output HKDF-SHA256 can produce (255 blocks of 32 bytes).
pub const MAX_EXPAND_LEN: usize = 255 * 32;

/// Expand `ikm` into `length` pseudorandom bytes bound to `info`.
pub fn expand_secret_bytes(
    ikm: &[u8],
    salt: &[u8],
    info: &[u8],
    length: usize,
) -> Result<Zeroizing<Vec<u8>>> {
    let hk = Hkdf::<Sha256>::new(Some(salt), ikm);

    let mut okm = Zeroizing::new(vec![0u8; length]);
    hk.expand(info, &mut okm)
        .map_err(|e| SecretaryError::Provider(format!("HKDF expand failed: {e}")))?;

    Ok(okm)
}

/// A wrapper around the 32-byte passphrase-derived key that
/// automatically zeroes its memory when dropped.
///
/// The vault keeps one of these while unlocked; it is the only thing
/// that can decrypt the persisted seed.
#[derive(Zeroize)]
#[zeroize(drop)]
pub struct MasterKey {
    bytes: [u8; KEY_LEN],
}

impl MasterKey {
    /// Create a new `MasterKey` from raw bytes.
    pub fn new(bytes: [u8; KEY_LEN]) -> Self {
        Self { bytes }
    }

    /// Access the raw key bytes (e.g. to build an AES-GCM cipher).
    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.bytes
    }
}

impl std::fmt::Debug for MasterKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("MasterKey(<redacted>)")
    }
}
