//! Password-based key derivation using SHA-256 and PBKDF2-HMAC-SHA256.
//!
//! Both the passphrase key and the per-identity seed key go through
//! PBKDF2 with an iteration count of `base + spice`, where the spice
//! is the XOR of every byte of a SHA-256 digest.  Two passphrases (or
//! two identity contexts) therefore almost never share a work factor.

use pbkdf2::pbkdf2_hmac;
use sha2::{Digest, Sha256};
use zeroize::Zeroizing;

use crate::errors::{SecretaryError, Result};

use super::keys::MasterKey;
use super::random_array;

/// Base PBKDF2 iteration count before the spice is added.
pub const BASE_ITERATION: u32 = 1_048_320;

/// Length of the vault salt in bytes (128 bits).
pub const SALT_LEN: usize = 16;

/// Length of SHA-256 digests and derived keys in bytes.
pub const DIGEST_LEN: usize = 32;

/// SHA-256 of `data` as a fixed-size array.
pub fn digest(data: &[u8]) -> [u8; DIGEST_LEN] {
    Sha256::digest(data).into()
}

/// XOR of all bytes in `buf`.
pub fn spice(buf: &[u8]) -> u8 {
    buf.iter().fold(0, |acc, b| acc ^ b)
}

/// Byte encoding used for every string that enters a digest.
///
/// One byte per code point: the low eight bits of its first UTF-16
/// code unit.  ASCII input encodes to its plain bytes; a character
/// outside the BMP contributes the low byte of its high surrogate.
/// This truncation is part of the derivation contract and must not
/// change.
pub fn string_bytes(s: &str) -> Zeroizing<Vec<u8>> {
    Zeroizing::new(
        s.chars()
            .map(|c| {
                let mut units = [0u16; 2];
                c.encode_utf16(&mut units)[0] as u8
            })
            .collect(),
    )
}

/// Iteration count for a given base and spice source.
fn iterations(base: u32, spice_source: &[u8]) -> Result<u32> {
    if base == 0 {
        return Err(SecretaryError::InvalidParameter(
            "base iteration count must be at least 1".into(),
        ));
    }
    base.checked_add(u32::from(spice(spice_source)))
        .ok_or_else(|| SecretaryError::InvalidParameter("iteration count overflows u32".into()))
}

/// Derive the AES-256-GCM key that wraps the seed.
///
/// `SHA-256(passphrase)` is the PBKDF2 password, `salt` the vault salt,
/// and the digest's spice perturbs the iteration count.
pub fn derive_passphrase_key(passphrase: &str, salt: &[u8], base: u32) -> Result<MasterKey> {
    let encoded = string_bytes(passphrase);
    let hashed = Zeroizing::new(digest(&encoded));
    let rounds = iterations(base, &hashed[..])?;

    let mut key = Zeroizing::new([0u8; DIGEST_LEN]);
    pbkdf2_hmac::<Sha256>(&hashed[..], salt, rounds, &mut key[..]);
    Ok(MasterKey::new(*key))
}

/// Stretch the recovered seed into 32 bytes of HKDF input keying material.
///
/// `context` only enters through its spice, which sets the iteration
/// count.  Binding the output to the identity is HKDF's job, via `info`.
pub fn derive_seed_key(
    seed: &[u8],
    salt: &[u8],
    context: &[u8; DIGEST_LEN],
    base: u32,
) -> Result<Zeroizing<[u8; DIGEST_LEN]>> {
    let rounds = iterations(base, context)?;
    let mut out = Zeroizing::new([0u8; DIGEST_LEN]);
    pbkdf2_hmac::<Sha256>(seed, salt, rounds, &mut out[..]);
    Ok(out)
}

/// Generate a cryptographically random 16-byte salt.
pub fn generate_salt() -> Result<[u8; SALT_LEN]> {
    random_array()
}
