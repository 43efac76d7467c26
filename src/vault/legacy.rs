//! First-generation vaults.
//!
//! Older envelopes have no packed container.  They are the base64 of
//!
//! ```text
//! [cipher: seed + 16-byte tag][salt: 28 bytes]
//! ```
//!
//! where the first 12 salt bytes double as the AES-GCM IV and the last
//! 16 are the KDF salt.  The unlocked seed is held in memory, and
//! passwords are plain `b mod 94 + 33` printable ASCII with no class
//! coverage.  `LegacyVault` exists so these envelopes keep working.

use std::fmt::Display;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use tracing::debug;
use zeroize::Zeroizing;

use crate::charset;
use crate::crypto::{
    decrypt, derive_passphrase_key, derive_seed_key, encrypt, expand_secret_bytes, random_bytes,
    MasterKey, IV_LEN, TAG_LEN,
};
use crate::errors::{SecretaryError, Result};

use super::context::IdentityContext;
use super::store::{validate_length, VaultParams};

/// Bytes drawn at registration: 64 seed bytes followed by the salt.
const REGISTRATION_LEN: usize = 92;

/// Length of the trailing salt block.
const LEGACY_SALT_LEN: usize = 28;

/// Everything an unlocked legacy vault holds.
struct LegacyState {
    seed: Zeroizing<Vec<u8>>,
    salt: Zeroizing<[u8; LEGACY_SALT_LEN]>,
    key: MasterKey,
}

impl LegacyState {
    fn iv(&self) -> [u8; IV_LEN] {
        let mut iv = [0u8; IV_LEN];
        iv.copy_from_slice(&self.salt[..IV_LEN]);
        iv
    }

    fn kdf_salt(&self) -> &[u8] {
        &self.salt[IV_LEN..]
    }
}

/// A first-generation deterministic password vault.
#[derive(Default)]
pub struct LegacyVault {
    params: VaultParams,
    state: Option<LegacyState>,
}

impl LegacyVault {
    /// Create a locked legacy vault.  `seed_bits` is ignored; legacy
    /// seeds are always 64 bytes.
    pub fn new(params: VaultParams) -> Self {
        Self {
            params,
            state: None,
        }
    }

    /// Register a new seed, or open `envelope` when one is given.
    pub fn unlock(&mut self, passphrase: &str, envelope: Option<&str>) -> Result<()> {
        self.reset();

        let (seed, salt, key) = match envelope {
            Some(envelope) => {
                let raw = Zeroizing::new(
                    BASE64
                        .decode(envelope.trim())
                        .map_err(|e| SecretaryError::InvalidEnvelope(format!("base64: {e}")))?,
                );
                if raw.len() <= LEGACY_SALT_LEN + TAG_LEN {
                    return Err(SecretaryError::InvalidEnvelope(format!(
                        "legacy envelope of {} bytes is too short",
                        raw.len()
                    )));
                }
                let (cipher, salt_bytes) = raw.split_at(raw.len() - LEGACY_SALT_LEN);
                let mut salt = Zeroizing::new([0u8; LEGACY_SALT_LEN]);
                salt.copy_from_slice(salt_bytes);

                let key = derive_passphrase_key(
                    passphrase,
                    &salt[IV_LEN..],
                    self.params.base_iterations,
                )?;
                let mut iv = [0u8; IV_LEN];
                iv.copy_from_slice(&salt[..IV_LEN]);
                let seed = Zeroizing::new(decrypt(key.as_bytes(), &iv, cipher)?);
                (seed, salt, key)
            }
            None => {
                let buf = random_bytes(REGISTRATION_LEN)?;
                let split = REGISTRATION_LEN - LEGACY_SALT_LEN;
                let seed = Zeroizing::new(buf[..split].to_vec());
                let mut salt = Zeroizing::new([0u8; LEGACY_SALT_LEN]);
                salt.copy_from_slice(&buf[split..]);

                let key = derive_passphrase_key(
                    passphrase,
                    &salt[IV_LEN..],
                    self.params.base_iterations,
                )?;
                (seed, salt, key)
            }
        };

        debug!(registered = envelope.is_none(), "legacy vault unlocked");
        self.state = Some(LegacyState { seed, salt, key });
        Ok(())
    }

    /// Lock the vault, zeroizing the seed and key.
    pub fn reset(&mut self) {
        self.state = None;
    }

    /// `true` while a seed, salt and key are held.
    pub fn is_unlocked(&self) -> bool {
        self.state.is_some()
    }

    /// Derive a `length`-character printable-ASCII password.
    pub fn generate(
        &self,
        service: &str,
        account: &str,
        revision: impl Display,
        length: usize,
    ) -> Result<Zeroizing<String>> {
        validate_length(length)?;
        let state = self.state.as_ref().ok_or(SecretaryError::Locked)?;

        let context = IdentityContext::new(service, account, revision, length);
        let stretched = derive_seed_key(
            &state.seed,
            state.kdf_salt(),
            context.as_bytes(),
            self.params.base_iterations,
        )?;
        let bytes =
            expand_secret_bytes(&stretched[..], state.kdf_salt(), context.as_bytes(), length)?;
        Ok(charset::printable_94(&bytes))
    }

    /// Encrypt the seed and emit `base64(cipher || salt)`.
    ///
    /// With `new_passphrase` the vault switches to a key derived from it;
    /// the salt, and therefore the IV, stays the same.  An empty new
    /// passphrase keeps the current key.
    pub fn encode(&mut self, new_passphrase: Option<&str>) -> Result<String> {
        let base = self.params.base_iterations;
        let state = self.state.as_mut().ok_or(SecretaryError::Locked)?;

        if let Some(passphrase) = new_passphrase.filter(|p| !p.is_empty()) {
            state.key = derive_passphrase_key(passphrase, state.kdf_salt(), base)?;
            debug!("legacy vault passphrase rotated");
        }

        let mut out = encrypt(state.key.as_bytes(), &state.iv(), &state.seed)?;
        out.extend_from_slice(&state.salt[..]);
        Ok(BASE64.encode(out))
    }
}
