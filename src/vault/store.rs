//! The `Vault`: unlock state and the password derivation pipeline.
//!
//! A vault is either locked (no state) or unlocked, in which case it
//! holds the encrypted seed, its IV, the salt, and the passphrase key.
//! The plaintext seed is never kept; `generate` and `encode` decrypt it
//! on demand into a zeroizing buffer.
//!
//! ```text
//! generate:  cipher --AES-GCM(key, iv)--> seed
//!            seed   --PBKDF2(salt, base + spice(ctx))--> 32 bytes
//!            bytes  --HKDF(salt, info = ctx)--> length bytes
//!            bytes  --charset mapping--> password
//! ```
//!
//! Callers must serialize access to one vault; `&mut self` on the
//! mutating operations lets the borrow checker enforce that.

use std::fmt::Display;

use tracing::{debug, trace};
use zeroize::{Zeroize, Zeroizing};

use crate::charset::{self, Strength};
use crate::crypto::{
    decrypt, derive_passphrase_key, derive_seed_key, encrypt, expand_secret_bytes, generate_iv,
    generate_salt, random_bytes, MasterKey, BASE_ITERATION, IV_LEN, MAX_EXPAND_LEN, SALT_LEN,
};
use crate::errors::{SecretaryError, Result};

use super::context::IdentityContext;
use super::format;

/// Default seed size in bits.
pub const DEFAULT_SEED_BITS: usize = 1024;

/// Largest seed size accepted at registration.
pub const MAX_SEED_BITS: usize = 65_536;

/// Tunables for a vault.
///
/// These are not stored in the envelope: opening an envelope with a
/// different `base_iterations` than it was created with derives a
/// different key and fails authentication.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VaultParams {
    /// PBKDF2 base iteration count (default: 1 048 320).
    pub base_iterations: u32,
    /// Seed size used when registering a new vault (default: 1024).
    pub seed_bits: usize,
}

impl Default for VaultParams {
    fn default() -> Self {
        Self {
            base_iterations: BASE_ITERATION,
            seed_bits: DEFAULT_SEED_BITS,
        }
    }
}

/// Everything an unlocked vault holds.
struct Unlocked {
    cipher: Vec<u8>,
    iv: [u8; IV_LEN],
    salt: [u8; SALT_LEN],
    key: MasterKey,
}

impl Drop for Unlocked {
    fn drop(&mut self) {
        self.cipher.zeroize();
        self.iv.zeroize();
        self.salt.zeroize();
    }
}

impl Unlocked {
    /// Decrypt the seed with the current key and IV.
    fn seed(&self) -> Result<Zeroizing<Vec<u8>>> {
        decrypt(self.key.as_bytes(), &self.iv, &self.cipher).map(Zeroizing::new)
    }
}

/// A deterministic password vault.
///
/// Create one with `Vault::new` (or `Vault::default`), then `unlock` it
/// to register a new seed or to open an existing envelope.
#[derive(Default)]
pub struct Vault {
    params: VaultParams,
    state: Option<Unlocked>,
}

impl Vault {
    // ------------------------------------------------------------------
    // Construction
    // ------------------------------------------------------------------

    /// Create a locked vault with the given parameters.
    pub fn new(params: VaultParams) -> Self {
        Self {
            params,
            state: None,
        }
    }

    /// The parameters this vault was built with.
    pub fn params(&self) -> &VaultParams {
        &self.params
    }

    // ------------------------------------------------------------------
    // Lifecycle
    // ------------------------------------------------------------------

    /// Unlock the vault.
    ///
    /// Without an envelope a brand-new seed is registered (sized by
    /// `VaultParams::seed_bits`).  With one, the passphrase is checked
    /// by decrypting the seed, which is then discarded.
    ///
    /// Any previous state is dropped first; on error the vault stays
    /// locked.
    pub fn unlock(&mut self, passphrase: &str, envelope: Option<&str>) -> Result<()> {
        match envelope {
            Some(envelope) => self.open(passphrase, envelope),
            None => self.register(passphrase, self.params.seed_bits),
        }
    }

    /// Register a new random seed of `seed_bits` bits under `passphrase`.
    pub fn register(&mut self, passphrase: &str, seed_bits: usize) -> Result<()> {
        self.reset();

        if seed_bits == 0 || seed_bits > MAX_SEED_BITS {
            return Err(SecretaryError::InvalidParameter(format!(
                "seed size must be between 1 and {MAX_SEED_BITS} bits, got {seed_bits}"
            )));
        }

        // 1. Fresh seed, IV and salt.
        let seed = random_bytes(seed_bits.div_ceil(8))?;
        let iv = generate_iv()?;
        let salt = generate_salt()?;

        // 2. Passphrase -> AES-256-GCM key.
        let key = derive_passphrase_key(passphrase, &salt, self.params.base_iterations)?;

        // 3. Wrap the seed; only the ciphertext is kept.
        let cipher = encrypt(key.as_bytes(), &iv, &seed)?;

        debug!(seed_bytes = seed.len(), "registered new vault seed");
        self.state = Some(Unlocked {
            cipher,
            iv,
            salt,
            key,
        });
        Ok(())
    }

    /// Open an existing envelope with `passphrase`.
    fn open(&mut self, passphrase: &str, envelope: &str) -> Result<()> {
        self.reset();

        let parts = format::decode_envelope(envelope)?;
        let key = derive_passphrase_key(passphrase, &parts.salt, self.params.base_iterations)?;

        // Authenticate only; the plaintext is zeroized on drop.
        let seed = Zeroizing::new(decrypt(key.as_bytes(), &parts.iv, &parts.cipher)?);
        trace!(seed_bytes = seed.len(), "envelope authenticated");
        drop(seed);

        debug!("vault unlocked from envelope");
        self.state = Some(Unlocked {
            cipher: parts.cipher,
            iv: parts.iv,
            salt: parts.salt,
            key,
        });
        Ok(())
    }

    /// Lock the vault, dropping (and zeroizing) all key material.
    pub fn reset(&mut self) {
        if self.state.take().is_some() {
            debug!("vault locked");
        }
    }

    /// `true` while the vault holds a cipher, salt and key.
    pub fn is_unlocked(&self) -> bool {
        self.state.is_some()
    }

    // ------------------------------------------------------------------
    // Derivation
    // ------------------------------------------------------------------

    /// Derive the password for `(service, account, revision)`.
    ///
    /// The same vault seed, identity, length and strength always give
    /// the same `length`-character password.
    pub fn generate(
        &self,
        service: &str,
        account: &str,
        revision: impl Display,
        length: usize,
        strength: Strength,
    ) -> Result<Zeroizing<String>> {
        validate_length(length)?;
        let state = self.state.as_ref().ok_or(SecretaryError::Locked)?;

        let context = IdentityContext::new(service, account, revision, length);
        let seed = state.seed()?;
        let stretched = derive_seed_key(
            &seed,
            &state.salt,
            context.as_bytes(),
            self.params.base_iterations,
        )?;
        drop(seed);

        let bytes = expand_secret_bytes(&stretched[..], &state.salt, context.as_bytes(), length)?;
        charset::encode(&bytes, strength)
    }

    // ------------------------------------------------------------------
    // Persistence
    // ------------------------------------------------------------------

    /// Serialize the vault as a base64 envelope.
    ///
    /// With `new_passphrase` the seed is re-encrypted under a key derived
    /// from it and a fresh IV, and the vault adopts the new key.  The salt
    /// never changes, so every future password stays the same.  An empty
    /// new passphrase means no rotation.
    pub fn encode(&mut self, new_passphrase: Option<&str>) -> Result<String> {
        let base = self.params.base_iterations;
        let state = self.state.as_mut().ok_or(SecretaryError::Locked)?;

        if let Some(passphrase) = new_passphrase.filter(|p| !p.is_empty()) {
            let seed = state.seed()?;
            let key = derive_passphrase_key(passphrase, &state.salt, base)?;
            let iv = generate_iv()?;
            let cipher = encrypt(key.as_bytes(), &iv, &seed)?;

            state.cipher.zeroize();
            state.cipher = cipher;
            state.iv = iv;
            state.key = key;
            debug!("vault passphrase rotated");
        }

        format::encode_envelope(&state.cipher, &state.iv, &state.salt)
    }
}

impl std::fmt::Debug for Vault {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Vault")
            .field("params", &self.params)
            .field("unlocked", &self.is_unlocked())
            .finish()
    }
}

/// Reject lengths HKDF-SHA256 cannot produce.
pub(crate) fn validate_length(length: usize) -> Result<()> {
    if length == 0 {
        return Err(SecretaryError::InvalidParameter(
            "length must be at least 1".into(),
        ));
    }
    if length > MAX_EXPAND_LEN {
        return Err(SecretaryError::InvalidParameter(format!(
            "length cannot exceed {MAX_EXPAND_LEN}"
        )));
    }
    Ok(())
}
