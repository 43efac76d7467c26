//! Identity context: the 32-byte binding for one generated password.
//!
//! ```text
//! context = SHA-256( SHA-256(service) || SHA-256(account)
//!                  || SHA-256(revision) || SHA-256(length) )
//! ```
//!
//! Revision and length enter as their decimal text.  Field order is part
//! of the derivation contract: swapping service and account changes the
//! password.

use std::fmt::Display;

use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::crypto::{digest, spice, string_bytes, DIGEST_LEN};

/// Number of identity fields folded into the context.
const FIELDS: usize = 4;

/// Digest of the identity tuple, used as HKDF `info` and PBKDF2 spice.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct IdentityContext([u8; DIGEST_LEN]);

impl IdentityContext {
    /// Build the context for `(service, account, revision, length)`.
    pub fn new(service: &str, account: &str, revision: impl Display, length: usize) -> Self {
        let revision = revision.to_string();
        let length = length.to_string();

        let mut joined = [0u8; FIELDS * DIGEST_LEN];
        for (slot, field) in joined
            .chunks_exact_mut(DIGEST_LEN)
            .zip([service, account, revision.as_str(), length.as_str()])
        {
            slot.copy_from_slice(&digest(&string_bytes(field)));
        }

        let context = Self(digest(&joined));
        joined.zeroize();
        context
    }

    /// The raw 32-byte context.
    pub fn as_bytes(&self) -> &[u8; DIGEST_LEN] {
        &self.0
    }

    /// XOR of the context bytes, added to the PBKDF2 iteration count.
    pub fn spice(&self) -> u8 {
        spice(&self.0)
    }
}

impl std::fmt::Debug for IdentityContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("IdentityContext(<redacted>)")
    }
}
