//! Vault module: the deterministic password engine.
//!
//! This module provides:
//! - The identity context that binds a password to its tuple (`context`)
//! - The packed container, base64 envelope and envelope files (`format`)
//! - The `Vault` lifecycle: unlock, generate, encode, reset (`store`)
//! - First-generation envelopes (`legacy`)

pub mod context;
pub mod format;
pub mod legacy;
pub mod store;

// Re-export the most commonly used items.
pub use context::IdentityContext;
pub use format::{decode_envelope, encode_envelope, pack, unpack, EnvelopeParts};
pub use legacy::LegacyVault;
pub use store::{Vault, VaultParams, DEFAULT_SEED_BITS, MAX_SEED_BITS};
