pub mod charset;
pub mod cli;
pub mod config;
pub mod crypto;
pub mod errors;
pub mod vault;

pub use charset::Strength;
pub use errors::{Result, SecretaryError};
pub use vault::{LegacyVault, Vault, VaultParams};
