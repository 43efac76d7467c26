use std::path::PathBuf;
use thiserror::Error;

/// All errors that can occur in Secretary.
#[derive(Debug, Error)]
pub enum SecretaryError {
    // --- Engine errors ---
    #[error("Vault is locked — unlock it before generating or encoding")]
    Locked,

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Authentication failed — wrong passphrase or corrupted envelope")]
    Authentication,

    #[error("Crypto provider error: {0}")]
    Provider(String),

    #[error("Invalid envelope: {0}")]
    InvalidEnvelope(String),

    // --- Vault file errors ---
    #[error("Vault not found at {0}")]
    VaultNotFound(PathBuf),

    #[error("Vault already exists at {0}")]
    VaultAlreadyExists(PathBuf),

    // --- Config errors ---
    #[error("Config file error: {0}")]
    ConfigError(String),

    // --- IO errors ---
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // --- CLI errors ---
    #[error("Command failed: {0}")]
    CommandFailed(String),

    #[error("User cancelled operation")]
    UserCancelled,
}

/// Convenience type alias for Secretary results.
pub type Result<T> = std::result::Result<T, SecretaryError>;
