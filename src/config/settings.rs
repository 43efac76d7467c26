use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::charset::Strength;
use crate::crypto::BASE_ITERATION;
use crate::errors::{SecretaryError, Result};
use crate::vault::{VaultParams, DEFAULT_SEED_BITS, MAX_SEED_BITS};

/// Project-level configuration, loaded from `.secretary.toml`.
///
/// Every field has a sensible default so Secretary works out-of-the-box
/// without any config file at all.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Directory (relative to project root) where the envelope is stored.
    #[serde(default = "default_vault_dir")]
    pub vault_dir: String,

    /// Password length used when `--length` is not given.
    #[serde(default = "default_length")]
    pub default_length: usize,

    /// Strength code used when `--strength` is not given.
    #[serde(default = "default_strength")]
    pub default_strength: u8,

    /// Seed size in bits for newly registered vaults.
    #[serde(default = "default_seed_bits")]
    pub seed_bits: usize,

    /// PBKDF2 base iteration count.  Changing it makes existing
    /// envelopes unreadable.
    #[serde(default = "default_base_iterations")]
    pub base_iterations: u32,
}

// ── Serde default helpers ────────────────────────────────────────────

fn default_vault_dir() -> String {
    ".secretary".to_string()
}

fn default_length() -> usize {
    16
}

fn default_strength() -> u8 {
    Strength::default().code()
}

fn default_seed_bits() -> usize {
    DEFAULT_SEED_BITS
}

fn default_base_iterations() -> u32 {
    BASE_ITERATION
}

// ── Implementation ───────────────────────────────────────────────────

impl Default for Settings {
    fn default() -> Self {
        Self {
            vault_dir: default_vault_dir(),
            default_length: default_length(),
            default_strength: default_strength(),
            seed_bits: default_seed_bits(),
            base_iterations: default_base_iterations(),
        }
    }
}

impl Settings {
    /// Name of the config file we look for in the project root.
    const FILE_NAME: &'static str = ".secretary.toml";

    /// Name of the envelope file inside the vault directory.
    const ENVELOPE_FILE: &'static str = "vault.envelope";

    /// Load settings from `<project_dir>/.secretary.toml`.
    ///
    /// If the file does not exist, sensible defaults are returned.
    /// If the file exists but cannot be parsed or holds an unsupported
    /// value, an error is returned.
    pub fn load(project_dir: &Path) -> Result<Self> {
        let config_path = project_dir.join(Self::FILE_NAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(&config_path)?;

        let settings: Settings = toml::from_str(&contents).map_err(|e| {
            SecretaryError::ConfigError(format!("Failed to parse {}: {e}", config_path.display()))
        })?;
        settings.validate()?;

        if settings.base_iterations != BASE_ITERATION {
            tracing::warn!(
                base_iterations = settings.base_iterations,
                "non-default PBKDF2 base iterations; envelopes are not portable"
            );
        }

        Ok(settings)
    }

    /// Check values serde cannot.
    fn validate(&self) -> Result<()> {
        Strength::try_from(self.default_strength)
            .map_err(|e| SecretaryError::ConfigError(format!("default_strength: {e}")))?;
        if self.default_length == 0 {
            return Err(SecretaryError::ConfigError(
                "default_length must be at least 1".into(),
            ));
        }
        if self.seed_bits == 0 || self.seed_bits > MAX_SEED_BITS {
            return Err(SecretaryError::ConfigError(format!(
                "seed_bits must be between 1 and {MAX_SEED_BITS}, got {}",
                self.seed_bits
            )));
        }
        if self.base_iterations == 0 {
            return Err(SecretaryError::ConfigError(
                "base_iterations must be at least 1".into(),
            ));
        }
        Ok(())
    }

    /// Build the full path to the envelope file.
    ///
    /// Example: `project_dir/.secretary/vault.envelope`
    pub fn envelope_path(&self, project_dir: &Path) -> PathBuf {
        project_dir.join(&self.vault_dir).join(Self::ENVELOPE_FILE)
    }

    /// The configured default strength.
    pub fn strength(&self) -> Result<Strength> {
        Strength::try_from(self.default_strength)
    }

    /// Convert the KDF settings into vault params.
    pub fn vault_params(&self) -> VaultParams {
        VaultParams {
            base_iterations: self.base_iterations,
            seed_bits: self.seed_bits,
        }
    }
}

// ── Tests ────────────────────────────────────────────────────────────
