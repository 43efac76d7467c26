//! Subcommand implementations, one module per command.

pub mod completions;
pub mod export;
pub mod generate;
pub mod import_cmd;
pub mod init;
pub mod rotate;
pub mod verify;
pub mod version;

use std::fmt::Display;
use std::path::PathBuf;

use zeroize::Zeroizing;

use crate::charset::Strength;
use crate::cli::{envelope_path, load_settings, prompt_passphrase, Cli};
use crate::config::Settings;
use crate::errors::Result;
use crate::vault::format;
use crate::vault::{LegacyVault, Vault, VaultParams};

/// A vault of either generation, opened from the envelope file.
pub(crate) enum OpenedVault {
    Current(Vault),
    Legacy(LegacyVault),
}

impl OpenedVault {
    /// Unlock `envelope` with the vault type selected by `--legacy`.
    pub(crate) fn unlock(
        legacy: bool,
        params: VaultParams,
        passphrase: &str,
        envelope: &str,
    ) -> Result<Self> {
        if legacy {
            let mut vault = LegacyVault::new(params);
            vault.unlock(passphrase, Some(envelope))?;
            Ok(Self::Legacy(vault))
        } else {
            let mut vault = Vault::new(params);
            vault.unlock(passphrase, Some(envelope))?;
            Ok(Self::Current(vault))
        }
    }

    /// Derive a password; legacy vaults ignore `strength`.
    pub(crate) fn generate(
        &self,
        service: &str,
        account: &str,
        revision: impl Display,
        length: usize,
        strength: Strength,
    ) -> Result<Zeroizing<String>> {
        match self {
            Self::Current(vault) => vault.generate(service, account, revision, length, strength),
            Self::Legacy(vault) => vault.generate(service, account, revision, length),
        }
    }

    /// Re-encode, optionally under a new passphrase.
    pub(crate) fn encode(&mut self, new_passphrase: Option<&str>) -> Result<String> {
        match self {
            Self::Current(vault) => vault.encode(new_passphrase),
            Self::Legacy(vault) => vault.encode(new_passphrase),
        }
    }
}

/// Load settings, read the envelope file and unlock it with a prompted
/// passphrase.
pub(crate) fn open_vault(cli: &Cli) -> Result<(OpenedVault, Settings, PathBuf)> {
    let settings = load_settings()?;
    let path = envelope_path(cli, &settings)?;
    let envelope = format::read_envelope(&path)?;

    let passphrase = prompt_passphrase()?;
    let vault = OpenedVault::unlock(cli.legacy, settings.vault_params(), &passphrase, &envelope)?;
    Ok((vault, settings, path))
}
