//! `secretary init`: register a new vault with a fresh random seed.

use tracing::info;

use crate::cli::output;
use crate::cli::{envelope_path, load_settings, prompt_new_passphrase, Cli, PASSPHRASE_ENV};
use crate::errors::{SecretaryError, Result};
use crate::vault::format;
use crate::vault::Vault;

/// Execute the `init` command.
pub fn execute(cli: &Cli) -> Result<()> {
    if cli.legacy {
        return Err(SecretaryError::CommandFailed(
            "legacy vaults can be opened but not created; drop --legacy".into(),
        ));
    }

    let settings = load_settings()?;
    let path = envelope_path(cli, &settings)?;

    // 1. Refuse to overwrite an existing vault.
    if path.exists() {
        output::tip("Use `secretary rotate` to change the passphrase of the existing vault.");
        return Err(SecretaryError::VaultAlreadyExists(path));
    }

    // 2. Prompt for a new passphrase (with confirmation).
    let passphrase = prompt_new_passphrase(PASSPHRASE_ENV)?;

    // 3. Register a fresh seed and persist only its envelope.
    let mut vault = Vault::new(settings.vault_params());
    vault.unlock(&passphrase, None)?;
    let envelope = vault.encode(None)?;
    vault.reset();

    format::write_envelope(&path, &envelope)?;
    info!(path = %path.display(), "vault envelope written");

    output::success(&format!("Vault created at {}", path.display()));
    output::tip("Run `secretary generate <SERVICE> <ACCOUNT>` to derive a password.");
    output::tip("Run `secretary export` and keep the envelope somewhere safe.");

    Ok(())
}
