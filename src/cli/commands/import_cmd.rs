//! `secretary import`: store an envelope from elsewhere.
//!
//! The envelope is unlocked with the passphrase before anything is
//! written, so a typo or a wrong passphrase never replaces a good vault.

use crate::cli::commands::OpenedVault;
use crate::cli::output;
use crate::cli::{envelope_path, load_settings, prompt_passphrase, Cli};
use crate::errors::{SecretaryError, Result};
use crate::vault::format;

/// Execute the `import` command.
pub fn execute(cli: &Cli, envelope: &str, force: bool) -> Result<()> {
    let settings = load_settings()?;
    let path = envelope_path(cli, &settings)?;

    if path.exists() && !force {
        output::tip("Pass --force to replace the existing vault.");
        return Err(SecretaryError::VaultAlreadyExists(path));
    }

    let envelope = envelope.trim();
    let passphrase = prompt_passphrase()?;
    OpenedVault::unlock(cli.legacy, settings.vault_params(), &passphrase, envelope)?;

    format::write_envelope(&path, envelope)?;
    output::success(&format!("Envelope imported to {}", path.display()));
    Ok(())
}
