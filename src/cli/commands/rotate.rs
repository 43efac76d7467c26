//! `secretary rotate`: change the vault passphrase.
//!
//! Decrypts the seed with the current passphrase and re-encrypts it
//! under the new one with a fresh IV.  The salt and the seed are
//! untouched, so every generated password stays the same.

use tracing::info;

use crate::cli::commands::open_vault;
use crate::cli::output;
use crate::cli::{prompt_new_passphrase, Cli, NEW_PASSPHRASE_ENV};
use crate::errors::Result;
use crate::vault::format;

/// Execute the `rotate` command.
pub fn execute(cli: &Cli) -> Result<()> {
    // 1. Open the vault with the current passphrase.
    output::info("Enter your current vault passphrase.");
    let (mut vault, _, path) = open_vault(cli)?;

    // 2. Prompt for the new passphrase.
    output::info("Choose your new vault passphrase.");
    let new_passphrase = prompt_new_passphrase(NEW_PASSPHRASE_ENV)?;

    // 3. Re-wrap the seed and save atomically.
    let envelope = vault.encode(Some(&new_passphrase))?;
    format::write_envelope(&path, &envelope)?;
    info!(path = %path.display(), "vault envelope rewritten");

    output::success("Passphrase rotated — your generated passwords are unchanged");
    Ok(())
}
