//! `secretary verify`: check that the passphrase opens the vault.

use crate::cli::commands::open_vault;
use crate::cli::output;
use crate::cli::Cli;
use crate::errors::Result;

/// Execute the `verify` command.
pub fn execute(cli: &Cli) -> Result<()> {
    let (_, _, path) = open_vault(cli)?;
    output::success(&format!("Passphrase accepted for {}", path.display()));
    Ok(())
}
