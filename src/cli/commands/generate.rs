//! `secretary generate`: derive and print a password.

use crate::charset::Strength;
use crate::cli::commands::open_vault;
use crate::cli::Cli;
use crate::errors::Result;

/// Execute the `generate` command.
pub fn execute(
    cli: &Cli,
    service: &str,
    account: &str,
    revision: &str,
    length: Option<usize>,
    strength: Option<Strength>,
) -> Result<()> {
    let (vault, settings, _) = open_vault(cli)?;

    let length = length.unwrap_or(settings.default_length);
    let strength = match strength {
        Some(strength) => strength,
        None => settings.strength()?,
    };

    // Print bare so the password can be piped.
    let password = vault.generate(service, account, revision, length, strength)?;
    println!("{}", password.as_str());

    Ok(())
}
