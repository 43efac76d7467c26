//! `secretary export`: print the stored envelope.
//!
//! The envelope is already encrypted, so no passphrase is needed.

use crate::cli::{envelope_path, load_settings, Cli};
use crate::errors::Result;
use crate::vault::format;

/// Execute the `export` command.
pub fn execute(cli: &Cli) -> Result<()> {
    let settings = load_settings()?;
    let path = envelope_path(cli, &settings)?;
    let envelope = format::read_envelope(&path)?;
    println!("{envelope}");
    Ok(())
}
