//! CLI module: Clap argument parser, output helpers, and command implementations.

pub mod commands;
pub mod output;

use std::path::PathBuf;

use clap::Parser;
use zeroize::Zeroizing;

use crate::charset::Strength;
use crate::config::Settings;
use crate::errors::{SecretaryError, Result};

/// Minimum passphrase length to prevent trivially weak passphrases.
const MIN_PASSPHRASE_LEN: usize = 8;

/// Environment variable consulted before prompting for a passphrase.
pub const PASSPHRASE_ENV: &str = "SECRETARY_PASSPHRASE";

/// Environment variable holding the new passphrase for `rotate`.
pub const NEW_PASSPHRASE_ENV: &str = "SECRETARY_NEW_PASSPHRASE";

/// Secretary CLI: deterministic password generator.
#[derive(Parser)]
#[command(
    name = "secretary",
    about = "Deterministic password generator — passwords are derived, never stored",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Vault directory (default: from .secretary.toml, else .secretary)
    #[arg(long, global = true)]
    pub vault_dir: Option<String>,

    /// Treat the envelope as a first-generation (legacy) vault
    #[arg(long, global = true)]
    pub legacy: bool,
}

/// All available subcommands.
#[derive(clap::Subcommand)]
pub enum Commands {
    /// Register a new vault with a fresh random seed
    Init,

    /// Derive the password for a service and account
    Generate {
        /// Service name (e.g. example.com)
        service: String,
        /// Account or user name on that service
        account: String,
        /// Revision; bump it to change a password
        #[arg(short, long, default_value = "0")]
        revision: String,
        /// Password length (default: from settings)
        #[arg(short, long)]
        length: Option<usize>,
        /// Strength code: 10, 36, 62, 91, 94 or 95 (default: from settings)
        #[arg(short, long, value_parser = parse_strength)]
        strength: Option<Strength>,
    },

    /// Change the vault passphrase (generated passwords stay the same)
    Rotate,

    /// Check that the passphrase opens the vault
    Verify,

    /// Print the stored envelope for backup or transport
    Export,

    /// Store an envelope after checking it against the passphrase
    Import {
        /// The base64 envelope text
        envelope: String,
        /// Replace an existing vault
        #[arg(short, long)]
        force: bool,
    },

    /// Show version
    Version,

    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// Clap value parser for strength codes.
fn parse_strength(s: &str) -> std::result::Result<Strength, String> {
    s.parse::<Strength>().map_err(|e| e.to_string())
}

// ---------------------------------------------------------------------------
// Shared helpers used by multiple commands
// ---------------------------------------------------------------------------

/// Get the vault passphrase, trying in order:
/// 1. `SECRETARY_PASSPHRASE` env var (scripts/CI)
/// 2. Interactive prompt
///
/// Returns `Zeroizing<String>` so the passphrase is wiped from memory on drop.
pub fn prompt_passphrase() -> Result<Zeroizing<String>> {
    if let Some(pw) = passphrase_from_env(PASSPHRASE_ENV) {
        return Ok(pw);
    }

    let pw = dialoguer::Password::new()
        .with_prompt("Enter vault passphrase")
        .interact()
        .map_err(prompt_error)?;
    Ok(Zeroizing::new(pw))
}

/// Prompt for a new passphrase with confirmation (used by `init` and `rotate`).
///
/// `env_var` is consulted first for scripted usage.  Enforces a minimum
/// passphrase length.
///
/// Returns `Zeroizing<String>` so the passphrase is wiped from memory on drop.
pub fn prompt_new_passphrase(env_var: &str) -> Result<Zeroizing<String>> {
    if let Some(pw) = passphrase_from_env(env_var) {
        if pw.chars().count() < MIN_PASSPHRASE_LEN {
            return Err(SecretaryError::CommandFailed(format!(
                "passphrase must be at least {MIN_PASSPHRASE_LEN} characters"
            )));
        }
        return Ok(pw);
    }

    loop {
        let passphrase = dialoguer::Password::new()
            .with_prompt("Choose vault passphrase")
            .with_confirmation(
                "Confirm vault passphrase",
                "Passphrases do not match, try again",
            )
            .interact()
            .map_err(prompt_error)?;

        if passphrase.chars().count() < MIN_PASSPHRASE_LEN {
            output::warning(&format!(
                "Passphrase must be at least {MIN_PASSPHRASE_LEN} characters. Try again."
            ));
            continue;
        }

        return Ok(Zeroizing::new(passphrase));
    }
}

/// Map a prompt failure; Ctrl-C becomes `UserCancelled`.
fn prompt_error(err: dialoguer::Error) -> SecretaryError {
    match err {
        dialoguer::Error::IO(ref io) if io.kind() == std::io::ErrorKind::Interrupted => {
            SecretaryError::UserCancelled
        }
        other => SecretaryError::CommandFailed(format!("passphrase prompt: {other}")),
    }
}

/// Read a non-empty passphrase from an environment variable.
fn passphrase_from_env(name: &str) -> Option<Zeroizing<String>> {
    std::env::var(name)
        .ok()
        .filter(|pw| !pw.is_empty())
        .map(Zeroizing::new)
}

/// Load settings from the current directory.
pub fn load_settings() -> Result<Settings> {
    let cwd = std::env::current_dir()?;
    Settings::load(&cwd)
}

/// Build the full path to the envelope file from the CLI arguments.
///
/// Example: `<cwd>/.secretary/vault.envelope`
pub fn envelope_path(cli: &Cli, settings: &Settings) -> Result<PathBuf> {
    let cwd = std::env::current_dir()?;
    match &cli.vault_dir {
        Some(dir) => {
            let settings = Settings {
                vault_dir: dir.clone(),
                ..settings.clone()
            };
            Ok(settings.envelope_path(&cwd))
        }
        None => Ok(settings.envelope_path(&cwd)),
    }
}
