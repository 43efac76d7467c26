//! Integration tests for the Secretary CLI.
//!
//! These tests exercise the binary end-to-end using `assert_cmd`.
//! Passphrases come from `SECRETARY_PASSPHRASE` so nothing prompts, and
//! every project dir carries a `.secretary.toml` with a tiny PBKDF2
//! base so the runs stay fast.

use assert_cmd::Command;
use assert_fs::prelude::*;
use assert_fs::TempDir;
use predicates::prelude::*;

const PASSPHRASE: &str = "correct horse battery";

/// Helper: get a Command pointing at the secretary binary.
fn secretary() -> Command {
    #[allow(deprecated)]
    let mut cmd = Command::cargo_bin("secretary").expect("binary should exist");
    cmd.env_remove("SECRETARY_PASSPHRASE")
        .env_remove("SECRETARY_NEW_PASSPHRASE")
        .env_remove("RUST_LOG");
    cmd
}

/// Helper: a project dir with fast KDF settings.
fn project() -> TempDir {
    let tmp = TempDir::new().unwrap();
    tmp.child(".secretary.toml")
        .write_str("base_iterations = 16\nseed_bits = 256\n")
        .unwrap();
    tmp
}

/// Helper: a project dir with an initialized vault.
fn initialized() -> TempDir {
    let tmp = project();
    secretary()
        .arg("init")
        .current_dir(tmp.path())
        .env("SECRETARY_PASSPHRASE", PASSPHRASE)
        .assert()
        .success();
    tmp
}

/// Helper: run `generate` and return the printed password.
fn generate(tmp: &TempDir, passphrase: &str, args: &[&str]) -> String {
    let out = secretary()
        .arg("generate")
        .args(args)
        .current_dir(tmp.path())
        .env("SECRETARY_PASSPHRASE", passphrase)
        .output()
        .unwrap();
    assert!(out.status.success(), "generate failed: {out:?}");
    String::from_utf8(out.stdout).unwrap().trim_end().to_string()
}

// ---------------------------------------------------------------------------
// Help and version
// ---------------------------------------------------------------------------

#[test]
fn help_flag_lists_commands() {
    secretary()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Deterministic password generator"))
        .stdout(predicate::str::contains("init"))
        .stdout(predicate::str::contains("generate"))
        .stdout(predicate::str::contains("rotate"))
        .stdout(predicate::str::contains("verify"))
        .stdout(predicate::str::contains("export"))
        .stdout(predicate::str::contains("import"));
}

#[test]
fn version_command_prints_package_version() {
    secretary()
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn no_args_shows_usage() {
    secretary()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn completions_for_bash_mention_the_binary() {
    secretary()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("secretary"));
}

// ---------------------------------------------------------------------------
// init / generate
// ---------------------------------------------------------------------------

#[test]
fn init_writes_envelope_file() {
    let tmp = initialized();
    tmp.child(".secretary/vault.envelope")
        .assert(predicate::path::exists());
}

#[test]
fn init_twice_fails() {
    let tmp = initialized();
    secretary()
        .arg("init")
        .current_dir(tmp.path())
        .env("SECRETARY_PASSPHRASE", PASSPHRASE)
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn init_rejects_short_passphrase() {
    let tmp = project();
    secretary()
        .arg("init")
        .current_dir(tmp.path())
        .env("SECRETARY_PASSPHRASE", "short")
        .assert()
        .failure()
        .stderr(predicate::str::contains("at least 8"));
}

#[test]
fn generate_is_repeatable_and_sized() {
    let tmp = initialized();
    let first = generate(&tmp, PASSPHRASE, &["example.com", "alice"]);
    let second = generate(&tmp, PASSPHRASE, &["example.com", "alice"]);
    assert_eq!(first, second);
    assert_eq!(first.chars().count(), 16);

    let revised = generate(&tmp, PASSPHRASE, &["example.com", "alice", "-r", "1"]);
    assert_ne!(first, revised);
}

#[test]
fn generate_honors_length_and_strength() {
    let tmp = initialized();
    let pin = generate(&tmp, PASSPHRASE, &["bank", "me", "-l", "6", "-s", "10"]);
    assert_eq!(pin.len(), 6);
    assert!(pin.chars().all(|c| c.is_ascii_digit()));
}

#[test]
fn generate_rejects_unknown_strength() {
    let tmp = initialized();
    secretary()
        .args(["generate", "svc", "me", "-s", "99"])
        .current_dir(tmp.path())
        .env("SECRETARY_PASSPHRASE", PASSPHRASE)
        .assert()
        .failure();
}

#[test]
fn generate_without_vault_fails() {
    let tmp = project();
    secretary()
        .args(["generate", "svc", "me"])
        .current_dir(tmp.path())
        .env("SECRETARY_PASSPHRASE", PASSPHRASE)
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

// ---------------------------------------------------------------------------
// verify / rotate
// ---------------------------------------------------------------------------

#[test]
fn verify_accepts_right_and_rejects_wrong_passphrase() {
    let tmp = initialized();
    secretary()
        .arg("verify")
        .current_dir(tmp.path())
        .env("SECRETARY_PASSPHRASE", PASSPHRASE)
        .assert()
        .success();

    secretary()
        .arg("verify")
        .current_dir(tmp.path())
        .env("SECRETARY_PASSPHRASE", "definitely wrong")
        .assert()
        .failure();
}

#[test]
fn rotate_keeps_generated_passwords() {
    let tmp = initialized();
    let before = generate(&tmp, PASSPHRASE, &["example.com", "alice"]);

    secretary()
        .arg("rotate")
        .current_dir(tmp.path())
        .env("SECRETARY_PASSPHRASE", PASSPHRASE)
        .env("SECRETARY_NEW_PASSPHRASE", "a brand new passphrase")
        .assert()
        .success();

    let after = generate(&tmp, "a brand new passphrase", &["example.com", "alice"]);
    assert_eq!(before, after);

    secretary()
        .arg("verify")
        .current_dir(tmp.path())
        .env("SECRETARY_PASSPHRASE", PASSPHRASE)
        .assert()
        .failure();
}

// ---------------------------------------------------------------------------
// export / import
// ---------------------------------------------------------------------------

#[test]
fn export_then_import_into_another_dir() {
    let source = initialized();
    let password = generate(&source, PASSPHRASE, &["example.com", "alice"]);

    let exported = secretary()
        .arg("export")
        .current_dir(source.path())
        .output()
        .unwrap();
    assert!(exported.status.success());
    let envelope = String::from_utf8(exported.stdout).unwrap();

    let target = project();
    secretary()
        .args(["import", envelope.trim()])
        .current_dir(target.path())
        .env("SECRETARY_PASSPHRASE", PASSPHRASE)
        .assert()
        .success();

    assert_eq!(
        generate(&target, PASSPHRASE, &["example.com", "alice"]),
        password
    );
}

#[test]
fn import_with_wrong_passphrase_writes_nothing() {
    let source = initialized();
    let envelope = std::fs::read_to_string(source.path().join(".secretary/vault.envelope")).unwrap();

    let target = project();
    secretary()
        .args(["import", envelope.trim()])
        .current_dir(target.path())
        .env("SECRETARY_PASSPHRASE", "definitely wrong")
        .assert()
        .failure();

    target
        .child(".secretary/vault.envelope")
        .assert(predicate::path::missing());
}

#[test]
fn import_refuses_to_overwrite_without_force() {
    let tmp = initialized();
    let envelope = std::fs::read_to_string(tmp.path().join(".secretary/vault.envelope")).unwrap();

    secretary()
        .args(["import", envelope.trim()])
        .current_dir(tmp.path())
        .env("SECRETARY_PASSPHRASE", PASSPHRASE)
        .assert()
        .failure();

    secretary()
        .args(["import", "--force", envelope.trim()])
        .current_dir(tmp.path())
        .env("SECRETARY_PASSPHRASE", PASSPHRASE)
        .assert()
        .success();
}

#[test]
fn vault_dir_flag_relocates_the_envelope() {
    let tmp = project();
    secretary()
        .args(["init", "--vault-dir", "keys"])
        .current_dir(tmp.path())
        .env("SECRETARY_PASSPHRASE", PASSPHRASE)
        .assert()
        .success();

    tmp.child("keys/vault.envelope")
        .assert(predicate::path::exists());
    tmp.child(".secretary/vault.envelope")
        .assert(predicate::path::missing());
}
