//! Integration tests for the Secretary vault: lifecycle, derivation and
//! rotation.

use secretary::charset::strength::{DIGITS, LOWERCASE, SYMBOLS_29, UPPERCASE};
use secretary::vault::decode_envelope;
use secretary::{SecretaryError, Strength, Vault, VaultParams};

/// Helper: a registered vault with a cheap KDF.
fn registered(passphrase: &str) -> Vault {
    let mut vault = Vault::new(VaultParams {
        base_iterations: 16,
        ..VaultParams::default()
    });
    vault.unlock(passphrase, None).expect("register vault");
    vault
}

// ---------------------------------------------------------------------------
// Determinism and sensitivity
// ---------------------------------------------------------------------------

#[test]
fn generate_is_deterministic() {
    let vault = registered("passphrase");
    let a = vault
        .generate("example.com", "alice", 0, 16, Strength::Symbols29)
        .unwrap();
    let b = vault
        .generate("example.com", "alice", 0, 16, Strength::Symbols29)
        .unwrap();
    assert_eq!(a, b);
}

#[test]
fn every_identity_field_changes_the_output() {
    let vault = registered("passphrase");
    let s = Strength::Alphanumeric;
    let base = vault.generate("example.com", "alice", 0, 20, s).unwrap();

    assert_ne!(base, vault.generate("example.org", "alice", 0, 20, s).unwrap());
    assert_ne!(base, vault.generate("example.com", "bob", 0, 20, s).unwrap());
    assert_ne!(base, vault.generate("example.com", "alice", 1, 20, s).unwrap());
    // Length is part of the context, so the shorter password is not a prefix.
    let shorter = vault.generate("example.com", "alice", 0, 19, s).unwrap();
    assert_ne!(&base[..19], shorter.as_str());
}

#[test]
fn numeric_and_string_revisions_agree() {
    let vault = registered("passphrase");
    let s = Strength::default();
    assert_eq!(
        vault.generate("svc", "me", 7, 16, s).unwrap(),
        vault.generate("svc", "me", "7", 16, s).unwrap()
    );
}

#[test]
fn different_vaults_derive_different_passwords() {
    let a = registered("passphrase");
    let b = registered("passphrase");
    assert_ne!(
        a.generate("svc", "me", 0, 16, Strength::default()).unwrap(),
        b.generate("svc", "me", 0, 16, Strength::default()).unwrap()
    );
}

// ---------------------------------------------------------------------------
// Output shape
// ---------------------------------------------------------------------------

#[test]
fn output_length_and_charset_follow_the_request() {
    let vault = registered("passphrase");
    for strength in Strength::ALL {
        let alphabet = strength.alphabet();
        for length in [1, 2, 5, 12, 64] {
            let pw = vault.generate("svc", "me", 0, length, strength).unwrap();
            assert_eq!(pw.chars().count(), length, "{strength} / {length}");
            assert!(
                pw.chars().all(|c| alphabet.contains(c)),
                "{pw:?} escapes the {strength} alphabet"
            );
        }
    }
}

#[test]
fn strength_91_covers_every_class() {
    let vault = registered("passphrase");
    for service in ["a.example", "b.example", "c.example", "d.example"] {
        let pw = vault
            .generate(service, "me", 0, 12, Strength::Symbols29)
            .unwrap();
        for class in [DIGITS, LOWERCASE, UPPERCASE, SYMBOLS_29] {
            assert!(
                pw.chars().any(|c| class.contains(c)),
                "{pw:?} has no character from {class:?}"
            );
        }
    }
}

#[test]
fn no_character_repeats_back_to_back() {
    let vault = registered("passphrase");
    for strength in Strength::ALL {
        let pw = vault.generate("svc", "me", 0, 200, strength).unwrap();
        let chars: Vec<char> = pw.chars().collect();
        assert!(
            chars.windows(2).all(|w| w[0] != w[1]),
            "{pw:?} repeats a character"
        );
    }
}

#[test]
fn unknown_strength_code_is_rejected() {
    assert!(matches!(
        Strength::try_from(99u8),
        Err(SecretaryError::InvalidParameter(_))
    ));
}

#[test]
fn zero_length_is_rejected() {
    let vault = registered("passphrase");
    assert!(matches!(
        vault.generate("svc", "me", 0, 0, Strength::default()),
        Err(SecretaryError::InvalidParameter(_))
    ));
}

// ---------------------------------------------------------------------------
// Envelope round-trip and rotation
// ---------------------------------------------------------------------------

#[test]
fn register_encode_reset_unlock_round_trip() {
    let mut vault = registered("passphrase");
    let secret = vault
        .generate("example.com", "alice", 3, 16, Strength::default())
        .unwrap();
    let envelope = vault.encode(None).unwrap();

    vault.reset();
    assert!(!vault.is_unlocked());

    vault.unlock("passphrase", Some(&envelope)).unwrap();
    assert_eq!(
        vault
            .generate("example.com", "alice", 3, 16, Strength::default())
            .unwrap(),
        secret
    );
}

#[test]
fn default_envelope_holds_a_1024_bit_seed() {
    let mut vault = registered("passphrase");
    let parts = decode_envelope(&vault.encode(None).unwrap()).unwrap();
    assert_eq!(parts.cipher.len(), 128 + 16);
}

#[test]
fn encode_without_rotation_is_stable() {
    let mut vault = registered("passphrase");
    assert_eq!(vault.encode(None).unwrap(), vault.encode(None).unwrap());
}

#[test]
fn wrong_passphrase_fails_and_leaves_vault_locked() {
    let mut vault = registered("passphrase");
    let envelope = vault.encode(None).unwrap();

    let result = vault.unlock("not the passphrase", Some(&envelope));
    assert!(matches!(result, Err(SecretaryError::Authentication)));
    assert!(!vault.is_unlocked());
}

#[test]
fn malformed_envelope_fails_and_leaves_vault_locked() {
    let mut vault = registered("passphrase");
    let result = vault.unlock("passphrase", Some("not base64 at all!"));
    assert!(matches!(result, Err(SecretaryError::InvalidEnvelope(_))));
    assert!(!vault.is_unlocked());
}

#[test]
fn rotation_keeps_passwords_and_changes_envelope() {
    let mut vault = registered("old passphrase");
    let secret = vault
        .generate("example.com", "alice", 0, 24, Strength::Symbols33)
        .unwrap();
    let before = vault.encode(None).unwrap();

    let after = vault.encode(Some("new passphrase")).unwrap();
    assert_ne!(before, after);

    // Salt survives rotation; cipher and IV do not.
    let (old, new) = (
        decode_envelope(&before).unwrap(),
        decode_envelope(&after).unwrap(),
    );
    assert_eq!(old.salt, new.salt);
    assert_ne!(old.iv, new.iv);

    // The live vault already uses the new key.
    assert_eq!(vault.encode(None).unwrap(), after);

    vault.reset();
    assert!(vault.unlock("old passphrase", Some(&after)).is_err());
    vault.unlock("new passphrase", Some(&after)).unwrap();
    assert_eq!(
        vault
            .generate("example.com", "alice", 0, 24, Strength::Symbols33)
            .unwrap(),
        secret
    );
}

#[test]
fn independent_vaults_do_not_share_state() {
    let a = registered("alpha passphrase");
    let mut b = registered("beta passphrase");
    b.reset();

    assert!(a.is_unlocked());
    assert!(!b.is_unlocked());
    assert!(a.generate("svc", "me", 0, 8, Strength::Numeric).is_ok());
    assert!(matches!(
        b.generate("svc", "me", 0, 8, Strength::Numeric),
        Err(SecretaryError::Locked)
    ));
}

#[test]
fn envelope_opened_with_other_base_iterations_fails() {
    let mut vault = registered("passphrase");
    let envelope = vault.encode(None).unwrap();

    let mut other = Vault::new(VaultParams {
        base_iterations: 17,
        ..VaultParams::default()
    });
    assert!(matches!(
        other.unlock("passphrase", Some(&envelope)),
        Err(SecretaryError::Authentication)
    ));
}
