//! Integration tests for the keystore and per-agent credential files.

use std::fs;

use credvault::config::Settings;
use credvault::credentials::{CredentialStore, Platform};
use credvault::crypto::kdf::MIN_ITERATIONS;
use credvault::errors::VaultError;
use credvault::vault::Keystore;
use tempfile::TempDir;

const MASTER: &str = "Tr0ub4dor&3-LongEnoughPass!";

/// Helper: settings that keep PBKDF2 and Argon2 at their floor.
fn fast_settings() -> Settings {
    Settings {
        kdf_iterations: MIN_ITERATIONS,
        argon2_memory_kib: 8_192,
        argon2_iterations: 1,
        ..Settings::default()
    }
}

#[test]
fn credentials_survive_a_restart() {
    let tmp = TempDir::new().unwrap();
    let settings = fast_settings();
    let keystore_path = settings.keystore_path(tmp.path());
    let store = CredentialStore::new(settings.agents_dir(tmp.path()));

    // First "process": create the keystore and store two logins.
    {
        let keystore = Keystore::create(&keystore_path, MASTER, &settings).unwrap();
        let vault = keystore.unlock(MASTER).unwrap();

        let mut creds = store.load("reels").unwrap();
        creds
            .set_credential(&vault, Platform::Instagram, "techie", "p@ss1")
            .unwrap();
        creds
            .set_credential(&vault, Platform::Youtube, "techie.tv", "yt-pass")
            .unwrap();
        store.save(&creds).unwrap();
    }

    // Second "process": load everything from disk again.
    let keystore = Keystore::load(&keystore_path).unwrap();
    let vault = keystore.unlock(MASTER).unwrap();
    let creds = store.load("reels").unwrap();

    let (user, pw) = creds.credential(&vault, Platform::Instagram).unwrap();
    assert_eq!((user.as_str(), pw.as_str()), ("techie", "p@ss1"));
    let (user, pw) = creds.credential(&vault, Platform::Youtube).unwrap();
    assert_eq!((user.as_str(), pw.as_str()), ("techie.tv", "yt-pass"));
}

#[test]
fn wrong_master_password_never_reaches_ciphertext() {
    let tmp = TempDir::new().unwrap();
    let settings = fast_settings();
    let keystore =
        Keystore::create(&settings.keystore_path(tmp.path()), MASTER, &settings).unwrap();

    assert!(matches!(
        keystore.unlock("wrong-password-2025!!"),
        Err(VaultError::AuthenticationFailed)
    ));
}

#[test]
fn stored_file_holds_no_plaintext_password() {
    let tmp = TempDir::new().unwrap();
    let settings = fast_settings();
    let keystore =
        Keystore::create(&settings.keystore_path(tmp.path()), MASTER, &settings).unwrap();
    let vault = keystore.unlock(MASTER).unwrap();

    let store = CredentialStore::new(settings.agents_dir(tmp.path()));
    let mut creds = store.load("reels").unwrap();
    creds
        .set_credential(&vault, Platform::Tiktok, "techie", "very-unique-password-xyz")
        .unwrap();
    store.save(&creds).unwrap();

    let raw = fs::read_to_string(store.agent_path("reels").unwrap()).unwrap();
    assert!(raw.contains("\"username\": \"techie\""));
    assert!(!raw.contains("very-unique-password-xyz"));

    let keystore_raw = fs::read_to_string(keystore.path()).unwrap();
    assert!(!keystore_raw.contains(MASTER));
}

#[test]
fn tampered_credential_file_fails_authentication() {
    let tmp = TempDir::new().unwrap();
    let settings = fast_settings();
    let keystore =
        Keystore::create(&settings.keystore_path(tmp.path()), MASTER, &settings).unwrap();
    let vault = keystore.unlock(MASTER).unwrap();

    let store = CredentialStore::new(settings.agents_dir(tmp.path()));
    let mut creds = store.load("reels").unwrap();
    creds
        .set_credential(&vault, Platform::Linkedin, "techie", "p@ss1")
        .unwrap();
    store.save(&creds).unwrap();

    // Swap the password token for one sealed under a different slot.
    let foreign = vault.encrypt_str("attacker-chosen").unwrap();
    let path = store.agent_path("reels").unwrap();
    let mut json: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    json["platforms"]["linkedin"]["password"] = serde_json::Value::String(foreign.to_token());
    fs::write(&path, serde_json::to_vec(&json).unwrap()).unwrap();

    let reloaded = store.load("reels").unwrap();
    assert!(matches!(
        reloaded.credential(&vault, Platform::Linkedin),
        Err(VaultError::AuthenticationFailed)
    ));
}

#[test]
fn keystore_respects_policy_from_settings() {
    let tmp = TempDir::new().unwrap();
    let settings = Settings {
        require_complexity: true,
        ..fast_settings()
    };
    let path = settings.keystore_path(tmp.path());

    assert!(matches!(
        Keystore::create(&path, "all-lowercase-but-long-enough", &settings),
        Err(VaultError::Validation(_))
    ));
    assert!(Keystore::create(&path, MASTER, &settings).is_ok());
}
