//! The `Vault` handle: key state plus encrypt/decrypt.
//!
//! A vault starts *uninitialized* and becomes *keyed* exactly once,
//! when `initialize` derives the key from the master password and the
//! installation salt.  There is no way back short of dropping the
//! handle.  All other operations take `&self` and touch no shared
//! mutable state, so an `Arc<Vault>` can serve many workers.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};
use tracing::debug;
use zeroize::{Zeroize, Zeroizing};

use crate::crypto::encryption::{decrypt, encrypt};
use crate::crypto::kdf::{derive_key_with_params, Pbkdf2Params};
use crate::crypto::keys::DerivedKey;
use crate::errors::{Result, VaultError};

use super::plaintext::Plaintext;
use super::policy::{validate_master_secret, PasswordPolicy};
use super::record::EncryptedRecord;

/// Tunables fixed at construction time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VaultConfig {
    pub kdf: Pbkdf2Params,
    pub policy: PasswordPolicy,
}

/// The two lifecycle states of a vault.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VaultState {
    Uninitialized,
    Keyed,
}

/// A username kept in clear next to its encrypted password.
///
/// The username stays readable so stored credentials can be listed
/// without the master password.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SealedCredentials {
    pub username: String,
    pub password: EncryptedRecord,
}

/// Password-keyed authenticated encryption of small secrets.
pub struct Vault {
    config: VaultConfig,
    key: OnceLock<DerivedKey>,
}

impl Default for Vault {
    fn default() -> Self {
        Self::new(VaultConfig::default())
    }
}

impl Vault {
    /// Create an uninitialized vault.
    pub fn new(config: VaultConfig) -> Self {
        Self {
            config,
            key: OnceLock::new(),
        }
    }

    pub fn config(&self) -> &VaultConfig {
        &self.config
    }

    pub fn state(&self) -> VaultState {
        if self.key.get().is_some() {
            VaultState::Keyed
        } else {
            VaultState::Uninitialized
        }
    }

    pub fn is_keyed(&self) -> bool {
        self.state() == VaultState::Keyed
    }

    // ------------------------------------------------------------------
    // Initialization
    // ------------------------------------------------------------------

    /// Derive the key from `master_secret` + `salt` and enter the keyed state.
    ///
    /// The password policy is checked before any derivation work.
    /// This blocks for the full PBKDF2 cost; call it once per process.
    pub fn initialize(&self, master_secret: &str, salt: &[u8]) -> Result<()> {
        if self.key.get().is_some() {
            return Err(VaultError::AlreadyInitialized);
        }

        validate_master_secret(master_secret, &self.config.policy)?;

        debug!(
            iterations = self.config.kdf.iterations,
            salt_len = salt.len(),
            "deriving vault key"
        );
        let mut key_bytes = derive_key_with_params(master_secret.as_bytes(), salt, &self.config.kdf)?;
        let key = DerivedKey::new(key_bytes);
        key_bytes.zeroize();

        // Another caller may have won the race while we were deriving.
        self.key
            .set(key)
            .map_err(|_| VaultError::AlreadyInitialized)?;

        debug!("vault keyed");
        Ok(())
    }

    fn key(&self) -> Result<&DerivedKey> {
        self.key.get().ok_or(VaultError::NotInitialized)
    }

    // ------------------------------------------------------------------
    // Encrypt / decrypt
    // ------------------------------------------------------------------

    /// Encrypt a plaintext into a fresh record.
    pub fn encrypt(&self, plaintext: &Plaintext) -> Result<EncryptedRecord> {
        self.encrypt_with_context(plaintext, "")
    }

    /// Encrypt a plaintext, binding `context` as associated data.
    ///
    /// The record only decrypts when the same `context` is supplied.
    pub fn encrypt_with_context(
        &self,
        plaintext: &Plaintext,
        context: &str,
    ) -> Result<EncryptedRecord> {
        let key = self.key()?;
        let payload = Zeroizing::new(plaintext.to_canonical_bytes()?);
        let sealed = encrypt(key.as_bytes(), &payload, context.as_bytes())?;
        Ok(EncryptedRecord::seal(sealed))
    }

    /// Decrypt a record produced by `encrypt`.
    pub fn decrypt(&self, record: &EncryptedRecord) -> Result<Plaintext> {
        self.decrypt_with_context(record, "")
    }

    /// Decrypt a record produced by `encrypt_with_context`.
    pub fn decrypt_with_context(
        &self,
        record: &EncryptedRecord,
        context: &str,
    ) -> Result<Plaintext> {
        let key = self.key()?;
        let payload = Zeroizing::new(decrypt(key.as_bytes(), record.sealed(), context.as_bytes())?);
        Plaintext::from_canonical_bytes(&payload)
    }

    // ------------------------------------------------------------------
    // Convenience wrappers
    // ------------------------------------------------------------------

    pub fn encrypt_str(&self, value: &str) -> Result<EncryptedRecord> {
        self.encrypt(&Plaintext::from(value))
    }

    /// Decrypt a record that must hold text.
    pub fn decrypt_str(&self, record: &EncryptedRecord) -> Result<Zeroizing<String>> {
        self.decrypt(record).and_then(expect_text)
    }

    /// Encrypt a flat string mapping.
    pub fn encrypt_map(&self, map: &BTreeMap<String, String>) -> Result<EncryptedRecord> {
        self.encrypt(&Plaintext::from_pairs(
            map.iter().map(|(k, v)| (k.as_str(), v.as_str())),
        ))
    }

    /// Decrypt a record that must hold a mapping.
    pub fn decrypt_map(&self, record: &EncryptedRecord) -> Result<BTreeMap<String, Plaintext>> {
        match self.decrypt(record)? {
            Plaintext::Map(map) => Ok(map),
            _ => Err(VaultError::InvalidFormat(
                "record does not hold a mapping".into(),
            )),
        }
    }

    /// Seal a password next to its clear-text username.
    pub fn encrypt_credentials(&self, username: &str, password: &str) -> Result<SealedCredentials> {
        self.encrypt_credentials_with_context(username, password, "")
    }

    pub fn encrypt_credentials_with_context(
        &self,
        username: &str,
        password: &str,
        context: &str,
    ) -> Result<SealedCredentials> {
        if username.is_empty() {
            return Err(VaultError::Validation("username cannot be empty".into()));
        }
        Ok(SealedCredentials {
            username: username.to_string(),
            password: self.encrypt_with_context(&Plaintext::from(password), context)?,
        })
    }

    /// Open sealed credentials, returning `(username, password)`.
    pub fn decrypt_credentials(
        &self,
        sealed: &SealedCredentials,
    ) -> Result<(String, Zeroizing<String>)> {
        self.decrypt_credentials_with_context(sealed, "")
    }

    pub fn decrypt_credentials_with_context(
        &self,
        sealed: &SealedCredentials,
        context: &str,
    ) -> Result<(String, Zeroizing<String>)> {
        if sealed.username.is_empty() {
            return Err(VaultError::InvalidFormat(
                "credentials are missing a username".into(),
            ));
        }
        let password = self
            .decrypt_with_context(&sealed.password, context)
            .and_then(expect_text)?;
        Ok((sealed.username.clone(), password))
    }
}

impl std::fmt::Debug for Vault {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Vault")
            .field("config", &self.config)
            .field("state", &self.state())
            .finish()
    }
}

fn expect_text(plaintext: Plaintext) -> Result<Zeroizing<String>> {
    match plaintext {
        Plaintext::Text(s) => Ok(Zeroizing::new(s)),
        _ => Err(VaultError::InvalidFormat(
            "record does not hold text".into(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::kdf::MIN_ITERATIONS;

    const SECRET: &str = "correct-horse-battery-staple";

    fn fast_config() -> VaultConfig {
        VaultConfig {
            kdf: Pbkdf2Params {
                iterations: MIN_ITERATIONS,
            },
            ..VaultConfig::default()
        }
    }

    fn keyed() -> Vault {
        let vault = Vault::new(fast_config());
        vault.initialize(SECRET, &[0x5Au8; 32]).unwrap();
        vault
    }

    #[test]
    fn starts_uninitialized() {
        let vault = Vault::new(fast_config());
        assert_eq!(vault.state(), VaultState::Uninitialized);
        assert!(matches!(
            vault.encrypt_str("x"),
            Err(VaultError::NotInitialized)
        ));
    }

    #[test]
    fn initialize_twice_is_a_state_error() {
        let vault = keyed();
        let err = vault.initialize(SECRET, &[0x5Au8; 32]).unwrap_err();
        assert!(err.is_state_error());
        assert!(vault.is_keyed());
    }

    #[test]
    fn policy_failure_leaves_vault_uninitialized() {
        let vault = Vault::new(fast_config());
        let err = vault.initialize("too-short", &[0x5Au8; 32]).unwrap_err();
        assert!(matches!(err, VaultError::Validation(_)));
        assert_eq!(vault.state(), VaultState::Uninitialized);
    }

    #[test]
    fn decrypt_str_rejects_map_record() {
        let vault = keyed();
        let record = vault
            .encrypt(&Plaintext::from_pairs([("k", "v")]))
            .unwrap();
        assert!(matches!(
            vault.decrypt_str(&record),
            Err(VaultError::InvalidFormat(_))
        ));
    }

    #[test]
    fn credentials_keep_username_in_clear() {
        let vault = keyed();
        let sealed = vault.encrypt_credentials("john", "secret123").unwrap();
        assert_eq!(sealed.username, "john");
        let (user, pw) = vault.decrypt_credentials(&sealed).unwrap();
        assert_eq!(user, "john");
        assert_eq!(pw.as_str(), "secret123");
    }

    #[test]
    fn empty_username_is_rejected() {
        let vault = keyed();
        assert!(vault.encrypt_credentials("", "pw").is_err());
    }

    #[test]
    fn debug_does_not_leak_key() {
        let vault = keyed();
        let shown = format!("{vault:?}");
        assert!(shown.contains("Keyed"));
        assert!(!shown.contains("DerivedKey"));
    }

    #[test]
    fn vault_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Vault>();
    }
}
