//! The per-installation keystore file.
//!
//! `keystore.json` holds everything needed to re-derive the vault key
//! after a restart, and nothing secret:
//!
//! ```json
//! {"version":1,"salt":"<base64>","kdf_iterations":480000,
//!  "verifier":"$argon2id$...","created_at":"..."}
//! ```
//!
//! The verifier is an Argon2id hash of the master password.  It lets
//! `unlock` reject a wrong password before spending the PBKDF2 cost.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::Settings;
use crate::crypto::kdf::{generate_salt, Pbkdf2Params};
use crate::crypto::password::{hash_password_with_params, verify_password};
use crate::errors::{Result, VaultError};

use super::handle::{Vault, VaultConfig};
use super::policy::{validate_master_secret, PasswordPolicy};
use super::record::{base64_decode, base64_encode};

/// Current keystore format version.
pub const KEYSTORE_VERSION: u8 = 1;

/// On-disk contents of `keystore.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeystoreFile {
    pub version: u8,

    /// PBKDF2 salt (base64 in JSON).
    #[serde(serialize_with = "base64_encode", deserialize_with = "base64_decode")]
    pub salt: Vec<u8>,

    /// Rounds used at creation, so unlock derives the same key.
    pub kdf_iterations: u32,

    /// Argon2id PHC hash of the master password.
    pub verifier: String,

    pub created_at: DateTime<Utc>,
}

/// A loaded keystore.
#[derive(Debug)]
pub struct Keystore {
    path: PathBuf,
    file: KeystoreFile,
}

impl Keystore {
    /// Create a new keystore file at `path`.
    ///
    /// The master password is checked against the configured policy
    /// before anything is hashed or written.
    pub fn create(path: &Path, master_secret: &str, settings: &Settings) -> Result<Self> {
        if path.exists() {
            return Err(VaultError::KeystoreAlreadyExists(path.to_path_buf()));
        }

        settings.validate()?;
        validate_master_secret(master_secret, &settings.password_policy())?;

        let file = KeystoreFile {
            version: KEYSTORE_VERSION,
            salt: generate_salt().to_vec(),
            kdf_iterations: settings.kdf_iterations,
            verifier: hash_password_with_params(master_secret, &settings.argon2_params())?,
            created_at: Utc::now(),
        };

        let bytes = serde_json::to_vec_pretty(&file)
            .map_err(|e| VaultError::SerializationError(format!("keystore: {e}")))?;
        write_private_file(path, &bytes)?;
        info!(path = %path.display(), "keystore created");

        Ok(Self {
            path: path.to_path_buf(),
            file,
        })
    }

    /// Load an existing keystore file.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(VaultError::KeystoreNotFound(path.to_path_buf()));
        }

        let data = fs::read(path)?;
        let file: KeystoreFile = serde_json::from_slice(&data)
            .map_err(|e| VaultError::InvalidFormat(format!("keystore JSON: {e}")))?;

        if file.version != KEYSTORE_VERSION {
            return Err(VaultError::InvalidFormat(format!(
                "unsupported keystore version {}, expected {KEYSTORE_VERSION}",
                file.version
            )));
        }

        Ok(Self {
            path: path.to_path_buf(),
            file,
        })
    }

    /// Check a master password against the stored verifier.
    pub fn verify(&self, master_secret: &str) -> Result<bool> {
        verify_password(master_secret, &self.file.verifier)
    }

    /// Verify `master_secret` and return a keyed vault.
    ///
    /// A wrong password fails with `AuthenticationFailed` before any
    /// PBKDF2 work is done.  The stored iteration count is used, not
    /// the current setting, so older keystores keep working.
    ///
    /// The master password policy is not applied here.  It gates new
    /// keystores only, so tightening it later never locks out a
    /// keystore whose verifier accepts the password.
    pub fn unlock(&self, master_secret: &str) -> Result<Vault> {
        if !self.verify(master_secret)? {
            return Err(VaultError::AuthenticationFailed);
        }

        let vault = Vault::new(VaultConfig {
            kdf: Pbkdf2Params {
                iterations: self.file.kdf_iterations,
            },
            policy: PasswordPolicy {
                min_length: 1,
                ..PasswordPolicy::default()
            },
        });
        vault.initialize(master_secret, &self.file.salt)?;
        Ok(vault)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn salt(&self) -> &[u8] {
        &self.file.salt
    }

    pub fn kdf_iterations(&self) -> u32 {
        self.file.kdf_iterations
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.file.created_at
    }
}

/// Write `bytes` to `path` atomically, owner-only on Unix.
///
/// The data goes to a temp file in the same directory first and is
/// then renamed over the target, so readers never see a half-written
/// file.  The temp file is created with mode 0600, never chmod'ed
/// after the fact.
pub(crate) fn write_private_file(path: &Path, bytes: &[u8]) -> Result<()> {
    let parent = path.parent().unwrap_or(Path::new("."));
    if !parent.as_os_str().is_empty() && !parent.exists() {
        fs::create_dir_all(parent)?;
    }

    let tmp_path = parent.join(format!(
        ".{}.tmp",
        path.file_name().unwrap_or_default().to_string_lossy()
    ));

    // A leftover from a crashed write may carry other permissions.
    if tmp_path.exists() {
        fs::remove_file(&tmp_path)?;
    }

    let mut options = OpenOptions::new();
    options.write(true).create_new(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }

    let mut file = options.open(&tmp_path)?;
    file.write_all(bytes)?;
    file.sync_all()?;
    drop(file);

    fs::rename(&tmp_path, path)?;
    Ok(())
}
