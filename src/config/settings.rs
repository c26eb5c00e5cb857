use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::crypto::kdf::{Pbkdf2Params, MIN_ITERATIONS};
use crate::crypto::password::{Argon2Params, MIN_MEMORY_KIB};
use crate::errors::{Result, VaultError};
use crate::vault::{PasswordPolicy, VaultConfig};

/// Installation-level configuration, loaded from `credvault.toml`
/// inside the data directory.
///
/// Every field has a sensible default so credvault works out-of-the-box
/// without any config file at all.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// PBKDF2 rounds used when a new keystore is created (default: 480 000).
    #[serde(default = "default_kdf_iterations")]
    pub kdf_iterations: u32,

    /// Minimum master password length (default: 20).
    #[serde(default = "default_min_secret_length")]
    pub min_secret_length: usize,

    /// Also require lower/upper case, a digit and a symbol.
    #[serde(default)]
    pub require_complexity: bool,

    /// Argon2 memory cost in KiB for the password verifier (default: 19 MiB).
    #[serde(default = "default_argon2_memory_kib")]
    pub argon2_memory_kib: u32,

    /// Argon2 iteration count (default: 2).
    #[serde(default = "default_argon2_iterations")]
    pub argon2_iterations: u32,

    /// Argon2 parallelism degree (default: 1).
    #[serde(default = "default_argon2_parallelism")]
    pub argon2_parallelism: u32,
}

// ── Serde default helpers ────────────────────────────────────────────

fn default_kdf_iterations() -> u32 {
    crate::crypto::kdf::DEFAULT_ITERATIONS
}

fn default_min_secret_length() -> usize {
    crate::vault::policy::PASSWORD_MIN_LENGTH
}

fn default_argon2_memory_kib() -> u32 {
    19_456
}

fn default_argon2_iterations() -> u32 {
    2
}

fn default_argon2_parallelism() -> u32 {
    1
}

// ── Implementation ───────────────────────────────────────────────────

impl Default for Settings {
    fn default() -> Self {
        Self {
            kdf_iterations: default_kdf_iterations(),
            min_secret_length: default_min_secret_length(),
            require_complexity: false,
            argon2_memory_kib: default_argon2_memory_kib(),
            argon2_iterations: default_argon2_iterations(),
            argon2_parallelism: default_argon2_parallelism(),
        }
    }
}

impl Settings {
    /// Name of the config file we look for in the data directory.
    const FILE_NAME: &'static str = "credvault.toml";

    /// Load settings from `<data_dir>/credvault.toml`.
    ///
    /// If the file does not exist, sensible defaults are returned.
    /// If the file exists but cannot be parsed, or asks for costs below
    /// the crypto floors, an error is returned.
    pub fn load(data_dir: &Path) -> Result<Self> {
        let config_path = data_dir.join(Self::FILE_NAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(&config_path)?;

        let settings: Settings = toml::from_str(&contents).map_err(|e| {
            VaultError::ConfigError(format!("Failed to parse {}: {e}", config_path.display()))
        })?;

        settings.validate()?;
        Ok(settings)
    }

    /// Reject settings that would produce a keystore nobody can unlock.
    pub fn validate(&self) -> Result<()> {
        if self.kdf_iterations < MIN_ITERATIONS {
            return Err(VaultError::ConfigError(format!(
                "kdf_iterations must be at least {MIN_ITERATIONS} (got {})",
                self.kdf_iterations
            )));
        }
        if self.min_secret_length == 0 {
            return Err(VaultError::ConfigError(
                "min_secret_length must be at least 1".into(),
            ));
        }
        if self.argon2_memory_kib < MIN_MEMORY_KIB {
            return Err(VaultError::ConfigError(format!(
                "argon2_memory_kib must be at least {MIN_MEMORY_KIB} (got {})",
                self.argon2_memory_kib
            )));
        }
        Ok(())
    }

    /// Path of the installation keystore: `<data_dir>/keystore.json`.
    pub fn keystore_path(&self, data_dir: &Path) -> PathBuf {
        data_dir.join("keystore.json")
    }

    /// Directory holding one credential file per agent.
    pub fn agents_dir(&self, data_dir: &Path) -> PathBuf {
        data_dir.join("agents")
    }

    pub fn pbkdf2_params(&self) -> Pbkdf2Params {
        Pbkdf2Params {
            iterations: self.kdf_iterations,
        }
    }

    /// Convert the Argon2 settings into crypto-layer params.
    pub fn argon2_params(&self) -> Argon2Params {
        Argon2Params {
            memory_kib: self.argon2_memory_kib,
            iterations: self.argon2_iterations,
            parallelism: self.argon2_parallelism,
        }
    }

    pub fn password_policy(&self) -> PasswordPolicy {
        if self.require_complexity {
            PasswordPolicy::strict(self.min_secret_length)
        } else {
            PasswordPolicy {
                min_length: self.min_secret_length,
                ..PasswordPolicy::default()
            }
        }
    }

    pub fn vault_config(&self) -> VaultConfig {
        VaultConfig {
            kdf: self.pbkdf2_params(),
            policy: self.password_policy(),
        }
    }
}

// ── Tests ────────────────────────────────────────────────────────────
