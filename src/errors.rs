use std::path::PathBuf;
use thiserror::Error;

/// All errors that can occur in credvault.
#[derive(Debug, Error)]
pub enum VaultError {
    // --- State errors ---
    #[error("Vault is not initialized — supply the master password first")]
    NotInitialized,

    #[error("Vault is already initialized for this process")]
    AlreadyInitialized,

    // --- Crypto errors ---
    #[error("Authentication failed — wrong master password or tampered data")]
    AuthenticationFailed,

    #[error("Invalid record format: {0}")]
    InvalidFormat(String),

    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),

    #[error("Key derivation failed: {0}")]
    KeyDerivationFailed(String),

    // --- Policy errors ---
    #[error("Validation failed: {0}")]
    Validation(String),

    // --- Keystore errors ---
    #[error("Keystore not found at {0} — run `credvault init` first")]
    KeystoreNotFound(PathBuf),

    #[error("Keystore already exists at {0}")]
    KeystoreAlreadyExists(PathBuf),

    // --- Credential store errors ---
    #[error("No {platform} credentials stored for agent '{agent}'")]
    CredentialNotFound { agent: String, platform: String },

    // --- Config errors ---
    #[error("Config file error: {0}")]
    ConfigError(String),

    // --- IO errors ---
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // --- Serialization errors ---
    #[error("Serialization error: {0}")]
    SerializationError(String),

    // --- CLI errors ---
    #[error("Command failed: {0}")]
    CommandFailed(String),
}

impl VaultError {
    /// `true` for errors caused by using the vault in the wrong state.
    pub fn is_state_error(&self) -> bool {
        matches!(self, Self::NotInitialized | Self::AlreadyInitialized)
    }
}

/// Convenience type alias for credvault results.
pub type Result<T> = std::result::Result<T, VaultError>;
