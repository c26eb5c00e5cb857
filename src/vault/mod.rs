//! Vault module: password-keyed encryption of credentials.
//!
//! This module provides:
//! - The `Vault` handle and its two-state lifecycle (`handle`)
//! - The `Plaintext` value type with canonical encoding (`plaintext`)
//! - The `EncryptedRecord` envelope and its base64 token (`record`)
//! - Master password policy checks (`policy`)
//! - The installation keystore file with salt and verifier (`keystore`)

pub mod handle;
pub mod keystore;
pub mod plaintext;
pub mod policy;
pub mod record;

// Re-export the most commonly used items.
pub use handle::{SealedCredentials, Vault, VaultConfig, VaultState};
pub use keystore::{Keystore, KeystoreFile};
pub use plaintext::{Plaintext, MAX_NESTING_DEPTH};
pub use policy::{complexity_report, validate_master_secret, PasswordPolicy};
pub use record::EncryptedRecord;
