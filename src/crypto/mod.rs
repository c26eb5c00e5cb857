//! Cryptographic primitives for credvault.
//!
//! This module provides:
//! - AES-256-GCM encryption and decryption (`encryption`)
//! - PBKDF2-HMAC-SHA256 password-based key derivation (`kdf`)
//! - The zeroizing `DerivedKey` holder (`keys`)
//! - Argon2id password hashes and password generation (`password`)

pub mod encryption;
pub mod kdf;
pub mod keys;
pub mod password;

// Re-export the most commonly used items so callers can write:
//   use crate::crypto::{encrypt, decrypt, derive_key, ...};
pub use encryption::{decrypt, encrypt};
pub use kdf::{derive_key, derive_key_with_params, generate_salt, Pbkdf2Params};
pub use keys::DerivedKey;
pub use password::{
    generate_password, hash_password, hash_password_with_params, verify_password, Argon2Params,
};
