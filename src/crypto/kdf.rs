//! Password-based key derivation using PBKDF2-HMAC-SHA256.
//!
//! The iteration count is deliberately high (480 000 rounds by default)
//! so that guessing the master password offline stays expensive.  The
//! count is configurable via `Pbkdf2Params` (loaded from
//! `credvault.toml` or the default) but can never drop below
//! `MIN_ITERATIONS`.

use hmac::Hmac;
use rand::RngCore;
use sha2::Sha256;

use crate::errors::{Result, VaultError};

/// Length of a freshly generated salt in bytes (256 bits).
pub const SALT_LEN: usize = 32;

/// Shortest salt accepted for derivation.
pub const MIN_SALT_LEN: usize = 16;

/// Length of the derived key in bytes (256 bits, for AES-256).
pub const KEY_LEN: usize = 32;

/// Default PBKDF2 round count.
pub const DEFAULT_ITERATIONS: u32 = 480_000;

/// Lowest round count accepted for derivation.
pub const MIN_ITERATIONS: u32 = 100_000;

/// Configurable PBKDF2 parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pbkdf2Params {
    /// Number of HMAC-SHA256 rounds (default: 480 000).
    pub iterations: u32,
}

impl Default for Pbkdf2Params {
    fn default() -> Self {
        Self {
            iterations: DEFAULT_ITERATIONS,
        }
    }
}

/// Derive a 32-byte key from a password and salt with the default rounds.
pub fn derive_key(password: &[u8], salt: &[u8]) -> Result<[u8; KEY_LEN]> {
    derive_key_with_params(password, salt, &Pbkdf2Params::default())
}

/// Derive a 32-byte key with explicit PBKDF2 parameters.
///
/// The same password + salt + params will always produce the same key.
pub fn derive_key_with_params(
    password: &[u8],
    salt: &[u8],
    params: &Pbkdf2Params,
) -> Result<[u8; KEY_LEN]> {
    if password.is_empty() {
        return Err(VaultError::KeyDerivationFailed(
            "master password cannot be empty".into(),
        ));
    }
    if salt.len() < MIN_SALT_LEN {
        return Err(VaultError::KeyDerivationFailed(format!(
            "salt must be at least {MIN_SALT_LEN} bytes (got {})",
            salt.len()
        )));
    }
    if params.iterations < MIN_ITERATIONS {
        return Err(VaultError::KeyDerivationFailed(format!(
            "PBKDF2 iterations must be at least {MIN_ITERATIONS} (got {})",
            params.iterations
        )));
    }

    let mut key = [0u8; KEY_LEN];
    pbkdf2::pbkdf2::<Hmac<Sha256>>(password, salt, params.iterations, &mut key)
        .map_err(|e| VaultError::KeyDerivationFailed(format!("PBKDF2 failed: {e}")))?;

    Ok(key)
}

/// Generate a cryptographically random 32-byte salt.
pub fn generate_salt() -> [u8; SALT_LEN] {
    let mut salt = [0u8; SALT_LEN];
    rand::rng().fill_bytes(&mut salt);
    salt
}
