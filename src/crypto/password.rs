//! Password hashing for verification, and random password generation.
//!
//! Hashes are Argon2id PHC strings
//! (`$argon2id$v=19$m=...,t=...,p=...$<salt>$<hash>`), so the
//! parameters travel with the hash and verification never needs the
//! current settings.  This is separate from key derivation: a hash
//! lets callers check a password without touching any ciphertext.

use argon2::password_hash::{self, PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};
use rand::{Rng, RngCore};
use zeroize::Zeroizing;

use crate::errors::{Result, VaultError};

/// Length of the per-hash random salt in bytes.
const HASH_SALT_LEN: usize = 16;

/// Minimum safe memory cost in KiB (8 MB).
pub const MIN_MEMORY_KIB: u32 = 8_192;

/// Alphabet used by `generate_password`.
pub const GENERATED_PASSWORD_CHARS: &str =
    "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789!;,?._ ";

/// Default length of a generated password.
pub const GENERATED_PASSWORD_LENGTH: usize = 55;

/// Configurable Argon2id parameters for password hashes.
///
/// These map 1:1 to the fields in `Settings`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Argon2Params {
    /// Memory cost in KiB (default: 19 456 = 19 MiB).
    pub memory_kib: u32,
    /// Number of iterations (default: 2).
    pub iterations: u32,
    /// Parallelism lanes (default: 1).
    pub parallelism: u32,
}

impl Default for Argon2Params {
    fn default() -> Self {
        Self {
            memory_kib: 19_456,
            iterations: 2,
            parallelism: 1,
        }
    }
}

impl Argon2Params {
    fn build(&self) -> Result<Argon2<'static>> {
        if self.memory_kib < MIN_MEMORY_KIB {
            return Err(VaultError::KeyDerivationFailed(format!(
                "Argon2 memory_kib must be at least {MIN_MEMORY_KIB} (got {})",
                self.memory_kib
            )));
        }
        let params = Params::new(self.memory_kib, self.iterations, self.parallelism, None)
            .map_err(|e| VaultError::KeyDerivationFailed(format!("invalid Argon2 params: {e}")))?;
        Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
    }
}

/// Hash `password` with the default Argon2id parameters.
pub fn hash_password(password: &str) -> Result<String> {
    hash_password_with_params(password, &Argon2Params::default())
}

/// Hash `password` into a PHC string with a fresh random salt.
///
/// Hashing the same password twice yields different strings.
pub fn hash_password_with_params(password: &str, params: &Argon2Params) -> Result<String> {
    let argon2 = params.build()?;

    let mut salt_bytes = [0u8; HASH_SALT_LEN];
    rand::rng().fill_bytes(&mut salt_bytes);
    let salt = SaltString::encode_b64(&salt_bytes)
        .map_err(|e| VaultError::KeyDerivationFailed(format!("salt encoding failed: {e}")))?;

    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| VaultError::KeyDerivationFailed(format!("Argon2id hashing failed: {e}")))?;

    Ok(hash.to_string())
}

/// Check `password` against a PHC string produced by `hash_password`.
///
/// Returns `Ok(false)` on a mismatch.  The comparison inside the
/// Argon2 verifier is constant time.  A string that is not a valid
/// PHC hash is a format error.
pub fn verify_password(password: &str, phc: &str) -> Result<bool> {
    let parsed = PasswordHash::new(phc)
        .map_err(|e| VaultError::InvalidFormat(format!("password hash: {e}")))?;

    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(password_hash::Error::Password) => Ok(false),
        Err(e) => Err(VaultError::InvalidFormat(format!("password hash: {e}"))),
    }
}

/// Generate a random password of `length` characters.
pub fn generate_password(length: usize) -> Zeroizing<String> {
    let alphabet: Vec<char> = GENERATED_PASSWORD_CHARS.chars().collect();
    let mut rng = rand::rng();
    let password: String = (0..length)
        .map(|_| alphabet[rng.random_range(0..alphabet.len())])
        .collect();
    Zeroizing::new(password)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_and_verify() {
        let hash = hash_password("mypassword").unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password("mypassword", &hash).unwrap());
        assert!(!verify_password("wrong_password", &hash).unwrap());
    }

    #[test]
    fn hashes_are_salted() {
        let hash1 = hash_password("mypassword").unwrap();
        let hash2 = hash_password("mypassword").unwrap();
        assert_ne!(hash1, hash2);
        assert!(verify_password("mypassword", &hash1).unwrap());
        assert!(verify_password("mypassword", &hash2).unwrap());
    }

    #[test]
    fn verify_rejects_garbage_hash() {
        assert!(matches!(
            verify_password("pw", "not-a-phc-string"),
            Err(VaultError::InvalidFormat(_))
        ));
    }

    #[test]
    fn weak_memory_cost_is_rejected() {
        let params = Argon2Params {
            memory_kib: 1_024,
            ..Argon2Params::default()
        };
        assert!(hash_password_with_params("pw", &params).is_err());
    }

    #[test]
    fn generated_password_uses_alphabet() {
        let pw = generate_password(GENERATED_PASSWORD_LENGTH);
        assert_eq!(pw.chars().count(), GENERATED_PASSWORD_LENGTH);
        assert!(pw.chars().all(|c| GENERATED_PASSWORD_CHARS.contains(c)));
        assert_ne!(*pw, *generate_password(GENERATED_PASSWORD_LENGTH));
    }
}
