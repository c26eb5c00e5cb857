//! AES-256-GCM authenticated encryption.
//!
//! Each call to `encrypt` generates a fresh random 12-byte nonce and
//! prepends it to the ciphertext.  `decrypt` splits the nonce back out
//! before decrypting.  Optional associated data is authenticated but
//! not stored; the same bytes must be supplied again to decrypt.
//!
//! Layout of the returned byte buffer:
//!   [ 12-byte nonce | ciphertext + 16-byte auth tag ]

use aes_gcm::aead::{Aead, KeyInit, OsRng, Payload};
use aes_gcm::{AeadCore, Aes256Gcm, Nonce};

use crate::errors::{Result, VaultError};

/// Size of the AES-256-GCM nonce in bytes.
pub const NONCE_LEN: usize = 12;

/// Size of the GCM authentication tag in bytes.
pub const TAG_LEN: usize = 16;

/// Encrypt `plaintext` with a 32-byte `key`, binding `aad`.
///
/// Returns the nonce prepended to the ciphertext (nonce || ciphertext).
pub fn encrypt(key: &[u8], plaintext: &[u8], aad: &[u8]) -> Result<Vec<u8>> {
    let cipher = Aes256Gcm::new_from_slice(key)
        .map_err(|e| VaultError::EncryptionFailed(format!("invalid key length: {e}")))?;

    let nonce = Aes256Gcm::generate_nonce(&mut OsRng);

    let ciphertext = cipher
        .encrypt(
            &nonce,
            Payload {
                msg: plaintext,
                aad,
            },
        )
        .map_err(|e| VaultError::EncryptionFailed(format!("encryption error: {e}")))?;

    let mut output = Vec::with_capacity(NONCE_LEN + ciphertext.len());
    output.extend_from_slice(&nonce);
    output.extend_from_slice(&ciphertext);
    Ok(output)
}

/// Decrypt data that was produced by `encrypt`.
///
/// Buffers too short to hold a nonce and a tag are a format error.
/// Every other failure (wrong key, flipped bit, different `aad`) is
/// reported as the same `AuthenticationFailed`.
pub fn decrypt(key: &[u8], ciphertext_with_nonce: &[u8], aad: &[u8]) -> Result<Vec<u8>> {
    if ciphertext_with_nonce.len() < NONCE_LEN + TAG_LEN {
        return Err(VaultError::InvalidFormat(format!(
            "ciphertext is {} bytes, need at least {}",
            ciphertext_with_nonce.len(),
            NONCE_LEN + TAG_LEN
        )));
    }

    let (nonce_bytes, ciphertext) = ciphertext_with_nonce.split_at(NONCE_LEN);
    let nonce = Nonce::from_slice(nonce_bytes);

    let cipher = Aes256Gcm::new_from_slice(key).map_err(|_| VaultError::AuthenticationFailed)?;

    cipher
        .decrypt(
            nonce,
            Payload {
                msg: ciphertext,
                aad,
            },
        )
        .map_err(|_| VaultError::AuthenticationFailed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_carries_nonce_and_tag() {
        let key = [0x01u8; 32];
        let out = encrypt(&key, b"abc", b"").unwrap();
        assert_eq!(out.len(), NONCE_LEN + 3 + TAG_LEN);
    }

    #[test]
    fn aad_must_match() {
        let key = [0x02u8; 32];
        let out = encrypt(&key, b"secret", b"alice/instagram").unwrap();
        assert_eq!(decrypt(&key, &out, b"alice/instagram").unwrap(), b"secret");
        assert!(matches!(
            decrypt(&key, &out, b"bob/instagram"),
            Err(VaultError::AuthenticationFailed)
        ));
    }

    #[test]
    fn short_buffer_is_format_error() {
        let key = [0x03u8; 32];
        assert!(matches!(
            decrypt(&key, &[0u8; NONCE_LEN + TAG_LEN - 1], b""),
            Err(VaultError::InvalidFormat(_))
        ));
    }
}
