//! The `EncryptedRecord` envelope.
//!
//! A record has this layout:
//!
//! ```text
//! [version: 1 byte][nonce: 12 bytes][ciphertext][GCM tag: 16 bytes]
//! ```
//!
//! Callers see it as opaque base64 text (the *token*).  A record is
//! never mutated; re-encrypting a value produces a new record.

use std::fmt;
use std::str::FromStr;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::crypto::encryption::{NONCE_LEN, TAG_LEN};
use crate::errors::{Result, VaultError};

/// Current record format version.
pub const RECORD_VERSION: u8 = 1;

/// Smallest possible record: version + nonce + tag (empty ciphertext).
const MIN_RECORD_LEN: usize = 1 + NONCE_LEN + TAG_LEN;

/// Authenticated ciphertext produced by `Vault::encrypt`.
#[derive(Clone, PartialEq, Eq)]
pub struct EncryptedRecord {
    bytes: Vec<u8>,
}

impl EncryptedRecord {
    /// Wrap the cipher output (`nonce || ciphertext || tag`).
    pub(crate) fn seal(sealed: Vec<u8>) -> Self {
        let mut bytes = Vec::with_capacity(1 + sealed.len());
        bytes.push(RECORD_VERSION);
        bytes.extend_from_slice(&sealed);
        Self { bytes }
    }

    /// Parse a record from its raw bytes, checking structure only.
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self> {
        if bytes.len() < MIN_RECORD_LEN {
            return Err(VaultError::InvalidFormat(format!(
                "record is {} bytes, need at least {MIN_RECORD_LEN}",
                bytes.len()
            )));
        }
        if bytes[0] != RECORD_VERSION {
            return Err(VaultError::InvalidFormat(format!(
                "unsupported record version {}, expected {RECORD_VERSION}",
                bytes[0]
            )));
        }
        Ok(Self { bytes })
    }

    /// Parse a record from its base64 token.
    pub fn from_token(token: &str) -> Result<Self> {
        let bytes = BASE64
            .decode(token.trim())
            .map_err(|e| VaultError::InvalidFormat(format!("record is not base64: {e}")))?;
        Self::from_bytes(bytes)
    }

    /// Render the record as base64 text for storage.
    pub fn to_token(&self) -> String {
        BASE64.encode(&self.bytes)
    }

    /// The full record, version byte included.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// The `nonce || ciphertext || tag` part handed to the cipher.
    pub(crate) fn sealed(&self) -> &[u8] {
        &self.bytes[1..]
    }

    /// Consume the record and return its raw bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

impl fmt::Debug for EncryptedRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EncryptedRecord")
            .field("version", &self.bytes[0])
            .field("len", &self.bytes.len())
            .finish()
    }
}

impl fmt::Display for EncryptedRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_token())
    }
}

impl FromStr for EncryptedRecord {
    type Err = VaultError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_token(s)
    }
}

impl Serialize for EncryptedRecord {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        base64_encode(&self.bytes, serializer)
    }
}

impl<'de> Deserialize<'de> for EncryptedRecord {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let bytes = base64_decode(deserializer)?;
        Self::from_bytes(bytes).map_err(serde::de::Error::custom)
    }
}

// ---------------------------------------------------------------------------
// Serde helpers for base64-encoded Vec<u8> fields
// ---------------------------------------------------------------------------

pub(crate) fn base64_encode<S>(data: &[u8], serializer: S) -> std::result::Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    let encoded = BASE64.encode(data);
    serializer.serialize_str(&encoded)
}

pub(crate) fn base64_decode<'de, D>(deserializer: D) -> std::result::Result<Vec<u8>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    BASE64.decode(&s).map_err(serde::de::Error::custom)
}
