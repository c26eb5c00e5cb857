//! The values a vault can encrypt.
//!
//! `Plaintext` is a closed, tagged variant so that the bytes fed to the
//! cipher are canonical: the JSON form carries an explicit `type` tag,
//! maps are `BTreeMap`s (sorted keys) and raw bytes are base64 text.
//! Two structurally equal values always serialize identically, which
//! makes `decrypt(encrypt(x)) == x` a plain `PartialEq` check.
//!
//! Maps nest at most `MAX_NESTING_DEPTH` levels.  Every map level costs
//! two JSON levels, and the limit keeps the deepest accepted value well
//! inside what the JSON parser will read back.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::record::{base64_decode, base64_encode};
use crate::errors::{Result, VaultError};

/// Deepest accepted map nesting; a flat mapping has depth 1.
pub const MAX_NESTING_DEPTH: usize = 32;

/// A secret value: a string, raw bytes, or a string-keyed mapping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum Plaintext {
    Text(String),
    Bytes(
        #[serde(serialize_with = "base64_encode", deserialize_with = "base64_decode")] Vec<u8>,
    ),
    Map(BTreeMap<String, Plaintext>),
}

impl Plaintext {
    /// Canonical byte encoding fed to the cipher.
    ///
    /// Values nested deeper than `MAX_NESTING_DEPTH` are a validation
    /// error, so nothing is encrypted that could not be decrypted.
    pub fn to_canonical_bytes(&self) -> Result<Vec<u8>> {
        let depth = self.depth();
        if depth > MAX_NESTING_DEPTH {
            return Err(VaultError::Validation(format!(
                "plaintext nests {depth} maps deep, at most {MAX_NESTING_DEPTH} allowed"
            )));
        }
        serde_json::to_vec(self)
            .map_err(|e| VaultError::SerializationError(format!("plaintext: {e}")))
    }

    /// Parse bytes produced by `to_canonical_bytes`.
    pub fn from_canonical_bytes(bytes: &[u8]) -> Result<Self> {
        let value: Self = serde_json::from_slice(bytes)
            .map_err(|e| VaultError::InvalidFormat(format!("decrypted payload: {e}")))?;
        if value.depth() > MAX_NESTING_DEPTH {
            return Err(VaultError::InvalidFormat(format!(
                "decrypted payload nests deeper than {MAX_NESTING_DEPTH} maps"
            )));
        }
        Ok(value)
    }

    /// Map nesting depth: 0 for text and bytes, 1 for a flat map.
    pub fn depth(&self) -> usize {
        match self {
            Self::Map(m) => 1 + m.values().map(Self::depth).max().unwrap_or(0),
            _ => 0,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Bytes(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&BTreeMap<String, Plaintext>> {
        match self {
            Self::Map(m) => Some(m),
            _ => None,
        }
    }

    /// Build a flat string-to-string mapping.
    pub fn from_pairs<K, V, I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self::Map(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), Self::Text(v.into())))
                .collect(),
        )
    }
}

impl From<&str> for Plaintext {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for Plaintext {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<Vec<u8>> for Plaintext {
    fn from(b: Vec<u8>) -> Self {
        Self::Bytes(b)
    }
}

impl From<BTreeMap<String, Plaintext>> for Plaintext {
    fn from(m: BTreeMap<String, Plaintext>) -> Self {
        Self::Map(m)
    }
}
