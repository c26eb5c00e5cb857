//! The in-memory derived key.

use subtle::ConstantTimeEq;
use zeroize::Zeroize;

use super::kdf::KEY_LEN;

/// A wrapper around a 32-byte derived key that automatically zeroes
/// its memory when dropped.
///
/// The key only ever lives inside a keyed `Vault`; there is no way to
/// serialize it.  `Debug` prints a placeholder.
#[derive(Zeroize)]
#[zeroize(drop)]
pub struct DerivedKey {
    bytes: [u8; KEY_LEN],
}

impl DerivedKey {
    /// Create a new `DerivedKey` from raw bytes.
    pub fn new(bytes: [u8; KEY_LEN]) -> Self {
        Self { bytes }
    }

    /// Access the raw key bytes (e.g. to pass to the cipher).
    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.bytes
    }
}

impl PartialEq for DerivedKey {
    fn eq(&self, other: &Self) -> bool {
        self.bytes.ct_eq(&other.bytes).into()
    }
}

impl Eq for DerivedKey {}

impl std::fmt::Debug for DerivedKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("DerivedKey(..)")
    }
}
