//! Construction options for [`HexSeal`](crate::HexSeal).

use serde::Deserialize;
use zeroize::Zeroize;

/// Hex-encoded key material used to build a [`HexSeal`](crate::HexSeal).
///
/// Deserialisable so a configuration layer can fill it directly. The key
/// string is zeroed when the options are dropped.
#[derive(Clone, Deserialize)]
pub struct Options {
    /// 32-byte AES-256 key, hex-encoded (64 characters).
    pub key: String,
    /// 12-byte nonce for the fixed-nonce operations, hex-encoded (24 characters).
    pub fixed_nonce: String,
}

impl Options {
    pub fn new(key: impl Into<String>, fixed_nonce: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            fixed_nonce: fixed_nonce.into(),
        }
    }
}

impl Drop for Options {
    fn drop(&mut self) {
        self.key.zeroize();
    }
}

impl std::fmt::Debug for Options {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Options")
            .field("key", &"[REDACTED]")
            .field("fixed_nonce", &self.fixed_nonce)
            .finish()
    }
}
