//! [`KeyBytes`]: owned AES-256 key buffer, zeroed on drop.

use common::{ConfigError, ConfigField};
use zeroize::{Zeroize, Zeroizing};

use crate::cipher::KEY_LEN;

/// Fixed-size key buffer that holds exactly [`KEY_LEN`] bytes.
///
/// When this type is dropped, the memory is overwritten with zeroes to
/// minimise the window during which plaintext key material lives in RAM.
#[derive(Clone)]
pub(crate) struct KeyBytes(Box<[u8; KEY_LEN]>);

impl KeyBytes {
    /// Decode a hex-encoded key.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if `key_hex` is not hex or does not decode to
    /// exactly [`KEY_LEN`] bytes.
    pub(crate) fn from_hex(key_hex: &str) -> Result<Self, ConfigError> {
        let mut buf = Box::new([0u8; KEY_LEN]);
        decode_into(key_hex, ConfigField::Key, &mut buf[..])?;
        Ok(Self(buf))
    }

    pub(crate) fn as_bytes(&self) -> &[u8] {
        &self.0[..]
    }
}

impl Drop for KeyBytes {
    fn drop(&mut self) {
        self.0.as_mut_slice().zeroize();
    }
}

impl std::fmt::Debug for KeyBytes {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Key bytes stay out of every formatter, debug builds included.
        f.write_str("KeyBytes([REDACTED])")
    }
}

/// Hex-decode `value` into `out`, which fixes the expected length.
///
/// The intermediate decode buffer is zeroed before it is freed.
pub(crate) fn decode_into(
    value: &str,
    field: ConfigField,
    out: &mut [u8],
) -> Result<(), ConfigError> {
    let decoded = Zeroizing::new(hex::decode(value).map_err(|_| ConfigError::Encoding { field })?);
    if decoded.len() != out.len() {
        return Err(ConfigError::Length {
            field,
            expected: out.len(),
            actual: decoded.len(),
        });
    }
    out.copy_from_slice(&decoded);
    Ok(())
}
