//! Operation names and the JSON-lines batch protocol.
//!
//! A batch request is one JSON object per line; each produces exactly one
//! response line, in order.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Operations
// ---------------------------------------------------------------------------

/// The four facade operations.
///
/// Used both as the batch `op` field and as the originating-operation tag
/// carried by [`CryptoError`](crate::error::CryptoError).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    /// Random-nonce encryption.
    Encrypt,
    /// Random-nonce decryption.
    Decrypt,
    /// Fixed-nonce (deterministic) encryption.
    #[serde(alias = "encrypt-fixed")]
    EncryptFixed,
    /// Fixed-nonce decryption.
    #[serde(alias = "decrypt-fixed")]
    DecryptFixed,
}

impl Operation {
    /// Canonical `snake_case` name.
    pub fn as_str(self) -> &'static str {
        match self {
            Operation::Encrypt => "encrypt",
            Operation::Decrypt => "decrypt",
            Operation::EncryptFixed => "encrypt_fixed",
            Operation::DecryptFixed => "decrypt_fixed",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string names no known [`Operation`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown operation: {0}")]
pub struct UnknownOperation(pub String);

impl FromStr for Operation {
    type Err = UnknownOperation;

    /// Accepts both `snake_case` and `kebab-case` spellings.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "encrypt" => Ok(Operation::Encrypt),
            "decrypt" => Ok(Operation::Decrypt),
            "encrypt_fixed" | "encrypt-fixed" => Ok(Operation::EncryptFixed),
            "decrypt_fixed" | "decrypt-fixed" => Ok(Operation::DecryptFixed),
            other => Err(UnknownOperation(other.to_owned())),
        }
    }
}

// ---------------------------------------------------------------------------
// Batch request / response
// ---------------------------------------------------------------------------

/// One line of batch input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SealRequest {
    /// Operation to apply.
    pub op: Operation,
    /// Plaintext for encrypt operations, hex ciphertext for decrypt operations.
    pub input: String,
}

/// Successful batch output line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SealResponse {
    /// Hex ciphertext or recovered plaintext.
    pub output: String,
}

/// Failed batch output line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorLine {
    pub error: ErrorResponse,
}

/// Machine-readable error body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Short machine-readable error code (e.g. `"nonce_mismatch"`).
    pub code: String,
    /// Human-readable description. Never contains key, nonce or payload bytes.
    pub message: String,
}

impl ErrorResponse {
    /// Construct an [`ErrorResponse`] from a code and message.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}
