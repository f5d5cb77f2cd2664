//! Error types shared across crates.

use std::fmt;

use thiserror::Error;

use crate::protocol::Operation;

// ---------------------------------------------------------------------------
// Construction errors
// ---------------------------------------------------------------------------

/// Which construction input was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigField {
    Key,
    FixedNonce,
}

impl fmt::Display for ConfigField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigField::Key => f.write_str("encryption key"),
            ConfigField::FixedNonce => f.write_str("fixed nonce"),
        }
    }
}

/// Malformed or wrong-length key material supplied at construction.
///
/// Messages name the field and the lengths only; the rejected value is never
/// echoed back.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// The value is not valid hexadecimal.
    #[error("failed to decode {field}: not valid hex")]
    Encoding { field: ConfigField },

    /// The value decoded to the wrong number of bytes.
    #[error("{field} must be {expected} bytes long, got {actual}")]
    Length {
        field: ConfigField,
        expected: usize,
        actual: usize,
    },
}

impl ConfigError {
    /// The construction input that was rejected.
    pub fn field(&self) -> ConfigField {
        match self {
            ConfigError::Encoding { field } | ConfigError::Length { field, .. } => *field,
        }
    }
}

// ---------------------------------------------------------------------------
// Per-operation errors
// ---------------------------------------------------------------------------

/// Classification of a failed encrypt or decrypt call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CryptoErrorKind {
    /// Ciphertext input is not valid hex.
    #[error("ciphertext is not valid hex")]
    Encoding,

    /// Decoded ciphertext is shorter than the nonce.
    #[error("ciphertext too short")]
    TruncatedInput,

    /// The embedded nonce differs from the configured fixed nonce.
    #[error("nonce mismatch")]
    NonceMismatch,

    /// The AEAD tag did not verify: tampering, wrong key, or corruption.
    #[error("authentication failed")]
    AuthenticationFailure,

    /// The cipher could not be keyed.
    #[error("failed to initialise cipher")]
    PrimitiveInit,

    /// The OS random source could not supply a nonce.
    #[error("secure random source unavailable")]
    RandomSource,

    /// The AEAD seal operation rejected the plaintext.
    #[error("seal operation failed")]
    SealFailure,

    /// The authenticated plaintext is not UTF-8.
    #[error("decrypted plaintext is not valid UTF-8")]
    InvalidUtf8,
}

impl CryptoErrorKind {
    /// Stable machine-readable code.
    pub fn code(self) -> &'static str {
        match self {
            CryptoErrorKind::Encoding => "encoding",
            CryptoErrorKind::TruncatedInput => "truncated_input",
            CryptoErrorKind::NonceMismatch => "nonce_mismatch",
            CryptoErrorKind::AuthenticationFailure => "authentication_failure",
            CryptoErrorKind::PrimitiveInit => "primitive_init",
            CryptoErrorKind::RandomSource => "random_source",
            CryptoErrorKind::SealFailure => "seal_failure",
            CryptoErrorKind::InvalidUtf8 => "invalid_utf8",
        }
    }
}

/// A failed facade operation: what went wrong and where.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("{operation} failed: {kind}")]
pub struct CryptoError {
    operation: Operation,
    kind: CryptoErrorKind,
}

impl CryptoError {
    pub fn new(operation: Operation, kind: CryptoErrorKind) -> Self {
        Self { operation, kind }
    }

    /// The operation that failed.
    pub fn operation(&self) -> Operation {
        self.operation
    }

    pub fn kind(&self) -> CryptoErrorKind {
        self.kind
    }
}

// ---------------------------------------------------------------------------
// Command-line surface
// ---------------------------------------------------------------------------

/// Top-level error type for the `hexseal-cli` binary.
///
/// Variants map to process exit codes (sysexits):
/// - [`ServiceError::BadRequest`] → 64
/// - [`ServiceError::Crypto`] → 65
/// - [`ServiceError::Internal`] → 70
/// - [`ServiceError::Unconfigured`], [`ServiceError::Config`] → 78
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Unknown command, missing argument, or malformed batch line.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Required settings missing from the environment.
    #[error("configuration unavailable: {0}")]
    Unconfigured(String),

    /// Key or fixed nonce rejected at startup.
    #[error("invalid configuration")]
    Config(#[from] ConfigError),

    /// An encrypt or decrypt call failed.
    #[error(transparent)]
    Crypto(#[from] CryptoError),

    /// An unexpected internal error occurred (I/O, serialisation).
    #[error("internal error: {0}")]
    Internal(String),
}

impl ServiceError {
    /// Returns the process exit code that should be used for this error.
    pub fn exit_code(&self) -> u8 {
        match self {
            ServiceError::BadRequest(_) => 64,
            ServiceError::Crypto(_) => 65,
            ServiceError::Internal(_) => 70,
            ServiceError::Unconfigured(_) | ServiceError::Config(_) => 78,
        }
    }

    /// Machine-readable code used in batch error lines.
    pub fn code(&self) -> &'static str {
        match self {
            ServiceError::BadRequest(_) => "bad_request",
            ServiceError::Unconfigured(_) | ServiceError::Config(_) => "config_error",
            ServiceError::Crypto(e) => e.kind().code(),
            ServiceError::Internal(_) => "internal_error",
        }
    }
}
