//! Common types, protocol definitions, and errors shared across `hexseal` crates.

pub mod error;
pub mod protocol;

pub use error::{ConfigError, ConfigField, CryptoError, CryptoErrorKind, ServiceError};
pub use protocol::Operation;
