//! Hex-in, hex-out AES-256-GCM encryption of short strings.
//!
//! [`HexSeal`] holds a 32-byte key and a 12-byte fixed nonce, both supplied as
//! hex, and offers two modes:
//!
//! - [`HexSeal::encrypt`] / [`HexSeal::decrypt`]: a fresh random nonce per call.
//! - [`HexSeal::encrypt_fixed`] / [`HexSeal::decrypt_fixed`]: the configured
//!   nonce every time, for reproducible ciphertext (lookup tokens, indexes).
//!
//! The AEAD construction itself comes from the RustCrypto `aes-gcm` crate.
//! This crate never logs.
//!
//! ```
//! use hexseal::HexSeal;
//!
//! let seal = HexSeal::from_hex(
//!     "76a91c59564bd56132304a9fd65913ac96012689f1ab39b9d04e941cda00f08f",
//!     "203095d2a50cdbd777b5d8d7",
//! )?;
//!
//! let token = seal.encrypt_fixed("alice@example.com")?;
//! assert_eq!(token, seal.encrypt_fixed("alice@example.com")?);
//! assert_eq!(seal.decrypt_fixed(&token)?, "alice@example.com");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod cipher;
mod key;
pub mod options;

pub use cipher::{HexSeal, KEY_LEN, NONCE_LEN, TAG_LEN};
pub use common::{ConfigError, ConfigField, CryptoError, CryptoErrorKind, Operation};
pub use options::Options;
