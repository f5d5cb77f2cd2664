//! AES-256-GCM encryption and decryption of strings, hex in and hex out.
//!
//! # Ciphertext format
//!
//! ```text
//! hex( nonce (12 bytes) || ciphertext || tag (16 bytes) )
//! ```
//!
//! Both modes share this format, so a fixed-nonce ciphertext also opens with
//! [`HexSeal::decrypt`]. The reverse does not hold: [`HexSeal::decrypt_fixed`]
//! only accepts ciphertexts carrying the configured nonce.
//!
//! **Fixed-nonce mode is deterministic.** Every [`HexSeal::encrypt_fixed`] call
//! under one key reuses one nonce, so equal plaintexts produce equal
//! ciphertexts and the GCM keystream repeats across different plaintexts.
//! Use it only where reproducible output is the point (lookup tokens, blind
//! indexes) and keep one fixed nonce per key.

use aes_gcm::aead::generic_array::typenum::Unsigned;
use aes_gcm::aead::rand_core::RngCore;
use aes_gcm::aead::{Aead, AeadCore, KeyInit, Nonce, OsRng};
use aes_gcm::Aes256Gcm;
use common::{ConfigError, ConfigField, CryptoError, CryptoErrorKind, Operation};
use subtle::ConstantTimeEq;
use zeroize::Zeroize;

use crate::key::{decode_into, KeyBytes};
use crate::options::Options;

/// Byte length of an AES-256 key (32 bytes = 256 bits).
pub const KEY_LEN: usize = 32;

/// Byte length of an AES-GCM nonce (12 bytes = 96 bits).
pub const NONCE_LEN: usize = 12;

/// Byte length of the GCM authentication tag (16 bytes = 128 bits).
pub const TAG_LEN: usize = 16;

const _: () = assert!(<<Aes256Gcm as AeadCore>::NonceSize as Unsigned>::USIZE == NONCE_LEN);
const _: () = assert!(<<Aes256Gcm as AeadCore>::TagSize as Unsigned>::USIZE == TAG_LEN);

/// AEAD facade holding a key and a fixed nonce.
///
/// Immutable after construction and safe to share between threads; every
/// operation builds its own cipher instance.
#[derive(Clone)]
pub struct HexSeal {
    key: KeyBytes,
    fixed_nonce: [u8; NONCE_LEN],
}

impl HexSeal {
    /// Build a facade from hex-encoded [`Options`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the key is not 32 bytes of hex or the fixed
    /// nonce is not 12 bytes of hex.
    pub fn new(options: &Options) -> Result<Self, ConfigError> {
        Self::from_hex(&options.key, &options.fixed_nonce)
    }

    /// Build a facade from a hex key and a hex fixed nonce.
    ///
    /// # Errors
    ///
    /// See [`HexSeal::new`].
    pub fn from_hex(key_hex: &str, fixed_nonce_hex: &str) -> Result<Self, ConfigError> {
        let key = KeyBytes::from_hex(key_hex)?;
        let mut fixed_nonce = [0u8; NONCE_LEN];
        decode_into(fixed_nonce_hex, ConfigField::FixedNonce, &mut fixed_nonce)?;
        Ok(Self { key, fixed_nonce })
    }

    /// The configured fixed nonce. Not secret: it prefixes every fixed-nonce
    /// ciphertext.
    pub fn fixed_nonce(&self) -> &[u8; NONCE_LEN] {
        &self.fixed_nonce
    }

    /// Encrypt `plaintext` under a fresh random nonce drawn from the OS CSPRNG.
    ///
    /// # Errors
    ///
    /// [`CryptoErrorKind::PrimitiveInit`], [`CryptoErrorKind::RandomSource`] or
    /// [`CryptoErrorKind::SealFailure`]. None is expected with a validated key.
    pub fn encrypt(&self, plaintext: &str) -> Result<String, CryptoError> {
        let op = Operation::Encrypt;
        let mut nonce = [0u8; NONCE_LEN];
        OsRng
            .try_fill_bytes(&mut nonce)
            .map_err(|_| CryptoError::new(op, CryptoErrorKind::RandomSource))?;
        self.seal(op, &nonce, plaintext)
    }

    /// Decrypt a ciphertext produced by [`HexSeal::encrypt`] (or
    /// [`HexSeal::encrypt_fixed`]).
    ///
    /// # Errors
    ///
    /// - [`CryptoErrorKind::Encoding`] if the input is not hex.
    /// - [`CryptoErrorKind::TruncatedInput`] if it decodes to fewer than
    ///   [`NONCE_LEN`] bytes.
    /// - [`CryptoErrorKind::AuthenticationFailure`] on a wrong key or any
    ///   modification of the ciphertext.
    pub fn decrypt(&self, ciphertext_hex: &str) -> Result<String, CryptoError> {
        self.open(Operation::Decrypt, ciphertext_hex, None)
    }

    /// Encrypt `plaintext` under the configured fixed nonce.
    ///
    /// Output is deterministic for a given key, nonce and plaintext. The
    /// caller is responsible for the nonce-reuse exposure this implies; see
    /// the module documentation.
    ///
    /// # Errors
    ///
    /// [`CryptoErrorKind::PrimitiveInit`] or [`CryptoErrorKind::SealFailure`].
    pub fn encrypt_fixed(&self, plaintext: &str) -> Result<String, CryptoError> {
        self.seal(Operation::EncryptFixed, &self.fixed_nonce, plaintext)
    }

    /// Decrypt a ciphertext produced by [`HexSeal::encrypt_fixed`].
    ///
    /// # Errors
    ///
    /// As [`HexSeal::decrypt`], plus [`CryptoErrorKind::NonceMismatch`] when
    /// the embedded nonce is not the configured one. That check runs before
    /// authentication.
    pub fn decrypt_fixed(&self, ciphertext_hex: &str) -> Result<String, CryptoError> {
        self.open(Operation::DecryptFixed, ciphertext_hex, Some(&self.fixed_nonce))
    }

    fn cipher(&self, op: Operation) -> Result<Aes256Gcm, CryptoError> {
        Aes256Gcm::new_from_slice(self.key.as_bytes())
            .map_err(|_| CryptoError::new(op, CryptoErrorKind::PrimitiveInit))
    }

    fn seal(
        &self,
        op: Operation,
        nonce: &[u8; NONCE_LEN],
        plaintext: &str,
    ) -> Result<String, CryptoError> {
        let cipher = self.cipher(op)?;
        let sealed = cipher
            .encrypt(Nonce::<Aes256Gcm>::from_slice(nonce), plaintext.as_bytes())
            .map_err(|_| CryptoError::new(op, CryptoErrorKind::SealFailure))?;

        let mut out = Vec::with_capacity(NONCE_LEN + sealed.len());
        out.extend_from_slice(nonce);
        out.extend_from_slice(&sealed);
        Ok(hex::encode(out))
    }

    fn open(
        &self,
        op: Operation,
        ciphertext_hex: &str,
        expected_nonce: Option<&[u8; NONCE_LEN]>,
    ) -> Result<String, CryptoError> {
        let fail = |kind| CryptoError::new(op, kind);

        let cipher = self.cipher(op)?;
        let bytes = hex::decode(ciphertext_hex).map_err(|_| fail(CryptoErrorKind::Encoding))?;
        if bytes.len() < NONCE_LEN {
            return Err(fail(CryptoErrorKind::TruncatedInput));
        }
        let (nonce, sealed) = bytes.split_at(NONCE_LEN);

        if let Some(expected) = expected_nonce {
            if !bool::from(nonce.ct_eq(&expected[..])) {
                return Err(fail(CryptoErrorKind::NonceMismatch));
            }
        }

        let plaintext = cipher
            .decrypt(Nonce::<Aes256Gcm>::from_slice(nonce), sealed)
            .map_err(|_| fail(CryptoErrorKind::AuthenticationFailure))?;

        String::from_utf8(plaintext).map_err(|e| {
            e.into_bytes().zeroize();
            fail(CryptoErrorKind::InvalidUtf8)
        })
    }
}

impl std::fmt::Debug for HexSeal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HexSeal")
            .field("key", &self.key)
            .field("fixed_nonce", &hex::encode(self.fixed_nonce))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: &str = "76a91c59564bd56132304a9fd65913ac96012689f1ab39b9d04e941cda00f08f";
    const FIXED_NONCE: &str = "203095d2a50cdbd777b5d8d7";
    const OTHER_NONCE: &str = "000102030405060708090a0b";
    const PLAINTEXT: &str = "Hello, World!";

    fn seal() -> HexSeal {
        HexSeal::from_hex(KEY, FIXED_NONCE).unwrap()
    }

    /// Replace the hex digit at `i` with a different digit.
    fn flip_digit(hex: &str, i: usize) -> String {
        let mut chars: Vec<char> = hex.chars().collect();
        let digit = chars[i].to_digit(16).unwrap();
        chars[i] = std::char::from_digit(digit ^ 0x1, 16).unwrap();
        chars.into_iter().collect()
    }

    // --- construction ----------------------------------------------------

    #[test]
    fn new_accepts_reference_material() {
        let opts = Options::new(KEY, FIXED_NONCE);
        assert!(HexSeal::new(&opts).is_ok());
    }

    #[test]
    fn new_rejects_bad_key() {
        let opts = Options::new("bad_key", FIXED_NONCE);
        let err = HexSeal::new(&opts).unwrap_err();
        assert_eq!(err.field(), ConfigField::Key);
    }

    #[test]
    fn new_rejects_short_key() {
        let err = HexSeal::from_hex(&KEY[..62], FIXED_NONCE).unwrap_err();
        assert_eq!(
            err,
            ConfigError::Length {
                field: ConfigField::Key,
                expected: KEY_LEN,
                actual: 31,
            }
        );
    }

    #[test]
    fn new_rejects_bad_fixed_nonce() {
        let err = HexSeal::from_hex(KEY, "not-a-nonce").unwrap_err();
        assert_eq!(
            err,
            ConfigError::Encoding {
                field: ConfigField::FixedNonce
            }
        );

        let err = HexSeal::from_hex(KEY, "203095d2a50cdbd777b5d8").unwrap_err();
        assert_eq!(
            err,
            ConfigError::Length {
                field: ConfigField::FixedNonce,
                expected: NONCE_LEN,
                actual: 11,
            }
        );
    }

    #[test]
    fn debug_never_prints_key() {
        let printed = format!("{:?}", seal());
        assert!(printed.contains("REDACTED"));
        assert!(!printed.contains(KEY));
        assert!(printed.contains(FIXED_NONCE));
    }

    // --- random-nonce mode -------------------------------------------------

    #[test]
    fn encrypt_decrypt_round_trip() {
        let seal = seal();
        for _ in 0..3 {
            let ct = seal.encrypt(PLAINTEXT).unwrap();
            assert_eq!(ct.len(), 2 * (NONCE_LEN + PLAINTEXT.len() + TAG_LEN));
            assert_eq!(seal.decrypt(&ct).unwrap(), PLAINTEXT);
        }
    }

    #[test]
    fn encrypt_uses_fresh_nonce() {
        let seal = seal();
        let a = seal.encrypt(PLAINTEXT).unwrap();
        let b = seal.encrypt(PLAINTEXT).unwrap();
        assert_ne!(a, b);
        assert_ne!(a[..2 * NONCE_LEN], b[..2 * NONCE_LEN]);
    }

    #[test]
    fn empty_plaintext_round_trips() {
        let seal = seal();
        let ct = seal.encrypt("").unwrap();
        assert_eq!(ct.len(), 2 * (NONCE_LEN + TAG_LEN));
        assert_eq!(seal.decrypt(&ct).unwrap(), "");
    }

    #[test]
    fn decrypt_is_idempotent() {
        let seal = seal();
        let ct = seal.encrypt(PLAINTEXT).unwrap();
        assert_eq!(seal.decrypt(&ct).unwrap(), seal.decrypt(&ct).unwrap());

        let ct = seal.encrypt_fixed(PLAINTEXT).unwrap();
        assert_eq!(
            seal.decrypt_fixed(&ct).unwrap(),
            seal.decrypt_fixed(&ct).unwrap()
        );
    }

    #[test]
    fn tampered_ciphertext_fails_auth() {
        let seal = seal();
        let ct = seal.encrypt(PLAINTEXT).unwrap();
        for i in 0..ct.len() {
            let err = seal.decrypt(&flip_digit(&ct, i)).unwrap_err();
            assert_eq!(err.kind(), CryptoErrorKind::AuthenticationFailure, "digit {i}");
            assert_eq!(err.operation(), Operation::Decrypt);
        }
    }

    #[test]
    fn wrong_key_fails_decryption() {
        let other = HexSeal::from_hex(&"11".repeat(KEY_LEN), FIXED_NONCE).unwrap();
        let ct = seal().encrypt(PLAINTEXT).unwrap();
        let err = other.decrypt(&ct).unwrap_err();
        assert_eq!(err.kind(), CryptoErrorKind::AuthenticationFailure);
    }

    #[test]
    fn decrypt_rejects_non_hex() {
        let seal = seal();
        assert_eq!(
            seal.decrypt("zz").unwrap_err().kind(),
            CryptoErrorKind::Encoding
        );
        assert_eq!(
            seal.decrypt("abc").unwrap_err().kind(),
            CryptoErrorKind::Encoding
        );
    }

    #[test]
    fn decrypt_rejects_truncated_input() {
        let seal = seal();
        for input in ["", "00", "0011223344556677889900"] {
            assert_eq!(
                seal.decrypt(input).unwrap_err().kind(),
                CryptoErrorKind::TruncatedInput
            );
            assert_eq!(
                seal.decrypt_fixed(input).unwrap_err().kind(),
                CryptoErrorKind::TruncatedInput
            );
        }
    }

    #[test]
    fn nonce_without_payload_fails_auth() {
        let seal = seal();
        let err = seal.decrypt(FIXED_NONCE).unwrap_err();
        assert_eq!(err.kind(), CryptoErrorKind::AuthenticationFailure);
        let err = seal.decrypt_fixed(FIXED_NONCE).unwrap_err();
        assert_eq!(err.kind(), CryptoErrorKind::AuthenticationFailure);
    }

    #[test]
    fn decrypt_accepts_uppercase_hex() {
        let seal = seal();
        let ct = seal.encrypt(PLAINTEXT).unwrap().to_uppercase();
        assert_eq!(seal.decrypt(&ct).unwrap(), PLAINTEXT);
    }

    // --- fixed-nonce mode --------------------------------------------------

    #[test]
    fn encrypt_fixed_round_trip() {
        let seal = seal();
        for _ in 0..3 {
            let ct = seal.encrypt_fixed(PLAINTEXT).unwrap();
            assert_eq!(seal.decrypt_fixed(&ct).unwrap(), PLAINTEXT);
        }
    }

    #[test]
    fn encrypt_fixed_is_deterministic() {
        let seal = seal();
        let a = seal.encrypt_fixed(PLAINTEXT).unwrap();
        let b = seal.encrypt_fixed(PLAINTEXT).unwrap();
        assert_eq!(a, b);
        assert!(a.starts_with(FIXED_NONCE));
        assert_ne!(a, seal.encrypt_fixed("Hello, World?").unwrap());
    }

    #[test]
    fn fixed_ciphertext_opens_in_random_mode() {
        let seal = seal();
        let ct = seal.encrypt_fixed(PLAINTEXT).unwrap();
        assert_eq!(seal.decrypt(&ct).unwrap(), PLAINTEXT);
    }

    #[test]
    fn random_ciphertext_rejected_in_fixed_mode() {
        let seal = seal();
        let ct = seal.encrypt(PLAINTEXT).unwrap();
        // A random nonce equal to the fixed one has probability 2^-96.
        let err = seal.decrypt_fixed(&ct).unwrap_err();
        assert_eq!(err.kind(), CryptoErrorKind::NonceMismatch);
    }

    #[test]
    fn decrypt_fixed_rejects_foreign_nonce() {
        let seal = seal();
        let other = HexSeal::from_hex(KEY, OTHER_NONCE).unwrap();
        let ct = other.encrypt_fixed(PLAINTEXT).unwrap();

        // Same key, so the payload itself authenticates.
        assert_eq!(seal.decrypt(&ct).unwrap(), PLAINTEXT);

        let err = seal.decrypt_fixed(&ct).unwrap_err();
        assert_eq!(err.kind(), CryptoErrorKind::NonceMismatch);
        assert_eq!(err.operation(), Operation::DecryptFixed);
    }

    #[test]
    fn tampered_fixed_ciphertext_is_rejected() {
        let seal = seal();
        let ct = seal.encrypt_fixed(PLAINTEXT).unwrap();
        for i in 0..ct.len() {
            let err = seal.decrypt_fixed(&flip_digit(&ct, i)).unwrap_err();
            let expected = if i < 2 * NONCE_LEN {
                CryptoErrorKind::NonceMismatch
            } else {
                CryptoErrorKind::AuthenticationFailure
            };
            assert_eq!(err.kind(), expected, "digit {i}");
        }
    }

    // --- sharing -----------------------------------------------------------

    #[test]
    fn facade_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<HexSeal>();
    }

    #[test]
    fn concurrent_use_of_one_facade() {
        let seal = seal();
        let outputs: Vec<String> = std::thread::scope(|s| {
            let handles: Vec<_> = (0..4)
                .map(|i| {
                    let seal = &seal;
                    s.spawn(move || {
                        let plaintext = format!("record-{i}");
                        let ct = seal.encrypt(&plaintext).unwrap();
                        assert_eq!(seal.decrypt(&ct).unwrap(), plaintext);
                        let ct = seal.encrypt_fixed(&plaintext).unwrap();
                        seal.decrypt_fixed(&ct).unwrap()
                    })
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });
        assert_eq!(outputs, ["record-0", "record-1", "record-2", "record-3"]);
    }
}
