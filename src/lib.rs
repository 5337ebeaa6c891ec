//! Password-based authenticated encryption.
//!
//! `passbox` seals text (or any serde-serializable object) under a password
//! into a self-contained envelope:
//!
//! ```text
//! SALT (16) | NONCE (24) | XSalsa20-Poly1305 CIPHERTEXT + TAG
//! ```
//!
//! The key is derived with PBKDF2-HMAC-SHA256 from the password and the
//! per-envelope salt. It also provides salted password hashing with
//! constant-time verification, and reusable derived keys.
//!
//! ```no_run
//! let sealed = passbox::encrypt("meet at noon", "correct horse", passbox::Format::Encoded)?;
//! assert_eq!(passbox::decrypt(&sealed, "correct horse")?, "meet at noon");
//! # Ok::<(), passbox::Error>(())
//! ```

mod codec;
pub mod crypto;
mod error;
pub mod format;
mod object;
mod password;
pub mod storage;
pub mod validation;

use serde::{Serialize, de::DeserializeOwned};
use tracing::debug;

pub use crate::crypto::{Backend, GeneratedKey, OsBackend, ThreadRngBackend};
pub use crate::error::{Error, Result};
pub use crate::format::{Envelope, Format};
pub use crate::storage::EnvelopeFile;
pub use crate::validation::{
    Validation, validate_encrypted_text, validate_hash, validate_password, validate_text,
};

use crate::crypto::{
    KEY_LEN, MAX_RANDOM_BYTES, NONCE_LEN, PBKDF2_DIGEST, PBKDF2_ITERATIONS, SALT_LEN, TAG_LEN,
};
use crate::validation::{
    MAX_PASSWORD_LENGTH, MAX_TEXT_LENGTH, MIN_PASSWORD_LENGTH, MIN_TEXT_LENGTH,
};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Human readable version including the primitives in use.
pub fn version() -> String {
    format!("passbox v{VERSION} (xsalsa20poly1305, pbkdf2-{PBKDF2_DIGEST})")
}

/// Fixed parameters of the envelope format.
///
/// Changing any of these breaks every envelope and hash produced before.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Config {
    pub version: &'static str,
    pub pbkdf2_iterations: u32,
    pub pbkdf2_digest: &'static str,
    pub salt_length: usize,
    pub nonce_length: usize,
    pub key_length: usize,
    pub tag_length: usize,
    pub min_password_length: usize,
    pub max_password_length: usize,
    pub min_text_length: usize,
    pub max_text_length: usize,
    pub max_random_bytes: usize,
}

pub const CONFIG: Config = Config {
    version: VERSION,
    pbkdf2_iterations: PBKDF2_ITERATIONS,
    pbkdf2_digest: PBKDF2_DIGEST,
    salt_length: SALT_LEN,
    nonce_length: NONCE_LEN,
    key_length: KEY_LEN,
    tag_length: TAG_LEN,
    min_password_length: MIN_PASSWORD_LENGTH,
    max_password_length: MAX_PASSWORD_LENGTH,
    min_text_length: MIN_TEXT_LENGTH,
    max_text_length: MAX_TEXT_LENGTH,
    max_random_bytes: MAX_RANDOM_BYTES,
};

/// Entry point holding the platform backend.
///
/// `PassBox` keeps no other state: every call derives its own key and drops
/// it before returning, so one instance can be shared across threads.
#[derive(Debug, Clone, Default)]
pub struct PassBox<B = OsBackend> {
    backend: B,
}

impl PassBox<OsBackend> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<B: Backend> PassBox<B> {
    pub fn with_backend(backend: B) -> Self {
        debug!(backend = backend.name(), "passbox backend selected");
        Self { backend }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Cryptographically secure random bytes, `1..=65536` of them.
    pub fn random_bytes(&self, len: usize) -> Result<Vec<u8>> {
        if !(1..=MAX_RANDOM_BYTES).contains(&len) {
            return Err(Error::Validation(format!(
                "Length must be between 1 and {MAX_RANDOM_BYTES}"
            )));
        }

        let mut buf = vec![0u8; len];
        self.backend.fill_random(&mut buf)?;
        Ok(buf)
    }

    /// Derives a key for reuse. A fresh salt is generated when none is given.
    pub fn generate_key(&self, password: &str, salt: Option<&[u8]>) -> Result<GeneratedKey> {
        validate_password(password).into_result()?;
        GeneratedKey::derive(&self.backend, password, salt)
    }

    pub(crate) fn fresh<const N: usize>(&self) -> Result<[u8; N]> {
        let mut buf = [0u8; N];
        self.backend.fill_random(&mut buf)?;
        Ok(buf)
    }
}

/// Encrypts `text` under `password` with the default backend.
pub fn encrypt(text: &str, password: &str, format: Format) -> Result<Envelope> {
    PassBox::new().encrypt(text, password, format)
}

/// Decrypts an envelope produced by [`encrypt`].
pub fn decrypt(envelope: &Envelope, password: &str) -> Result<String> {
    PassBox::new().decrypt(envelope, password)
}

/// Serializes `value` to JSON and encrypts it.
pub fn encrypt_object<T: Serialize + ?Sized>(
    value: &T,
    password: &str,
    format: Format,
) -> Result<Envelope> {
    PassBox::new().encrypt_object(value, password, format)
}

/// Decrypts an envelope produced by [`encrypt_object`] and parses it.
pub fn decrypt_object<T: DeserializeOwned>(envelope: &Envelope, password: &str) -> Result<T> {
    PassBox::new().decrypt_object(envelope, password)
}

/// Salted password hash, base64 encoded.
pub fn hash(password: &str) -> Result<String> {
    PassBox::new().hash(password)
}

/// Checks `password` against a hash from [`hash`]. Never fails, only says no.
pub fn verify_hash(password: &str, stored_hash: &str) -> bool {
    PassBox::new().verify_hash(password, stored_hash)
}

pub fn generate_key(password: &str, salt: Option<&[u8]>) -> Result<GeneratedKey> {
    PassBox::new().generate_key(password, salt)
}

pub fn encrypt_with_key(text: &str, key: &GeneratedKey, format: Format) -> Result<Envelope> {
    PassBox::new().encrypt_with_key(text, key, format)
}

pub fn decrypt_with_key(envelope: &Envelope, key: &GeneratedKey) -> Result<String> {
    PassBox::new().decrypt_with_key(envelope, key)
}

pub fn random_bytes(len: usize) -> Result<Vec<u8>> {
    PassBox::new().random_bytes(len)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_reports_fixed_parameters() {
        assert_eq!(CONFIG.salt_length, 16);
        assert_eq!(CONFIG.nonce_length, 24);
        assert_eq!(CONFIG.key_length, 32);
        assert_eq!(CONFIG.pbkdf2_iterations, 100_000);
        assert_eq!(CONFIG.pbkdf2_digest, "sha256");
        assert_eq!(CONFIG.min_password_length, 8);
        assert_eq!(CONFIG.version, VERSION);
    }

    #[test]
    fn version_names_primitives() {
        let v = version();
        assert!(v.starts_with("passbox v"));
        assert!(v.contains("xsalsa20poly1305"));
    }

    #[test]
    fn random_bytes_bounds() {
        let pb = PassBox::new();
        assert!(matches!(pb.random_bytes(0), Err(Error::Validation(_))));
        assert!(pb.random_bytes(MAX_RANDOM_BYTES + 1).is_err());
        assert_eq!(pb.random_bytes(1).unwrap().len(), 1);
        assert_eq!(pb.random_bytes(MAX_RANDOM_BYTES).unwrap().len(), MAX_RANDOM_BYTES);
    }

    #[test]
    fn random_bytes_differ_between_calls() {
        let pb = PassBox::with_backend(ThreadRngBackend);
        assert_ne!(pb.random_bytes(32).unwrap(), pb.random_bytes(32).unwrap());
    }

    #[test]
    fn generate_key_reuses_given_salt() {
        let pb = PassBox::new();
        let first = pb.generate_key("master-key-password", None).unwrap();
        let again = pb
            .generate_key("master-key-password", Some(&first.salt()[..]))
            .unwrap();

        assert_eq!(first.key(), again.key());
        assert_eq!(first.salt(), again.salt());
    }

    #[test]
    fn generate_key_without_salt_differs() {
        let pb = PassBox::new();
        let a = pb.generate_key("master-key-password", None).unwrap();
        let b = pb.generate_key("master-key-password", None).unwrap();

        assert_ne!(a.salt(), b.salt());
        assert_ne!(a.key(), b.key());
    }

    #[test]
    fn generate_key_validates_password() {
        assert!(matches!(
            generate_key("short", None),
            Err(Error::Validation(_))
        ));
    }

    #[test]
    fn passbox_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PassBox>();
        assert_send_sync::<PassBox<ThreadRngBackend>>();
    }
}
