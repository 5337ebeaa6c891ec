//! Cryptographic primitives behind the envelope.
//!
//! Provides the random/KDF capability backends, PBKDF2 key derivation and
//! the XSalsa20-Poly1305 secretbox.

pub mod aead;
pub mod backend;
pub mod kdf;

pub use aead::{open, seal};
pub use backend::{Backend, OsBackend, ThreadRngBackend};
pub use kdf::{GeneratedKey, derive_key};

/// Length of the salt (16 bytes).
pub const SALT_LEN: usize = 16;
/// Length of the nonce (24 bytes for XSalsa20-Poly1305).
pub const NONCE_LEN: usize = 24;
/// Length of the derived key (32 bytes / 256 bits).
pub const KEY_LEN: usize = 32;
/// Length of the Poly1305 authentication tag.
pub const TAG_LEN: usize = 16;
/// PBKDF2 rounds.
pub const PBKDF2_ITERATIONS: u32 = 100_000;
/// PBKDF2 HMAC digest.
pub const PBKDF2_DIGEST: &str = "sha256";
/// Upper bound for a single `random_bytes` request.
pub const MAX_RANDOM_BYTES: usize = 65_536;
