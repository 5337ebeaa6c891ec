use thiserror::Error;

/// Errors returned by the fallible passbox operations.
///
/// Authentication failures are deliberately reported through a single
/// variant: a wrong password and a tampered envelope look the same.
#[derive(Debug, Error)]
pub enum Error {
    /// Input rejected before any cryptographic work ran.
    #[error("{0}")]
    Validation(String),

    /// Decoded envelope is too short to hold salt, nonce and a tag.
    #[error("encrypted data too short: {len} bytes, expected at least {min}")]
    TooShort { len: usize, min: usize },

    /// Tag verification failed: wrong password or corrupted data.
    #[error("Decryption failed - wrong password or corrupted data")]
    DecryptionFailed,

    /// Authentication succeeded but the payload has an unexpected shape.
    #[error("decrypted payload is not {0}")]
    Format(String),

    #[error("encryption failed: {0}")]
    Encryption(String),

    /// Secure random source or key derivation unavailable.
    #[error("platform failure: {0}")]
    Platform(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn validation(msg: impl Into<String>) -> Self {
        Error::Validation(msg.into())
    }
}
