//! Cheap input checks that run before any cryptographic work.
//!
//! Every check returns a [`Validation`] instead of an error so callers can
//! branch on shape problems without error handling.

use crate::error::{Error, Result};

/// Minimum password length in UTF-16 code units.
pub const MIN_PASSWORD_LENGTH: usize = 8;
/// Maximum password length in UTF-16 code units.
pub const MAX_PASSWORD_LENGTH: usize = 1024;
/// Minimum plaintext length in bytes.
pub const MIN_TEXT_LENGTH: usize = 1;
/// Maximum plaintext length in UTF-8 bytes (10 MiB).
pub const MAX_TEXT_LENGTH: usize = 10 * 1024 * 1024;
/// Shortest encoded envelope or hash worth attempting to decode.
pub const MIN_ENCODED_LENGTH: usize = 20;

/// Outcome of a validation check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Validation {
    pub valid: bool,
    pub error: Option<String>,
}

impl Validation {
    fn ok() -> Self {
        Self {
            valid: true,
            error: None,
        }
    }

    fn fail(reason: impl Into<String>) -> Self {
        Self {
            valid: false,
            error: Some(reason.into()),
        }
    }

    /// Converts a failed check into [`Error::Validation`].
    pub fn into_result(self) -> Result<()> {
        match self.error {
            Some(reason) if !self.valid => Err(Error::Validation(reason)),
            _ => Ok(()),
        }
    }
}

pub fn validate_password(password: &str) -> Validation {
    if password.is_empty() {
        return Validation::fail("Password must be a non-empty string");
    }

    // UTF-16 units, so astral characters count twice
    let len = password.encode_utf16().count();
    if len < MIN_PASSWORD_LENGTH {
        return Validation::fail(format!(
            "Password must be at least {MIN_PASSWORD_LENGTH} characters"
        ));
    }
    if len > MAX_PASSWORD_LENGTH {
        return Validation::fail(format!(
            "Password must not exceed {MAX_PASSWORD_LENGTH} characters"
        ));
    }

    Validation::ok()
}

pub fn validate_text(text: &str) -> Validation {
    if text.len() < MIN_TEXT_LENGTH {
        return Validation::fail("Text cannot be empty");
    }
    if text.len() > MAX_TEXT_LENGTH {
        return Validation::fail(format!(
            "Text exceeds maximum size of {MAX_TEXT_LENGTH} bytes"
        ));
    }

    Validation::ok()
}

pub fn validate_encrypted_text(encoded: &str) -> Validation {
    check_encoded_shape(encoded, "Encrypted text")
}

pub fn validate_hash(hash: &str) -> Validation {
    check_encoded_shape(hash, "Hash")
}

fn check_encoded_shape(value: &str, what: &str) -> Validation {
    if value.is_empty() {
        return Validation::fail(format!("{what} must be a non-empty string"));
    }
    if value.len() < MIN_ENCODED_LENGTH {
        return Validation::fail(format!("{what} appears too short"));
    }
    if !is_base64_shaped(value) {
        return Validation::fail(format!("{what} is not valid Base64"));
    }

    Validation::ok()
}

/// `^[A-Za-z0-9+/]*={0,2}$`
fn is_base64_shaped(value: &str) -> bool {
    let body = value.trim_end_matches('=');
    let padding = value.len() - body.len();

    padding <= 2
        && body
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'+' || b == b'/')
}
