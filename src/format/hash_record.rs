//! Stored password hash layout.
//!
//! ```text
//! SALT (16) | PBKDF2 OUTPUT (32)
//! ```
//!
//! Always exchanged as base64 text.

use super::{decode, encode};
use crate::{
    crypto::{KEY_LEN, SALT_LEN},
    error::{Error, Result},
};

pub const HASH_RECORD_LEN: usize = SALT_LEN + KEY_LEN;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HashRecord {
    salt: [u8; SALT_LEN],
    derived: [u8; KEY_LEN],
}

impl HashRecord {
    pub fn new(salt: [u8; SALT_LEN], derived: [u8; KEY_LEN]) -> Self {
        Self { salt, derived }
    }

    pub fn salt(&self) -> &[u8; SALT_LEN] {
        &self.salt
    }

    pub fn derived(&self) -> &[u8; KEY_LEN] {
        &self.derived
    }

    pub fn encode(&self) -> String {
        let mut buf = Vec::with_capacity(HASH_RECORD_LEN);
        buf.extend_from_slice(&self.salt);
        buf.extend_from_slice(&self.derived);
        encode(&buf)
    }

    /// Parses base64 text holding exactly salt and derived bytes.
    pub fn decode(text: &str) -> Result<Self> {
        let bytes = decode(text)?;
        if bytes.len() != HASH_RECORD_LEN {
            return Err(Error::Validation(format!(
                "hash must decode to {HASH_RECORD_LEN} bytes, got {}",
                bytes.len()
            )));
        }

        let (salt, derived) = bytes.split_at(SALT_LEN);
        Ok(Self {
            salt: salt.try_into().map_err(|_| Error::validation("invalid salt length"))?,
            derived: derived
                .try_into()
                .map_err(|_| Error::validation("invalid hash length"))?,
        })
    }
}
