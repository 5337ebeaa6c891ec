//! Envelope layout.
//!
//! ```text
//! SALT (16) | NONCE (24) | CIPHERTEXT + TAG (>= 1)
//! ```

use crate::{
    crypto::{NONCE_LEN, SALT_LEN},
    error::{Error, Result},
};

/// Shortest buffer that can be an envelope.
pub const MIN_ENVELOPE_LEN: usize = SALT_LEN + NONCE_LEN + 1;

/// An envelope split into its components.
#[derive(Debug)]
pub struct SealedParts<'a> {
    pub salt: &'a [u8; SALT_LEN],
    pub nonce: &'a [u8; NONCE_LEN],
    pub ciphertext: &'a [u8],
}

impl<'a> SealedParts<'a> {
    /// Splits a decoded envelope.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TooShort`] when `data` cannot hold a salt, a nonce
    /// and at least one ciphertext byte.
    pub fn parse(data: &'a [u8]) -> Result<Self> {
        if data.len() < MIN_ENVELOPE_LEN {
            return Err(Error::TooShort {
                len: data.len(),
                min: MIN_ENVELOPE_LEN,
            });
        }

        let (salt, rest) = data.split_at(SALT_LEN);
        let (nonce, ciphertext) = rest.split_at(NONCE_LEN);

        Ok(Self {
            salt: salt.try_into().map_err(|_| Error::validation("invalid salt length"))?,
            nonce: nonce.try_into().map_err(|_| Error::validation("invalid nonce length"))?,
            ciphertext,
        })
    }

    /// Joins the components into one buffer.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(SALT_LEN + NONCE_LEN + self.ciphertext.len());

        buf.extend_from_slice(self.salt);
        buf.extend_from_slice(self.nonce);
        buf.extend_from_slice(self.ciphertext);

        buf
    }
}
