//! Wire format of envelopes and password hashes.
//!
//! Provides the output-mode enumeration, the envelope container and the
//! byte layouts shared by encryption and hashing.

use base64::{Engine, engine::general_purpose::STANDARD};

use crate::error::{Error, Result};

pub mod envelope;
pub mod hash_record;

pub use envelope::SealedParts;
pub use hash_record::HashRecord;

/// How an envelope is presented to the caller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Format {
    /// Standard base64 text with padding.
    #[default]
    Encoded,
    /// The bare `salt ‖ nonce ‖ ciphertext` bytes.
    Raw,
}

/// Output of one encryption call and input of the matching decryption.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Envelope {
    Encoded(String),
    Raw(Vec<u8>),
}

impl Envelope {
    pub fn format(&self) -> Format {
        match self {
            Envelope::Encoded(_) => Format::Encoded,
            Envelope::Raw(_) => Format::Raw,
        }
    }

    /// Base64 text, when this is an encoded envelope.
    pub fn as_encoded(&self) -> Option<&str> {
        match self {
            Envelope::Encoded(s) => Some(s),
            Envelope::Raw(_) => None,
        }
    }

    /// Raw bytes, when this is a raw envelope.
    pub fn as_raw(&self) -> Option<&[u8]> {
        match self {
            Envelope::Raw(b) => Some(b),
            Envelope::Encoded(_) => None,
        }
    }

    /// Bytes as they would be written to a file or socket.
    pub fn into_bytes(self) -> Vec<u8> {
        match self {
            Envelope::Encoded(s) => s.into_bytes(),
            Envelope::Raw(b) => b,
        }
    }

    /// Present `buf` in the requested format.
    pub(crate) fn from_buffer(buf: Vec<u8>, format: Format) -> Self {
        match format {
            Format::Encoded => Envelope::Encoded(encode(&buf)),
            Format::Raw => Envelope::Raw(buf),
        }
    }
}

impl From<String> for Envelope {
    fn from(encoded: String) -> Self {
        Envelope::Encoded(encoded)
    }
}

impl From<&str> for Envelope {
    fn from(encoded: &str) -> Self {
        Envelope::Encoded(encoded.to_owned())
    }
}

impl From<Vec<u8>> for Envelope {
    fn from(raw: Vec<u8>) -> Self {
        Envelope::Raw(raw)
    }
}

pub(crate) fn encode(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

pub(crate) fn decode(text: &str) -> Result<Vec<u8>> {
    STANDARD
        .decode(text)
        .map_err(|e| Error::Validation(format!("invalid Base64 encoding: {e}")))
}
