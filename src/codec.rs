//! Envelope encryption and decryption.

use tracing::{debug, trace};

use crate::{
    PassBox,
    crypto::{self, Backend, GeneratedKey, KEY_LEN, NONCE_LEN, SALT_LEN},
    error::{Error, Result},
    format::{self, Envelope, Format, SealedParts},
    validation::{validate_encrypted_text, validate_password, validate_text},
};

impl<B: Backend> PassBox<B> {
    /// Encrypts `text` under a key derived from `password` and a fresh salt.
    ///
    /// Two calls with the same inputs never return the same envelope.
    ///
    /// # Errors
    ///
    /// [`Error::Validation`] for a weak password or empty/oversized text,
    /// before any key derivation runs.
    pub fn encrypt(&self, text: &str, password: &str, format: Format) -> Result<Envelope> {
        validate_password(password).into_result()?;
        validate_text(text).into_result()?;

        let salt = self.fresh::<SALT_LEN>()?;
        let key = crypto::derive_key(&self.backend, password, &salt)?;

        self.seal_with(&key, &salt, text, format)
    }

    /// Decrypts an envelope back into text.
    ///
    /// # Errors
    ///
    /// - [`Error::Validation`] for a bad password or malformed base64,
    /// - [`Error::TooShort`] when the decoded envelope is truncated,
    /// - [`Error::DecryptionFailed`] for a wrong password or any corruption,
    /// - [`Error::Format`] when the authenticated payload is not UTF-8.
    pub fn decrypt(&self, envelope: &Envelope, password: &str) -> Result<String> {
        validate_password(password).into_result()?;

        let buf = envelope_bytes(envelope)?;
        let parts = SealedParts::parse(&buf)?;
        let key = crypto::derive_key(&self.backend, password, parts.salt)?;

        open_parts(&key, &parts)
    }

    /// Encrypts with a key from [`generate_key`](Self::generate_key),
    /// skipping password stretching.
    ///
    /// The envelope embeds the key's salt, so `decrypt` with the original
    /// password opens it too.
    pub fn encrypt_with_key(
        &self,
        text: &str,
        key: &GeneratedKey,
        format: Format,
    ) -> Result<Envelope> {
        validate_text(text).into_result()?;
        self.seal_with(key.key(), key.salt(), text, format)
    }

    /// Decrypts with a caller-held key. The envelope must carry the key's salt.
    pub fn decrypt_with_key(&self, envelope: &Envelope, key: &GeneratedKey) -> Result<String> {
        let buf = envelope_bytes(envelope)?;
        let parts = SealedParts::parse(&buf)?;

        // a different salt means a different key; report it like any other
        // authentication failure
        if parts.salt != key.salt() {
            debug!("envelope salt does not match the supplied key");
            return Err(Error::DecryptionFailed);
        }

        open_parts(key.key(), &parts)
    }

    fn seal_with(
        &self,
        key: &[u8; KEY_LEN],
        salt: &[u8; SALT_LEN],
        text: &str,
        format: Format,
    ) -> Result<Envelope> {
        let nonce = self.fresh::<NONCE_LEN>()?;
        let ciphertext = crypto::seal(key, &nonce, text.as_bytes())?;

        let buf = SealedParts {
            salt,
            nonce: &nonce,
            ciphertext: &ciphertext,
        }
        .to_bytes();

        debug!(?format, len = buf.len(), "sealed envelope");
        Ok(Envelope::from_buffer(buf, format))
    }
}

/// Decoded envelope bytes. Only encoded input is shape-checked.
fn envelope_bytes(envelope: &Envelope) -> Result<Vec<u8>> {
    match envelope {
        Envelope::Encoded(text) => {
            validate_encrypted_text(text).into_result()?;
            format::decode(text)
        }
        Envelope::Raw(bytes) => Ok(bytes.clone()),
    }
}

fn open_parts(key: &[u8; KEY_LEN], parts: &SealedParts<'_>) -> Result<String> {
    let plaintext = crypto::open(key, parts.nonce, parts.ciphertext).inspect_err(|_| {
        debug!(len = parts.ciphertext.len(), "envelope failed authentication");
    })?;

    let text = std::str::from_utf8(&plaintext)
        .map_err(|_| Error::Format("UTF-8 text".into()))?
        .to_owned();
    trace!(len = text.len(), "opened envelope");

    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::{OsBackend, TAG_LEN};
    use crate::format::envelope::MIN_ENVELOPE_LEN;

    const PASSWORD: &str = "secure-password-123";

    fn pb() -> PassBox<OsBackend> {
        PassBox::new()
    }

    #[test]
    fn encoded_roundtrip() {
        let env = pb()
            .encrypt("Secret message for secure transmission", PASSWORD, Format::Encoded)
            .unwrap();

        assert_eq!(env.format(), Format::Encoded);
        assert_eq!(
            pb().decrypt(&env, PASSWORD).unwrap(),
            "Secret message for secure transmission"
        );
    }

    #[test]
    fn raw_roundtrip_and_layout() {
        let env = pb().encrypt("hello", PASSWORD, Format::Raw).unwrap();
        let raw = env.as_raw().unwrap();

        assert_eq!(raw.len(), SALT_LEN + NONCE_LEN + "hello".len() + TAG_LEN);
        assert_eq!(pb().decrypt(&env, PASSWORD).unwrap(), "hello");
    }

    #[test]
    fn wrong_password_is_generic_failure() {
        let env = pb().encrypt("hello", PASSWORD, Format::Encoded).unwrap();
        let err = pb().decrypt(&env, "wrong-password").unwrap_err();

        assert!(matches!(err, Error::DecryptionFailed));
        assert_eq!(
            err.to_string(),
            "Decryption failed - wrong password or corrupted data"
        );
    }

    #[test]
    fn validation_runs_before_crypto() {
        assert!(matches!(
            pb().encrypt("", PASSWORD, Format::Encoded),
            Err(Error::Validation(_))
        ));
        assert!(matches!(
            pb().encrypt("hello", "1234567", Format::Encoded),
            Err(Error::Validation(_))
        ));
        assert!(matches!(
            pb().decrypt(&Envelope::from("not base64!"), PASSWORD),
            Err(Error::Validation(_))
        ));
    }

    #[test]
    fn truncated_raw_is_too_short() {
        let err = pb()
            .decrypt(&Envelope::Raw(vec![0u8; MIN_ENVELOPE_LEN - 1]), PASSWORD)
            .unwrap_err();
        assert!(matches!(err, Error::TooShort { .. }));
    }

    #[test]
    fn shape_valid_garbage_fails_authentication() {
        let garbage = format::encode(&[0xAAu8; MIN_ENVELOPE_LEN + TAG_LEN]);
        let err = pb().decrypt(&Envelope::Encoded(garbage), PASSWORD).unwrap_err();
        assert!(matches!(err, Error::DecryptionFailed));
    }

    #[test]
    fn non_utf8_payload_is_format_error() {
        let key = pb().generate_key(PASSWORD, None).unwrap();
        let nonce = [5u8; NONCE_LEN];
        let ciphertext = crypto::seal(key.key(), &nonce, &[0xFF, 0xFE, 0xFD]).unwrap();
        let buf = SealedParts {
            salt: key.salt(),
            nonce: &nonce,
            ciphertext: &ciphertext,
        }
        .to_bytes();

        let err = pb().decrypt(&Envelope::Raw(buf), PASSWORD).unwrap_err();
        assert!(matches!(err, Error::Format(_)));
    }

    #[test]
    fn key_reuse_envelopes_open_with_password() {
        let key = pb().generate_key(PASSWORD, None).unwrap();

        let a = pb().encrypt_with_key("first", &key, Format::Encoded).unwrap();
        let b = pb().encrypt_with_key("second", &key, Format::Raw).unwrap();

        assert_eq!(pb().decrypt_with_key(&a, &key).unwrap(), "first");
        assert_eq!(pb().decrypt_with_key(&b, &key).unwrap(), "second");
        assert_eq!(pb().decrypt(&a, PASSWORD).unwrap(), "first");
    }

    #[test]
    fn key_reuse_rejects_foreign_salt() {
        let key = pb().generate_key(PASSWORD, None).unwrap();
        let env = pb().encrypt("hello", PASSWORD, Format::Encoded).unwrap();

        assert!(matches!(
            pb().decrypt_with_key(&env, &key),
            Err(Error::DecryptionFailed)
        ));
    }
}
