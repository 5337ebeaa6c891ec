//! Salted password hashing.

use subtle::ConstantTimeEq;
use tracing::debug;

use crate::{
    PassBox,
    crypto::{self, Backend, SALT_LEN},
    error::{Error, Result},
    format::HashRecord,
    validation::{validate_hash, validate_password},
};

impl<B: Backend> PassBox<B> {
    /// Hashes a password for storage as `base64(salt ‖ pbkdf2)`.
    ///
    /// Every call uses a fresh salt, so hashing the same password twice
    /// gives two different strings.
    pub fn hash(&self, password: &str) -> Result<String> {
        validate_password(password)
            .into_result()
            .map_err(|e| Error::Validation(format!("Invalid password: {e}")))?;

        let salt = self.fresh::<SALT_LEN>()?;
        let derived = crypto::derive_key(&self.backend, password, &salt)?;

        Ok(HashRecord::new(salt, *derived).encode())
    }

    /// Checks `password` against a stored hash in constant time.
    ///
    /// Malformed input of any kind is a plain `false`; this never errors.
    pub fn verify_hash(&self, password: &str, stored_hash: &str) -> bool {
        if !validate_password(password).valid || !validate_hash(stored_hash).valid {
            return false;
        }

        let record = match HashRecord::decode(stored_hash) {
            Ok(record) => record,
            Err(e) => {
                debug!(error = %e, "stored hash rejected");
                return false;
            }
        };

        match crypto::derive_key(&self.backend, password, record.salt()) {
            Ok(candidate) => candidate[..].ct_eq(&record.derived()[..]).into(),
            Err(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format;

    const PASSWORD: &str = "user-secure-password-456";

    #[test]
    fn hash_is_salted() {
        let pb = PassBox::new();
        let h1 = pb.hash(PASSWORD).unwrap();
        let h2 = pb.hash(PASSWORD).unwrap();

        assert_ne!(h1, h2);
        assert!(pb.verify_hash(PASSWORD, &h1));
        assert!(pb.verify_hash(PASSWORD, &h2));
    }

    #[test]
    fn other_password_does_not_verify() {
        let pb = PassBox::new();
        let h = pb.hash(PASSWORD).unwrap();

        assert!(!pb.verify_hash("wrong-password", &h));
        assert!(!pb.verify_hash("user-secure-password-457", &h));
    }

    #[test]
    fn hash_rejects_weak_password() {
        let err = PassBox::new().hash("short").unwrap_err();
        assert!(matches!(err, Error::Validation(ref m) if m.starts_with("Invalid password")));
    }

    #[test]
    fn malformed_hashes_are_false() {
        let pb = PassBox::new();
        let good = pb.hash(PASSWORD).unwrap();

        let truncated = format::encode(&[0u8; SALT_LEN + 8]);
        let oversized = format::encode(&[0u8; 64]);

        for stored in [
            "",
            "abc",
            "this is not base64 but is long enough",
            "QUJDREVGR0hJSktMTU5PUFFSU1RVVg",
            truncated.as_str(),
            oversized.as_str(),
            &good[..good.len() - 4],
        ] {
            assert!(!pb.verify_hash(PASSWORD, stored), "accepted {stored:?}");
        }
    }

    #[test]
    fn weak_candidate_is_false() {
        let pb = PassBox::new();
        let good = pb.hash(PASSWORD).unwrap();
        assert!(!pb.verify_hash("", &good));
        assert!(!pb.verify_hash("1234567", &good));
    }
}
