use std::fmt;

use zeroize::Zeroizing;

use super::{Backend, KEY_LEN, PBKDF2_ITERATIONS, SALT_LEN};
use crate::error::{Error, Result};

/// Derive the envelope key from a password and salt.
///
/// PBKDF2-HMAC-SHA256 with fixed rounds and output length; identical inputs
/// always give the identical key.
pub fn derive_key<B: Backend + ?Sized>(
    backend: &B,
    password: &str,
    salt: &[u8],
) -> Result<Zeroizing<[u8; KEY_LEN]>> {
    let mut key = Zeroizing::new([0u8; KEY_LEN]);
    backend.pbkdf2_sha256(password.as_bytes(), salt, PBKDF2_ITERATIONS, &mut key[..])?;
    Ok(key)
}

/// A derived key held by the caller for reuse, with the salt it came from.
///
/// The key is wiped when dropped and never shows up in `Debug` output.
#[derive(Clone)]
pub struct GeneratedKey {
    key: Zeroizing<[u8; KEY_LEN]>,
    salt: [u8; SALT_LEN],
}

impl GeneratedKey {
    pub(crate) fn derive<B: Backend + ?Sized>(
        backend: &B,
        password: &str,
        salt: Option<&[u8]>,
    ) -> Result<Self> {
        let salt: [u8; SALT_LEN] = match salt {
            Some(s) => s.try_into().map_err(|_| {
                Error::Validation(format!("Salt must be exactly {SALT_LEN} bytes"))
            })?,
            None => {
                let mut fresh = [0u8; SALT_LEN];
                backend.fill_random(&mut fresh)?;
                fresh
            }
        };

        let key = derive_key(backend, password, &salt)?;
        Ok(Self { key, salt })
    }

    pub fn key(&self) -> &[u8; KEY_LEN] {
        &self.key
    }

    pub fn salt(&self) -> &[u8; SALT_LEN] {
        &self.salt
    }
}

impl fmt::Debug for GeneratedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeneratedKey")
            .field("key", &"[REDACTED]")
            .field("salt", &self.salt)
            .finish()
    }
}
