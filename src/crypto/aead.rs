use crypto_secretbox::{
    XSalsa20Poly1305,
    aead::{Aead, KeyInit, Nonce},
};
use zeroize::Zeroizing;

use super::{KEY_LEN, NONCE_LEN};
use crate::error::{Error, Result};

fn cipher(key: &[u8; KEY_LEN]) -> Result<XSalsa20Poly1305> {
    XSalsa20Poly1305::new_from_slice(key).map_err(|e| Error::Encryption(e.to_string()))
}

/// Encrypt plaintext; the returned ciphertext carries the Poly1305 tag.
pub fn seal(key: &[u8; KEY_LEN], nonce: &[u8; NONCE_LEN], plaintext: &[u8]) -> Result<Vec<u8>> {
    cipher(key)?
        .encrypt(Nonce::<XSalsa20Poly1305>::from_slice(nonce), plaintext)
        .map_err(|_| Error::Encryption("secretbox refused plaintext".into()))
}

/// Decrypt ciphertext
pub fn open(
    key: &[u8; KEY_LEN],
    nonce: &[u8; NONCE_LEN],
    ciphertext: &[u8],
) -> Result<Zeroizing<Vec<u8>>> {
    let plaintext = cipher(key)?
        .decrypt(Nonce::<XSalsa20Poly1305>::from_slice(nonce), ciphertext)
        .map_err(|_| Error::DecryptionFailed)?;
    Ok(Zeroizing::new(plaintext))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::TAG_LEN;

    const KEY: [u8; KEY_LEN] = [7u8; KEY_LEN];
    const NONCE: [u8; NONCE_LEN] = [3u8; NONCE_LEN];

    #[test]
    fn seal_open_roundtrip() {
        let ct = seal(&KEY, &NONCE, b"secret data").unwrap();
        let pt = open(&KEY, &NONCE, &ct).unwrap();
        assert_eq!(pt.as_slice(), b"secret data");
    }

    #[test]
    fn ciphertext_expands_by_tag() {
        let ct = seal(&KEY, &NONCE, b"abc").unwrap();
        assert_eq!(ct.len(), 3 + TAG_LEN);

        let empty = seal(&KEY, &NONCE, b"").unwrap();
        assert_eq!(empty.len(), TAG_LEN);
    }

    #[test]
    fn wrong_key_fails() {
        let ct = seal(&KEY, &NONCE, b"secret").unwrap();
        let err = open(&[8u8; KEY_LEN], &NONCE, &ct).unwrap_err();
        assert!(matches!(err, Error::DecryptionFailed));
    }

    #[test]
    fn wrong_nonce_fails() {
        let ct = seal(&KEY, &NONCE, b"secret").unwrap();
        assert!(open(&KEY, &[4u8; NONCE_LEN], &ct).is_err());
    }

    #[test]
    fn tampered_ciphertext_fails() {
        let mut ct = seal(&KEY, &NONCE, b"secret").unwrap();
        let last = ct.len() - 1;
        ct[last] ^= 0x01;
        assert!(matches!(open(&KEY, &NONCE, &ct), Err(Error::DecryptionFailed)));
    }

    #[test]
    fn truncated_ciphertext_fails() {
        assert!(matches!(
            open(&KEY, &NONCE, &[0u8; TAG_LEN - 1]),
            Err(Error::DecryptionFailed)
        ));
    }
}
