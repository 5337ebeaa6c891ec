//! Platform capabilities: secure randomness and PBKDF2.
//!
//! A backend is picked once, when a [`PassBox`](crate::PassBox) is built,
//! and every operation goes through it.

use pbkdf2::pbkdf2_hmac;
use rand::RngCore;
use sha2::Sha256;

use crate::error::{Error, Result};

/// Source of randomness and password stretching.
pub trait Backend: Send + Sync {
    /// Short identifier used in logs.
    fn name(&self) -> &'static str;

    /// Fill `buf` with cryptographically secure random bytes.
    fn fill_random(&self, buf: &mut [u8]) -> Result<()>;

    /// PBKDF2-HMAC-SHA256 of `password` and `salt` into `out`.
    fn pbkdf2_sha256(
        &self,
        password: &[u8],
        salt: &[u8],
        iterations: u32,
        out: &mut [u8],
    ) -> Result<()> {
        if iterations == 0 {
            return Err(Error::Platform("pbkdf2 needs at least one round".into()));
        }
        pbkdf2_hmac::<Sha256>(password, salt, iterations, out);
        Ok(())
    }
}

/// Operating-system CSPRNG via `getrandom`.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsBackend;

impl Backend for OsBackend {
    fn name(&self) -> &'static str {
        "os"
    }

    fn fill_random(&self, buf: &mut [u8]) -> Result<()> {
        getrandom::fill(buf).map_err(|e| {
            tracing::error!(error = %e, "OS random generator unavailable");
            Error::Platform("OS random generator unavailable".into())
        })
    }
}

/// Userspace CSPRNG (`rand::rng()`), periodically reseeded from the OS.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadRngBackend;

impl Backend for ThreadRngBackend {
    fn name(&self) -> &'static str {
        "thread-rng"
    }

    fn fill_random(&self, buf: &mut [u8]) -> Result<()> {
        rand::rng().fill_bytes(buf);
        Ok(())
    }
}

impl<B: Backend + ?Sized> Backend for &B {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn fill_random(&self, buf: &mut [u8]) -> Result<()> {
        (**self).fill_random(buf)
    }

    fn pbkdf2_sha256(
        &self,
        password: &[u8],
        salt: &[u8],
        iterations: u32,
        out: &mut [u8],
    ) -> Result<()> {
        (**self).pbkdf2_sha256(password, salt, iterations, out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fills_distinct_buffers(backend: &dyn Backend) {
        let mut a = [0u8; 32];
        let mut b = [0u8; 32];
        backend.fill_random(&mut a).unwrap();
        backend.fill_random(&mut b).unwrap();
        assert_ne!(a, b);
        assert_ne!(a, [0u8; 32]);
    }

    #[test]
    fn os_backend_fills_random() {
        fills_distinct_buffers(&OsBackend);
    }

    #[test]
    fn thread_rng_backend_fills_random() {
        fills_distinct_buffers(&ThreadRngBackend);
    }

    #[test]
    fn pbkdf2_matches_rfc_vector() {
        // RFC 7914 section 11, PBKDF2-HMAC-SHA256 P="passwd" S="salt" c=1
        let mut out = [0u8; 16];
        OsBackend
            .pbkdf2_sha256(b"passwd", b"salt", 1, &mut out)
            .unwrap();
        assert_eq!(
            out,
            [
                0x55, 0xac, 0x04, 0x6e, 0x56, 0xe3, 0x08, 0x9f, 0xec, 0x16, 0x91, 0xc2, 0x25, 0x44,
                0xb6, 0x05
            ]
        );
    }

    #[test]
    fn backends_agree_on_pbkdf2() {
        let mut a = [0u8; 32];
        let mut b = [0u8; 32];
        OsBackend.pbkdf2_sha256(b"pw", b"salt", 10, &mut a).unwrap();
        ThreadRngBackend
            .pbkdf2_sha256(b"pw", b"salt", 10, &mut b)
            .unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn zero_rounds_rejected() {
        let mut out = [0u8; 32];
        assert!(matches!(
            OsBackend.pbkdf2_sha256(b"pw", b"salt", 0, &mut out),
            Err(Error::Platform(_))
        ));
    }
}
