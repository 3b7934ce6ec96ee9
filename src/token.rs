//! Authenticated ciphertext token
//!
//! Seals plaintext under a 32-byte key with AES-256-GCM. The token layout is:
//! - nonce: 12 bytes, random per call
//! - ciphertext + 16-byte GCM tag: variable length
//!
//! Everything above this module treats the token as an opaque byte string;
//! only `seal` and `open` know about the embedded nonce.

use aes_gcm::aead::{Aead, KeyInit, OsRng};
use aes_gcm::{AeadCore, Aes256Gcm, Nonce};

use crate::error::{CryptainerError, ErrorCategory, ErrorKind, Result};
use crate::kdf::KEY_LEN;

/// Length of the AES-GCM nonce in bytes.
pub const NONCE_LEN: usize = 12;

/// Length of the GCM authentication tag in bytes.
pub const TAG_LEN: usize = 16;

/// Seal plaintext under `key`, generating a fresh random nonce.
///
/// Returns the token: nonce(12) + ciphertext + tag(16).
pub fn seal(key: &[u8; KEY_LEN], plaintext: &[u8]) -> Result<Vec<u8>> {
    let nonce = Aes256Gcm::generate_nonce(&mut OsRng);
    seal_with_nonce(key, plaintext, &nonce.into())
}

/// Seal plaintext under `key` with a caller-provided nonce.
///
/// This function is ONLY for testing purposes to generate deterministic
/// output. NEVER use this in production - always use `seal()` which
/// generates a random nonce per call.
pub fn seal_with_nonce(
    key: &[u8; KEY_LEN],
    plaintext: &[u8],
    nonce: &[u8; NONCE_LEN],
) -> Result<Vec<u8>> {
    let cipher = Aes256Gcm::new(key.into());
    let nonce_obj = Nonce::from_slice(nonce);
    let sealed = cipher.encrypt(nonce_obj, plaintext).map_err(|_| {
        CryptainerError::with_kind(
            ErrorCategory::Internal,
            ErrorKind::CipherFailure,
            "AES-GCM encryption failed",
        )
    })?;

    let mut token = Vec::with_capacity(NONCE_LEN + sealed.len());
    token.extend_from_slice(nonce);
    token.extend_from_slice(&sealed);
    Ok(token)
}

/// Open a token produced by `seal`, verifying its integrity.
///
/// Fails with `AuthenticationFailed` if the token is too short to contain a
/// nonce and tag, or if the GCM tag does not verify. A wrong key and a
/// tampered token are indistinguishable here, which is deliberate.
pub fn open(key: &[u8; KEY_LEN], token: &[u8]) -> Result<Vec<u8>> {
    if token.len() < NONCE_LEN + TAG_LEN {
        return Err(auth_failure());
    }

    let (nonce_bytes, sealed) = token.split_at(NONCE_LEN);
    let cipher = Aes256Gcm::new(key.into());
    let nonce_obj = Nonce::from_slice(nonce_bytes);
    let plaintext = cipher.decrypt(nonce_obj, sealed).map_err(|_| auth_failure())?;

    Ok(plaintext)
}

fn auth_failure() -> CryptainerError {
    CryptainerError::with_kind(
        ErrorCategory::User,
        ErrorKind::AuthenticationFailed,
        "corrupt input, tampered-with data, or bad password",
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: [u8; KEY_LEN] = [0x42u8; KEY_LEN];

    #[test]
    fn test_roundtrip() {
        let token = seal(&KEY, b"hello world").unwrap();
        let plaintext = open(&KEY, &token).unwrap();
        assert_eq!(plaintext, b"hello world");
    }

    #[test]
    fn test_empty_plaintext() {
        let token = seal(&KEY, b"").unwrap();
        assert_eq!(token.len(), NONCE_LEN + TAG_LEN);
        let plaintext = open(&KEY, &token).unwrap();
        assert_eq!(plaintext, b"");
    }

    #[test]
    fn test_deterministic_with_fixed_nonce() {
        let nonce = [9u8; NONCE_LEN];
        let t1 = seal_with_nonce(&KEY, b"payload", &nonce).unwrap();
        let t2 = seal_with_nonce(&KEY, b"payload", &nonce).unwrap();
        assert_eq!(t1, t2);
    }

    #[test]
    fn test_random_nonce_differs() {
        let t1 = seal(&KEY, b"payload").unwrap();
        let t2 = seal(&KEY, b"payload").unwrap();
        assert_ne!(t1, t2);
    }

    #[test]
    fn test_wrong_key() {
        let token = seal(&KEY, b"secret").unwrap();
        let other = [0x43u8; KEY_LEN];
        let err = open(&other, &token).expect_err("expected authentication failure");
        assert_eq!(err.kind, Some(crate::error::ErrorKind::AuthenticationFailed));
    }

    #[test]
    fn test_bit_flip_detected() {
        let mut token = seal(&KEY, b"secret").unwrap();
        let last = token.len() - 1;
        token[last] ^= 0x01;
        let err = open(&KEY, &token).expect_err("expected authentication failure");
        assert_eq!(err.kind, Some(crate::error::ErrorKind::AuthenticationFailed));
    }

    #[test]
    fn test_too_short_token() {
        let err = open(&KEY, &[0u8; NONCE_LEN]).expect_err("expected authentication failure");
        assert_eq!(err.kind, Some(crate::error::ErrorKind::AuthenticationFailed));
    }
}
