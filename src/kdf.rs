//! Password-based key derivation
//!
//! Stretches a user-supplied password into a 32-byte symmetric key using
//! PBKDF2-HMAC-SHA256 with a fixed, deliberately high iteration count. The
//! container format and salt are assumed known to an attacker, so the slow
//! derivation is the primary defense against password guessing.

use pbkdf2::pbkdf2_hmac;
use sha2::Sha256;

/// Length of the derived key in bytes (suitable for AES-256).
pub const KEY_LEN: usize = 32;

/// Length of the salt generated at encryption time, in bytes.
pub const SALT_LEN: usize = 16;

/// PBKDF2 iteration count. Fixed for all v1 containers; raising it is a
/// format change.
pub const PBKDF2_ITERATIONS: u32 = 100_000;

/// Derive a 32-byte key from a password and salt.
///
/// Deterministic: the same (password, salt) pair always yields the same key.
/// An empty password is accepted and simply yields a weak-but-valid key.
/// The salt is taken as-is; callers generating fresh salts use [`SALT_LEN`]
/// bytes from a CSPRNG.
pub fn derive_key(password: &[u8], salt: &[u8]) -> [u8; KEY_LEN] {
    let mut key = [0u8; KEY_LEN];
    pbkdf2_hmac::<Sha256>(password, salt, PBKDF2_ITERATIONS, &mut key);
    key
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deterministic() {
        let salt = [7u8; SALT_LEN];
        let k1 = derive_key(b"hunter2", &salt);
        let k2 = derive_key(b"hunter2", &salt);
        assert_eq!(k1, k2);
    }

    #[test]
    fn test_different_salt_different_key() {
        let k1 = derive_key(b"hunter2", &[1u8; SALT_LEN]);
        let k2 = derive_key(b"hunter2", &[2u8; SALT_LEN]);
        assert_ne!(k1, k2);
    }

    #[test]
    fn test_different_password_different_key() {
        let salt = [7u8; SALT_LEN];
        let k1 = derive_key(b"hunter2", &salt);
        let k2 = derive_key(b"hunter3", &salt);
        assert_ne!(k1, k2);
    }

    #[test]
    fn test_empty_password_accepted() {
        let salt = [7u8; SALT_LEN];
        let key = derive_key(b"", &salt);
        assert_ne!(key, [0u8; KEY_LEN]);
    }

    #[test]
    fn test_non_utf8_password() {
        let salt = [7u8; SALT_LEN];
        let k1 = derive_key(&[0xff, 0xfe, 0x00, 0x01], &salt);
        let k2 = derive_key(&[0xff, 0xfe, 0x00, 0x01], &salt);
        assert_eq!(k1, k2);
    }
}
