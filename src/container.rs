//! Container encoding/decoding
//!
//! This module implements password-based encryption of a plaintext buffer
//! into a single self-describing container, and the inverse operation. The
//! container binary format is:
//! - length: 4 bytes (big-endian u32) = L, the metadata block length
//! - metadata: L bytes of JSON { filename, salt(base64), version }
//! - authenticated ciphertext token: all remaining bytes
//!
//! Decryption is a two-phase parse-then-decrypt sequence: every structural
//! check happens before the key is derived, so a malformed container never
//! pays the deliberately slow KDF cost.

use rand::RngCore;
use rand::rngs::OsRng;
use zeroize::Zeroize;

use crate::error::{CryptainerError, ErrorCategory, ErrorKind, Result};
use crate::kdf::{self, SALT_LEN};
use crate::metadata::Metadata;
use crate::token;

/// Length of the metadata length prefix in bytes.
const LEN_PREFIX: usize = 4;

/// Result of a successful decryption.
#[derive(Debug, PartialEq, Eq)]
pub struct Decrypted {
    /// The recovered plaintext, byte-for-byte identical to the original.
    pub plaintext: Vec<u8>,
    /// The original filename recorded at encryption time. Untrusted input:
    /// sanitize before using it for any storage path.
    pub filename: String,
}

/// Encrypt plaintext with a password into a self-contained container.
///
/// A fresh 16-byte salt is generated per call, so encrypting the same
/// plaintext with the same password twice yields different containers.
/// Nothing besides the correct password is needed to decrypt the result.
pub fn encrypt(password: &[u8], plaintext: &[u8], filename: &str) -> Result<Vec<u8>> {
    let mut salt = [0u8; SALT_LEN];
    OsRng.fill_bytes(&mut salt);

    let mut key = kdf::derive_key(password, &salt);
    let sealed = token::seal(&key, plaintext);
    key.zeroize();
    let sealed = sealed?;

    assemble(&salt, filename, &sealed)
}

/// Encrypt with a caller-provided salt and nonce.
///
/// This function is ONLY for testing purposes to generate deterministic
/// output. NEVER use this in production - always use `encrypt()` which
/// generates random salt and nonce per call.
pub fn encrypt_with_salt_and_nonce(
    password: &[u8],
    plaintext: &[u8],
    filename: &str,
    salt: &[u8; SALT_LEN],
    nonce: &[u8; token::NONCE_LEN],
) -> Result<Vec<u8>> {
    let mut key = kdf::derive_key(password, salt);
    let sealed = token::seal_with_nonce(&key, plaintext, nonce);
    key.zeroize();

    assemble(salt, filename, &sealed?)
}

fn assemble(salt: &[u8], filename: &str, sealed: &[u8]) -> Result<Vec<u8>> {
    let metadata = Metadata::new(filename, salt);
    let metadata_bytes = metadata.to_bytes()?;
    let metadata_len = u32::try_from(metadata_bytes.len()).map_err(|_| {
        CryptainerError::new(
            ErrorCategory::Internal,
            "metadata block exceeds the maximum length encodable in the container",
        )
    })?;

    let mut container = Vec::with_capacity(LEN_PREFIX + metadata_bytes.len() + sealed.len());
    container.extend_from_slice(&metadata_len.to_be_bytes());
    container.extend_from_slice(&metadata_bytes);
    container.extend_from_slice(sealed);

    Ok(container)
}

/// Decrypt a container with a password.
///
/// Either returns the exact original plaintext plus the recorded filename,
/// or fails with a classified error - never partially decrypted or
/// unauthenticated data.
pub fn decrypt(password: &[u8], container: &[u8]) -> Result<Decrypted> {
    if container.len() < LEN_PREFIX {
        return Err(malformed(
            "input likely truncated while reading metadata length",
        ));
    }
    let length_bytes: [u8; LEN_PREFIX] = container[..LEN_PREFIX].try_into().map_err(|_| {
        CryptainerError::new(ErrorCategory::Internal, "failed to read metadata length")
    })?;
    let metadata_len = u32::from_be_bytes(length_bytes) as usize;

    if container.len() - LEN_PREFIX < metadata_len {
        return Err(malformed(
            "truncated or corrupt input; metadata length greater than available input",
        ));
    }
    let metadata_bytes = &container[LEN_PREFIX..LEN_PREFIX + metadata_len];
    let sealed = &container[LEN_PREFIX + metadata_len..];

    let metadata = Metadata::parse(metadata_bytes)?;
    let salt = metadata.salt_bytes()?;

    if sealed.is_empty() {
        return Err(malformed("container holds no ciphertext"));
    }
    if salt.is_empty() {
        return Err(malformed("container metadata holds an empty salt"));
    }

    // Structural validation complete; only now pay for key derivation.
    let mut key = kdf::derive_key(password, &salt);
    let plaintext = token::open(&key, sealed);
    key.zeroize();

    Ok(Decrypted {
        plaintext: plaintext?,
        filename: metadata.filename,
    })
}

fn malformed(msg: &str) -> CryptainerError {
    CryptainerError::with_kind(ErrorCategory::User, ErrorKind::MalformedContainer, msg)
}
