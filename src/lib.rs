//! Password-based file encryption producing self-describing containers.
//!
//! A container embeds everything needed to reverse the operation except the
//! password itself:
//!
//! ```text
//! [4-byte big-endian length][JSON metadata: filename, salt, version][AES-GCM token]
//! ```
//!
//! Keys are derived from the password with PBKDF2-HMAC-SHA256 (100,000
//! iterations) over a fresh 16-byte random salt per encryption; the plaintext
//! is sealed with AES-256-GCM. Decryption either returns the exact original
//! plaintext plus the recorded filename, or fails with a classified error
//! (see [`error::ErrorKind`]) - it never returns unauthenticated data.
//!
//! The codec in [`container`] is pure buffer-in/buffer-out; [`file_ops`]
//! layers filesystem handling on top for the CLI.

pub mod container;
pub mod error;
pub mod file_ops;
pub mod kdf;
pub mod metadata;
pub mod password;
pub mod token;
