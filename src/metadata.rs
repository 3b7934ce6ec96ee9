//! Container metadata block
//!
//! The metadata block carries everything besides the password that is needed
//! to reverse an encryption: the original filename, the KDF salt (base64),
//! and the container format version. It is serialized as compact JSON and
//! embedded length-prefixed at the front of the container.

use base64::{Engine, engine::general_purpose::STANDARD as BASE64_STANDARD};
use serde::{Deserialize, Serialize};

use crate::error::{CryptainerError, ErrorCategory, ErrorKind, Result};

/// Version string written into every newly produced container.
pub const CURRENT_VERSION: &str = "v1";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Metadata {
    /// Original filename of the plaintext, recorded verbatim. Consumers must
    /// treat this as untrusted input before using it for any storage path.
    pub filename: String,
    /// KDF salt, base64 (standard alphabet, padded).
    pub salt: String,
    /// Container format version.
    pub version: String,
}

impl Metadata {
    /// Build metadata for a new container at the current version.
    pub fn new(filename: impl Into<String>, salt: &[u8]) -> Self {
        Self {
            filename: filename.into(),
            salt: BASE64_STANDARD.encode(salt),
            version: CURRENT_VERSION.to_string(),
        }
    }

    /// Serialize to the compact JSON form stored in the container.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        serde_json::to_vec(self).map_err(|e| {
            CryptainerError::with_source(
                ErrorCategory::Internal,
                "failed to serialize container metadata",
                e,
            )
        })
    }

    /// Parse a metadata block out of the container.
    ///
    /// Rejects blocks that are not valid JSON, lack a required field, or
    /// declare a version this build does not understand. The salt is not
    /// decoded here; use [`Metadata::salt_bytes`].
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        let metadata: Metadata = serde_json::from_slice(bytes).map_err(|e| {
            CryptainerError::with_kind_and_source(
                ErrorCategory::User,
                ErrorKind::MalformedMetadata,
                "container metadata is not valid JSON with the required fields",
                e,
            )
        })?;

        if metadata.version != CURRENT_VERSION {
            return Err(CryptainerError::with_kind(
                ErrorCategory::User,
                ErrorKind::UnsupportedVersion,
                format!(
                    "container declares version {:?}, but only {:?} is supported",
                    metadata.version, CURRENT_VERSION
                ),
            ));
        }

        Ok(metadata)
    }

    /// Decode the embedded salt back to raw bytes.
    pub fn salt_bytes(&self) -> Result<Vec<u8>> {
        BASE64_STANDARD.decode(&self.salt).map_err(|e| {
            CryptainerError::with_kind_and_source(
                ErrorCategory::User,
                ErrorKind::MalformedMetadata,
                "container metadata carries a salt that is not valid base64",
                e,
            )
        })
    }
}
