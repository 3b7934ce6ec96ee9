//! File encryption/decryption operations
//!
//! High-level glue between the filesystem and the container codec. The codec
//! itself never touches storage; this module owns reading inputs, choosing
//! output paths, and writing results with restrictive permissions.

use crate::container;
use crate::error::{CryptainerError, ErrorCategory, ErrorKind, Result};
use crate::password::PasswordReader;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Filename used when a container's recorded filename sanitizes to nothing.
const FALLBACK_FILENAME: &str = "recovered.bin";

/// File extension for encrypted containers.
pub const CONTAINER_EXTENSION: &str = "enc";

/// Encrypt a file with a password
///
/// Reads plaintext from `input_path`, encrypts it using a password from
/// `password_reader`, and writes the container to `output_path`. The input's
/// base filename is recorded in the container so that decryption can restore
/// it.
///
/// The output file is created with mode 0o600 (read/write for owner only) on Unix systems.
pub fn encrypt_file(
    input_path: &Path,
    output_path: &Path,
    password_reader: &mut dyn PasswordReader,
) -> Result<()> {
    let plaintext = fs::read(input_path).map_err(|e| read_error(input_path, e))?;
    let filename = input_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let password = password_reader.read_password()?;
    let container = container::encrypt(&password, &plaintext, &filename)
        .map_err(|e| e.with_context("encryption failed"))?;
    write_file_secure(output_path, &container)
        .map_err(|e| e.with_context(format!("failed to write to {}", output_path.display())))?;

    Ok(())
}

/// Decrypt a container file with a password
///
/// Reads a container from `input_path`, decrypts it using a password from
/// `password_reader`, and writes the plaintext into `output_dir` under the
/// filename recorded in the container. The recorded name is untrusted input
/// and is sanitized to its final path component before use, so a hostile
/// container cannot escape `output_dir`.
///
/// Returns the path the plaintext was written to. The output file is created
/// with mode 0o600 (read/write for owner only) on Unix systems.
pub fn decrypt_file(
    input_path: &Path,
    output_dir: &Path,
    password_reader: &mut dyn PasswordReader,
) -> Result<PathBuf> {
    let container_bytes = fs::read(input_path).map_err(|e| read_error(input_path, e))?;
    let password = password_reader.read_password()?;
    let recovered = container::decrypt(&password, &container_bytes)
        .map_err(|e| e.with_context("failed to decrypt"))?;

    let output_path = output_dir.join(sanitize_filename(&recovered.filename));
    write_file_secure(&output_path, &recovered.plaintext)
        .map_err(|e| e.with_context(format!("failed to write to {}", output_path.display())))?;

    Ok(output_path)
}

/// Default container name for an input file: `<stem>_encrypted.enc`
pub fn default_output_name(input_path: &Path) -> PathBuf {
    let stem = input_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string());
    input_path.with_file_name(format!("{}_encrypted.{}", stem, CONTAINER_EXTENSION))
}

/// Reduce an untrusted recorded filename to a safe final path component.
///
/// Strips any directory structure (both `/` and `\` separators) and maps
/// names that would resolve outside the target directory, or to nothing at
/// all, to a fixed fallback.
fn sanitize_filename(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or("");
    if base.is_empty() || base == "." || base == ".." {
        FALLBACK_FILENAME.to_string()
    } else {
        base.to_string()
    }
}

/// Write file with secure permissions (0o600 on Unix)
fn write_file_secure(path: &Path, contents: &[u8]) -> Result<()> {
    #[cfg(unix)]
    {
        use std::fs::OpenOptions;
        use std::os::unix::fs::OpenOptionsExt;

        let mut file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .mode(0o600)
            .open(path)
            .map_err(|e| {
                CryptainerError::with_kind_and_source(
                    ErrorCategory::User,
                    ErrorKind::Io,
                    format!("failed to open {}", path.display()),
                    e,
                )
            })?;

        file.write_all(contents).map_err(|e| {
            CryptainerError::with_kind_and_source(
                ErrorCategory::Internal,
                ErrorKind::Io,
                format!("failed to write {}", path.display()),
                e,
            )
        })?;
        Ok(())
    }

    #[cfg(not(unix))]
    {
        fs::write(path, contents).map_err(|e| {
            CryptainerError::with_kind_and_source(
                ErrorCategory::User,
                ErrorKind::Io,
                format!("failed to write {}", path.display()),
                e,
            )
        })?;
        Ok(())
    }
}

fn read_error(path: &Path, err: io::Error) -> CryptainerError {
    let category = if err.kind() == io::ErrorKind::NotFound {
        ErrorCategory::User
    } else {
        ErrorCategory::Internal
    };
    CryptainerError::with_kind_and_source(
        category,
        ErrorKind::Io,
        format!("failed to read from {}", path.display()),
        err,
    )
}
