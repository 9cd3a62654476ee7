//! Word package detection and batch candidate filtering.

use crate::error::{Error, Result};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Zip local file header magic: PK\x03\x04
const ZIP_MAGIC: &[u8] = b"PK\x03\x04";
/// Empty zip archive magic: PK\x05\x06
const ZIP_EMPTY_MAGIC: &[u8] = b"PK\x05\x06";

/// Prefix Word uses for owner/lock files next to an open document.
pub const LOCK_FILE_PREFIX: &str = "~$";

/// Extension handled by the batch driver.
pub const DOCX_EXTENSION: &str = "docx";

/// Why a directory entry is not processed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Word lock file (`~$name.docx`)
    LockFile,
    /// Extension other than `.docx`
    NotDocx,
    /// Not a regular file
    NotAFile,
}

/// Detect a zip container from its first bytes.
///
/// # Returns
/// * `Ok(())` if the data starts with a zip signature
/// * `Err(Error::Corrupted)` otherwise
pub fn detect_package_from_bytes(data: &[u8]) -> Result<()> {
    if data.len() < ZIP_MAGIC.len() {
        return Err(Error::Corrupted("file is too short".into()));
    }

    if data.starts_with(ZIP_MAGIC) || data.starts_with(ZIP_EMPTY_MAGIC) {
        Ok(())
    } else {
        Err(Error::Corrupted("missing zip signature".into()))
    }
}

/// Detect a zip container from a file path.
///
/// # Example
/// ```no_run
/// use redocx::detect::detect_package_from_path;
///
/// detect_package_from_path("essay.docx").unwrap();
/// ```
pub fn detect_package_from_path<P: AsRef<Path>>(path: P) -> Result<()> {
    let file = File::open(path)?;
    let mut reader = BufReader::new(file);
    let mut header = [0u8; 4];
    reader
        .read_exact(&mut header)
        .map_err(|_| Error::Corrupted("file is too short".into()))?;
    detect_package_from_bytes(&header)
}

/// Check if a file looks like a zip-based Word package.
pub fn is_docx<P: AsRef<Path>>(path: P) -> bool {
    detect_package_from_path(path).is_ok()
}

/// Check if bytes look like a zip-based Word package.
pub fn is_docx_bytes(data: &[u8]) -> bool {
    detect_package_from_bytes(data).is_ok()
}

/// Decide from the file name alone whether a batch should pick it up.
///
/// Returns the reason to skip, or `None` for a candidate.
pub fn skip_reason(file_name: &str) -> Option<SkipReason> {
    if file_name.starts_with(LOCK_FILE_PREFIX) {
        return Some(SkipReason::LockFile);
    }

    let is_docx = Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(DOCX_EXTENSION));

    if is_docx {
        None
    } else {
        Some(SkipReason::NotDocx)
    }
}

/// Check whether a directory entry is a batch candidate.
pub fn is_candidate(path: &Path) -> std::result::Result<(), SkipReason> {
    if !path.is_file() {
        return Err(SkipReason::NotAFile);
    }
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy())
        .unwrap_or_default();
    match skip_reason(&name) {
        Some(reason) => Err(reason),
        None => Ok(()),
    }
}
