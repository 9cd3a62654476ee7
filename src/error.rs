//! Error types for redocx library.

use serde::{Deserialize, Serialize};
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for redocx operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while reading, reformatting or saving documents.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The input file does not exist.
    #[error("input file '{0}' does not exist")]
    NotFound(PathBuf),

    /// The file is not a readable zip package.
    #[error("file may be corrupted or not a valid document: {0}")]
    Corrupted(String),

    /// A package entry failed its CRC check.
    #[error("bad CRC in package entry '{0}'")]
    BadCrc(String),

    /// The package has no main document part.
    #[error("package not found: missing part '{0}'")]
    PackageNotFound(String),

    /// Malformed XML inside a package part.
    #[error("XML parsing error: {0}")]
    Xml(String),

    /// Author and/or title could not be extracted.
    #[error("{0}")]
    MissingFields(MissingFields),

    /// A picture could not be decoded or embedded.
    #[error("Image error: {0}")]
    Image(String),

    /// The rebuilt document could not be written.
    #[error("failed to save '{path}': {message}")]
    Save {
        /// Destination path
        path: PathBuf,
        /// Underlying cause
        message: String,
    },

    /// Invalid configuration value or file.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The batch was cancelled between files.
    #[error("batch cancelled")]
    Cancelled,

    /// Generic error with message.
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Classify this error for per-file reporting.
    pub fn kind(&self) -> FailureKind {
        match self {
            Error::Io(_) | Error::NotFound(_) => FailureKind::Unreadable,
            Error::Corrupted(_) | Error::Xml(_) => FailureKind::Corrupted,
            Error::BadCrc(_) => FailureKind::BadCrc,
            Error::PackageNotFound(_) => FailureKind::PackageNotFound,
            Error::MissingFields(_) => FailureKind::MissingFields,
            Error::Save { .. } => FailureKind::SaveFailed,
            Error::Image(_) | Error::Config(_) | Error::Cancelled | Error::Other(_) => {
                FailureKind::Other
            }
        }
    }
}

/// Which extracted fields were missing from a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissingFields {
    /// The author name was not found
    pub author: bool,
    /// The title was not found
    pub title: bool,
}

impl MissingFields {
    /// Build from the optional fields; `None` when nothing is missing.
    pub fn check(author: Option<&str>, title: Option<&str>) -> Option<Self> {
        let missing = Self {
            author: author.map_or(true, |a| a.trim().is_empty()),
            title: title.map_or(true, |t| t.trim().is_empty()),
        };
        (missing.author || missing.title).then_some(missing)
    }
}

impl std::fmt::Display for MissingFields {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (self.author, self.title) {
            (true, true) => write!(f, "author name not extracted; title not extracted"),
            (true, false) => write!(f, "author name not extracted"),
            (false, true) => write!(f, "title not extracted"),
            (false, false) => write!(f, "all fields extracted"),
        }
    }
}

/// Coarse failure category reported to event sinks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// Missing or unreadable input file
    Unreadable,
    /// Not a zip package or malformed XML
    Corrupted,
    /// CRC mismatch inside the package
    BadCrc,
    /// Zip without a main document part
    PackageNotFound,
    /// Author and/or title unresolved
    MissingFields,
    /// Output could not be written
    SaveFailed,
    /// Anything else
    Other,
}

impl From<zip::result::ZipError> for Error {
    fn from(err: zip::result::ZipError) -> Self {
        match err {
            zip::result::ZipError::Io(e) => read_error("archive", e),
            zip::result::ZipError::FileNotFound => {
                Error::PackageNotFound("word/document.xml".to_string())
            }
            other => Error::Corrupted(other.to_string()),
        }
    }
}

impl From<quick_xml::Error> for Error {
    fn from(err: quick_xml::Error) -> Self {
        Error::Xml(err.to_string())
    }
}

impl From<quick_xml::events::attributes::AttrError> for Error {
    fn from(err: quick_xml::events::attributes::AttrError) -> Self {
        Error::Xml(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Config(err.to_string())
    }
}

/// Map an I/O error raised while decompressing `entry`.
///
/// The zip reader reports checksum mismatches as plain I/O errors.
pub(crate) fn read_error(entry: &str, err: io::Error) -> Error {
    let message = err.to_string().to_lowercase();
    if message.contains("checksum") || message.contains("crc") {
        Error::BadCrc(entry.to_string())
    } else if err.kind() == io::ErrorKind::InvalidData
        || err.kind() == io::ErrorKind::UnexpectedEof
    {
        Error::Corrupted(err.to_string())
    } else {
        Error::Io(err)
    }
}
