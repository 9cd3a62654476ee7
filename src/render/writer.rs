//! Zip package writer.

use std::io::{Cursor, Write};

use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::error::{Error, Result};

/// Writes package parts into an in-memory zip archive.
pub struct PackageWriter {
    zip: ZipWriter<Cursor<Vec<u8>>>,
}

impl PackageWriter {
    /// Create an empty package.
    pub fn new() -> Self {
        Self {
            zip: ZipWriter::new(Cursor::new(Vec::new())),
        }
    }

    /// Add a deflated part.
    pub fn add_part(&mut self, name: &str, data: &[u8]) -> Result<()> {
        self.write_entry(name, data, CompressionMethod::Deflated)
    }

    /// Add a part without compression, for already compressed media.
    pub fn add_stored_part(&mut self, name: &str, data: &[u8]) -> Result<()> {
        self.write_entry(name, data, CompressionMethod::Stored)
    }

    fn write_entry(&mut self, name: &str, data: &[u8], method: CompressionMethod) -> Result<()> {
        let options = SimpleFileOptions::default().compression_method(method);
        self.zip
            .start_file(name, options)
            .map_err(|e| Error::Other(format!("zip entry '{}': {}", name, e)))?;
        self.zip.write_all(data)?;
        Ok(())
    }

    /// Finish the archive and return its bytes.
    pub fn finish(self) -> Result<Vec<u8>> {
        let cursor = self
            .zip
            .finish()
            .map_err(|e| Error::Other(format!("zip finish: {}", e)))?;
        Ok(cursor.into_inner())
    }
}

impl Default for PackageWriter {
    fn default() -> Self {
        Self::new()
    }
}
