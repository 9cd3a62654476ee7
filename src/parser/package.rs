//! Word package reader built on `zip`.

use std::collections::HashSet;
use std::io::{Cursor, Read};
use std::path::Path;

use zip::result::ZipError;
use zip::ZipArchive;

use crate::detect::{detect_package_from_bytes, detect_package_from_path};
use crate::error::{read_error, Error, Result};
use crate::model::{Relationships, SourceDocument};

use super::document_xml::parse_document_xml;
use super::options::{ErrorMode, ParseOptions};
use super::relationships::parse_relationships;

/// Main document part.
pub const DOCUMENT_PART: &str = "word/document.xml";

/// Relationships of the main document part.
pub const DOCUMENT_RELS_PART: &str = "word/_rels/document.xml.rels";

/// Word package parser.
pub struct DocxParser {
    archive: ZipArchive<Cursor<Vec<u8>>>,
    options: ParseOptions,
    file_name: Option<String>,
}

impl DocxParser {
    /// Open a `.docx` file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open_with_options(path, ParseOptions::default())
    }

    /// Open a `.docx` file with custom options.
    pub fn open_with_options<P: AsRef<Path>>(path: P, options: ParseOptions) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::NotFound(path.to_path_buf()));
        }

        detect_package_from_path(path)?;

        let data = std::fs::read(path)?;
        let mut parser = Self::from_bytes_with_options(data, options)?;
        parser.file_name = path.file_name().map(|n| n.to_string_lossy().into_owned());
        Ok(parser)
    }

    /// Read a package from bytes.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        Self::from_bytes_with_options(data, ParseOptions::default())
    }

    /// Read a package from bytes with custom options.
    pub fn from_bytes_with_options(data: Vec<u8>, options: ParseOptions) -> Result<Self> {
        detect_package_from_bytes(&data)?;
        let archive = ZipArchive::new(Cursor::new(data))?;
        Ok(Self {
            archive,
            options,
            file_name: None,
        })
    }

    /// Read a package from a reader.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        Self::from_reader_with_options(reader, ParseOptions::default())
    }

    /// Read a package from a reader with custom options.
    pub fn from_reader_with_options<R: Read>(mut reader: R, options: ParseOptions) -> Result<Self> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Self::from_bytes_with_options(data, options)
    }

    /// Names of all entries in the package.
    pub fn entry_names(&self) -> Vec<String> {
        self.archive.file_names().map(str::to_string).collect()
    }

    /// Parse the package into a [`SourceDocument`].
    pub fn parse(mut self) -> Result<SourceDocument> {
        let document_xml = self
            .read_text(DOCUMENT_PART)?
            .ok_or_else(|| Error::PackageNotFound(DOCUMENT_PART.to_string()))?;

        let relationships = match self.read_text(DOCUMENT_RELS_PART)? {
            Some(xml) => parse_relationships(&xml)?,
            None => Relationships::new(),
        };

        let mut document = SourceDocument {
            paragraphs: parse_document_xml(&document_xml)?,
            relationships,
            file_name: self.file_name.take(),
            ..Default::default()
        };

        if self.options.load_parts {
            self.load_picture_parts(&mut document)?;
        }

        log::debug!(
            "parsed {} paragraphs, {} relationships, {} parts",
            document.paragraphs.len(),
            document.relationships.len(),
            document.parts.len()
        );

        Ok(document)
    }

    /// Load every part a picture relationship or picture reference points at.
    fn load_picture_parts(&mut self, document: &mut SourceDocument) -> Result<()> {
        let referenced: HashSet<&str> = document
            .image_refs()
            .map(|r| r.relationship_id())
            .collect();

        let part_names: Vec<String> = document
            .relationships
            .iter()
            .filter(|rel| rel.is_image() || referenced.contains(rel.id.as_str()))
            .filter_map(|rel| rel.part_name())
            .collect();

        for name in part_names {
            if document.parts.contains_key(&name) {
                continue;
            }
            match self.read_bytes(&name) {
                Ok(Some(data)) => document.add_part(name, data),
                Ok(None) => log::warn!("picture part '{}' is missing from the package", name),
                Err(e) if self.options.error_mode == ErrorMode::Lenient => {
                    log::warn!("skipping unreadable picture part '{}': {}", name, e);
                }
                Err(e) => return Err(e),
            }
        }
        Ok(())
    }

    /// Read an entry, `None` when the package has no such entry.
    fn read_bytes(&mut self, name: &str) -> Result<Option<Vec<u8>>> {
        let mut entry = match self.archive.by_name(name) {
            Ok(entry) => entry,
            Err(ZipError::FileNotFound) => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let mut data = Vec::with_capacity(entry.size() as usize);
        entry
            .read_to_end(&mut data)
            .map_err(|e| read_error(name, e))?;
        Ok(Some(data))
    }

    fn read_text(&mut self, name: &str) -> Result<Option<String>> {
        Ok(self
            .read_bytes(name)?
            .map(|data| String::from_utf8_lossy(&data).into_owned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_a_zip_is_corrupted() {
        let result = DocxParser::from_bytes(b"this is plain text, not a package".to_vec());
        assert!(matches!(result, Err(Error::Corrupted(_))));
    }

    #[test]
    fn test_missing_file() {
        let result = DocxParser::open("/definitely/not/here.docx");
        assert!(matches!(result, Err(Error::NotFound(_))));
    }

    fn package(entries: &[(&str, &str)]) -> Vec<u8> {
        use std::io::Write;
        let mut zip = zip::ZipWriter::new(Cursor::new(Vec::new()));
        for (name, body) in entries {
            zip.start_file(*name, zip::write::SimpleFileOptions::default())
                .unwrap();
            zip.write_all(body.as_bytes()).unwrap();
        }
        zip.finish().unwrap().into_inner()
    }

    #[test]
    fn test_parse_without_relationships() {
        let data = package(&[(
            DOCUMENT_PART,
            r#"<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body><w:p><w:r><w:t>我的家乡</w:t></w:r></w:p></w:body></w:document>"#,
        )]);
        let parser = DocxParser::from_bytes(data).unwrap();
        assert_eq!(parser.entry_names(), vec![DOCUMENT_PART.to_string()]);

        let doc = parser.parse().unwrap();
        assert_eq!(doc.paragraph_count(), 1);
        assert!(doc.relationships.is_empty());
    }

    #[test]
    fn test_missing_document_part() {
        let data = package(&[("[Content_Types].xml", "<Types/>")]);
        let result = DocxParser::from_bytes(data).unwrap().parse();
        assert!(matches!(result, Err(Error::PackageNotFound(_))));
    }

    #[test]
    fn test_truncated_zip_is_corrupted() {
        let mut data = b"PK\x03\x04".to_vec();
        data.extend_from_slice(&[0u8; 16]);
        let result = DocxParser::from_bytes(data);
        assert!(matches!(result, Err(Error::Corrupted(_))));
    }
}
