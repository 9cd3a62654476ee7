//! Word package parsing module.

mod document_xml;
mod options;
mod package;
mod relationships;

pub use document_xml::parse_document_xml;
pub use options::{ErrorMode, ParseOptions};
pub use package::{DocxParser, DOCUMENT_PART, DOCUMENT_RELS_PART};
pub use relationships::parse_relationships;
