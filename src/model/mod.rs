//! Document model types for Word package content.
//!
//! This module defines the read-side representation shared by the package
//! parser, the extraction pipeline and the rebuilder.

mod document;
mod fields;
mod image;
mod paragraph;
mod relationship;

pub use document::SourceDocument;
pub use fields::ExtractedFields;
pub use image::{
    extension_from_target, mime_type_for_extension, EmbeddedImage, ImageRef, ImageRefKind,
    DEFAULT_IMAGE_EXTENSION,
};
pub use paragraph::{Alignment, Paragraph, Run, RunStyle};
pub use relationship::{resolve_part_name, Relationship, Relationships, DOCUMENT_PART_DIR};
