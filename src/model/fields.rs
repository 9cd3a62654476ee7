//! Fields pulled out of one source document.

use crate::error::MissingFields;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Author, title and scratch pictures extracted from a source document.
///
/// Built during the paragraph pass; treat as immutable afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedFields {
    /// Author name from the filename or an identifier line
    pub author: Option<String>,

    /// Title paragraph text, trimmed
    pub title: Option<String>,

    /// Scratch picture files in discovery order
    pub image_paths: Vec<PathBuf>,

    /// Whether the source referenced any picture at all
    pub has_images: bool,
}

impl ExtractedFields {
    /// Number of pictures written to scratch files.
    pub fn image_count(&self) -> usize {
        self.image_paths.len()
    }

    /// Report missing author/title, if any.
    pub fn missing(&self) -> Option<MissingFields> {
        MissingFields::check(self.author.as_deref(), self.title.as_deref())
    }

    /// Author and title when both are present.
    pub fn author_and_title(&self) -> Option<(&str, &str)> {
        match (self.author.as_deref(), self.title.as_deref()) {
            (Some(a), Some(t)) if !a.trim().is_empty() && !t.trim().is_empty() => Some((a, t)),
            _ => None,
        }
    }
}
