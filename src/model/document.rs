//! Document-level types.

use super::{ImageRef, Paragraph, Relationship, Relationships};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// An opened Word package, read-only once parsed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SourceDocument {
    /// Body paragraphs in document order
    pub paragraphs: Vec<Paragraph>,

    /// Relationship table of the main document part
    pub relationships: Relationships,

    /// Binary parts reachable through relationships, keyed by part name
    #[serde(skip)]
    pub parts: HashMap<String, Vec<u8>>,

    /// File name the package was opened from, if any
    pub file_name: Option<String>,
}

impl SourceDocument {
    /// Create a new empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of body paragraphs.
    pub fn paragraph_count(&self) -> usize {
        self.paragraphs.len()
    }

    /// Add a paragraph to the document.
    pub fn add_paragraph(&mut self, paragraph: Paragraph) {
        self.paragraphs.push(paragraph);
    }

    /// Register a binary part.
    pub fn add_part(&mut self, name: impl Into<String>, data: Vec<u8>) {
        self.parts.insert(name.into(), data);
    }

    /// Get a binary part by package name.
    pub fn part(&self, name: &str) -> Option<&[u8]> {
        self.parts.get(name).map(Vec::as_slice)
    }

    /// Resolve a relationship id to its relationship and part bytes.
    pub fn related_part(&self, relationship_id: &str) -> Option<(&Relationship, &[u8])> {
        let rel = self.relationships.get(relationship_id)?;
        let data = self.part(&rel.part_name()?)?;
        Some((rel, data))
    }

    /// Picture references of all runs, in document order.
    pub fn image_refs(&self) -> impl Iterator<Item = &ImageRef> {
        self.paragraphs.iter().flat_map(Paragraph::image_refs)
    }

    /// Whether any run or relationship references a picture.
    pub fn has_images(&self) -> bool {
        self.image_refs().next().is_some() || self.relationships.images().next().is_some()
    }

    /// Get plain text content of the document, one line per paragraph.
    pub fn plain_text(&self) -> String {
        self.paragraphs
            .iter()
            .map(Paragraph::text)
            .collect::<Vec<_>>()
            .join("\n")
    }
}
