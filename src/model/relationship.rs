//! Package relationship table (`word/_rels/document.xml.rels`).

use serde::{Deserialize, Serialize};

/// Directory the main document part lives in; relative targets resolve here.
pub const DOCUMENT_PART_DIR: &str = "word";

/// A single `Relationship` element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relationship {
    /// Relationship id (e.g., "rId7")
    pub id: String,

    /// Relationship type URI
    pub rel_type: String,

    /// Target reference as written (e.g., "media/image1.png")
    pub target: String,

    /// `TargetMode="External"` (linked, not embedded)
    pub external: bool,
}

impl Relationship {
    /// Create an internal relationship.
    pub fn new(id: impl Into<String>, rel_type: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            rel_type: rel_type.into(),
            target: target.into(),
            external: false,
        }
    }

    /// A relationship whose target reference mentions an image.
    pub fn is_image(&self) -> bool {
        self.target.contains("image")
    }

    /// Package part name of the target, or `None` for external targets.
    pub fn part_name(&self) -> Option<String> {
        if self.external {
            return None;
        }
        Some(resolve_part_name(DOCUMENT_PART_DIR, &self.target))
    }
}

/// The ordered relationship table of the main document part.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Relationships {
    entries: Vec<Relationship>,
}

impl Relationships {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a relationship, keeping table order.
    pub fn push(&mut self, rel: Relationship) {
        self.entries.push(rel);
    }

    /// Look up a relationship by id.
    pub fn get(&self, id: &str) -> Option<&Relationship> {
        self.entries.iter().find(|r| r.id == id)
    }

    /// Iterate in table order.
    pub fn iter(&self) -> impl Iterator<Item = &Relationship> {
        self.entries.iter()
    }

    /// Embedded relationships whose target mentions an image, in table order.
    pub fn images(&self) -> impl Iterator<Item = &Relationship> {
        self.entries.iter().filter(|r| !r.external && r.is_image())
    }

    /// Number of relationships.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the table is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<Relationship> for Relationships {
    fn from_iter<I: IntoIterator<Item = Relationship>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

/// Resolve a relationship target against the directory of its source part.
///
/// Absolute targets (`/word/media/a.png`) are taken from the package root;
/// `.` and `..` segments are collapsed.
pub fn resolve_part_name(base_dir: &str, target: &str) -> String {
    let joined = match target.strip_prefix('/') {
        Some(absolute) => absolute.to_string(),
        None if base_dir.is_empty() => target.to_string(),
        None => format!("{}/{}", base_dir.trim_end_matches('/'), target),
    };

    let mut segments: Vec<&str> = Vec::new();
    for segment in joined.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            s => segments.push(s),
        }
    }
    segments.join("/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_part_name() {
        assert_eq!(resolve_part_name("word", "media/image1.png"), "word/media/image1.png");
        assert_eq!(resolve_part_name("word", "/word/media/a.png"), "word/media/a.png");
        assert_eq!(resolve_part_name("word", "../customXml/item1.xml"), "customXml/item1.xml");
        assert_eq!(resolve_part_name("word", "./media/./b.gif"), "word/media/b.gif");
    }

    #[test]
    fn test_image_filter_skips_external() {
        let mut rels = Relationships::new();
        rels.push(Relationship::new("rId1", "styles", "styles.xml"));
        rels.push(Relationship::new("rId2", "image", "media/image1.png"));
        rels.push(Relationship {
            external: true,
            ..Relationship::new("rId3", "image", "http://example.com/image.png")
        });

        let ids: Vec<_> = rels.images().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["rId2"]);
        assert_eq!(rels.get("rId3").and_then(Relationship::part_name), None);
    }
}
