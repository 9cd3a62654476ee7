//! Picture references and embedded picture blobs.

use serde::{Deserialize, Serialize};

/// Extension used when a relationship target carries none.
pub const DEFAULT_IMAGE_EXTENSION: &str = "png";

/// A picture referenced from a run.
///
/// Word stores pictures in three known shapes. Each variant carries the
/// relationship id (`a:blip/@r:embed`) of the binary part it points to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ImageRef {
    /// `w:drawing/wp:inline/.../a:blip`
    Inline {
        /// Relationship id of the picture part
        relationship_id: String,
    },
    /// `w:drawing/wp:anchor/.../a:blip`
    Anchor {
        /// Relationship id of the picture part
        relationship_id: String,
    },
    /// `w:drawing/.../a:blip` outside inline/anchor wrappers
    Drawing {
        /// Relationship id of the picture part
        relationship_id: String,
    },
}

impl ImageRef {
    /// Build a reference of the given shape.
    pub fn new(kind: ImageRefKind, relationship_id: impl Into<String>) -> Self {
        let relationship_id = relationship_id.into();
        match kind {
            ImageRefKind::Inline => ImageRef::Inline { relationship_id },
            ImageRefKind::Anchor => ImageRef::Anchor { relationship_id },
            ImageRefKind::Drawing => ImageRef::Drawing { relationship_id },
        }
    }

    /// Relationship id of the referenced binary part.
    pub fn relationship_id(&self) -> &str {
        match self {
            ImageRef::Inline { relationship_id }
            | ImageRef::Anchor { relationship_id }
            | ImageRef::Drawing { relationship_id } => relationship_id,
        }
    }

    /// Shape of this reference.
    pub fn kind(&self) -> ImageRefKind {
        match self {
            ImageRef::Inline { .. } => ImageRefKind::Inline,
            ImageRef::Anchor { .. } => ImageRefKind::Anchor,
            ImageRef::Drawing { .. } => ImageRefKind::Drawing,
        }
    }
}

/// The XML shape a picture reference was found in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageRefKind {
    /// Inline with text
    Inline,
    /// Floating, anchored to the paragraph
    Anchor,
    /// Any other drawing wrapper
    Drawing,
}

impl std::fmt::Display for ImageRefKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ImageRefKind::Inline => "inline",
            ImageRefKind::Anchor => "anchor",
            ImageRefKind::Drawing => "drawing",
        };
        f.write_str(name)
    }
}

/// A picture blob pulled out of a source package.
#[derive(Debug, Clone)]
pub struct EmbeddedImage {
    /// Relationship id the picture was reached through
    pub relationship_id: String,

    /// Package part name (e.g., "word/media/image1.jpeg")
    pub part_name: String,

    /// Lowercase file extension without the dot
    pub extension: String,

    /// Raw binary data
    pub data: Vec<u8>,
}

impl EmbeddedImage {
    /// Get the size of the picture data in bytes.
    pub fn size(&self) -> usize {
        self.data.len()
    }

    /// MIME type derived from the extension.
    pub fn mime_type(&self) -> &'static str {
        mime_type_for_extension(&self.extension)
    }
}

/// Derive a stable extension from a relationship target.
///
/// `media/image3.JPEG` gives `jpeg`; a target without an extension gives
/// [`DEFAULT_IMAGE_EXTENSION`].
pub fn extension_from_target(target: &str) -> String {
    let file_name = target.rsplit('/').next().unwrap_or(target);
    match file_name.rsplit_once('.') {
        Some((stem, ext))
            if !stem.is_empty()
                && !ext.is_empty()
                && ext.chars().all(|c| c.is_ascii_alphanumeric()) =>
        {
            ext.to_ascii_lowercase()
        }
        _ => DEFAULT_IMAGE_EXTENSION.to_string(),
    }
}

/// Content type for a picture extension.
pub fn mime_type_for_extension(ext: &str) -> &'static str {
    match ext.to_ascii_lowercase().as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" | "jpe" => "image/jpeg",
        "gif" => "image/gif",
        "bmp" => "image/bmp",
        "tif" | "tiff" => "image/tiff",
        "webp" => "image/webp",
        "emf" => "image/x-emf",
        "wmf" => "image/x-wmf",
        "svg" => "image/svg+xml",
        _ => "application/octet-stream",
    }
}
