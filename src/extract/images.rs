//! Picture discovery and scratch file output.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::model::{extension_from_target, EmbeddedImage, Paragraph, SourceDocument};

use super::scratch::ScratchImages;

/// How pictures are located in a source package.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageStrategy {
    /// Picture references of runs, in document order
    #[default]
    Runs,
    /// Picture relationships, in relationship table order
    Relationships,
}

impl std::str::FromStr for ImageStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "runs" => Ok(ImageStrategy::Runs),
            "relationships" | "rels" => Ok(ImageStrategy::Relationships),
            other => Err(format!("unknown image strategy '{}'", other)),
        }
    }
}

/// Pictures found in a document plus the references that could not be used.
#[derive(Debug, Default)]
pub struct ImageDiscovery {
    /// Usable pictures in discovery order
    pub images: Vec<EmbeddedImage>,
    /// One message per skipped reference
    pub warnings: Vec<String>,
}

/// Scratch files written for a document plus the pictures that were skipped.
#[derive(Debug, Default)]
pub struct ExtractedImages {
    /// Written files, deleted when dropped
    pub files: ScratchImages,
    /// One message per skipped picture
    pub warnings: Vec<String>,
}

/// Locates pictures and writes them to a scratch directory.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageExtractor {
    strategy: ImageStrategy,
}

impl ImageExtractor {
    /// Create an extractor with the given strategy.
    pub fn new(strategy: ImageStrategy) -> Self {
        Self { strategy }
    }

    /// The configured strategy.
    pub fn strategy(&self) -> ImageStrategy {
        self.strategy
    }

    /// Find every usable picture without touching the file system.
    pub fn discover(&self, document: &SourceDocument) -> ImageDiscovery {
        let mut discovery = ImageDiscovery::default();

        let ids: Vec<&str> = match self.strategy {
            ImageStrategy::Runs => document.image_refs().map(|r| r.relationship_id()).collect(),
            ImageStrategy::Relationships => document
                .relationships
                .images()
                .map(|rel| rel.id.as_str())
                .collect(),
        };

        for id in ids {
            let Some(rel) = document.relationships.get(id) else {
                discovery
                    .warnings
                    .push(format!("picture reference {} has no relationship", id));
                continue;
            };
            if rel.external {
                discovery
                    .warnings
                    .push(format!("picture {} is linked externally, not embedded", id));
                continue;
            }
            match document.related_part(id) {
                Some((rel, data)) if !data.is_empty() => {
                    discovery.images.push(EmbeddedImage {
                        relationship_id: rel.id.clone(),
                        part_name: rel.part_name().unwrap_or_default(),
                        extension: extension_from_target(&rel.target),
                        data: data.to_vec(),
                    });
                }
                _ => discovery
                    .warnings
                    .push(format!("picture {} ({}) could not be read", id, rel.target)),
            }
        }

        for warning in &discovery.warnings {
            log::warn!("{}", warning);
        }
        discovery
    }

    /// Write pictures to `dir` as `image_{n}.{ext}`.
    ///
    /// Files that cannot be written are skipped with a warning.
    pub fn write_to(&self, images: &[EmbeddedImage], dir: &Path) -> ExtractedImages {
        let mut out = ExtractedImages::default();
        for image in images {
            let path = dir.join(format!("image_{}.{}", out.files.len(), image.extension));
            match fs::write(&path, &image.data) {
                Ok(()) => out.files.push(path),
                Err(e) => {
                    let message = format!("could not write picture {}: {}", image.part_name, e);
                    log::warn!("{}", message);
                    out.warnings.push(message);
                }
            }
        }
        out
    }

    /// Discover and write in one step.
    pub fn extract(&self, document: &SourceDocument, dir: &Path) -> ExtractedImages {
        let discovery = self.discover(document);
        let mut out = self.write_to(&discovery.images, dir);
        let mut warnings = discovery.warnings;
        warnings.append(&mut out.warnings);
        out.warnings = warnings;
        out
    }
}

/// Whether a paragraph carries a picture in any of its runs.
pub fn paragraph_has_image(paragraph: &Paragraph) -> bool {
    paragraph.has_image()
}
