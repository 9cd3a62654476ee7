//! Assembly of the standardized output document.

use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};

use image::ImageReader;

use crate::error::{Error, Result};
use crate::extract::Emission;
use crate::model::Alignment;

use super::options::LayoutOptions;
use super::writer::PackageWriter;
use super::xml;

/// A picture embedded in the rebuilt document.
#[derive(Debug, Clone)]
pub struct MediaPart {
    /// Relationship id in the new document
    pub relationship_id: String,

    /// File name under `word/media/`
    pub file_name: String,

    /// Lowercase extension
    pub extension: String,

    /// Pixel width and height
    pub pixels: (u32, u32),

    /// Display width and height in EMU
    pub extent: (u64, u64),

    /// Raw picture data
    pub data: Vec<u8>,
}

impl MediaPart {
    /// Target relative to `word/`.
    pub fn target(&self) -> String {
        format!("media/{}", self.file_name)
    }
}

/// One paragraph of the rebuilt document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    /// Title and subtitle in one centered paragraph
    Title {
        /// Title text
        title: String,
        /// Subtitle after a line break; empty for none
        subtitle: String,
    },
    /// Centered attribution line
    Attribution(String),
    /// Body text
    Body(String),
    /// Empty paragraph between body and pictures
    Separator,
    /// Centered picture, by index into the media list
    Picture(usize),
}

/// A new document assembled from emissions and pictures.
///
/// Owns its content; nothing refers back to the source package.
#[derive(Debug, Clone)]
pub struct RebuiltDocument {
    layout: LayoutOptions,
    blocks: Vec<Block>,
    media: Vec<MediaPart>,
    warnings: Vec<String>,
}

impl RebuiltDocument {
    /// Paragraphs in order.
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Embedded pictures in order.
    pub fn media(&self) -> &[MediaPart] {
        &self.media
    }

    /// Pictures that could not be embedded.
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// Number of embedded pictures.
    pub fn image_count(&self) -> usize {
        self.media.len()
    }

    /// Render `word/document.xml`.
    pub fn document_xml(&self) -> String {
        let layout = &self.layout;
        let mut body = String::new();

        for block in &self.blocks {
            let paragraph = match block {
                Block::Title { title, subtitle } => {
                    let mut runs = xml::run_xml(title, &layout.title);
                    if !subtitle.is_empty() {
                        runs.push_str(&xml::run_xml(&format!("\n{}", subtitle), &layout.title));
                    }
                    xml::paragraph_xml(Alignment::Center, &runs)
                }
                Block::Attribution(text) => {
                    xml::paragraph_xml(Alignment::Center, &xml::run_xml(text, &layout.attribution))
                }
                Block::Body(text) => {
                    xml::paragraph_xml(Alignment::Left, &xml::run_xml(text, &layout.body))
                }
                Block::Separator => xml::empty_paragraph_xml(),
                Block::Picture(index) => match self.media.get(*index) {
                    Some(media) => xml::paragraph_xml(
                        Alignment::Center,
                        &xml::picture_run_xml(
                            &media.relationship_id,
                            index + 1,
                            &media.file_name,
                            media.extent.0,
                            media.extent.1,
                        ),
                    ),
                    None => continue,
                },
            };
            body.push_str(&paragraph);
        }

        xml::document_xml(&body)
    }

    /// Serialize the whole package.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut writer = PackageWriter::new();

        writer.add_part(
            "[Content_Types].xml",
            xml::content_types_xml(self.media.iter().map(|m| m.extension.as_str())).as_bytes(),
        )?;
        writer.add_part("_rels/.rels", xml::package_rels_xml().as_bytes())?;
        writer.add_part("word/document.xml", self.document_xml().as_bytes())?;

        let rels: Vec<(String, String)> = self
            .media
            .iter()
            .map(|m| (m.relationship_id.clone(), m.target()))
            .collect();
        writer.add_part(
            "word/_rels/document.xml.rels",
            xml::document_rels_xml(&rels).as_bytes(),
        )?;
        writer.add_part("word/styles.xml", xml::styles_xml(&self.layout.body).as_bytes())?;

        for media in &self.media {
            writer.add_stored_part(&format!("word/{}", media.target()), &media.data)?;
        }

        writer.finish()
    }

    /// Write the package to `path`.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let save_error = |message: String| Error::Save {
            path: path.to_path_buf(),
            message,
        };

        let bytes = self.to_bytes().map_err(|e| save_error(e.to_string()))?;
        fs::write(path, bytes).map_err(|e| save_error(e.to_string()))?;
        log::debug!("saved {} ({} pictures)", path.display(), self.media.len());
        Ok(())
    }
}

/// Builds a [`RebuiltDocument`] in output order.
#[derive(Debug, Clone)]
pub struct DocumentBuilder {
    layout: LayoutOptions,
    blocks: Vec<Block>,
    pictures: Vec<PathBuf>,
    has_title: bool,
    has_attribution: bool,
}

impl DocumentBuilder {
    /// Create a builder for the given layout.
    pub fn new(layout: LayoutOptions) -> Self {
        Self {
            layout,
            blocks: Vec::new(),
            pictures: Vec::new(),
            has_title: false,
            has_attribution: false,
        }
    }

    /// Add the title block. Only the first call has an effect.
    pub fn title(&mut self, title: &str) -> &mut Self {
        if !self.has_title {
            self.blocks.push(Block::Title {
                title: title.to_string(),
                subtitle: self.layout.subtitle.clone(),
            });
            self.has_title = true;
        }
        self
    }

    /// Add the attribution line for `author`. Only the first call has an effect.
    pub fn attribution(&mut self, author: &str) -> &mut Self {
        if !self.has_attribution {
            self.blocks
                .push(Block::Attribution(self.layout.attribution_text(author)));
            self.has_attribution = true;
        }
        self
    }

    /// Add a body paragraph.
    pub fn body(&mut self, text: &str) -> &mut Self {
        self.blocks.push(Block::Body(text.to_string()));
        self
    }

    /// Add one classifier emission.
    pub fn emit(&mut self, emission: &Emission) -> &mut Self {
        match emission {
            Emission::Title(text) => self.title(text),
            Emission::Attribution(author) => self.attribution(author),
            Emission::Body(text) => self.body(text),
        }
    }

    /// Queue a picture file for the end of the document.
    pub fn picture(&mut self, path: impl Into<PathBuf>) -> &mut Self {
        self.pictures.push(path.into());
        self
    }

    /// Queue several picture files.
    pub fn pictures<I, P>(&mut self, paths: I) -> &mut Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.pictures.extend(paths.into_iter().map(Into::into));
        self
    }

    /// Load queued pictures and finish the document.
    ///
    /// Pictures that cannot be read or decoded are left out and reported
    /// through [`RebuiltDocument::warnings`].
    pub fn build(self) -> RebuiltDocument {
        let mut media = Vec::new();
        let mut warnings = Vec::new();

        for path in &self.pictures {
            let index = media.len();
            match load_media(path, index, self.layout.image_width_emu) {
                Ok(part) => media.push(part),
                Err(e) => {
                    let message = format!("picture {} skipped: {}", path.display(), e);
                    log::warn!("{}", message);
                    warnings.push(message);
                }
            }
        }

        let mut blocks = self.blocks;
        if !media.is_empty() {
            if self.layout.separator_before_images {
                blocks.push(Block::Separator);
            }
            blocks.extend((0..media.len()).map(Block::Picture));
        }

        RebuiltDocument {
            layout: self.layout,
            blocks,
            media,
            warnings,
        }
    }
}

/// Read and probe one picture file.
fn load_media(path: &Path, index: usize, width_emu: u64) -> Result<MediaPart> {
    let data = fs::read(path)?;

    let reader = ImageReader::new(Cursor::new(data.as_slice()))
        .with_guessed_format()
        .map_err(|e| Error::Image(e.to_string()))?;
    let format = reader.format();
    let (width, height) = reader
        .into_dimensions()
        .map_err(|e| Error::Image(e.to_string()))?;
    if width == 0 || height == 0 {
        return Err(Error::Image("picture has no pixels".into()));
    }

    let extension = format
        .and_then(|f| f.extensions_str().first().copied())
        .map(str::to_string)
        .or_else(|| {
            path.extension()
                .map(|e| e.to_string_lossy().to_ascii_lowercase())
        })
        .unwrap_or_else(|| crate::model::DEFAULT_IMAGE_EXTENSION.to_string());

    let cy = (width_emu as u128 * height as u128 / width as u128) as u64;

    Ok(MediaPart {
        relationship_id: format!("rId{}", index + 2),
        file_name: format!("image{}.{}", index + 1, extension),
        extension,
        pixels: (width, height),
        extent: (width_emu, cy.max(1)),
        data,
    })
}
