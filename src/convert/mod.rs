//! Reformatting pipeline for single files and folders.
//!
//! [`Reformatter`] turns one source package into a rebuilt document and
//! saves it under the output root; [`BatchProcessor`] drives it over a folder
//! and reports progress as [`FileEvent`]s.
//!
//! # Example
//!
//! ```no_run
//! use redocx::convert::{BatchProcessor, LogSink, ReformatOptions};
//!
//! fn main() -> redocx::Result<()> {
//!     let batch = BatchProcessor::new(ReformatOptions::default())?;
//!     let summary = batch.process_folder("submissions", "formatted", &mut LogSink)?;
//!     println!("{} saved, {} failed", summary.succeeded, summary.failed);
//!     Ok(())
//! }
//! ```

mod batch;
mod events;
mod failures;
mod naming;
mod options;

pub use batch::{BatchHandle, BatchProcessor, CancelFlag};
pub use events::{BatchSummary, EventSink, FailureRecord, FileEvent, LogSink};
pub use failures::FailureArchive;
pub use naming::{
    sanitize, NamingOptions, Placement, PlacementOptions, DEFAULT_SUFFIX, DEFAULT_TEMPLATE,
};
pub use options::ReformatOptions;

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;

use crate::error::{Error, Result};
use crate::extract::{
    Classification, Classifier, FirstParagraphTitle, IdentifierMatcher, ImageExtractor,
    PrefixIdentifier, ScratchImages, TitleMatcher,
};
use crate::model::{ExtractedFields, SourceDocument};
use crate::parser::DocxParser;
use crate::render::{DocumentBuilder, RebuiltDocument};

/// Warning text for a document without pictures.
pub const NO_IMAGES_WARNING: &str = "no images found";

/// A reformatted document that has not been saved yet.
///
/// Holds the scratch picture files until it is dropped.
#[derive(Debug)]
pub struct Reformatted {
    /// Extracted author, title and pictures
    pub fields: ExtractedFields,
    /// Classifier output
    pub classification: Classification,
    /// The new document
    pub document: RebuiltDocument,
    /// Pictures skipped on the way
    pub warnings: Vec<String>,
    scratch: ScratchImages,
}

impl Reformatted {
    /// Folder the document belongs in.
    pub fn placement(&self) -> Placement {
        Placement::for_image_count(self.document.image_count())
    }

    /// Scratch picture files still on disk.
    pub fn scratch_files(&self) -> &[PathBuf] {
        self.scratch.paths()
    }
}

/// Outcome of one saved file.
#[derive(Debug, Clone, Serialize)]
pub struct FileReport {
    /// Source file
    pub source: PathBuf,
    /// Written file
    pub output: PathBuf,
    /// Folder the output went to
    pub placement: Placement,
    /// Author name used
    pub author: String,
    /// Title used
    pub title: String,
    /// Embedded pictures
    pub image_count: usize,
    /// Whether the source referenced pictures
    pub has_images: bool,
    /// Warnings for this file
    pub warnings: Vec<String>,
}

/// Read-only view of what a file would produce.
#[derive(Debug, Clone, Serialize)]
pub struct Inspection {
    /// Author name, if any
    pub author: Option<String>,
    /// Title, if any
    pub title: Option<String>,
    /// Whether the source references pictures
    pub has_images: bool,
    /// Usable pictures
    pub image_count: usize,
    /// Output file name when author and title are known
    pub output_name: Option<String>,
    /// Classifier output
    pub classification: Classification,
    /// Number of body paragraphs in the source
    pub paragraph_count: usize,
    /// Picture references that could not be used
    pub warnings: Vec<String>,
}

/// Single-file reformatting pipeline.
#[derive(Clone)]
pub struct Reformatter {
    options: ReformatOptions,
    identifier: Arc<dyn IdentifierMatcher>,
    title: Arc<dyn TitleMatcher>,
}

impl Reformatter {
    /// Create a pipeline, compiling the identifier rules from the options.
    pub fn new(options: ReformatOptions) -> Result<Self> {
        let identifier = PrefixIdentifier::new(&options.identifier_prefix)?;
        Ok(Self {
            options,
            identifier: Arc::new(identifier),
            title: Arc::new(FirstParagraphTitle),
        })
    }

    /// Replace the identifier rules.
    pub fn with_identifier_matcher(mut self, matcher: impl IdentifierMatcher + 'static) -> Self {
        self.identifier = Arc::new(matcher);
        self
    }

    /// Replace the title rule.
    pub fn with_title_matcher(mut self, matcher: impl TitleMatcher + 'static) -> Self {
        self.title = Arc::new(matcher);
        self
    }

    /// The options in use.
    pub fn options(&self) -> &ReformatOptions {
        &self.options
    }

    fn open(&self, input: &Path) -> Result<SourceDocument> {
        DocxParser::open_with_options(input, self.options.parse.clone())?.parse()
    }

    fn classify(&self, document: &SourceDocument, file_name: &str) -> Classification {
        let author = self.identifier.author_from_filename(file_name);
        if let Some(author) = &author {
            log::debug!("author '{}' from file name", author);
        }
        Classifier::new(self.identifier.as_ref(), self.title.as_ref())
            .classify(&document.paragraphs, author)
    }

    /// Extract fields and pictures without writing anything.
    pub fn inspect<P: AsRef<Path>>(&self, input: P) -> Result<Inspection> {
        let input = input.as_ref();
        let document = self.open(input)?;
        let classification = self.classify(&document, &file_name_of(input));
        let discovery = ImageExtractor::new(self.options.image_strategy).discover(&document);

        let output_name = match (&classification.author, &classification.title) {
            (Some(author), Some(title)) => Some(self.options.naming.file_name(author, title)),
            _ => None,
        };

        Ok(Inspection {
            author: classification.author.clone(),
            title: classification.title.clone(),
            has_images: document.has_images(),
            image_count: discovery.images.len(),
            output_name,
            paragraph_count: document.paragraph_count(),
            classification,
            warnings: discovery.warnings,
        })
    }

    /// Build the new document for `input`, using `scratch_dir` for pictures.
    ///
    /// Fails with [`Error::MissingFields`] when author or title is unknown.
    pub fn reformat<P: AsRef<Path>>(&self, input: P, scratch_dir: &Path) -> Result<Reformatted> {
        let input = input.as_ref();
        let document = self.open(input)?;
        let classification = self.classify(&document, &file_name_of(input));

        let mut fields = ExtractedFields {
            author: classification.author.clone(),
            title: classification.title.clone(),
            has_images: document.has_images(),
            ..Default::default()
        };
        if let Some(missing) = fields.missing() {
            return Err(Error::MissingFields(missing));
        }

        let extracted =
            ImageExtractor::new(self.options.image_strategy).extract(&document, scratch_dir);
        fields.image_paths = extracted.files.paths().to_vec();
        let mut warnings = extracted.warnings;

        let mut builder = DocumentBuilder::new(self.options.layout.clone());
        for emission in &classification.emissions {
            builder.emit(emission);
        }
        builder.pictures(&fields.image_paths);
        let rebuilt = builder.build();
        warnings.extend(rebuilt.warnings().iter().cloned());

        if rebuilt.image_count() == 0 {
            if fields.has_images {
                warnings.push("pictures are referenced but none could be embedded".to_string());
            }
            warnings.push(NO_IMAGES_WARNING.to_string());
        }

        Ok(Reformatted {
            fields,
            classification,
            document: rebuilt,
            warnings,
            scratch: extracted.files,
        })
    }

    /// Reformat `input` and save it under `output_root`.
    ///
    /// Scratch pictures are removed before this returns, whether or not the
    /// save succeeded.
    pub fn process_file<P: AsRef<Path>>(
        &self,
        input: P,
        output_root: &Path,
        scratch_dir: &Path,
    ) -> Result<FileReport> {
        let input = input.as_ref();
        let reformatted = self.reformat(input, scratch_dir)?;

        let (author, title) = match reformatted.fields.author_and_title() {
            Some((author, title)) => (author.to_string(), title.to_string()),
            None => return Err(Error::Other("author or title lost after extraction".into())),
        };

        let placement = reformatted.placement();
        let folder = self.options.placement.folder(output_root, placement);
        fs::create_dir_all(&folder).map_err(|e| Error::Save {
            path: folder.clone(),
            message: e.to_string(),
        })?;
        let output = folder.join(self.options.naming.file_name(&author, &title));

        let saved = reformatted.document.save(&output);
        let Reformatted {
            document,
            fields,
            warnings,
            scratch,
            ..
        } = reformatted;
        scratch.cleanup();
        saved?;

        log::info!("{} -> {}", input.display(), output.display());
        Ok(FileReport {
            source: input.to_path_buf(),
            output,
            placement,
            author,
            title,
            image_count: document.image_count(),
            has_images: fields.has_images,
            warnings,
        })
    }
}

fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}
