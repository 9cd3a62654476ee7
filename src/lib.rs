//! # redocx
//!
//! Batch reformatting of templated Word (`.docx`) submissions.
//!
//! Each source document carries an author identifier (`852` followed by
//! digits and a name), a title paragraph, body paragraphs and pictures. The
//! library pulls those out and writes a new document in a fixed layout:
//! a centered title block with subtitle, an attribution line, the body in a
//! uniform font, and every picture at the end scaled to a common width.
//!
//! ## Quick Start
//!
//! ```no_run
//! use redocx::{process_folder, ReformatOptions};
//!
//! fn main() -> redocx::Result<()> {
//!     let summary = process_folder("submissions", "formatted", ReformatOptions::default())?;
//!     println!("{} of {} files saved", summary.succeeded, summary.total);
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Author extraction**: from the file name, falling back to the identifier line
//! - **Picture discovery**: inline, anchored and bare drawing shapes
//! - **Standard layout**: configurable fonts, subtitle, attribution and picture width
//! - **Batch driver**: typed per-file events, failed-file archive, background thread
//! - **Configuration**: JSON files mapped onto option structs

pub mod convert;
pub mod detect;
pub mod error;
pub mod extract;
pub mod model;
pub mod parser;
pub mod render;

// Re-export commonly used types
pub use convert::{
    BatchHandle, BatchProcessor, BatchSummary, CancelFlag, EventSink, FileEvent, FileReport,
    Inspection, LogSink, NamingOptions, Placement, PlacementOptions, ReformatOptions,
    Reformatter,
};
pub use detect::{detect_package_from_bytes, detect_package_from_path, is_docx};
pub use error::{Error, FailureKind, MissingFields, Result};
pub use extract::{Emission, IdentifierMatcher, ImageStrategy, PrefixIdentifier, TitleMatcher};
pub use model::{
    Alignment, EmbeddedImage, ExtractedFields, ImageRef, Paragraph, Run, RunStyle,
    SourceDocument,
};
pub use parser::{DocxParser, ErrorMode, ParseOptions};
pub use render::{LayoutOptions, RebuiltDocument, TextStyle};

use std::io::Read;
use std::path::{Path, PathBuf};

/// Open a `.docx` file as a [`SourceDocument`].
///
/// # Example
///
/// ```no_run
/// use redocx::open_document;
///
/// let doc = open_document("852203106张三.docx").unwrap();
/// println!("Paragraphs: {}", doc.paragraph_count());
/// ```
pub fn open_document<P: AsRef<Path>>(path: P) -> Result<SourceDocument> {
    DocxParser::open(path)?.parse()
}

/// Open a `.docx` file with custom options.
pub fn open_document_with_options<P: AsRef<Path>>(
    path: P,
    options: ParseOptions,
) -> Result<SourceDocument> {
    DocxParser::open_with_options(path, options)?.parse()
}

/// Read a `.docx` package from bytes.
pub fn open_bytes(data: &[u8]) -> Result<SourceDocument> {
    DocxParser::from_bytes(data.to_vec())?.parse()
}

/// Read a `.docx` package from a reader.
pub fn open_reader<R: Read>(reader: R) -> Result<SourceDocument> {
    DocxParser::from_reader(reader)?.parse()
}

/// Show what a file would produce without writing anything.
///
/// # Example
///
/// ```no_run
/// use redocx::inspect_file;
///
/// let info = inspect_file("852203106张三.docx").unwrap();
/// println!("{:?} / {:?}", info.author, info.title);
/// ```
pub fn inspect_file<P: AsRef<Path>>(path: P) -> Result<Inspection> {
    Reformatter::new(ReformatOptions::default())?.inspect(path)
}

/// Reformat one file into `output_root` with default options.
///
/// Pictures pass through a temporary directory that is removed afterwards.
pub fn reformat_file<P, Q>(input: P, output_root: Q) -> Result<FileReport>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    Redocx::new().reformat_file(input, output_root)
}

/// Reformat every candidate file of a folder.
///
/// Progress goes to the `log` facade.
pub fn process_folder<P, Q>(
    input_dir: P,
    output_dir: Q,
    options: ReformatOptions,
) -> Result<BatchSummary>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    BatchProcessor::new(options)?.process_folder(input_dir, output_dir, &mut LogSink)
}

/// Builder for reformatting documents.
///
/// # Example
///
/// ```no_run
/// use redocx::{ImageStrategy, Redocx};
///
/// let summary = Redocx::new()
///     .with_suffix("2024年主题教育征文")
///     .with_image_strategy(ImageStrategy::Relationships)
///     .without_failure_copies()
///     .process_folder("submissions", "formatted")?;
/// # Ok::<(), redocx::Error>(())
/// ```
pub struct Redocx {
    options: ReformatOptions,
}

impl Redocx {
    /// Create a new builder with default options.
    pub fn new() -> Self {
        Self {
            options: ReformatOptions::default(),
        }
    }

    /// Start from existing options.
    pub fn with_options(options: ReformatOptions) -> Self {
        Self { options }
    }

    /// Set the campaign suffix used in file names.
    pub fn with_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.options = self.options.with_suffix(suffix);
        self
    }

    /// Set the subtitle under the title.
    pub fn with_subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.options = self.options.with_subtitle(subtitle);
        self
    }

    /// Set the identifier prefix.
    pub fn with_identifier_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.options = self.options.with_identifier_prefix(prefix);
        self
    }

    /// Set the picture strategy.
    pub fn with_image_strategy(mut self, strategy: ImageStrategy) -> Self {
        self.options = self.options.with_image_strategy(strategy);
        self
    }

    /// Set the layout.
    pub fn with_layout(mut self, layout: LayoutOptions) -> Self {
        self.options = self.options.with_layout(layout);
        self
    }

    /// Create the per-run picture folder inside `dir`.
    pub fn with_scratch_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.options = self.options.with_scratch_dir(dir);
        self
    }

    /// Do not write the failed folder.
    pub fn without_failure_copies(mut self) -> Self {
        self.options = self.options.with_failure_collection(false);
        self
    }

    /// Fail on unreadable picture parts instead of skipping them.
    pub fn strict(mut self) -> Self {
        self.options.parse = self.options.parse.strict();
        self
    }

    /// The options collected so far.
    pub fn options(&self) -> &ReformatOptions {
        &self.options
    }

    /// Inspect one file.
    pub fn inspect<P: AsRef<Path>>(self, path: P) -> Result<Inspection> {
        Reformatter::new(self.options)?.inspect(path)
    }

    /// Reformat one file into `output_root`.
    pub fn reformat_file<P, Q>(self, input: P, output_root: Q) -> Result<FileReport>
    where
        P: AsRef<Path>,
        Q: AsRef<Path>,
    {
        let scratch = extract::ScratchDir::new(self.options.scratch_dir.as_deref())?;
        let reformatter = Reformatter::new(self.options)?;
        std::fs::create_dir_all(output_root.as_ref())?;
        reformatter.process_file(input, output_root.as_ref(), scratch.path())
    }

    /// Reformat a folder, logging progress.
    pub fn process_folder<P, Q>(self, input_dir: P, output_dir: Q) -> Result<BatchSummary>
    where
        P: AsRef<Path>,
        Q: AsRef<Path>,
    {
        process_folder(input_dir, output_dir, self.options)
    }

    /// Reformat a folder, sending events to `sink`.
    pub fn process_folder_with_sink<P, Q>(
        self,
        input_dir: P,
        output_dir: Q,
        sink: &mut dyn EventSink,
    ) -> Result<BatchSummary>
    where
        P: AsRef<Path>,
        Q: AsRef<Path>,
    {
        BatchProcessor::new(self.options)?.process_folder(input_dir, output_dir, sink)
    }

    /// Start a folder batch on a background thread.
    pub fn spawn<P, Q>(self, input_dir: P, output_dir: Q) -> Result<BatchHandle>
    where
        P: Into<PathBuf>,
        Q: Into<PathBuf>,
    {
        Ok(BatchProcessor::new(self.options)?.spawn(input_dir, output_dir))
    }
}

impl Default for Redocx {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redocx_builder() {
        let redocx = Redocx::new()
            .with_suffix("征文")
            .with_identifier_prefix("731")
            .without_failure_copies()
            .strict();

        assert_eq!(redocx.options().naming.suffix, "征文");
        assert_eq!(redocx.options().identifier_prefix, "731");
        assert!(!redocx.options().collect_failures);
        assert_eq!(redocx.options().parse.error_mode, ErrorMode::Strict);
    }

    #[test]
    fn test_open_bytes_empty_data() {
        let data: [u8; 0] = [];
        assert!(open_bytes(&data).is_err());
    }

    #[test]
    fn test_open_bytes_not_a_package() {
        let result = open_bytes(b"%PDF-1.7\n%test");
        assert!(matches!(result, Err(Error::Corrupted(_))));
    }

    #[test]
    fn test_open_missing_file() {
        let result = open_document("/no/such/file.docx");
        assert!(matches!(result, Err(Error::NotFound(_))));
    }

    #[test]
    fn test_empty_identifier_prefix_is_rejected() {
        let result = Redocx::new().with_identifier_prefix("").inspect("any.docx");
        assert!(matches!(result, Err(Error::Config(_))));
    }
}
