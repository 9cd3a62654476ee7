//! Field extraction from source documents.
//!
//! - [`identifier`]: author name from file names and identifier lines
//! - [`images`]: picture discovery and scratch output
//! - [`classify`]: title, attribution and body selection
//! - [`scratch`]: scratch directory and file guards

pub mod classify;
pub mod identifier;
pub mod images;
pub mod scratch;

pub use classify::{Classification, Classifier, Emission, FirstParagraphTitle, TitleMatcher};
pub use identifier::{sort_key, IdentifierMatcher, PrefixIdentifier, DEFAULT_IDENTIFIER_PREFIX};
pub use images::{paragraph_has_image, ExtractedImages, ImageDiscovery, ImageExtractor, ImageStrategy};
pub use scratch::{ScratchDir, ScratchImages};
