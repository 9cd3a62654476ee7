//! Rebuilding documents in the standardized layout.
//!
//! [`DocumentBuilder`] collects the title, attribution, body and pictures in
//! output order; [`RebuiltDocument`] renders the WordprocessingML parts and
//! writes the package.

mod options;
mod rebuild;
mod writer;
pub mod xml;

pub use options::{
    LayoutOptions, TextStyle, DEFAULT_ATTRIBUTION_TEMPLATE, DEFAULT_SUBTITLE, EMU_PER_INCH,
};
pub use rebuild::{Block, DocumentBuilder, MediaPart, RebuiltDocument};
pub use writer::PackageWriter;
