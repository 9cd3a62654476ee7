//! Parsing options and configuration.

use serde::{Deserialize, Serialize};

/// Options for reading Word packages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParseOptions {
    /// Error handling mode for picture parts
    pub error_mode: ErrorMode,

    /// Whether to load binary parts (pictures) reachable from relationships
    pub load_parts: bool,
}

impl ParseOptions {
    /// Create new parse options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set error mode.
    pub fn with_error_mode(mut self, mode: ErrorMode) -> Self {
        self.error_mode = mode;
        self
    }

    /// Fail the whole package when any picture part is unreadable.
    pub fn strict(mut self) -> Self {
        self.error_mode = ErrorMode::Strict;
        self
    }

    /// Enable lenient mode (skip unreadable picture parts).
    pub fn lenient(mut self) -> Self {
        self.error_mode = ErrorMode::Lenient;
        self
    }

    /// Read text structure only.
    pub fn text_only(mut self) -> Self {
        self.load_parts = false;
        self
    }
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            error_mode: ErrorMode::Lenient,
            load_parts: true,
        }
    }
}

/// Error handling mode during parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorMode {
    /// Fail on any unreadable part
    Strict,
    /// Skip unreadable picture parts and continue
    #[default]
    Lenient,
}
