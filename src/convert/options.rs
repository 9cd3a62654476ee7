//! Reformatting options and JSON configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::extract::{ImageStrategy, DEFAULT_IDENTIFIER_PREFIX};
use crate::parser::ParseOptions;
use crate::render::LayoutOptions;

use super::naming::{NamingOptions, PlacementOptions};

/// Options for reformatting one file or a whole folder.
///
/// Every field has a default, so a configuration file only needs the values
/// it changes:
///
/// ```
/// use redocx::convert::ReformatOptions;
///
/// let options = ReformatOptions::from_json_str(r#"{
///     "naming": { "suffix": "2024年征文" },
///     "image_strategy": "relationships"
/// }"#).unwrap();
/// assert_eq!(options.naming.suffix, "2024年征文");
/// assert_eq!(options.identifier_prefix, "852");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReformatOptions {
    /// Layout of rebuilt documents
    pub layout: LayoutOptions,

    /// Output file naming
    pub naming: NamingOptions,

    /// Output folder names
    pub placement: PlacementOptions,

    /// How pictures are located
    pub image_strategy: ImageStrategy,

    /// Prefix of identifier lines
    pub identifier_prefix: String,

    /// Folder in which each run creates its own picture folder; the system temporary location when unset
    pub scratch_dir: Option<PathBuf>,

    /// Copy failed originals and write an error log
    pub collect_failures: bool,

    /// Package reading options
    #[serde(skip)]
    pub parse: ParseOptions,
}

impl Default for ReformatOptions {
    fn default() -> Self {
        Self {
            layout: LayoutOptions::default(),
            naming: NamingOptions::default(),
            placement: PlacementOptions::default(),
            image_strategy: ImageStrategy::default(),
            identifier_prefix: DEFAULT_IDENTIFIER_PREFIX.to_string(),
            scratch_dir: None,
            collect_failures: true,
            parse: ParseOptions::default(),
        }
    }
}

impl ReformatOptions {
    /// Create options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load options from a JSON file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_json_str(&text)
    }

    /// Parse options from JSON text.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize options as pretty JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Set the layout.
    pub fn with_layout(mut self, layout: LayoutOptions) -> Self {
        self.layout = layout;
        self
    }

    /// Set the campaign suffix used in file names.
    pub fn with_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.naming.suffix = suffix.into();
        self
    }

    /// Set the subtitle under the title.
    pub fn with_subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.layout.subtitle = subtitle.into();
        self
    }

    /// Set the identifier prefix.
    pub fn with_identifier_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.identifier_prefix = prefix.into();
        self
    }

    /// Set the picture strategy.
    pub fn with_image_strategy(mut self, strategy: ImageStrategy) -> Self {
        self.image_strategy = strategy;
        self
    }

    /// Use an explicit scratch directory.
    pub fn with_scratch_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.scratch_dir = Some(dir.into());
        self
    }

    /// Enable or disable the failed folder.
    pub fn with_failure_collection(mut self, collect: bool) -> Self {
        self.collect_failures = collect;
        self
    }

    /// Set package reading options.
    pub fn with_parse_options(mut self, parse: ParseOptions) -> Self {
        self.parse = parse;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_json_is_default() {
        let options = ReformatOptions::from_json_str("{}").unwrap();
        assert_eq!(options, ReformatOptions::default());
    }

    #[test]
    fn test_json_roundtrip_keeps_changes() {
        let options = ReformatOptions::new()
            .with_suffix("征文")
            .with_identifier_prefix("731")
            .with_failure_collection(false);
        let parsed = ReformatOptions::from_json_str(&options.to_json().unwrap()).unwrap();
        assert_eq!(parsed, options);
    }

    #[test]
    fn test_invalid_json_is_config_error() {
        let result = ReformatOptions::from_json_str(r#"{"image_strategy": "everything"}"#);
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_missing_config_file() {
        let result = ReformatOptions::from_json_file("/no/such/redocx.json");
        assert!(matches!(result, Err(Error::Config(_))));
    }
}
