//! Output file naming and folder placement.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use unicode_normalization::UnicodeNormalization;

/// Default campaign suffix used in output file names.
pub const DEFAULT_SUFFIX: &str =
    "福州大学先进制造学院与海洋学院关工委2023年'中华魂'（毛泽东伟大精神品格）主题教育征文";

/// Default file name template.
pub const DEFAULT_TEMPLATE: &str = "《{author}》{title}——{suffix}.docx";

/// How output files are named.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NamingOptions {
    /// Template with `{author}`, `{title}` and `{suffix}` placeholders
    pub template: String,

    /// Campaign suffix
    pub suffix: String,

    /// Apply NFC normalization to author and title
    pub normalize: bool,
}

impl Default for NamingOptions {
    fn default() -> Self {
        Self {
            template: DEFAULT_TEMPLATE.to_string(),
            suffix: DEFAULT_SUFFIX.to_string(),
            normalize: true,
        }
    }
}

impl NamingOptions {
    /// Create naming options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the campaign suffix.
    pub fn with_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = suffix.into();
        self
    }

    /// Set the file name template.
    pub fn with_template(mut self, template: impl Into<String>) -> Self {
        self.template = template.into();
        self
    }

    /// Output file name for an author and title.
    ///
    /// # Example
    ///
    /// ```
    /// use redocx::convert::NamingOptions;
    ///
    /// let naming = NamingOptions::new().with_suffix("征文");
    /// assert_eq!(naming.file_name("张三", "我的家乡"), "《张三》我的家乡——征文.docx");
    /// ```
    pub fn file_name(&self, author: &str, title: &str) -> String {
        let clean = |s: &str| {
            let s = s.trim();
            if self.normalize {
                sanitize(&s.nfc().collect::<String>())
            } else {
                sanitize(s)
            }
        };

        let name = self
            .template
            .replace("{author}", &clean(author))
            .replace("{title}", &clean(title))
            .replace("{suffix}", &sanitize(&self.suffix));

        if name.to_ascii_lowercase().ends_with(".docx") {
            name
        } else {
            format!("{}.docx", name)
        }
    }
}

/// Replace characters that are not allowed in file names with `_`.
pub fn sanitize(component: &str) -> String {
    component
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect()
}

/// Output folder of a successful file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Placement {
    /// At least one picture was embedded
    Success,
    /// No picture was embedded
    NoImageSuccess,
}

impl Placement {
    /// Placement for a number of embedded pictures.
    pub fn for_image_count(count: usize) -> Self {
        if count > 0 {
            Placement::Success
        } else {
            Placement::NoImageSuccess
        }
    }
}

impl std::fmt::Display for Placement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Placement::Success => write!(f, "success"),
            Placement::NoImageSuccess => write!(f, "no-image-success"),
        }
    }
}

/// Folder names under the output root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlacementOptions {
    /// Files with pictures
    pub success_dir: String,

    /// Files without pictures
    pub no_image_dir: String,

    /// Failed originals and the error log
    pub failed_dir: String,

    /// Error log file name inside the failed folder
    pub error_log: String,

    /// Zip of failed originals inside the failed folder; empty to skip
    pub failed_archive: String,
}

impl Default for PlacementOptions {
    fn default() -> Self {
        Self {
            success_dir: "success".to_string(),
            no_image_dir: "no-image-success".to_string(),
            failed_dir: "failed".to_string(),
            error_log: "error_log.txt".to_string(),
            failed_archive: "failed_files.zip".to_string(),
        }
    }
}

impl PlacementOptions {
    /// Folder for a placement under `root`.
    pub fn folder(&self, root: &Path, placement: Placement) -> PathBuf {
        match placement {
            Placement::Success => root.join(&self.success_dir),
            Placement::NoImageSuccess => root.join(&self.no_image_dir),
        }
    }

    /// Failed folder under `root`.
    pub fn failed_folder(&self, root: &Path) -> PathBuf {
        root.join(&self.failed_dir)
    }
}
