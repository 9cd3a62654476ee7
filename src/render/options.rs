//! Layout options for rebuilt documents.

use serde::{Deserialize, Serialize};

/// EMUs per inch in DrawingML.
pub const EMU_PER_INCH: u64 = 914_400;

/// Default subtitle appended under the title.
pub const DEFAULT_SUBTITLE: &str =
    "——福州大学先进制造学院与海洋学院关工委2023年\"中华魂\"（毛泽东伟大精神品格）主题教育征文";

/// Default attribution line; `{author}` is replaced by the author name.
pub const DEFAULT_ATTRIBUTION_TEMPLATE: &str = "（先进制造学院与海洋学院关工委通讯员{author}）";

/// Font, size and weight of one kind of paragraph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextStyle {
    /// Font family, used for both Latin and East Asian text
    pub font: String,

    /// Font size in points
    pub size_pt: f32,

    /// Bold text
    pub bold: bool,
}

impl TextStyle {
    /// Create a style.
    pub fn new(font: impl Into<String>, size_pt: f32, bold: bool) -> Self {
        Self {
            font: font.into(),
            size_pt,
            bold,
        }
    }

    /// Size in half-points as written to `w:sz`.
    pub fn size_half_points(&self) -> u32 {
        (self.size_pt * 2.0).round().max(1.0) as u32
    }
}

/// Layout of a rebuilt document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutOptions {
    /// Title block style, also used for the subtitle
    pub title: TextStyle,

    /// Subtitle placed after a line break in the title paragraph
    pub subtitle: String,

    /// Attribution line style
    pub attribution: TextStyle,

    /// Attribution text with an `{author}` placeholder
    pub attribution_template: String,

    /// Body paragraph style
    pub body: TextStyle,

    /// Display width of every picture in EMU
    pub image_width_emu: u64,

    /// Insert an empty paragraph between the body and the pictures
    pub separator_before_images: bool,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            title: TextStyle::new("黑体", 16.0, true),
            subtitle: DEFAULT_SUBTITLE.to_string(),
            attribution: TextStyle::new("宋体", 14.0, true),
            attribution_template: DEFAULT_ATTRIBUTION_TEMPLATE.to_string(),
            body: TextStyle::new("宋体", 12.0, false),
            image_width_emu: 6 * EMU_PER_INCH,
            separator_before_images: true,
        }
    }
}

impl LayoutOptions {
    /// Create layout options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the subtitle. An empty subtitle drops the line break as well.
    pub fn with_subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.subtitle = subtitle.into();
        self
    }

    /// Set the attribution template.
    pub fn with_attribution_template(mut self, template: impl Into<String>) -> Self {
        self.attribution_template = template.into();
        self
    }

    /// Set whether the attribution line is bold.
    pub fn with_attribution_bold(mut self, bold: bool) -> Self {
        self.attribution.bold = bold;
        self
    }

    /// Set the picture display width in inches.
    pub fn with_image_width_inches(mut self, inches: f64) -> Self {
        self.image_width_emu = (inches.max(0.1) * EMU_PER_INCH as f64).round() as u64;
        self
    }

    /// Set the body style.
    pub fn with_body_style(mut self, style: TextStyle) -> Self {
        self.body = style;
        self
    }

    /// Attribution text for an author.
    pub fn attribution_text(&self, author: &str) -> String {
        self.attribution_template.replace("{author}", author)
    }
}
