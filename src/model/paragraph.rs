//! Paragraph and run-level types.

use super::ImageRef;
use serde::{Deserialize, Serialize};

/// A body paragraph of a Word document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Paragraph {
    /// Runs in document order
    pub runs: Vec<Run>,

    /// Paragraph alignment (`w:jc`)
    pub alignment: Alignment,

    /// Paragraph style id (`w:pStyle`), if any
    pub style_id: Option<String>,
}

impl Paragraph {
    /// Create a new empty paragraph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a paragraph with a single plain run.
    pub fn with_text(text: impl Into<String>) -> Self {
        let mut p = Self::new();
        p.add_run(Run::new(text));
        p
    }

    /// Add a run.
    pub fn add_run(&mut self, run: Run) {
        self.runs.push(run);
    }

    /// Concatenated text of all runs.
    pub fn text(&self) -> String {
        self.runs.iter().map(|r| r.text.as_str()).collect()
    }

    /// Check if the paragraph has no visible text.
    pub fn is_empty(&self) -> bool {
        self.runs.iter().all(|r| r.text.trim().is_empty())
    }

    /// Check if any run references a picture.
    pub fn has_image(&self) -> bool {
        self.runs.iter().any(Run::has_image)
    }

    /// A paragraph that carries pictures and no text.
    pub fn is_image_only(&self) -> bool {
        self.has_image() && self.is_empty()
    }

    /// All picture references in run order.
    pub fn image_refs(&self) -> impl Iterator<Item = &ImageRef> {
        self.runs.iter().flat_map(|r| r.images.iter())
    }
}

/// A run of text with consistent styling.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Run {
    /// The text content (`w:t`, with `w:tab`/`w:br` flattened)
    pub text: String,

    /// Run properties
    pub style: RunStyle,

    /// Pictures anchored in this run
    pub images: Vec<ImageRef>,
}

impl Run {
    /// Create a new run with default style.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }

    /// Create a run with the given style.
    pub fn styled(text: impl Into<String>, style: RunStyle) -> Self {
        Self {
            text: text.into(),
            style,
            images: Vec::new(),
        }
    }

    /// Create a run holding only a picture reference.
    pub fn image(image: ImageRef) -> Self {
        Self {
            images: vec![image],
            ..Default::default()
        }
    }

    /// Check if this run references a picture.
    pub fn has_image(&self) -> bool {
        !self.images.is_empty()
    }
}

/// Run properties read from `w:rPr`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunStyle {
    /// Bold text
    pub bold: bool,

    /// Italic text
    pub italic: bool,

    /// Font size in half-points (`w:sz`)
    pub size_half_points: Option<u32>,

    /// Latin font family (`w:rFonts/@w:ascii`)
    pub font: Option<String>,

    /// East Asian font family (`w:rFonts/@w:eastAsia`)
    pub east_asia_font: Option<String>,
}

impl RunStyle {
    /// Font size in points.
    pub fn size_pt(&self) -> Option<f32> {
        self.size_half_points.map(|hp| hp as f32 / 2.0)
    }

    /// Preferred font family for display, East Asian first.
    pub fn font_family(&self) -> Option<&str> {
        self.east_asia_font.as_deref().or(self.font.as_deref())
    }
}

/// Paragraph alignment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    /// Left alignment (default)
    #[default]
    Left,
    /// Center alignment
    Center,
    /// Right alignment
    Right,
    /// Justified alignment
    Justify,
}

impl Alignment {
    /// Parse a `w:jc/@w:val` value.
    pub fn from_ooxml(val: &str) -> Self {
        match val {
            "center" => Alignment::Center,
            "right" | "end" => Alignment::Right,
            "both" | "distribute" => Alignment::Justify,
            _ => Alignment::Left,
        }
    }

    /// The `w:jc/@w:val` value for this alignment.
    pub fn as_ooxml(&self) -> &'static str {
        match self {
            Alignment::Left => "left",
            Alignment::Center => "center",
            Alignment::Right => "right",
            Alignment::Justify => "both",
        }
    }
}
