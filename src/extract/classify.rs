//! Single-pass paragraph classification.
//!
//! The classifier walks the body paragraphs once, in order, and decides for
//! each one whether it becomes the title, feeds the author name, or is kept
//! as body text. It never goes back to an earlier paragraph.

use serde::{Deserialize, Serialize};

use crate::model::Paragraph;

use super::identifier::IdentifierMatcher;
use super::images::paragraph_has_image;

/// Decides whether a candidate paragraph is the title.
///
/// Candidates are already non-empty, picture-free and not identifier lines.
pub trait TitleMatcher: Send + Sync {
    /// Whether `text` (trimmed) is the title.
    fn is_title(&self, text: &str) -> bool;
}

/// The first candidate paragraph is the title.
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstParagraphTitle;

impl TitleMatcher for FirstParagraphTitle {
    fn is_title(&self, _text: &str) -> bool {
        true
    }
}

impl<F> TitleMatcher for F
where
    F: Fn(&str) -> bool + Send + Sync,
{
    fn is_title(&self, text: &str) -> bool {
        self(text)
    }
}

/// One output element, in the order the rebuilt document shows them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "text", rename_all = "snake_case")]
pub enum Emission {
    /// The title text
    Title(String),
    /// The author name to credit
    Attribution(String),
    /// A body paragraph's text
    Body(String),
}

/// Result of a classification pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    /// Output elements in order
    pub emissions: Vec<Emission>,
    /// Author from the file name or an identifier line
    pub author: Option<String>,
    /// Title text
    pub title: Option<String>,
}

impl Classification {
    /// Body paragraphs only.
    pub fn body(&self) -> impl Iterator<Item = &str> {
        self.emissions.iter().filter_map(|e| match e {
            Emission::Body(text) => Some(text.as_str()),
            _ => None,
        })
    }

    /// Whether an attribution line was emitted.
    pub fn has_attribution(&self) -> bool {
        self.emissions
            .iter()
            .any(|e| matches!(e, Emission::Attribution(_)))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    SeekingTitle,
    AfterTitle,
}

/// Forward-only paragraph classifier.
pub struct Classifier<'a> {
    identifier: &'a dyn IdentifierMatcher,
    title: &'a dyn TitleMatcher,
}

impl<'a> Classifier<'a> {
    /// Create a classifier from the two matchers.
    pub fn new(identifier: &'a dyn IdentifierMatcher, title: &'a dyn TitleMatcher) -> Self {
        Self { identifier, title }
    }

    /// Classify `paragraphs`, starting from the author found in the file name.
    pub fn classify<'p, I>(&self, paragraphs: I, author: Option<String>) -> Classification
    where
        I: IntoIterator<Item = &'p Paragraph>,
    {
        let mut out = Classification {
            author,
            ..Default::default()
        };
        let mut state = State::SeekingTitle;
        let mut attributed = false;

        for (index, paragraph) in paragraphs.into_iter().enumerate() {
            let text = paragraph.text();
            let trimmed = text.trim();

            if trimmed.is_empty() {
                continue;
            }

            if self.identifier.is_identifier_line(&text) {
                if out.author.is_none() {
                    out.author = self.identifier.author_from_line(&text);
                    if let Some(author) = &out.author {
                        log::debug!("paragraph {}: author '{}' from identifier line", index, author);
                    }
                }
                if state == State::AfterTitle {
                    attributed |= emit_attribution(&mut out, attributed);
                }
                continue;
            }

            match state {
                State::SeekingTitle => {
                    if paragraph_has_image(paragraph) || !self.title.is_title(trimmed) {
                        continue;
                    }
                    log::debug!("paragraph {}: title '{}'", index, trimmed);
                    out.title = Some(trimmed.to_string());
                    out.emissions.push(Emission::Title(trimmed.to_string()));
                    state = State::AfterTitle;
                    attributed |= emit_attribution(&mut out, attributed);
                }
                State::AfterTitle => out.emissions.push(Emission::Body(text)),
            }
        }

        out
    }
}

/// Push the attribution once an author is known; returns whether it was pushed.
fn emit_attribution(out: &mut Classification, attributed: bool) -> bool {
    if attributed {
        return false;
    }
    match &out.author {
        Some(author) => {
            out.emissions.push(Emission::Attribution(author.clone()));
            true
        }
        None => false,
    }
}
