//! Author identifier recognition.
//!
//! Submissions carry a student identifier such as `852203106-张三`, both in
//! the file name and on a line of the body. The name is taken from the file
//! name first and from the identifier line as a fallback.

use regex::Regex;

use crate::error::{Error, Result};

/// Prefix every identifier starts with.
pub const DEFAULT_IDENTIFIER_PREFIX: &str = "852";

/// Rules that recognize identifier lines and pull an author name out of them.
pub trait IdentifierMatcher: Send + Sync {
    /// Whether this paragraph text is an identifier line.
    fn is_identifier_line(&self, text: &str) -> bool;

    /// Author name from an identifier line, if the line yields one.
    fn author_from_line(&self, text: &str) -> Option<String>;

    /// Author name from a source file name.
    fn author_from_filename(&self, file_name: &str) -> Option<String>;
}

/// Identifier rules keyed on a digit prefix.
///
/// # Example
///
/// ```
/// use redocx::extract::{IdentifierMatcher, PrefixIdentifier};
///
/// let rules = PrefixIdentifier::default();
/// assert_eq!(
///     rules.author_from_filename("852203106张三-我的家乡.docx").as_deref(),
///     Some("张三")
/// );
/// ```
#[derive(Debug, Clone)]
pub struct PrefixIdentifier {
    prefix: String,
    filename_re: Regex,
    dashed_line_re: Regex,
    plain_line_re: Regex,
}

impl PrefixIdentifier {
    /// Build the rules for a custom prefix.
    pub fn new(prefix: &str) -> Result<Self> {
        let prefix = prefix.trim();
        if prefix.is_empty() {
            return Err(Error::Config("identifier prefix must not be empty".into()));
        }

        let escaped = regex::escape(prefix);
        let compile = |pattern: String| {
            Regex::new(&pattern).map_err(|e| Error::Config(format!("identifier pattern: {}", e)))
        };

        Ok(Self {
            prefix: prefix.to_string(),
            filename_re: compile(format!(r"{}\d+[^一-龥]*([一-龥]{{2,4}})", escaped))?,
            dashed_line_re: compile(format!(r"{}\d*[^-]*-([^-\d\W]+)", escaped))?,
            plain_line_re: compile(format!(r"{}\d*[\s-]*([^\d\W]+)", escaped))?,
        })
    }

    /// The configured prefix.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }
}

impl Default for PrefixIdentifier {
    fn default() -> Self {
        Self::new(DEFAULT_IDENTIFIER_PREFIX).expect("default identifier patterns compile")
    }
}

impl IdentifierMatcher for PrefixIdentifier {
    fn is_identifier_line(&self, text: &str) -> bool {
        text.trim_start().starts_with(&self.prefix)
    }

    fn author_from_line(&self, text: &str) -> Option<String> {
        if !self.is_identifier_line(text) {
            return None;
        }
        let text = text.trim_start();
        [&self.dashed_line_re, &self.plain_line_re]
            .into_iter()
            .find_map(|re| first_capture(re, text))
    }

    fn author_from_filename(&self, file_name: &str) -> Option<String> {
        first_capture(&self.filename_re, file_name)
    }
}

fn first_capture(re: &Regex, text: &str) -> Option<String> {
    let name = re.captures(text)?.get(1)?.as_str().trim();
    (!name.is_empty()).then(|| name.to_string())
}

/// Batch ordering key: the first run of ASCII digits in the file name.
///
/// Numbered files sort ascending by that number; files without digits come
/// last. Ties fall back to the file name.
pub fn sort_key(file_name: &str) -> (u128, String) {
    let number = file_name
        .split(|c: char| !c.is_ascii_digit())
        .find(|run| !run.is_empty())
        .map(|run| run.parse::<u128>().unwrap_or(u128::MAX - 1))
        .unwrap_or(u128::MAX);
    (number, file_name.to_string())
}
