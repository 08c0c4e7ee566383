//! Regex-based char filter.

use regex::Regex;

use super::CharFilter;
use crate::error::{CategorizerError, Result};

/// Pattern matching tokens that mix letters and digits.
///
/// Alternatives, in order: a letter run followed by a digit run and any word
/// characters (`abc123x`), or a digit run followed by an optional letter run and
/// any word characters (`123abc`, and bare numbers such as `12345`).
pub const WORD_WITH_DIGITS_PATTERN: &str = r"\b(?:[a-z]+[0-9]+\w*|[0-9]+[a-z]*\w*)";

/// A char filter that replaces every match of a regex pattern.
#[derive(Clone, Debug)]
pub struct PatternReplaceCharFilter {
    pattern: Regex,
    replacement: String,
    name: &'static str,
}

impl PatternReplaceCharFilter {
    /// Create a new pattern replace char filter.
    pub fn new(pattern: &str, replacement: &str) -> Result<Self> {
        Ok(Self {
            pattern: Regex::new(pattern)
                .map_err(|e| CategorizerError::analysis(format!("Invalid regex pattern: {e}")))?,
            replacement: replacement.to_string(),
            name: "pattern_replace",
        })
    }

    /// Filter that blanks out identifiers mixing letters and digits
    /// (order ids, ticket numbers, bare numbers).
    pub fn word_with_digits() -> Result<Self> {
        let mut filter = Self::new(WORD_WITH_DIGITS_PATTERN, " ")?;
        filter.name = "word_with_digits";
        Ok(filter)
    }

    /// Get the regex pattern used by this filter.
    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }
}

impl CharFilter for PatternReplaceCharFilter {
    fn filter(&self, input: &str) -> String {
        self.pattern
            .replace_all(input, regex::NoExpand(&self.replacement))
            .into_owned()
    }

    fn name(&self) -> &'static str {
        self.name
    }
}
