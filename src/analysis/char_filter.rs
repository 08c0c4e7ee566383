//! Char filter implementations for text normalization.
//!
//! Char filters pre-process the raw string before it reaches the tokenizer.
//! Each filter is a pure `&str -> String` transform.
//!
//! # Available Filters
//!
//! - [`lowercase::LowercaseCharFilter`] - Lowercases the whole string
//! - [`printable_ascii::PrintableAsciiCharFilter`] - Replaces non-printable ASCII with spaces
//! - [`pattern_replace::PatternReplaceCharFilter`] - Regex-based replacement
//!
//! # Examples
//!
//! ```
//! use message_categorizer::analysis::char_filter::CharFilter;
//! use message_categorizer::analysis::char_filter::printable_ascii::PrintableAsciiCharFilter;
//!
//! let filter = PrintableAsciiCharFilter::new();
//! assert_eq!(filter.filter("caf\u{e9}\tok"), "caf  ok");
//! ```

/// Trait for character filters that transform text before tokenization.
pub trait CharFilter: Send + Sync {
    /// Apply this filter to the input text.
    fn filter(&self, input: &str) -> String;

    /// Get the name of this char filter.
    fn name(&self) -> &'static str;
}

pub mod lowercase;
pub mod pattern_replace;
pub mod printable_ascii;

pub use lowercase::LowercaseCharFilter;
pub use pattern_replace::PatternReplaceCharFilter;
pub use printable_ascii::PrintableAsciiCharFilter;
