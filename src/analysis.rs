//! Text analysis module.
//!
//! Turns raw support messages into cleaned token sequences. The design follows
//! a classic analysis chain:
//!
//! ```text
//! Raw Text → Char Filters → Tokenizer → Token Filters → Tokens
//! ```
//!
//! [`analyzer::normalizer::TextNormalizer`] assembles the fixed chain used by the
//! categorizer from a set of [`analyzer::normalizer::NormalizationOptions`].

pub mod analyzer;
pub mod char_filter;
pub mod token;
pub mod token_filter;
pub mod tokenizer;
