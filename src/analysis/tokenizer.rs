//! Tokenizer implementations for text analysis.
//!
//! Tokenizers split a (char-filtered) string into tokens. They are the step
//! between char filters and token filters in the analysis chain.
//!
//! # Available Tokenizers
//!
//! - [`treebank::TreebankWordTokenizer`] - Word tokenization with punctuation as separate tokens
//! - [`whitespace::WhitespaceTokenizer`] - Splits on whitespace only
//!
//! # Examples
//!
//! ```
//! use message_categorizer::analysis::tokenizer::Tokenizer;
//! use message_categorizer::analysis::tokenizer::treebank::TreebankWordTokenizer;
//!
//! let tokenizer = TreebankWordTokenizer::new();
//! let tokens: Vec<_> = tokenizer.tokenize("hello, world!").unwrap().map(|t| t.text).collect();
//! assert_eq!(tokens, vec!["hello", ",", "world", "!"]);
//! ```

use crate::analysis::token::TokenStream;
use crate::error::Result;

/// Trait for tokenizers that convert text into tokens.
///
/// The trait requires `Send + Sync` so one tokenizer can serve parallel
/// normalization of many messages.
pub trait Tokenizer: Send + Sync {
    /// Tokenize the given text into a stream of tokens.
    fn tokenize(&self, text: &str) -> Result<TokenStream>;

    /// Get the name of this tokenizer (for debugging and configuration).
    fn name(&self) -> &'static str;
}

pub mod treebank;
pub mod whitespace;

pub use treebank::TreebankWordTokenizer;
pub use whitespace::WhitespaceTokenizer;
