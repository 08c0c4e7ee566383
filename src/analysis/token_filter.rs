//! Token filter implementations for token transformation.
//!
//! Filters transform the token stream produced by a tokenizer. They can drop
//! tokens (stop words, punctuation) or rewrite them (lemmatization).
//!
//! # Available Filters
//!
//! - [`stop::StopFilter`] - Removes stop words
//! - [`lemma::LemmaFilter`] - Replaces tokens with their dictionary base form
//! - [`punctuation::PunctuationFilter`] - Removes single punctuation characters
//!
//! # Examples
//!
//! ```
//! use message_categorizer::analysis::token_filter::Filter;
//! use message_categorizer::analysis::token_filter::stop::StopFilter;
//! use message_categorizer::analysis::token::Token;
//!
//! let filter = StopFilter::from_words(vec!["the"]);
//! let tokens = vec![Token::new("the", 0), Token::new("parcel", 1)];
//! let filtered: Vec<_> = filter.filter(Box::new(tokens.into_iter()))
//!     .unwrap()
//!     .collect();
//!
//! assert_eq!(filtered.len(), 1);
//! assert_eq!(filtered[0].text, "parcel");
//! ```

use crate::analysis::token::TokenStream;
use crate::error::Result;

/// Trait for filters that transform token streams.
///
/// The trait requires `Send + Sync` to allow use in concurrent contexts.
pub trait Filter: Send + Sync {
    /// Apply this filter to a token stream.
    fn filter(&self, tokens: TokenStream) -> Result<TokenStream>;

    /// Get the name of this filter (for debugging and configuration).
    fn name(&self) -> &'static str;
}

pub mod lemma;
pub mod punctuation;
pub mod stop;

pub use lemma::{LemmaFilter, Lemmatizer, MorphyLemmatizer};
pub use punctuation::PunctuationFilter;
pub use stop::{
    EnglishStopwords, StaticStopwords, StopFilter, StopwordSource, SupportChatStopwords,
};
