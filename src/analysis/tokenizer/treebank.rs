//! Treebank-style word tokenizer.
//!
//! Splits text on whitespace and punctuation the way the Penn Treebank
//! conventions do for plain ASCII text:
//!
//! - runs of word characters (with internal `-` or `'`) form one token
//! - decimal numbers such as `3.50` stay together
//! - an ellipsis `...` is a single token
//! - every other non-space character is a token of its own
//! - contractions are split into stem and clitic (`don't` → `do` `n't`,
//!   `i'm` → `i` `'m`)
//!
//! # Examples
//!
//! ```
//! use message_categorizer::analysis::tokenizer::Tokenizer;
//! use message_categorizer::analysis::tokenizer::treebank::TreebankWordTokenizer;
//!
//! let tokenizer = TreebankWordTokenizer::new();
//! let tokens: Vec<_> = tokenizer
//!     .tokenize("i don't see it!!")
//!     .unwrap()
//!     .map(|t| t.text)
//!     .collect();
//! assert_eq!(tokens, vec!["i", "do", "n't", "see", "it", "!", "!"]);
//! ```

use std::sync::LazyLock;

use regex::Regex;

use super::Tokenizer;
use crate::analysis::token::{Token, TokenStream, TokenType};
use crate::error::Result;

static TREEBANK_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\.\.\.|\d+(?:[.,]\d+)+|\w+(?:[-']\w+)*|\S")
        .expect("treebank pattern should be valid")
});

/// Clitics split off the end of a word.
const CLITICS: &[&str] = &["'s", "'m", "'d", "'ll", "'re", "'ve"];

/// A word tokenizer following Treebank conventions.
#[derive(Clone, Debug, Default)]
pub struct TreebankWordTokenizer;

impl TreebankWordTokenizer {
    /// Create a new treebank word tokenizer.
    pub fn new() -> Self {
        TreebankWordTokenizer
    }

    /// Byte index where a contraction suffix starts, if the word has one.
    fn contraction_split(word: &str) -> Option<usize> {
        let lower = word.to_ascii_lowercase();
        if lower.len() > 3 && lower.ends_with("n't") {
            return Some(lower.len() - 3);
        }
        let apostrophe = lower.rfind('\'')?;
        if apostrophe > 0 && CLITICS.contains(&&lower[apostrophe..]) {
            return Some(apostrophe);
        }
        None
    }
}

impl Tokenizer for TreebankWordTokenizer {
    fn tokenize(&self, text: &str) -> Result<TokenStream> {
        let mut tokens: Vec<Token> = Vec::new();

        for mat in TREEBANK_PATTERN.find_iter(text) {
            let word = mat.as_str();
            match Self::contraction_split(word) {
                Some(split) => {
                    let (stem, clitic) = word.split_at(split);
                    let position = tokens.len();
                    tokens.push(
                        Token::with_offsets(stem, position, mat.start(), mat.start() + split)
                            .with_token_type(TokenType::detect(stem)),
                    );
                    tokens.push(
                        Token::with_offsets(clitic, position + 1, mat.start() + split, mat.end())
                            .with_token_type(TokenType::Contraction),
                    );
                }
                None => {
                    let position = tokens.len();
                    tokens.push(
                        Token::with_offsets(word, position, mat.start(), mat.end())
                            .with_token_type(TokenType::detect(word)),
                    );
                }
            }
        }

        Ok(Box::new(tokens.into_iter()))
    }

    fn name(&self) -> &'static str {
        "treebank"
    }
}
