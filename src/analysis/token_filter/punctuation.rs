//! Punctuation filter implementation.

use super::Filter;
use crate::analysis::token::{Token, TokenStream, TokenType};
use crate::error::Result;

/// A filter that drops tokens consisting of exactly one ASCII punctuation character.
///
/// Multi-character tokens such as `...` or `n't` pass through unchanged. When the
/// tokenizer assigned a [`TokenType`], only `Punctuation` tokens are candidates;
/// untyped tokens are judged by their text alone.
#[derive(Clone, Debug, Default)]
pub struct PunctuationFilter;

impl PunctuationFilter {
    /// Create a new punctuation filter.
    pub fn new() -> Self {
        PunctuationFilter
    }

    /// Check whether the text is a single punctuation character.
    pub fn is_punctuation(text: &str) -> bool {
        let mut chars = text.chars();
        matches!((chars.next(), chars.next()), (Some(c), None) if c.is_ascii_punctuation())
    }

    /// Check whether the token should be dropped.
    pub fn is_punctuation_token(token: &Token) -> bool {
        match token.token_type {
            Some(TokenType::Punctuation) | None => Self::is_punctuation(&token.text),
            Some(_) => false,
        }
    }
}

impl Filter for PunctuationFilter {
    fn filter(&self, tokens: TokenStream) -> Result<TokenStream> {
        let filtered_tokens: Vec<Token> = tokens
            .filter(|token| !Self::is_punctuation_token(token))
            .collect();

        Ok(Box::new(filtered_tokens.into_iter()))
    }

    fn name(&self) -> &'static str {
        "punctuation"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_punctuation_filter() {
        let filter = PunctuationFilter::new();
        let tokens = vec![
            Token::new("refund", 0),
            Token::new("!", 1),
            Token::new("#", 2),
            Token::new("...", 3),
            Token::new("n't", 4),
        ];

        let result: Vec<String> = filter
            .filter(Box::new(tokens.into_iter()))
            .unwrap()
            .map(|t| t.text)
            .collect();

        assert_eq!(result, vec!["refund", "...", "n't"]);
    }

    #[test]
    fn test_typed_tokens() {
        let filter = PunctuationFilter::new();
        let tokens = vec![
            Token::new("parcel", 0).with_token_type(TokenType::Word),
            Token::new("n't", 1).with_token_type(TokenType::Contraction),
            Token::new("?", 2).with_token_type(TokenType::Punctuation),
            Token::new("...", 3).with_token_type(TokenType::Punctuation),
            // A typed token is only dropped when typed as punctuation.
            Token::new("-", 4).with_token_type(TokenType::Other),
        ];

        let result: Vec<String> = filter
            .filter(Box::new(tokens.into_iter()))
            .unwrap()
            .map(|t| t.text)
            .collect();

        assert_eq!(result, vec!["parcel", "n't", "...", "-"]);
    }

    #[test]
    fn test_is_punctuation() {
        assert!(PunctuationFilter::is_punctuation(","));
        assert!(PunctuationFilter::is_punctuation("~"));
        assert!(!PunctuationFilter::is_punctuation(""));
        assert!(!PunctuationFilter::is_punctuation("a"));
        assert!(!PunctuationFilter::is_punctuation("!!"));
    }

    #[test]
    fn test_filter_name() {
        assert_eq!(PunctuationFilter::new().name(), "punctuation");
    }
}
