//! Stop filter implementation.
//!
//! Removes tokens that carry little signal for categorization. Stop word lists
//! come from [`StopwordSource`] providers so callers can inject their own
//! (or a minimal fake one in tests):
//!
//! - [`EnglishStopwords`] - the standard English list used by NLTK
//! - [`SupportChatStopwords`] - support chat boilerplate (greetings, sign-offs, brand terms)
//! - [`StaticStopwords`] - any caller-supplied list
//!
//! # Examples
//!
//! ```
//! use message_categorizer::analysis::token_filter::Filter;
//! use message_categorizer::analysis::token_filter::stop::{
//!     EnglishStopwords, StopFilter, SupportChatStopwords,
//! };
//! use message_categorizer::analysis::token::Token;
//!
//! let filter = StopFilter::from_sources(&[&EnglishStopwords, &SupportChatStopwords]);
//! let tokens = vec![
//!     Token::new("hello", 0),
//!     Token::new("the", 1),
//!     Token::new("parcel", 2),
//! ];
//!
//! let result: Vec<_> = filter.filter(Box::new(tokens.into_iter()))
//!     .unwrap()
//!     .collect();
//!
//! assert_eq!(result.len(), 1);
//! assert_eq!(result[0].text, "parcel");
//! ```

use std::collections::HashSet;
use std::sync::{Arc, LazyLock};

use crate::analysis::token::{Token, TokenStream};
use crate::analysis::token_filter::Filter;
use crate::error::Result;

/// Standard English stop words (the NLTK corpus list).
const ENGLISH_STOP_WORDS: &[&str] = &[
    "i", "me", "my", "myself", "we", "our", "ours", "ourselves", "you", "you're", "you've",
    "you'll", "you'd", "your", "yours", "yourself", "yourselves", "he", "him", "his", "himself",
    "she", "she's", "her", "hers", "herself", "it", "it's", "its", "itself", "they", "them",
    "their", "theirs", "themselves", "what", "which", "who", "whom", "this", "that", "that'll",
    "these", "those", "am", "is", "are", "was", "were", "be", "been", "being", "have", "has",
    "had", "having", "do", "does", "did", "doing", "a", "an", "the", "and", "but", "if", "or",
    "because", "as", "until", "while", "of", "at", "by", "for", "with", "about", "against",
    "between", "into", "through", "during", "before", "after", "above", "below", "to", "from",
    "up", "down", "in", "out", "on", "off", "over", "under", "again", "further", "then", "once",
    "here", "there", "when", "where", "why", "how", "all", "any", "both", "each", "few", "more",
    "most", "other", "some", "such", "no", "nor", "not", "only", "own", "same", "so", "than",
    "too", "very", "s", "t", "can", "will", "just", "don", "don't", "should", "should've", "now",
    "d", "ll", "m", "o", "re", "ve", "y", "ain", "aren", "aren't", "couldn", "couldn't", "didn",
    "didn't", "doesn", "doesn't", "hadn", "hadn't", "hasn", "hasn't", "haven", "haven't", "isn",
    "isn't", "ma", "mightn", "mightn't", "mustn", "mustn't", "needn", "needn't", "shan",
    "shan't", "shouldn", "shouldn't", "wasn", "wasn't", "weren", "weren't", "won", "won't",
    "wouldn", "wouldn't",
];

/// Support chat boilerplate: greetings, sign-offs, politeness, brand terms.
const SUPPORT_CHAT_STOP_WORDS: &[&str] = &[
    "i", "im", "hi", "hello", "hey", "dear", "good", "morning", "afternoon", "evening", "please",
    "pls", "plz", "thanks", "thank", "thx", "ty", "you", "regards", "kind", "best", "cheers",
    "sincerely", "sir", "madam", "team", "support", "hope", "ok", "okay", "shop", "store", "app",
];

static ENGLISH_STOP_WORDS_SET: LazyLock<HashSet<String>> =
    LazyLock::new(|| ENGLISH_STOP_WORDS.iter().map(|&s| s.to_string()).collect());

static SUPPORT_CHAT_STOP_WORDS_SET: LazyLock<HashSet<String>> =
    LazyLock::new(|| SUPPORT_CHAT_STOP_WORDS.iter().map(|&s| s.to_string()).collect());

/// A read-only provider of stop words.
pub trait StopwordSource: Send + Sync {
    /// The words this source contributes.
    fn stopwords(&self) -> &HashSet<String>;

    /// Get the name of this source.
    fn name(&self) -> &'static str;
}

/// The standard English stop word list.
#[derive(Clone, Copy, Debug, Default)]
pub struct EnglishStopwords;

impl StopwordSource for EnglishStopwords {
    fn stopwords(&self) -> &HashSet<String> {
        &ENGLISH_STOP_WORDS_SET
    }

    fn name(&self) -> &'static str {
        "english"
    }
}

/// Support chat boilerplate stop words.
#[derive(Clone, Copy, Debug, Default)]
pub struct SupportChatStopwords;

impl StopwordSource for SupportChatStopwords {
    fn stopwords(&self) -> &HashSet<String> {
        &SUPPORT_CHAT_STOP_WORDS_SET
    }

    fn name(&self) -> &'static str {
        "support_chat"
    }
}

/// A caller-supplied stop word list.
#[derive(Clone, Debug, Default)]
pub struct StaticStopwords {
    words: HashSet<String>,
}

impl StaticStopwords {
    /// Create a source from any list of words.
    pub fn new<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        StaticStopwords {
            words: words.into_iter().map(Into::into).collect(),
        }
    }
}

impl StopwordSource for StaticStopwords {
    fn stopwords(&self) -> &HashSet<String> {
        &self.words
    }

    fn name(&self) -> &'static str {
        "static"
    }
}

/// A filter that removes stop words from the token stream.
///
/// Stopped tokens can either be dropped entirely (the default) or kept in the
/// stream with their `stopped` flag set.
#[derive(Clone, Debug)]
pub struct StopFilter {
    /// The set of stop words to remove
    stop_words: Arc<HashSet<String>>,
    /// Whether to remove stopped tokens entirely or just mark them as stopped
    remove_stopped: bool,
}

impl StopFilter {
    /// Create a new stop filter with the standard English stop words.
    pub fn new() -> Self {
        Self::with_stop_words(ENGLISH_STOP_WORDS_SET.clone())
    }

    /// Create a new stop filter with custom stop words.
    pub fn with_stop_words(stop_words: HashSet<String>) -> Self {
        StopFilter {
            stop_words: Arc::new(stop_words),
            remove_stopped: true,
        }
    }

    /// Create a new stop filter from a list of stop words.
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let stop_words = words.into_iter().map(|s| s.into()).collect();
        Self::with_stop_words(stop_words)
    }

    /// Create a stop filter from the union of several sources.
    pub fn from_sources(sources: &[&dyn StopwordSource]) -> Self {
        let stop_words = sources
            .iter()
            .flat_map(|source| source.stopwords().iter().cloned())
            .collect();
        Self::with_stop_words(stop_words)
    }

    /// Set whether to remove stopped tokens entirely or just mark them as stopped.
    pub fn remove_stopped(mut self, remove: bool) -> Self {
        self.remove_stopped = remove;
        self
    }

    /// Check if a word is a stop word.
    pub fn is_stop_word(&self, word: &str) -> bool {
        self.stop_words.contains(word)
    }

    /// Get the number of stop words.
    pub fn len(&self) -> usize {
        self.stop_words.len()
    }

    /// Check if the stop word set is empty.
    pub fn is_empty(&self) -> bool {
        self.stop_words.is_empty()
    }
}

impl Default for StopFilter {
    fn default() -> Self {
        Self::new()
    }
}

impl Filter for StopFilter {
    fn filter(&self, tokens: TokenStream) -> Result<TokenStream> {
        let filtered_tokens: Vec<Token> = tokens
            .filter_map(|token| {
                if token.is_stopped() {
                    Some(token)
                } else if self.is_stop_word(&token.text) {
                    if self.remove_stopped {
                        None // Remove the token entirely
                    } else {
                        Some(token.stop()) // Mark as stopped but keep it
                    }
                } else {
                    Some(token)
                }
            })
            .collect();

        Ok(Box::new(filtered_tokens.into_iter()))
    }

    fn name(&self) -> &'static str {
        "stop"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stop_filter() {
        let filter = StopFilter::from_words(vec!["the", "and", "or"]);
        let tokens = vec![
            Token::new("hello", 0),
            Token::new("the", 1),
            Token::new("world", 2),
            Token::new("and", 3),
            Token::new("test", 4),
        ];

        let result: Vec<Token> = filter
            .filter(Box::new(tokens.into_iter()))
            .unwrap()
            .collect();

        assert_eq!(result.len(), 3);
        assert_eq!(result[0].text, "hello");
        assert_eq!(result[1].text, "world");
        assert_eq!(result[2].text, "test");
    }

    #[test]
    fn test_stop_filter_preserve_stopped() {
        let filter = StopFilter::from_words(vec!["the", "and"]).remove_stopped(false);
        let tokens = vec![
            Token::new("hello", 0),
            Token::new("the", 1),
            Token::new("world", 2),
        ];

        let result: Vec<Token> = filter
            .filter(Box::new(tokens.into_iter()))
            .unwrap()
            .collect();

        assert_eq!(result.len(), 3);
        assert!(!result[0].is_stopped());
        assert!(result[1].is_stopped());
        assert!(!result[2].is_stopped());
    }

    #[test]
    fn test_builtin_lists() {
        assert_eq!(EnglishStopwords.stopwords().len(), 179);
        assert!(EnglishStopwords.stopwords().contains("wouldn't"));
        assert!(SupportChatStopwords.stopwords().contains("please"));
        assert!(!SupportChatStopwords.stopwords().contains("refund"));
    }

    #[test]
    fn test_union_of_sources() {
        let custom = StaticStopwords::new(["acme"]);
        let filter = StopFilter::from_sources(&[&SupportChatStopwords, &custom]);

        assert!(filter.is_stop_word("hello"));
        assert!(filter.is_stop_word("acme"));
        assert!(!filter.is_stop_word("the"));
        assert_eq!(filter.len(), SupportChatStopwords.stopwords().len() + 1);
    }

    #[test]
    fn test_empty_sources() {
        let filter = StopFilter::from_sources(&[]);
        assert!(filter.is_empty());
    }

    #[test]
    fn test_filter_name() {
        assert_eq!(StopFilter::new().name(), "stop");
    }
}
