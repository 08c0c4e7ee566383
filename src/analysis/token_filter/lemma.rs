//! Lemmatization filter implementation.
//!
//! Lemmatizers reduce inflected nouns to their dictionary form
//! (`parcels` → `parcel`, `deliveries` → `delivery`). Only the noun reading
//! is applied, so verb inflections such as `blocked` pass through unchanged.
//!
//! [`MorphyLemmatizer`] follows the WordNet morphy noun rules. With a lexicon
//! it only accepts candidates found in the lexicon; without one it uses a
//! conservative suffix heuristic.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use crate::analysis::token::{Token, TokenStream};
use crate::analysis::token_filter::Filter;
use crate::error::Result;

/// Noun detachment rules as (suffix, replacement) pairs.
const NOUN_RULES: &[(&str, &str)] = &[
    ("s", ""),
    ("ses", "s"),
    ("xes", "x"),
    ("zes", "z"),
    ("ches", "ch"),
    ("shes", "sh"),
    ("men", "man"),
    ("ies", "y"),
];

/// Irregular plural nouns.
const NOUN_EXCEPTIONS: &[(&str, &str)] = &[
    ("children", "child"),
    ("men", "man"),
    ("women", "woman"),
    ("people", "person"),
    ("mice", "mouse"),
    ("feet", "foot"),
    ("geese", "goose"),
    ("teeth", "tooth"),
    ("theses", "thesis"),
    ("analyses", "analysis"),
    ("crises", "crisis"),
    ("bases", "basis"),
];

/// Trait for word lemmatizers.
pub trait Lemmatizer: Send + Sync {
    /// Return the base form of a word.
    fn lemmatize(&self, word: &str) -> String;

    /// Get the name of this lemmatizer.
    fn name(&self) -> &'static str;
}

/// Noun lemmatizer following the WordNet morphy rules.
#[derive(Clone, Default)]
pub struct MorphyLemmatizer {
    lexicon: Option<Arc<HashSet<String>>>,
}

impl fmt::Debug for MorphyLemmatizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MorphyLemmatizer")
            .field("lexicon_size", &self.lexicon.as_ref().map(|l| l.len()))
            .finish()
    }
}

impl MorphyLemmatizer {
    /// Create a lemmatizer that uses the suffix heuristic.
    pub fn new() -> Self {
        MorphyLemmatizer { lexicon: None }
    }

    /// Create a lemmatizer that only accepts lemmas present in the lexicon.
    pub fn with_lexicon<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        MorphyLemmatizer {
            lexicon: Some(Arc::new(words.into_iter().map(Into::into).collect())),
        }
    }

    /// Whether this lemmatizer validates candidates against a lexicon.
    pub fn has_lexicon(&self) -> bool {
        self.lexicon.is_some()
    }

    fn exception(word: &str) -> Option<&'static str> {
        NOUN_EXCEPTIONS
            .iter()
            .find(|(plural, _)| *plural == word)
            .map(|(_, lemma)| *lemma)
    }

    fn lemmatize_with_lexicon(word: &str, lexicon: &HashSet<String>) -> String {
        let mut candidates: Vec<String> = Vec::new();

        if let Some(lemma) = Self::exception(word) {
            candidates.push(lemma.to_string());
        }
        if lexicon.contains(word) {
            candidates.push(word.to_string());
        }
        for (suffix, replacement) in NOUN_RULES {
            if let Some(stem) = word.strip_suffix(suffix) {
                if stem.is_empty() {
                    continue;
                }
                let candidate = format!("{stem}{replacement}");
                if lexicon.contains(&candidate) {
                    candidates.push(candidate);
                }
            }
        }

        // Shortest candidate wins, first one on ties.
        candidates
            .into_iter()
            .reduce(|best, c| if c.len() < best.len() { c } else { best })
            .unwrap_or_else(|| word.to_string())
    }

    fn lemmatize_heuristic(word: &str) -> String {
        if let Some(lemma) = Self::exception(word) {
            return lemma.to_string();
        }

        for suffix in ["xes", "zes", "ches", "shes", "sses"] {
            if word.ends_with(suffix) {
                return word[..word.len() - 2].to_string();
            }
        }
        if word.len() > 4 {
            if let Some(stem) = word.strip_suffix("ies") {
                return format!("{stem}y");
            }
        }
        if let Some(stem) = word.strip_suffix("men") {
            if !stem.is_empty() {
                return format!("{stem}man");
            }
        }
        if word.len() > 3
            && word.ends_with('s')
            && !["ss", "us", "is"].iter().any(|s| word.ends_with(s))
        {
            return word[..word.len() - 1].to_string();
        }

        word.to_string()
    }
}

impl Lemmatizer for MorphyLemmatizer {
    fn lemmatize(&self, word: &str) -> String {
        if word.is_empty() || !word.bytes().all(|b| b.is_ascii_lowercase()) {
            return word.to_string();
        }

        match &self.lexicon {
            Some(lexicon) => Self::lemmatize_with_lexicon(word, lexicon),
            None => Self::lemmatize_heuristic(word),
        }
    }

    fn name(&self) -> &'static str {
        "morphy"
    }
}

/// A filter that replaces each token with its lemma.
#[derive(Clone)]
pub struct LemmaFilter {
    lemmatizer: Arc<dyn Lemmatizer>,
}

impl fmt::Debug for LemmaFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LemmaFilter")
            .field("lemmatizer", &self.lemmatizer.name())
            .finish()
    }
}

impl LemmaFilter {
    /// Create a lemma filter using the heuristic morphy lemmatizer.
    pub fn new() -> Self {
        Self::with_lemmatizer(Arc::new(MorphyLemmatizer::new()))
    }

    /// Create a lemma filter with a custom lemmatizer.
    pub fn with_lemmatizer(lemmatizer: Arc<dyn Lemmatizer>) -> Self {
        LemmaFilter { lemmatizer }
    }

    /// Get the lemmatizer used by this filter.
    pub fn lemmatizer(&self) -> &Arc<dyn Lemmatizer> {
        &self.lemmatizer
    }
}

impl Default for LemmaFilter {
    fn default() -> Self {
        Self::new()
    }
}

impl Filter for LemmaFilter {
    fn filter(&self, tokens: TokenStream) -> Result<TokenStream> {
        let filtered_tokens: Vec<Token> = tokens
            .map(|token| {
                if token.is_stopped() {
                    token
                } else {
                    let lemma = self.lemmatizer.lemmatize(&token.text);
                    token.with_text(lemma)
                }
            })
            .collect();

        Ok(Box::new(filtered_tokens.into_iter()))
    }

    fn name(&self) -> &'static str {
        "lemma"
    }
}
