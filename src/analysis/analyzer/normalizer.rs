//! Option-driven text normalizer for support messages.
//!
//! The normalizer is a [`PipelineAnalyzer`] whose stages are selected by
//! [`NormalizationOptions`]. Stage order is fixed regardless of the order in
//! which options were supplied:
//!
//! 1. lowercase
//! 2. non-printable / non-ASCII characters → space
//! 3. `word_with_digits`: identifiers and numbers → space
//! 4. treebank word tokenization
//! 5. `nltk_stopwords` / `manual_stopwords`: drop stop words (union of the enabled lists)
//! 6. `lemmatization`: noun lemmatization
//! 7. `punctuation`: drop single punctuation characters
//! 8. join with a single space
//!
//! # Examples
//!
//! ```
//! use message_categorizer::analysis::analyzer::normalizer::{
//!     LinguisticResources, NormalizationOption, NormalizationOptions, TextNormalizer,
//! };
//!
//! let options: NormalizationOptions = [
//!     NormalizationOption::WordWithDigits,
//!     NormalizationOption::ManualStopwords,
//!     NormalizationOption::Punctuation,
//! ]
//! .into_iter()
//! .collect();
//!
//! let normalizer = TextNormalizer::new(options, LinguisticResources::default()).unwrap();
//! let cleaned = normalizer.normalize("Hello, I want REFUND #12345 please!!").unwrap();
//! assert_eq!(cleaned, "want refund");
//! ```

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::analysis::analyzer::analyzer::Analyzer;
use crate::analysis::analyzer::pipeline::PipelineAnalyzer;
use crate::analysis::char_filter::{
    LowercaseCharFilter, PatternReplaceCharFilter, PrintableAsciiCharFilter,
};
use crate::analysis::token_filter::{
    EnglishStopwords, LemmaFilter, Lemmatizer, MorphyLemmatizer, PunctuationFilter, StopFilter,
    StopwordSource, SupportChatStopwords,
};
use crate::analysis::tokenizer::TreebankWordTokenizer;
use crate::error::{CategorizerError, Result};

/// A single named normalization option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NormalizationOption {
    /// Blank out tokens mixing letters and digits, and bare numbers.
    WordWithDigits,
    /// Drop the standard English stop words.
    NltkStopwords,
    /// Drop support chat boilerplate.
    ManualStopwords,
    /// Reduce tokens to their noun base form.
    Lemmatization,
    /// Drop single punctuation characters.
    Punctuation,
}

impl NormalizationOption {
    /// All options in pipeline order.
    pub const ALL: [NormalizationOption; 5] = [
        NormalizationOption::WordWithDigits,
        NormalizationOption::NltkStopwords,
        NormalizationOption::ManualStopwords,
        NormalizationOption::Lemmatization,
        NormalizationOption::Punctuation,
    ];

    /// The snake_case name of this option.
    pub fn as_str(&self) -> &'static str {
        match self {
            NormalizationOption::WordWithDigits => "word_with_digits",
            NormalizationOption::NltkStopwords => "nltk_stopwords",
            NormalizationOption::ManualStopwords => "manual_stopwords",
            NormalizationOption::Lemmatization => "lemmatization",
            NormalizationOption::Punctuation => "punctuation",
        }
    }
}

impl fmt::Display for NormalizationOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NormalizationOption {
    type Err = CategorizerError;

    fn from_str(s: &str) -> Result<Self> {
        NormalizationOption::ALL
            .into_iter()
            .find(|option| option.as_str() == s)
            .ok_or_else(|| {
                CategorizerError::invalid_config(format!("Unknown normalization option: {s}"))
            })
    }
}

/// The set of enabled normalization stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizationOptions {
    pub word_with_digits: bool,
    pub nltk_stopwords: bool,
    pub manual_stopwords: bool,
    pub lemmatization: bool,
    pub punctuation: bool,
}

impl Default for NormalizationOptions {
    /// Every stage enabled.
    fn default() -> Self {
        NormalizationOptions {
            word_with_digits: true,
            nltk_stopwords: true,
            manual_stopwords: true,
            lemmatization: true,
            punctuation: true,
        }
    }
}

impl NormalizationOptions {
    /// No optional stage enabled: lowercase, ASCII cleanup and tokenization only.
    pub fn none() -> Self {
        NormalizationOptions {
            word_with_digits: false,
            nltk_stopwords: false,
            manual_stopwords: false,
            lemmatization: false,
            punctuation: false,
        }
    }

    /// Enable one option.
    pub fn with(mut self, option: NormalizationOption) -> Self {
        match option {
            NormalizationOption::WordWithDigits => self.word_with_digits = true,
            NormalizationOption::NltkStopwords => self.nltk_stopwords = true,
            NormalizationOption::ManualStopwords => self.manual_stopwords = true,
            NormalizationOption::Lemmatization => self.lemmatization = true,
            NormalizationOption::Punctuation => self.punctuation = true,
        }
        self
    }

    /// Check whether an option is enabled.
    pub fn is_enabled(&self, option: NormalizationOption) -> bool {
        match option {
            NormalizationOption::WordWithDigits => self.word_with_digits,
            NormalizationOption::NltkStopwords => self.nltk_stopwords,
            NormalizationOption::ManualStopwords => self.manual_stopwords,
            NormalizationOption::Lemmatization => self.lemmatization,
            NormalizationOption::Punctuation => self.punctuation,
        }
    }

    /// Enabled options in pipeline order.
    pub fn enabled(&self) -> Vec<NormalizationOption> {
        NormalizationOption::ALL
            .into_iter()
            .filter(|option| self.is_enabled(*option))
            .collect()
    }
}

impl FromIterator<NormalizationOption> for NormalizationOptions {
    fn from_iter<I: IntoIterator<Item = NormalizationOption>>(iter: I) -> Self {
        iter.into_iter()
            .fold(NormalizationOptions::none(), |options, option| {
                options.with(option)
            })
    }
}

/// Read-only linguistic resources injected into the normalizer.
#[derive(Clone)]
pub struct LinguisticResources {
    /// Source for `nltk_stopwords`.
    pub standard_stopwords: Arc<dyn StopwordSource>,
    /// Source for `manual_stopwords`.
    pub manual_stopwords: Arc<dyn StopwordSource>,
    /// Lemmatizer for `lemmatization`.
    pub lemmatizer: Arc<dyn Lemmatizer>,
}

impl Default for LinguisticResources {
    fn default() -> Self {
        LinguisticResources {
            standard_stopwords: Arc::new(EnglishStopwords),
            manual_stopwords: Arc::new(SupportChatStopwords),
            lemmatizer: Arc::new(MorphyLemmatizer::new()),
        }
    }
}

impl fmt::Debug for LinguisticResources {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LinguisticResources")
            .field("standard_stopwords", &self.standard_stopwords.name())
            .field("manual_stopwords", &self.manual_stopwords.name())
            .field("lemmatizer", &self.lemmatizer.name())
            .finish()
    }
}

/// Deterministic `raw text -> cleaned text` normalizer.
#[derive(Clone, Debug)]
pub struct TextNormalizer {
    options: NormalizationOptions,
    analyzer: PipelineAnalyzer,
}

impl TextNormalizer {
    /// Build the stage pipeline for the given options.
    pub fn new(options: NormalizationOptions, resources: LinguisticResources) -> Result<Self> {
        let mut analyzer = PipelineAnalyzer::new(Arc::new(TreebankWordTokenizer::new()))
            .add_char_filter(Arc::new(LowercaseCharFilter::new()))
            .add_char_filter(Arc::new(PrintableAsciiCharFilter::new()));

        if options.word_with_digits {
            analyzer =
                analyzer.add_char_filter(Arc::new(PatternReplaceCharFilter::word_with_digits()?));
        }

        let mut sources: Vec<&dyn StopwordSource> = Vec::new();
        if options.nltk_stopwords {
            sources.push(resources.standard_stopwords.as_ref());
        }
        if options.manual_stopwords {
            sources.push(resources.manual_stopwords.as_ref());
        }
        if !sources.is_empty() {
            analyzer = analyzer.add_filter(Arc::new(StopFilter::from_sources(&sources)));
        }

        if options.lemmatization {
            analyzer = analyzer.add_filter(Arc::new(LemmaFilter::with_lemmatizer(
                resources.lemmatizer.clone(),
            )));
        }

        if options.punctuation {
            analyzer = analyzer.add_filter(Arc::new(PunctuationFilter::new()));
        }

        Ok(TextNormalizer {
            options,
            analyzer: analyzer.with_name("text_normalizer"),
        })
    }

    /// Build a normalizer with every stage enabled and the built-in resources.
    pub fn with_defaults() -> Result<Self> {
        Self::new(
            NormalizationOptions::default(),
            LinguisticResources::default(),
        )
    }

    /// Normalize one message. The result may be empty.
    pub fn normalize(&self, text: &str) -> Result<String> {
        let tokens: Vec<String> = self
            .analyzer
            .analyze(text)?
            .filter(|token| !token.is_stopped())
            .map(|token| token.text)
            .collect();

        Ok(tokens.join(" "))
    }

    /// Normalize many messages in parallel, preserving input order.
    pub fn normalize_batch<S>(&self, texts: &[S]) -> Result<Vec<String>>
    where
        S: AsRef<str> + Sync,
    {
        texts
            .par_iter()
            .map(|text| self.normalize(text.as_ref()))
            .collect()
    }

    /// Names of the active stages in execution order.
    pub fn stages(&self) -> Vec<&'static str> {
        self.analyzer.stage_names()
    }

    /// The options this normalizer was built with.
    pub fn options(&self) -> &NormalizationOptions {
        &self.options
    }

    /// The underlying analyzer.
    pub fn analyzer(&self) -> &PipelineAnalyzer {
        &self.analyzer
    }
}
