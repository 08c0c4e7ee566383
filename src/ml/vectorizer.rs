//! TF-IDF vectorizer for cleaned message text.
//!
//! Weighting is fixed:
//!
//! - term frequency: raw count of the term in the document
//! - inverse document frequency: `ln((1 + N) / (1 + df)) + 1` (smoothed)
//! - each document vector is L2-normalized
//!
//! The vocabulary keeps terms with `min_df <= df <= max_df * N`, then the
//! `max_features` terms with the highest total count (ties broken by term).
//! Feature indices follow lexicographic term order, so the same corpus always
//! yields the same vocabulary.

use std::collections::{HashMap, HashSet};

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::analysis::tokenizer::WhitespaceTokenizer;
use crate::error::{CategorizerError, Result};
use crate::ml::features::FeatureVector;
use crate::storage::artifact::{self, ArtifactKind, ArtifactMetadata};

/// Configuration for vocabulary selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TfIdfConfig {
    /// Maximum vocabulary size. `None` keeps every qualifying term.
    pub max_features: Option<usize>,
    /// Drop terms appearing in more than this fraction of documents.
    pub max_df: f64,
    /// Drop terms appearing in fewer than this many documents.
    pub min_df: usize,
}

impl Default for TfIdfConfig {
    fn default() -> Self {
        TfIdfConfig {
            max_features: Some(3000),
            max_df: 0.95,
            min_df: 1,
        }
    }
}

impl TfIdfConfig {
    /// Check that every value is in range.
    pub fn validate(&self) -> Result<()> {
        if !(self.max_df > 0.0 && self.max_df <= 1.0) {
            return Err(CategorizerError::invalid_config(format!(
                "max_df must be in (0, 1], got {}",
                self.max_df
            )));
        }
        if self.min_df == 0 {
            return Err(CategorizerError::invalid_config("min_df must be at least 1"));
        }
        if self.max_features == Some(0) {
            return Err(CategorizerError::invalid_config(
                "max_features must be at least 1",
            ));
        }
        Ok(())
    }
}

/// Frozen term → feature index mapping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct Vocabulary {
    terms: Vec<String>,
    index: HashMap<String, usize>,
}

impl From<Vec<String>> for Vocabulary {
    fn from(terms: Vec<String>) -> Self {
        let index = terms
            .iter()
            .enumerate()
            .map(|(i, term)| (term.clone(), i))
            .collect();
        Vocabulary { terms, index }
    }
}

impl From<Vocabulary> for Vec<String> {
    fn from(vocabulary: Vocabulary) -> Self {
        vocabulary.terms
    }
}

impl Vocabulary {
    /// Number of terms.
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    /// Whether the vocabulary is empty.
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Feature index of a term.
    pub fn index_of(&self, term: &str) -> Option<usize> {
        self.index.get(term).copied()
    }

    /// Term at a feature index.
    pub fn term(&self, index: usize) -> Option<&str> {
        self.terms.get(index).map(String::as_str)
    }

    /// Iterate over terms in index order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.terms.iter().map(String::as_str)
    }
}

/// A fitted TF-IDF vectorizer. Immutable after [`TfIdfVectorizer::fit`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TfIdfVectorizer {
    config: TfIdfConfig,
    vocabulary: Vocabulary,
    /// Inverse document frequency per feature index.
    idf: Vec<f64>,
    /// Number of documents seen during fit.
    n_documents: usize,
    #[serde(skip)]
    tokenizer: WhitespaceTokenizer,
}

impl TfIdfVectorizer {
    /// Fit with the default configuration.
    pub fn fit<S: AsRef<str>>(documents: &[S]) -> Result<Self> {
        Self::fit_with_config(documents, TfIdfConfig::default())
    }

    /// Build the vocabulary and IDF weights from a corpus of cleaned texts.
    pub fn fit_with_config<S: AsRef<str>>(documents: &[S], config: TfIdfConfig) -> Result<Self> {
        config.validate()?;
        if documents.is_empty() {
            return Err(CategorizerError::training(
                "cannot fit vectorizer on an empty corpus",
            ));
        }

        let tokenizer = WhitespaceTokenizer::new();
        let n_documents = documents.len();

        // Document frequency and total corpus count per term
        let mut document_frequency: HashMap<&str, usize> = HashMap::new();
        let mut total_count: HashMap<&str, usize> = HashMap::new();
        for doc in documents {
            let mut seen = HashSet::new();
            for term in tokenizer.terms(doc.as_ref()) {
                *total_count.entry(term).or_insert(0) += 1;
                if seen.insert(term) {
                    *document_frequency.entry(term).or_insert(0) += 1;
                }
            }
        }

        let max_df_count = config.max_df * n_documents as f64;
        let mut candidates: Vec<(&str, usize)> = total_count
            .iter()
            .filter(|(term, _)| {
                let df = document_frequency[*term];
                df >= config.min_df && df as f64 <= max_df_count
            })
            .map(|(term, count)| (*term, *count))
            .collect();
        let pruned = total_count.len() - candidates.len();

        if let Some(max_features) = config.max_features {
            if candidates.len() > max_features {
                candidates.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
                candidates.truncate(max_features);
            }
        }

        if candidates.is_empty() {
            return Err(CategorizerError::training(format!(
                "empty vocabulary: all {} terms were pruned by min_df={} / max_df={}",
                total_count.len(),
                config.min_df,
                config.max_df
            )));
        }

        let mut terms: Vec<String> = candidates.iter().map(|(t, _)| t.to_string()).collect();
        terms.sort();

        let idf: Vec<f64> = terms
            .iter()
            .map(|term| {
                let df = document_frequency[term.as_str()];
                ((1.0 + n_documents as f64) / (1.0 + df as f64)).ln() + 1.0
            })
            .collect();

        info!(
            documents = n_documents,
            distinct_terms = total_count.len(),
            pruned_by_df = pruned,
            vocabulary = terms.len(),
            "fitted TF-IDF vectorizer"
        );

        Ok(TfIdfVectorizer {
            config,
            vocabulary: Vocabulary::from(terms),
            idf,
            n_documents,
            tokenizer,
        })
    }

    /// Map a cleaned text to its TF-IDF vector. Out-of-vocabulary terms are ignored.
    pub fn transform(&self, text: &str) -> FeatureVector {
        let entries: Vec<(usize, f64)> = self
            .tokenizer
            .terms(text)
            .filter_map(|term| self.vocabulary.index_of(term))
            .map(|index| (index, self.idf[index]))
            .collect();

        let mut vector = FeatureVector::new(self.dimension(), entries);
        vector.normalize_l2();
        vector
    }

    /// Transform many texts in parallel, preserving input order.
    pub fn transform_batch<S>(&self, texts: &[S]) -> Vec<FeatureVector>
    where
        S: AsRef<str> + Sync,
    {
        texts
            .par_iter()
            .map(|text| self.transform(text.as_ref()))
            .collect()
    }

    /// Number of features.
    pub fn dimension(&self) -> usize {
        self.vocabulary.len()
    }

    /// The fitted vocabulary.
    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    /// IDF weight per feature index.
    pub fn idf(&self) -> &[f64] {
        &self.idf
    }

    /// Number of documents seen during fit.
    pub fn n_documents(&self) -> usize {
        self.n_documents
    }

    /// The configuration used for fit.
    pub fn config(&self) -> &TfIdfConfig {
        &self.config
    }

    /// Serialize into a versioned artifact.
    pub fn to_artifact(&self, metadata: &ArtifactMetadata) -> Result<Vec<u8>> {
        artifact::encode(ArtifactKind::Vectorizer, metadata, self)
    }

    /// Restore from an artifact produced by [`TfIdfVectorizer::to_artifact`].
    pub fn from_artifact(bytes: &[u8]) -> Result<(Self, ArtifactMetadata)> {
        let (metadata, vectorizer): (ArtifactMetadata, TfIdfVectorizer) =
            artifact::decode(ArtifactKind::Vectorizer, bytes)?;

        if vectorizer.idf.len() != vectorizer.vocabulary.len() {
            return Err(CategorizerError::corrupt(format!(
                "vectorizer has {} IDF weights for {} terms",
                vectorizer.idf.len(),
                vectorizer.vocabulary.len()
            )));
        }
        debug!(
            run_id = %metadata.run_id,
            vocabulary = vectorizer.dimension(),
            "loaded vectorizer artifact"
        );

        Ok((vectorizer, metadata))
    }
}
