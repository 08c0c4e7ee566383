//! End-to-end message categorizer.
//!
//! [`MessageCategorizer`] chains the fitted pieces:
//!
//! ```text
//! raw text → TextNormalizer → TfIdfVectorizer → LinearSvc → Category
//! ```
//!
//! It is built once by [`MessageCategorizer::train`] (or restored with
//! [`MessageCategorizer::load`]) and only read afterwards, so one instance can
//! serve concurrent callers.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::analysis::analyzer::normalizer::{
    LinguisticResources, NormalizationOptions, TextNormalizer,
};
use crate::error::{CategorizerError, Result};
use crate::ml::category::Category;
use crate::ml::config::TrainingConfig;
use crate::ml::dataset::{Dataset, DatasetStats, RawRecord};
use crate::ml::metrics::ClassificationReport;
use crate::ml::svm::LinearSvc;
use crate::ml::vectorizer::TfIdfVectorizer;
use crate::storage::ArtifactStore;
use crate::storage::artifact::ArtifactMetadata;

/// Suffix of the vectorizer artifact id.
pub const VECTORIZER_SUFFIX: &str = "vectorizer";
/// Suffix of the classifier artifact id.
pub const CLASSIFIER_SUFFIX: &str = "classifier";

/// Summary of a training run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingReport {
    /// Identifier shared by both artifacts of this run.
    pub run_id: Uuid,
    /// Row counts from dataset validation.
    pub dataset: DatasetStats,
    /// Rows dropped because nothing survived normalization.
    pub empty_after_normalization: usize,
    pub train_size: usize,
    pub test_size: usize,
    pub vocabulary_size: usize,
    /// Whether the classifier met its tolerance within the iteration budget.
    pub converged: bool,
    /// Evaluation on the training split.
    pub train: ClassificationReport,
    /// Evaluation on the held-out split.
    pub test: ClassificationReport,
}

/// A fitted normalizer, vectorizer and classifier.
#[derive(Debug, Clone)]
pub struct MessageCategorizer {
    normalizer: TextNormalizer,
    vectorizer: TfIdfVectorizer,
    classifier: LinearSvc,
    metadata: ArtifactMetadata,
}

impl MessageCategorizer {
    /// Assemble from fitted parts. The classifier must match the vectorizer's dimension.
    pub fn new(
        normalizer: TextNormalizer,
        vectorizer: TfIdfVectorizer,
        classifier: LinearSvc,
        metadata: ArtifactMetadata,
    ) -> Result<Self> {
        if vectorizer.dimension() != classifier.n_features() {
            return Err(CategorizerError::invalid_config(format!(
                "classifier expects {} features but the vectorizer produces {}",
                classifier.n_features(),
                vectorizer.dimension()
            )));
        }
        Ok(MessageCategorizer {
            normalizer,
            vectorizer,
            classifier,
            metadata,
        })
    }

    /// Train with the built-in stop word lists and lemmatizer.
    pub fn train<I>(records: I, config: &TrainingConfig) -> Result<(Self, TrainingReport)>
    where
        I: IntoIterator<Item = RawRecord>,
    {
        Self::train_with_resources(records, config, LinguisticResources::default())
    }

    /// Run the full pipeline: validate rows, normalize, drop empty texts,
    /// split, fit the vectorizer and classifier on the training split, and
    /// evaluate both splits.
    pub fn train_with_resources<I>(
        records: I,
        config: &TrainingConfig,
        resources: LinguisticResources,
    ) -> Result<(Self, TrainingReport)>
    where
        I: IntoIterator<Item = RawRecord>,
    {
        config.validate()?;
        let metadata = ArtifactMetadata::generate();
        info!(run_id = %metadata.run_id, "starting training run");

        let (dataset, dataset_stats) = Dataset::from_records(records);
        if dataset.is_empty() {
            return Err(CategorizerError::training("no usable training rows"));
        }

        let normalizer = TextNormalizer::new(config.normalization, resources)?;
        let cleaned = normalizer.normalize_batch(dataset.messages())?;
        let mut cleaned = Dataset::new(cleaned, dataset.labels().to_vec())?;

        let before = cleaned.len();
        cleaned.retain(|text, _| !text.is_empty());
        let empty_after_normalization = before - cleaned.len();
        if empty_after_normalization > 0 {
            warn!(
                rows = empty_after_normalization,
                "excluded rows that were empty after normalization"
            );
        }
        if cleaned.is_empty() {
            return Err(CategorizerError::training(
                "every row was empty after normalization",
            ));
        }

        let (train, test) = cleaned.stratified_split(config.test_fraction, config.seed)?;
        info!(
            train = train.len(),
            test = test.len(),
            class_counts = ?train.class_counts(),
            "split dataset"
        );

        let vectorizer = TfIdfVectorizer::fit_with_config(train.messages(), config.tfidf.clone())?;
        let x_train = vectorizer.transform_batch(train.messages());
        let classifier = LinearSvc::fit(&x_train, train.labels(), config.svc.clone())?;

        let train_pred = classifier.predict_batch(&x_train);
        let train_report = ClassificationReport::from_predictions(train.labels(), &train_pred);
        let x_test = vectorizer.transform_batch(test.messages());
        let test_pred = classifier.predict_batch(&x_test);
        let test_report = ClassificationReport::from_predictions(test.labels(), &test_pred);

        info!(
            train_accuracy = train_report.accuracy,
            test_accuracy = test_report.accuracy,
            test_macro_f1 = test_report.macro_avg.f1,
            "training run finished"
        );

        let report = TrainingReport {
            run_id: metadata.run_id,
            dataset: dataset_stats,
            empty_after_normalization,
            train_size: train.len(),
            test_size: test.len(),
            vocabulary_size: vectorizer.dimension(),
            converged: classifier.converged(),
            train: train_report,
            test: test_report,
        };

        let categorizer = MessageCategorizer::new(normalizer, vectorizer, classifier, metadata)?;
        Ok((categorizer, report))
    }

    /// Predict the category of one raw message.
    pub fn predict(&self, text: &str) -> Result<Category> {
        let cleaned = self.normalizer.normalize(text)?;
        Ok(self.classifier.predict(&self.vectorizer.transform(&cleaned)))
    }

    /// Predict many raw messages in parallel, preserving input order.
    pub fn predict_batch<S>(&self, texts: &[S]) -> Result<Vec<Category>>
    where
        S: AsRef<str> + Sync,
    {
        let cleaned = self.normalizer.normalize_batch(texts)?;
        let features = self.vectorizer.transform_batch(&cleaned);
        Ok(self.classifier.predict_batch(&features))
    }

    /// The `k` best categories with their margins, best first.
    pub fn predict_top_k(&self, text: &str, k: usize) -> Result<Vec<(Category, f64)>> {
        let cleaned = self.normalizer.normalize(text)?;
        let mut ranked = self.classifier.rank(&self.vectorizer.transform(&cleaned));
        ranked.truncate(k);
        Ok(ranked)
    }

    /// Write the vectorizer and classifier as `{prefix}.vectorizer` and `{prefix}.classifier`.
    pub fn save(&self, store: &dyn ArtifactStore, prefix: &str) -> Result<()> {
        let vectorizer_id = artifact_id(prefix, VECTORIZER_SUFFIX);
        let classifier_id = artifact_id(prefix, CLASSIFIER_SUFFIX);

        store.save(&vectorizer_id, &self.vectorizer.to_artifact(&self.metadata)?)?;
        store.save(&classifier_id, &self.classifier.to_artifact(&self.metadata)?)?;

        info!(
            run_id = %self.metadata.run_id,
            vectorizer = %vectorizer_id,
            classifier = %classifier_id,
            "saved categorizer artifacts"
        );
        Ok(())
    }

    /// Restore from the two artifacts written by [`MessageCategorizer::save`].
    ///
    /// Normalization settings are not part of the artifacts and must match
    /// the ones used for training.
    pub fn load(
        store: &dyn ArtifactStore,
        prefix: &str,
        options: NormalizationOptions,
        resources: LinguisticResources,
    ) -> Result<Self> {
        let (vectorizer, vectorizer_meta) =
            TfIdfVectorizer::from_artifact(&store.load(&artifact_id(prefix, VECTORIZER_SUFFIX))?)?;
        let (classifier, classifier_meta) =
            LinearSvc::from_artifact(&store.load(&artifact_id(prefix, CLASSIFIER_SUFFIX))?)?;

        if vectorizer_meta.run_id != classifier_meta.run_id {
            warn!(
                vectorizer_run = %vectorizer_meta.run_id,
                classifier_run = %classifier_meta.run_id,
                "vectorizer and classifier come from different training runs"
            );
        }
        if vectorizer.dimension() != classifier.n_features() {
            return Err(CategorizerError::corrupt(format!(
                "classifier expects {} features but the vectorizer produces {}",
                classifier.n_features(),
                vectorizer.dimension()
            )));
        }

        let normalizer = TextNormalizer::new(options, resources)?;
        info!(run_id = %classifier_meta.run_id, "loaded categorizer");
        MessageCategorizer::new(normalizer, vectorizer, classifier, classifier_meta)
    }

    /// The text normalizer.
    pub fn normalizer(&self) -> &TextNormalizer {
        &self.normalizer
    }

    /// The fitted vectorizer.
    pub fn vectorizer(&self) -> &TfIdfVectorizer {
        &self.vectorizer
    }

    /// The fitted classifier.
    pub fn classifier(&self) -> &LinearSvc {
        &self.classifier
    }

    /// Run id and creation time of the fitted state.
    pub fn metadata(&self) -> &ArtifactMetadata {
        &self.metadata
    }
}

fn artifact_id(prefix: &str, suffix: &str) -> String {
    format!("{prefix}.{suffix}")
}
