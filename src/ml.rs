//! Training and inference for support-message categorization.
//!
//! The pieces compose as follows:
//!
//! - [`Dataset`] validates raw rows and splits them per category
//! - [`TfIdfVectorizer`] turns normalized text into sparse [`FeatureVector`]s
//! - [`LinearSvc`] scores a vector against every [`Category`]
//! - [`ClassificationReport`] evaluates predictions
//! - [`MessageCategorizer`] ties normalizer, vectorizer and classifier together

pub mod categorizer;
pub mod category;
pub mod config;
pub mod dataset;
pub mod features;
pub mod metrics;
pub mod svm;
pub mod vectorizer;

pub use categorizer::{MessageCategorizer, TrainingReport};
pub use category::{Category, NUM_CATEGORIES};
pub use config::TrainingConfig;
pub use dataset::{Dataset, DatasetStats, RawRecord, load_training_data};
pub use features::FeatureVector;
pub use metrics::{AverageMetrics, ClassMetrics, ClassificationReport, ConfusionMatrix};
pub use svm::{ClassWeight, LinearSvc, LinearSvcConfig};
pub use vectorizer::{TfIdfConfig, TfIdfVectorizer, Vocabulary};
