//! Training configuration.
//!
//! Every section has defaults, so a JSON file only needs the values it changes:
//!
//! ```
//! use message_categorizer::ml::TrainingConfig;
//!
//! let config = TrainingConfig::from_json_str(r#"{
//!     "svc": { "c": 0.5, "class_weight": "uniform" },
//!     "tfidf": { "max_features": 500 },
//!     "test_fraction": 0.25
//! }"#).unwrap();
//!
//! assert_eq!(config.svc.c, 0.5);
//! assert_eq!(config.tfidf.max_df, 0.95);
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::analysis::analyzer::normalizer::NormalizationOptions;
use crate::error::{CategorizerError, Result};
use crate::ml::svm::LinearSvcConfig;
use crate::ml::vectorizer::TfIdfConfig;

/// Settings for one training run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainingConfig {
    /// Enabled normalization stages.
    pub normalization: NormalizationOptions,
    /// Vocabulary selection.
    pub tfidf: TfIdfConfig,
    /// Classifier hyper-parameters.
    pub svc: LinearSvcConfig,
    /// Fraction of rows held out for evaluation.
    pub test_fraction: f64,
    /// Seed for the train/test split.
    pub seed: u64,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        TrainingConfig {
            normalization: NormalizationOptions::default(),
            tfidf: TfIdfConfig::default(),
            svc: LinearSvcConfig::default(),
            test_fraction: 0.2,
            seed: 42,
        }
    }
}

impl TrainingConfig {
    /// Parse a JSON document and validate it.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: TrainingConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    /// Serialize as pretty-printed JSON.
    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check every section.
    pub fn validate(&self) -> Result<()> {
        self.tfidf.validate()?;
        self.svc.validate()?;
        if !(0.0..1.0).contains(&self.test_fraction) {
            return Err(CategorizerError::invalid_config(format!(
                "test_fraction must be in [0, 1), got {}",
                self.test_fraction
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;
    use crate::ml::svm::ClassWeight;

    #[test]
    fn test_defaults() {
        let config = TrainingConfig::default();

        assert!(config.validate().is_ok());
        assert_eq!(config.tfidf.max_features, Some(3000));
        assert_eq!(config.svc.class_weight, ClassWeight::Balanced);
        assert_eq!(config.svc.max_iter, 1000);
        assert!(config.normalization.lemmatization);
    }

    #[test]
    fn test_partial_json() {
        let config = TrainingConfig::from_json_str(
            r#"{"normalization": {"lemmatization": false}, "svc": {"class_weight": "uniform"}}"#,
        )
        .unwrap();

        assert!(!config.normalization.lemmatization);
        assert!(config.normalization.punctuation);
        assert_eq!(config.svc.class_weight, ClassWeight::Uniform);
        assert_eq!(config.svc.c, 1.0);
        assert_eq!(config.test_fraction, 0.2);
    }

    #[test]
    fn test_invalid_values() {
        assert!(matches!(
            TrainingConfig::from_json_str(r#"{"test_fraction": 1.5}"#),
            Err(CategorizerError::InvalidConfig(_))
        ));
        assert!(matches!(
            TrainingConfig::from_json_str(r#"{"tfidf": {"max_df": 2.0}}"#),
            Err(CategorizerError::InvalidConfig(_))
        ));
        assert!(matches!(
            TrainingConfig::from_json_str(r#"{"svc": {"c": -1.0}}"#),
            Err(CategorizerError::InvalidConfig(_))
        ));
        assert!(matches!(
            TrainingConfig::from_json_str("{not json"),
            Err(CategorizerError::Json(_))
        ));
    }

    #[test]
    fn test_file_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.json");

        let mut config = TrainingConfig::default();
        config.tfidf.max_features = None;
        config.seed = 7;
        fs::write(&path, config.to_json_string().unwrap()).unwrap();

        assert_eq!(TrainingConfig::from_json_file(&path).unwrap(), config);
    }
}
