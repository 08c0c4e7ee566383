//! One-vs-rest linear support vector classifier.
//!
//! Each category gets a binary hinge-loss, L2-regularized linear separator
//! trained by dual coordinate descent. The intercept is learned as the weight
//! of an implicit constant feature with value 1.
//!
//! With [`ClassWeight::Balanced`] every training sample's box constraint is
//! scaled by `n_samples / (n_classes_present * count(class of sample))`, so
//! minority categories are not drowned out by the majority one.

use std::cmp::Ordering;
use std::fmt;

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{CategorizerError, Result};
use crate::ml::category::{Category, NUM_CATEGORIES};
use crate::ml::features::FeatureVector;
use crate::storage::artifact::{self, ArtifactKind, ArtifactMetadata};

/// How per-class loss contributions are weighted during fit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassWeight {
    /// Inversely proportional to class frequency.
    #[default]
    Balanced,
    /// Every sample counts the same.
    Uniform,
}

impl ClassWeight {
    /// Weight per category index for the given training labels.
    ///
    /// Categories absent from `labels` get weight 0.
    pub fn weights(&self, labels: &[Category]) -> [f64; NUM_CATEGORIES] {
        let mut counts = [0usize; NUM_CATEGORIES];
        for label in labels {
            counts[label.index()] += 1;
        }

        match self {
            ClassWeight::Uniform => counts.map(|c| if c > 0 { 1.0 } else { 0.0 }),
            ClassWeight::Balanced => {
                let present = counts.iter().filter(|&&c| c > 0).count() as f64;
                let n = labels.len() as f64;
                counts.map(|c| if c > 0 { n / (present * c as f64) } else { 0.0 })
            }
        }
    }
}

/// Hyper-parameters for [`LinearSvc`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinearSvcConfig {
    /// Inverse regularization strength. Larger values fit the training data harder.
    pub c: f64,
    /// Class weighting policy.
    pub class_weight: ClassWeight,
    /// Maximum number of passes over the data per binary problem.
    pub max_iter: usize,
    /// Stopping tolerance on the projected gradient spread.
    pub tol: f64,
    /// Seed for the per-pass sample shuffle.
    pub seed: u64,
}

impl Default for LinearSvcConfig {
    fn default() -> Self {
        LinearSvcConfig {
            c: 1.0,
            class_weight: ClassWeight::Balanced,
            max_iter: 1000,
            tol: 1e-4,
            seed: 0,
        }
    }
}

impl LinearSvcConfig {
    /// Check that every value is in range.
    pub fn validate(&self) -> Result<()> {
        if !(self.c.is_finite() && self.c > 0.0) {
            return Err(CategorizerError::invalid_config(format!(
                "c must be a positive number, got {}",
                self.c
            )));
        }
        if !(self.tol.is_finite() && self.tol > 0.0) {
            return Err(CategorizerError::invalid_config(format!(
                "tol must be a positive number, got {}",
                self.tol
            )));
        }
        if self.max_iter == 0 {
            return Err(CategorizerError::invalid_config("max_iter must be at least 1"));
        }
        Ok(())
    }
}

/// Outcome of one binary sub-problem.
struct BinaryModel {
    weights: Vec<f64>,
    intercept: f64,
    iterations: usize,
    converged: bool,
}

/// A fitted one-vs-rest linear classifier. Immutable after [`LinearSvc::fit`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearSvc {
    config: LinearSvcConfig,
    n_features: usize,
    /// One weight vector per category, indexed by category index.
    weights: Vec<Vec<f64>>,
    intercepts: Vec<f64>,
    class_weights: Vec<f64>,
    iterations: Vec<usize>,
    converged: bool,
}

impl LinearSvc {
    /// Fit one binary separator per category.
    pub fn fit(
        features: &[FeatureVector],
        labels: &[Category],
        config: LinearSvcConfig,
    ) -> Result<Self> {
        config.validate()?;
        if features.is_empty() {
            return Err(CategorizerError::training(
                "cannot fit classifier on an empty training set",
            ));
        }
        if features.len() != labels.len() {
            return Err(CategorizerError::training(format!(
                "{} feature vectors but {} labels",
                features.len(),
                labels.len()
            )));
        }

        let n_features = features[0].dimension();
        if let Some(bad) = features.iter().find(|f| f.dimension() != n_features) {
            return Err(CategorizerError::training(format!(
                "inconsistent feature dimension: expected {n_features}, found {}",
                bad.dimension()
            )));
        }

        let class_weights = config.class_weight.weights(labels);
        let present = class_weights.iter().filter(|&&w| w > 0.0).count();
        if present < 2 {
            return Err(CategorizerError::training(
                "training data must contain at least two categories",
            ));
        }

        // Box bound and squared norm (including the constant feature) per sample
        let upper: Vec<f64> = labels
            .iter()
            .map(|label| config.c * class_weights[label.index()])
            .collect();
        let diagonal: Vec<f64> = features.iter().map(|x| x.squared_norm() + 1.0).collect();

        let models: Vec<BinaryModel> = Category::ALL
            .par_iter()
            .map(|&category| {
                let targets: Vec<f64> = labels
                    .iter()
                    .map(|&label| if label == category { 1.0 } else { -1.0 })
                    .collect();
                Self::fit_binary(
                    features, &targets, &upper, &diagonal, n_features, &config, category,
                )
            })
            .collect();

        let converged = models.iter().all(|m| m.converged);
        for (category, model) in Category::ALL.iter().zip(&models) {
            if model.converged {
                debug!(
                    category = %category,
                    iterations = model.iterations,
                    "binary problem converged"
                );
            } else {
                warn!(
                    category = %category,
                    max_iter = config.max_iter,
                    "linear SVC did not converge; consider increasing max_iter"
                );
            }
        }

        info!(
            samples = features.len(),
            features = n_features,
            c = config.c,
            class_weight = ?config.class_weight,
            converged,
            "fitted linear SVC"
        );

        let mut weights = Vec::with_capacity(NUM_CATEGORIES);
        let mut intercepts = Vec::with_capacity(NUM_CATEGORIES);
        let mut iterations = Vec::with_capacity(NUM_CATEGORIES);
        for model in models {
            weights.push(model.weights);
            intercepts.push(model.intercept);
            iterations.push(model.iterations);
        }

        Ok(LinearSvc {
            config,
            n_features,
            weights,
            intercepts,
            class_weights: class_weights.to_vec(),
            iterations,
            converged,
        })
    }

    /// Dual coordinate descent for the L1-loss (hinge) L2-regularized SVM.
    fn fit_binary(
        features: &[FeatureVector],
        targets: &[f64],
        upper: &[f64],
        diagonal: &[f64],
        n_features: usize,
        config: &LinearSvcConfig,
        category: Category,
    ) -> BinaryModel {
        let n = features.len();
        let mut alpha = vec![0.0; n];
        let mut weights = vec![0.0; n_features];
        let mut intercept = 0.0;
        let mut order: Vec<usize> = (0..n).collect();
        let mut rng = StdRng::seed_from_u64(config.seed.wrapping_add(category.index() as u64));

        let mut iterations = 0;
        let mut converged = false;
        while iterations < config.max_iter {
            order.shuffle(&mut rng);
            let mut pg_max = f64::NEG_INFINITY;
            let mut pg_min = f64::INFINITY;

            for &i in &order {
                let y = targets[i];
                let gradient = y * (features[i].dot(&weights) + intercept) - 1.0;

                let projected = if alpha[i] <= 0.0 {
                    gradient.min(0.0)
                } else if alpha[i] >= upper[i] {
                    gradient.max(0.0)
                } else {
                    gradient
                };
                pg_max = pg_max.max(projected);
                pg_min = pg_min.min(projected);

                if projected.abs() > 1e-12 {
                    let previous = alpha[i];
                    alpha[i] = (alpha[i] - gradient / diagonal[i]).clamp(0.0, upper[i]);
                    let step = (alpha[i] - previous) * y;
                    for (index, value) in features[i].iter() {
                        weights[index] += step * value;
                    }
                    intercept += step;
                }
            }

            iterations += 1;
            if pg_max - pg_min <= config.tol {
                converged = true;
                break;
            }
        }

        BinaryModel {
            weights,
            intercept,
            iterations,
            converged,
        }
    }

    /// Signed margin of the input against every category's separator.
    pub fn decision_function(&self, features: &FeatureVector) -> [f64; NUM_CATEGORIES] {
        let mut scores = [0.0; NUM_CATEGORIES];
        for (c, score) in scores.iter_mut().enumerate() {
            *score = features.dot(&self.weights[c]) + self.intercepts[c];
        }
        scores
    }

    /// The category with the highest margin; the lowest index wins ties.
    pub fn predict(&self, features: &FeatureVector) -> Category {
        let scores = self.decision_function(features);
        let mut best = 0;
        for c in 1..NUM_CATEGORIES {
            if scores[c] > scores[best] {
                best = c;
            }
        }
        Category::ALL[best]
    }

    /// Predict many inputs in parallel, preserving input order.
    pub fn predict_batch(&self, features: &[FeatureVector]) -> Vec<Category> {
        features.par_iter().map(|f| self.predict(f)).collect()
    }

    /// Every category with its margin, best first; ties keep index order.
    pub fn rank(&self, features: &FeatureVector) -> Vec<(Category, f64)> {
        let scores = self.decision_function(features);
        let mut ranked: Vec<(Category, f64)> = Category::ALL.into_iter().zip(scores).collect();
        ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
        ranked
    }

    /// Whether every binary problem met the tolerance within `max_iter`.
    pub fn converged(&self) -> bool {
        self.converged
    }

    /// Passes used per category.
    pub fn iterations(&self) -> &[usize] {
        &self.iterations
    }

    /// Number of input features.
    pub fn n_features(&self) -> usize {
        self.n_features
    }

    /// Weight vector of one category.
    pub fn coefficients(&self, category: Category) -> &[f64] {
        &self.weights[category.index()]
    }

    /// Intercept of one category.
    pub fn intercept(&self, category: Category) -> f64 {
        self.intercepts[category.index()]
    }

    /// Class weights used during fit, indexed by category.
    pub fn class_weights(&self) -> &[f64] {
        &self.class_weights
    }

    /// The configuration used for fit.
    pub fn config(&self) -> &LinearSvcConfig {
        &self.config
    }

    /// Serialize into a versioned artifact.
    pub fn to_artifact(&self, metadata: &ArtifactMetadata) -> Result<Vec<u8>> {
        artifact::encode(ArtifactKind::Classifier, metadata, self)
    }

    /// Restore from an artifact produced by [`LinearSvc::to_artifact`].
    pub fn from_artifact(bytes: &[u8]) -> Result<(Self, ArtifactMetadata)> {
        let (metadata, model): (ArtifactMetadata, LinearSvc) =
            artifact::decode(ArtifactKind::Classifier, bytes)?;

        let well_formed = model.weights.len() == NUM_CATEGORIES
            && model.intercepts.len() == NUM_CATEGORIES
            && model.weights.iter().all(|w| w.len() == model.n_features);
        if !well_formed {
            return Err(CategorizerError::corrupt(
                "classifier weights do not match the category count or feature dimension",
            ));
        }
        debug!(
            run_id = %metadata.run_id,
            features = model.n_features,
            "loaded classifier artifact"
        );

        Ok((model, metadata))
    }
}

impl fmt::Display for LinearSvc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "LinearSvc(features={}, c={}, class_weight={:?}, converged={})",
            self.n_features, self.config.c, self.config.class_weight, self.converged
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn one_hot(dimension: usize, index: usize) -> FeatureVector {
        FeatureVector::new(dimension, vec![(index, 1.0)])
    }

    fn toy_data() -> (Vec<FeatureVector>, Vec<Category>) {
        let mut features = Vec::new();
        let mut labels = Vec::new();
        for _ in 0..6 {
            features.push(one_hot(4, 0));
            labels.push(Category::General);
        }
        for _ in 0..3 {
            features.push(one_hot(4, 1));
            labels.push(Category::Delivery);
        }
        for _ in 0..3 {
            features.push(FeatureVector::new(4, vec![(2, 0.6), (3, 0.8)]));
            labels.push(Category::Payment);
        }
        (features, labels)
    }

    #[test]
    fn test_fit_separable() {
        let (features, labels) = toy_data();
        let model = LinearSvc::fit(&features, &labels, LinearSvcConfig::default()).unwrap();

        assert!(model.converged());
        assert_eq!(model.n_features(), 4);
        assert_eq!(model.predict_batch(&features), labels);
    }

    #[test]
    fn test_balanced_weights() {
        let labels = vec![
            Category::General,
            Category::General,
            Category::General,
            Category::General,
            Category::General,
            Category::General,
            Category::Delivery,
            Category::Delivery,
            Category::Payment,
        ];

        assert_eq!(ClassWeight::Balanced.weights(&labels), [0.5, 1.5, 3.0]);
        assert_eq!(ClassWeight::Uniform.weights(&labels), [1.0, 1.0, 1.0]);
        assert_eq!(
            ClassWeight::Balanced.weights(&labels[..8]),
            [8.0 / 12.0, 2.0, 0.0]
        );
    }

    #[test]
    fn test_deterministic_fit() {
        let (features, labels) = toy_data();
        let a = LinearSvc::fit(&features, &labels, LinearSvcConfig::default()).unwrap();
        let b = LinearSvc::fit(&features, &labels, LinearSvcConfig::default()).unwrap();

        assert_eq!(a, b);
    }

    #[test]
    fn test_iteration_budget_exhaustion_is_not_fatal() {
        let (features, labels) = toy_data();
        let config = LinearSvcConfig {
            max_iter: 1,
            ..LinearSvcConfig::default()
        };
        let model = LinearSvc::fit(&features, &labels, config).unwrap();

        assert!(!model.converged());
        assert_eq!(model.iterations(), &[1, 1, 1]);
        // The partial model still scores every category.
        assert_eq!(model.decision_function(&features[0]).len(), NUM_CATEGORIES);
    }

    #[test]
    fn test_tie_break_lowest_index() {
        let model = LinearSvc {
            config: LinearSvcConfig::default(),
            n_features: 2,
            weights: vec![vec![0.0, 0.0], vec![0.0, 1.0], vec![0.0, 1.0]],
            intercepts: vec![0.0, 0.0, 0.0],
            class_weights: vec![1.0, 1.0, 1.0],
            iterations: vec![0, 0, 0],
            converged: true,
        };

        assert_eq!(model.predict(&FeatureVector::zeros(2)), Category::General);
        assert_eq!(model.predict(&one_hot(2, 1)), Category::Delivery);

        let ranked = model.rank(&one_hot(2, 1));
        let order: Vec<Category> = ranked.iter().map(|(c, _)| *c).collect();
        assert_eq!(
            order,
            vec![Category::Delivery, Category::Payment, Category::General]
        );
    }

    #[test]
    fn test_rank_agrees_with_predict_on_signed_zero() {
        for intercepts in [vec![-0.0, 0.0, -0.0], vec![0.0, -0.0, 0.0]] {
            let model = LinearSvc {
                config: LinearSvcConfig::default(),
                n_features: 2,
                weights: vec![vec![0.0; 2]; NUM_CATEGORIES],
                intercepts,
                class_weights: vec![1.0; NUM_CATEGORIES],
                iterations: vec![0; NUM_CATEGORIES],
                converged: true,
            };
            let zero = FeatureVector::zeros(2);

            assert_eq!(model.predict(&zero), Category::General);
            assert_eq!(model.rank(&zero)[0].0, model.predict(&zero));
        }
    }

    #[test]
    fn test_wider_input_is_ignored_past_dimension() {
        let (features, labels) = toy_data();
        let model = LinearSvc::fit(&features, &labels, LinearSvcConfig::default()).unwrap();

        let wide = FeatureVector::new(10, vec![(1, 1.0), (9, 5.0)]);
        assert_eq!(model.predict(&wide), Category::Delivery);
    }

    #[test]
    fn test_fit_errors() {
        let (features, labels) = toy_data();

        assert!(matches!(
            LinearSvc::fit(&[], &[], LinearSvcConfig::default()),
            Err(CategorizerError::Training(_))
        ));
        assert!(matches!(
            LinearSvc::fit(&features, &labels[..3], LinearSvcConfig::default()),
            Err(CategorizerError::Training(_))
        ));
        assert!(matches!(
            LinearSvc::fit(&features[..6], &labels[..6], LinearSvcConfig::default()),
            Err(CategorizerError::Training(_))
        ));

        let bad = LinearSvcConfig {
            c: 0.0,
            ..LinearSvcConfig::default()
        };
        assert!(matches!(
            LinearSvc::fit(&features, &labels, bad),
            Err(CategorizerError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_artifact_round_trip() {
        let (features, labels) = toy_data();
        let model = LinearSvc::fit(&features, &labels, LinearSvcConfig::default()).unwrap();
        let metadata = ArtifactMetadata::generate();

        let bytes = model.to_artifact(&metadata).unwrap();
        let (restored, _) = LinearSvc::from_artifact(&bytes).unwrap();

        assert_eq!(restored, model);
        for x in &features {
            assert_eq!(restored.decision_function(x), model.decision_function(x));
        }
    }

    #[test]
    fn test_artifact_kind_is_checked() {
        let (features, labels) = toy_data();
        let model = LinearSvc::fit(&features, &labels, LinearSvcConfig::default()).unwrap();
        let bytes = model.to_artifact(&ArtifactMetadata::generate()).unwrap();

        assert!(matches!(
            crate::ml::TfIdfVectorizer::from_artifact(&bytes),
            Err(CategorizerError::CorruptArtifact(_))
        ));
    }
}
