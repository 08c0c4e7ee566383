//! Classification metrics for evaluating the categorizer.
//!
//! Per-category precision, recall and F1, their macro and support-weighted
//! averages, overall accuracy and the confusion matrix.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::ml::category::{Category, NUM_CATEGORIES};

/// Confusion matrix indexed as `[actual][predicted]`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfusionMatrix {
    counts: [[usize; NUM_CATEGORIES]; NUM_CATEGORIES],
}

impl ConfusionMatrix {
    /// Count `(actual, predicted)` pairs. Extra entries in the longer slice are ignored.
    pub fn from_predictions(y_true: &[Category], y_pred: &[Category]) -> Self {
        let mut counts = [[0; NUM_CATEGORIES]; NUM_CATEGORIES];
        for (actual, predicted) in y_true.iter().zip(y_pred) {
            counts[actual.index()][predicted.index()] += 1;
        }
        ConfusionMatrix { counts }
    }

    /// Number of samples of `actual` predicted as `predicted`.
    pub fn get(&self, actual: Category, predicted: Category) -> usize {
        self.counts[actual.index()][predicted.index()]
    }

    /// Total samples
    pub fn total(&self) -> usize {
        self.counts.iter().flatten().sum()
    }

    /// Correct predictions
    pub fn correct(&self) -> usize {
        (0..NUM_CATEGORIES).map(|c| self.counts[c][c]).sum()
    }

    /// Samples whose actual category is `category`.
    pub fn support(&self, category: Category) -> usize {
        self.counts[category.index()].iter().sum()
    }

    /// Samples predicted as `category`.
    pub fn predicted(&self, category: Category) -> usize {
        self.counts.iter().map(|row| row[category.index()]).sum()
    }
}

impl fmt::Display for ConfusionMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:>12}", "actual\\pred")?;
        for category in Category::ALL {
            write!(f, " {:>9}", category.name())?;
        }
        writeln!(f)?;
        for actual in Category::ALL {
            write!(f, "{:>12}", actual.name())?;
            for predicted in Category::ALL {
                write!(f, " {:>9}", self.get(actual, predicted))?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Precision, recall and F1 for one category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ClassMetrics {
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    pub support: usize,
}

/// Averaged precision, recall and F1.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AverageMetrics {
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
}

/// Full evaluation of a set of predictions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationReport {
    /// Metrics per category, indexed by category index.
    pub per_class: Vec<ClassMetrics>,
    /// Unweighted mean over categories that occur in the truth or the predictions.
    pub macro_avg: AverageMetrics,
    /// Mean weighted by support.
    pub weighted_avg: AverageMetrics,
    pub accuracy: f64,
    pub confusion_matrix: ConfusionMatrix,
}

/// Ratio that is 0 when the denominator is 0.
fn safe_ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator < 1e-10 {
        0.0
    } else {
        numerator / denominator
    }
}

impl ClassificationReport {
    /// Evaluate predictions against the true categories.
    pub fn from_predictions(y_true: &[Category], y_pred: &[Category]) -> Self {
        let cm = ConfusionMatrix::from_predictions(y_true, y_pred);

        let per_class: Vec<ClassMetrics> = Category::ALL
            .iter()
            .map(|&category| {
                let tp = cm.get(category, category) as f64;
                let precision = safe_ratio(tp, cm.predicted(category) as f64);
                let recall = safe_ratio(tp, cm.support(category) as f64);
                let f1 = safe_ratio(2.0 * precision * recall, precision + recall);
                ClassMetrics {
                    precision,
                    recall,
                    f1,
                    support: cm.support(category),
                }
            })
            .collect();

        let observed: Vec<&ClassMetrics> = Category::ALL
            .iter()
            .zip(&per_class)
            .filter(|(category, _)| cm.support(**category) > 0 || cm.predicted(**category) > 0)
            .map(|(_, metrics)| metrics)
            .collect();
        let n_observed = observed.len() as f64;
        let macro_avg = AverageMetrics {
            precision: safe_ratio(observed.iter().map(|m| m.precision).sum(), n_observed),
            recall: safe_ratio(observed.iter().map(|m| m.recall).sum(), n_observed),
            f1: safe_ratio(observed.iter().map(|m| m.f1).sum(), n_observed),
        };

        let total = cm.total() as f64;
        let weighted = |value: fn(&ClassMetrics) -> f64| {
            safe_ratio(
                per_class.iter().map(|m| value(m) * m.support as f64).sum(),
                total,
            )
        };
        let weighted_avg = AverageMetrics {
            precision: weighted(|m| m.precision),
            recall: weighted(|m| m.recall),
            f1: weighted(|m| m.f1),
        };

        ClassificationReport {
            accuracy: safe_ratio(cm.correct() as f64, total),
            per_class,
            macro_avg,
            weighted_avg,
            confusion_matrix: cm,
        }
    }

    /// Metrics of one category.
    pub fn class(&self, category: Category) -> &ClassMetrics {
        &self.per_class[category.index()]
    }

    /// Total number of evaluated samples.
    pub fn total(&self) -> usize {
        self.confusion_matrix.total()
    }
}

impl fmt::Display for ClassificationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{:>12} {:>9} {:>9} {:>9} {:>9}",
            "", "precision", "recall", "f1-score", "support"
        )?;
        writeln!(f)?;
        for (category, m) in Category::ALL.iter().zip(&self.per_class) {
            writeln!(
                f,
                "{:>12} {:>9.2} {:>9.2} {:>9.2} {:>9}",
                category.name(),
                m.precision,
                m.recall,
                m.f1,
                m.support
            )?;
        }
        writeln!(f)?;
        writeln!(
            f,
            "{:>12} {:>9} {:>9} {:>9.2} {:>9}",
            "accuracy",
            "",
            "",
            self.accuracy,
            self.total()
        )?;
        let averages = [
            ("macro avg", &self.macro_avg),
            ("weighted avg", &self.weighted_avg),
        ];
        for (label, avg) in averages {
            writeln!(
                f,
                "{:>12} {:>9.2} {:>9.2} {:>9.2} {:>9}",
                label,
                avg.precision,
                avg.recall,
                avg.f1,
                self.total()
            )?;
        }
        writeln!(f)?;
        write!(f, "{}", self.confusion_matrix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use Category::{Delivery as D, General as G, Payment as P};

    #[test]
    fn test_confusion_matrix() {
        let cm = ConfusionMatrix::from_predictions(&[G, G, D, P], &[G, D, D, G]);

        assert_eq!(cm.total(), 4);
        assert_eq!(cm.correct(), 2);
        assert_eq!(cm.get(G, D), 1);
        assert_eq!(cm.get(P, G), 1);
        assert_eq!(cm.support(G), 2);
        assert_eq!(cm.predicted(G), 2);
    }

    #[test]
    fn test_report_values() {
        let y_true = [G, G, G, G, D, D, P, P];
        let y_pred = [G, G, G, D, D, D, P, G];
        let report = ClassificationReport::from_predictions(&y_true, &y_pred);

        assert!((report.accuracy - 6.0 / 8.0).abs() < 1e-12);

        let general = report.class(G);
        assert!((general.precision - 3.0 / 4.0).abs() < 1e-12);
        assert!((general.recall - 3.0 / 4.0).abs() < 1e-12);
        assert_eq!(general.support, 4);

        let delivery = report.class(D);
        assert!((delivery.precision - 2.0 / 3.0).abs() < 1e-12);
        assert!((delivery.recall - 1.0).abs() < 1e-12);
        assert!((delivery.f1 - 0.8).abs() < 1e-12);

        let payment = report.class(P);
        assert!((payment.precision - 1.0).abs() < 1e-12);
        assert!((payment.recall - 0.5).abs() < 1e-12);

        let macro_recall = (0.75 + 1.0 + 0.5) / 3.0;
        assert!((report.macro_avg.recall - macro_recall).abs() < 1e-12);
        // Weighted recall equals accuracy.
        assert!((report.weighted_avg.recall - report.accuracy).abs() < 1e-12);
    }

    #[test]
    fn test_unobserved_class_is_excluded_from_macro() {
        let report = ClassificationReport::from_predictions(&[G, D], &[G, D]);

        assert_eq!(report.class(P).support, 0);
        assert_eq!(report.class(P).f1, 0.0);
        assert!((report.macro_avg.f1 - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_empty() {
        let report = ClassificationReport::from_predictions(&[], &[]);

        assert_eq!(report.total(), 0);
        assert_eq!(report.accuracy, 0.0);
        assert_eq!(report.macro_avg, AverageMetrics::default());
    }

    #[test]
    fn test_display() {
        let report = ClassificationReport::from_predictions(&[G, D, P], &[G, D, G]);
        let text = report.to_string();

        assert!(text.contains("precision"));
        assert!(text.contains("delivery"));
        assert!(text.contains("weighted avg"));
        assert!(text.contains("accuracy"));
    }
}
