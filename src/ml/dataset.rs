//! Labeled training data.
//!
//! Raw rows may miss either column; such rows are dropped (and counted)
//! before anything else touches the data.

use std::path::Path;

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Deserializer, Serialize};
use tracing::{debug, warn};

use crate::error::{CategorizerError, Result};
use crate::ml::category::{Category, NUM_CATEGORIES};

/// One row of the labeled dataset table, as read.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRecord {
    /// Free-text message.
    #[serde(default)]
    pub message: Option<String>,
    /// Category name (`"delivery"`) or index (`1`).
    #[serde(default, deserialize_with = "deserialize_label")]
    pub category: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum LabelValue {
    Text(String),
    Index(u64),
}

fn deserialize_label<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<LabelValue> = Option::deserialize(deserializer)?;
    Ok(value.map(|v| match v {
        LabelValue::Text(text) => text,
        LabelValue::Index(index) => index.to_string(),
    }))
}

impl RawRecord {
    /// Create a complete record.
    pub fn new<M: Into<String>, C: Into<String>>(message: M, category: C) -> Self {
        RawRecord {
            message: Some(message.into()),
            category: Some(category.into()),
        }
    }
}

/// Load raw records from a JSON array file.
pub fn load_training_data<P: AsRef<Path>>(path: P) -> Result<Vec<RawRecord>> {
    let content = std::fs::read_to_string(path)?;
    let records: Vec<RawRecord> = serde_json::from_str(&content)?;
    Ok(records)
}

/// Counts gathered while building a [`Dataset`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetStats {
    /// Rows read.
    pub total_rows: usize,
    /// Rows dropped for a missing or blank message.
    pub missing_message: usize,
    /// Rows dropped for a missing or unknown category.
    pub invalid_category: usize,
    /// All dropped rows.
    pub dropped_rows: usize,
}

/// Validated `(message, category)` pairs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    messages: Vec<String>,
    labels: Vec<Category>,
}

impl Dataset {
    /// Build from already-validated pairs.
    pub fn new(messages: Vec<String>, labels: Vec<Category>) -> Result<Self> {
        if messages.len() != labels.len() {
            return Err(CategorizerError::training(format!(
                "{} messages but {} labels",
                messages.len(),
                labels.len()
            )));
        }
        Ok(Dataset { messages, labels })
    }

    /// Keep rows with a non-blank message and a known category; drop the rest.
    pub fn from_records<I>(records: I) -> (Self, DatasetStats)
    where
        I: IntoIterator<Item = RawRecord>,
    {
        let mut dataset = Dataset::default();
        let mut stats = DatasetStats::default();

        for (row, record) in records.into_iter().enumerate() {
            stats.total_rows += 1;

            let message = match record.message {
                Some(message) if !message.trim().is_empty() => message,
                _ => {
                    stats.missing_message += 1;
                    debug!(row, "dropping row without message");
                    continue;
                }
            };
            let category = match record.category.as_deref().map(str::parse::<Category>) {
                Some(Ok(category)) => category,
                _ => {
                    stats.invalid_category += 1;
                    debug!(row, category = ?record.category, "dropping row with invalid category");
                    continue;
                }
            };

            dataset.messages.push(message);
            dataset.labels.push(category);
        }

        stats.dropped_rows = stats.missing_message + stats.invalid_category;
        if stats.dropped_rows > 0 {
            warn!(
                dropped = stats.dropped_rows,
                missing_message = stats.missing_message,
                invalid_category = stats.invalid_category,
                total = stats.total_rows,
                "dropped malformed training rows"
            );
        }

        (dataset, stats)
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Whether the dataset has no rows.
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Messages in row order.
    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    /// Categories in row order.
    pub fn labels(&self) -> &[Category] {
        &self.labels
    }

    /// Iterate over `(message, category)` rows.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Category)> {
        self.messages
            .iter()
            .map(String::as_str)
            .zip(self.labels.iter().copied())
    }

    /// Number of rows per category index.
    pub fn class_counts(&self) -> [usize; NUM_CATEGORIES] {
        let mut counts = [0; NUM_CATEGORIES];
        for label in &self.labels {
            counts[label.index()] += 1;
        }
        counts
    }

    /// Keep only the rows for which `keep` returns true.
    pub fn retain<F>(&mut self, mut keep: F)
    where
        F: FnMut(&str, Category) -> bool,
    {
        let (messages, labels): (Vec<String>, Vec<Category>) = self
            .messages
            .drain(..)
            .zip(self.labels.drain(..))
            .filter(|(message, label)| keep(message.as_str(), *label))
            .unzip();
        self.messages = messages;
        self.labels = labels;
    }

    /// Split into `(train, test)` keeping each category's proportion.
    ///
    /// Every category keeps at least one training row. Rows stay in their
    /// original order within each split.
    pub fn stratified_split(&self, test_fraction: f64, seed: u64) -> Result<(Dataset, Dataset)> {
        if !(0.0..1.0).contains(&test_fraction) {
            return Err(CategorizerError::invalid_config(format!(
                "test_fraction must be in [0, 1), got {test_fraction}"
            )));
        }

        let mut rng = StdRng::seed_from_u64(seed);
        let mut test_rows = Vec::new();
        for category in Category::ALL {
            let mut rows: Vec<usize> = (0..self.len())
                .filter(|&i| self.labels[i] == category)
                .collect();
            if rows.is_empty() {
                continue;
            }
            rows.shuffle(&mut rng);

            let n_test = ((rows.len() as f64 * test_fraction).round() as usize).min(rows.len() - 1);
            test_rows.extend_from_slice(&rows[..n_test]);
        }

        let mut is_test = vec![false; self.len()];
        for i in test_rows {
            is_test[i] = true;
        }

        let mut train = Dataset::default();
        let mut test = Dataset::default();
        for (i, (message, label)) in self.messages.iter().zip(&self.labels).enumerate() {
            let split = if is_test[i] { &mut test } else { &mut train };
            split.messages.push(message.clone());
            split.labels.push(*label);
        }

        Ok((train, test))
    }
}
