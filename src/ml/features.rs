//! Sparse feature vectors.

use serde::{Deserialize, Serialize};

/// A sparse vector of non-negative TF-IDF weights.
///
/// Indices are strictly increasing and every stored value is non-zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    dimension: usize,
    indices: Vec<usize>,
    values: Vec<f64>,
}

impl FeatureVector {
    /// Create a vector from `(index, value)` pairs.
    ///
    /// Duplicate indices are summed; zero values and indices outside the
    /// dimension are dropped.
    pub fn new(dimension: usize, mut entries: Vec<(usize, f64)>) -> Self {
        entries.sort_by_key(|(index, _)| *index);

        let mut indices = Vec::with_capacity(entries.len());
        let mut values: Vec<f64> = Vec::with_capacity(entries.len());
        for (index, value) in entries {
            if index >= dimension {
                continue;
            }
            if indices.last() == Some(&index) {
                if let Some(last) = values.last_mut() {
                    *last += value;
                }
            } else {
                indices.push(index);
                values.push(value);
            }
        }

        let mut vector = FeatureVector {
            dimension,
            indices,
            values,
        };
        vector.prune_zeros();
        vector
    }

    /// An all-zero vector.
    pub fn zeros(dimension: usize) -> Self {
        FeatureVector {
            dimension,
            indices: Vec::new(),
            values: Vec::new(),
        }
    }

    fn prune_zeros(&mut self) {
        let mut i = 0;
        while i < self.values.len() {
            if self.values[i] == 0.0 {
                self.values.remove(i);
                self.indices.remove(i);
            } else {
                i += 1;
            }
        }
    }

    /// The full (dense) dimensionality.
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Number of stored (non-zero) entries.
    pub fn nnz(&self) -> usize {
        self.indices.len()
    }

    /// Whether every weight is zero.
    pub fn is_zero(&self) -> bool {
        self.indices.is_empty()
    }

    /// The weight at `index`, zero when absent.
    pub fn get(&self, index: usize) -> f64 {
        match self.indices.binary_search(&index) {
            Ok(pos) => self.values[pos],
            Err(_) => 0.0,
        }
    }

    /// Iterate over `(index, value)` pairs in index order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.indices.iter().copied().zip(self.values.iter().copied())
    }

    /// Dot product with a dense weight vector; indices beyond `weights` count as zero.
    pub fn dot(&self, weights: &[f64]) -> f64 {
        self.iter()
            .filter_map(|(index, value)| weights.get(index).map(|w| w * value))
            .sum()
    }

    /// Squared Euclidean norm.
    pub fn squared_norm(&self) -> f64 {
        self.values.iter().map(|v| v * v).sum()
    }

    /// Euclidean norm.
    pub fn norm(&self) -> f64 {
        self.squared_norm().sqrt()
    }

    /// Scale to unit Euclidean norm. Zero vectors are left unchanged.
    pub fn normalize_l2(&mut self) {
        let norm = self.norm();
        if norm > 0.0 {
            for value in &mut self.values {
                *value /= norm;
            }
        }
    }

    /// Expand into a dense vector.
    pub fn to_dense(&self) -> Vec<f64> {
        let mut dense = vec![0.0; self.dimension];
        for (index, value) in self.iter() {
            dense[index] = value;
        }
        dense
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_construction_sorts_and_merges() {
        let vector = FeatureVector::new(5, vec![(3, 1.0), (1, 2.0), (3, 0.5), (9, 4.0), (2, 0.0)]);

        assert_eq!(vector.dimension(), 5);
        assert_eq!(vector.nnz(), 2);
        assert_eq!(vector.iter().collect::<Vec<_>>(), vec![(1, 2.0), (3, 1.5)]);
        assert_eq!(vector.get(3), 1.5);
        assert_eq!(vector.get(0), 0.0);
        assert_eq!(vector.get(42), 0.0);
    }

    #[test]
    fn test_zero_vector() {
        let vector = FeatureVector::zeros(10);
        assert!(vector.is_zero());
        assert_eq!(vector.norm(), 0.0);

        let mut normalized = vector.clone();
        normalized.normalize_l2();
        assert_eq!(normalized, vector);
    }

    #[test]
    fn test_dot_and_norm() {
        let mut vector = FeatureVector::new(4, vec![(0, 3.0), (3, 4.0)]);

        assert_eq!(vector.norm(), 5.0);
        assert_eq!(vector.dot(&[1.0, 1.0, 1.0, 2.0]), 11.0);
        // Shorter weight vectors ignore the missing tail.
        assert_eq!(vector.dot(&[1.0]), 3.0);

        vector.normalize_l2();
        assert!((vector.norm() - 1.0).abs() < 1e-12);
        assert_eq!(vector.to_dense(), vec![0.6, 0.0, 0.0, 0.8]);
    }
}
