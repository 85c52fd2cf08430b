// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Hyperpolymath

//! TF-IDF feature space
//!
//! The vectorizer is fitted offline by the training pipeline and loaded here
//! as a read-only artifact: a vocabulary mapping n-gram terms to columns and
//! one idf weight per column. `transform` is the only operation; the core
//! never fits or refits.

use crate::error::{DetectorError, DetectorResult};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Sparse feature vector over the vectorizer's fixed column space.
///
/// Produced fresh per request and never mutated; absent columns weigh zero.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector {
    dimension: usize,
    weights: HashMap<usize, f64>,
}

impl FeatureVector {
    pub fn new(dimension: usize, weights: HashMap<usize, f64>) -> Self {
        Self { dimension, weights }
    }

    /// Fixed dimensionality of the feature space this vector lives in.
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Weight of a column, zero when absent.
    pub fn weight(&self, column: usize) -> f64 {
        self.weights.get(&column).copied().unwrap_or(0.0)
    }

    /// Number of nonzero columns.
    pub fn nonzero(&self) -> usize {
        self.weights.len()
    }
}

/// A TF-IDF vectorizer fitted at training time.
///
/// Vocabulary, idf weighting, and the n-gram range are frozen in the
/// artifact; terms outside the vocabulary are silently ignored and
/// contribute zero weight.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TfidfVectorizer {
    vocabulary: HashMap<String, usize>,
    idf: Vec<f64>,
    ngram_range: (usize, usize),
}

impl TfidfVectorizer {
    pub fn new(
        vocabulary: HashMap<String, usize>,
        idf: Vec<f64>,
        ngram_range: (usize, usize),
    ) -> DetectorResult<Self> {
        let vectorizer = Self {
            vocabulary,
            idf,
            ngram_range,
        };
        vectorizer.validate()?;
        Ok(vectorizer)
    }

    /// Load the vectorizer artifact from disk, failing fast on an
    /// internally inconsistent file.
    pub fn load(path: &Path) -> DetectorResult<Self> {
        let file = File::open(path).map_err(|e| {
            DetectorError::Artifact(format!(
                "failed to open vectorizer artifact {}: {e}",
                path.display()
            ))
        })?;
        let vectorizer: Self = serde_json::from_reader(BufReader::new(file)).map_err(|e| {
            DetectorError::Artifact(format!(
                "failed to parse vectorizer artifact {}: {e}",
                path.display()
            ))
        })?;
        vectorizer.validate()?;
        Ok(vectorizer)
    }

    fn validate(&self) -> DetectorResult<()> {
        let (min_n, max_n) = self.ngram_range;
        if min_n == 0 || min_n > max_n {
            return Err(DetectorError::Artifact(format!(
                "invalid ngram range ({min_n}, {max_n})"
            )));
        }
        if self.idf.len() != self.vocabulary.len() {
            return Err(DetectorError::Artifact(format!(
                "idf length {} does not match vocabulary size {}",
                self.idf.len(),
                self.vocabulary.len()
            )));
        }
        if let Some((term, &column)) = self
            .vocabulary
            .iter()
            .find(|(_, &column)| column >= self.idf.len())
        {
            return Err(DetectorError::Artifact(format!(
                "term '{term}' maps to column {column}, outside the {}-column space",
                self.idf.len()
            )));
        }
        Ok(())
    }

    /// Dimensionality of the feature space.
    pub fn dimension(&self) -> usize {
        self.idf.len()
    }

    /// Map normalized text to its TF-IDF vector: raw term counts over the
    /// vocabulary's n-grams, times idf, L2-normalized.
    pub fn transform(&self, normalized: &str) -> FeatureVector {
        let tokens: Vec<&str> = normalized.split_whitespace().collect();
        let (min_n, max_n) = self.ngram_range;

        let mut counts: HashMap<usize, f64> = HashMap::new();
        for n in min_n..=max_n {
            if tokens.len() < n {
                break;
            }
            for window in tokens.windows(n) {
                let term = window.join(" ");
                if let Some(&column) = self.vocabulary.get(&term) {
                    *counts.entry(column).or_insert(0.0) += 1.0;
                }
            }
        }

        let mut weights: HashMap<usize, f64> = counts
            .into_iter()
            .map(|(column, tf)| (column, tf * self.idf[column]))
            .collect();

        let norm = weights.values().map(|w| w * w).sum::<f64>().sqrt();
        if norm > 0.0 {
            for w in weights.values_mut() {
                *w /= norm;
            }
        }

        FeatureVector::new(self.idf.len(), weights)
    }
}
