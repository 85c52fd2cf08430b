// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Hyperpolymath

//! Scoring orchestrator: the decision pipeline from raw text to verdict
//!
//! Orchestrates:
//! - The short-input guard (empty input rejected, sparse input uncertain)
//! - Normalization and a single vectorization per request
//! - Both classifiers evaluated against the identical feature vector
//! - The fixed best-pick rule and response assembly
//!
//! Each request is scored independently and atomically; the only long-lived
//! state is the injected artifacts, shared read-only across requests.

use crate::error::{DetectorError, DetectorResult};
use crate::features::{FeatureVector, TfidfVectorizer};
use crate::models::{Classifier, DecisionTreeModel, Label, RandomForestModel};
use crate::text;
use serde::Serialize;
use std::path::Path;

/// Inputs that normalize to fewer content tokens than this are never sent to
/// the classifiers: TF-IDF vectors are too sparse below this count for either
/// model's training distribution to apply. A fixed behavioral contract, not a
/// tuning knob.
pub const MIN_CONTENT_TOKENS: usize = 20;

pub const DECISION_TREE: &str = "Decision Tree";
pub const RANDOM_FOREST: &str = "Random Forest";
const NOT_AVAILABLE: &str = "N/A";

/// One model's verdict as surfaced in the comparison block.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelVerdict {
    pub prediction: String,
    pub confidence: f64,
}

/// Side-by-side verdicts from both models.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Comparison {
    pub decision_tree: ModelVerdict,
    pub random_forest: ModelVerdict,
}

/// Full scoring response. Constructed per request, returned immediately,
/// never stored.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Detection {
    pub prediction: String,
    pub confidence: f64,
    pub explanation: String,
    pub comparison: Comparison,
    pub best_algorithm: String,
}

impl Detection {
    /// Fixed-shape response for inputs below the content-token threshold.
    fn uncertain() -> Self {
        let not_scored = ModelVerdict {
            prediction: NOT_AVAILABLE.to_string(),
            confidence: 0.0,
        };
        Self {
            prediction: "Uncertain".to_string(),
            confidence: 0.0,
            explanation: "Input too short; add more text for accurate detection.".to_string(),
            comparison: Comparison {
                decision_tree: not_scored.clone(),
                random_forest: not_scored,
            },
            best_algorithm: NOT_AVAILABLE.to_string(),
        }
    }
}

/// The scoring orchestrator.
///
/// Owns the fitted vectorizer and both classifiers and exposes the single
/// scoring entry point used by the serving layer and the CLI. Capabilities
/// arrive by injection so tests can substitute doubles.
pub struct Detector {
    vectorizer: TfidfVectorizer,
    decision_tree: Box<dyn Classifier>,
    random_forest: Box<dyn Classifier>,
}

impl Detector {
    pub fn new(
        vectorizer: TfidfVectorizer,
        decision_tree: Box<dyn Classifier>,
        random_forest: Box<dyn Classifier>,
    ) -> Self {
        Self {
            vectorizer,
            decision_tree,
            random_forest,
        }
    }

    /// Load all three artifacts from a model directory, failing fast on any
    /// missing or inconsistent file.
    pub fn load(model_dir: &Path) -> DetectorResult<Self> {
        let vectorizer = TfidfVectorizer::load(&model_dir.join("vectorizer.json"))?;
        let decision_tree = DecisionTreeModel::load(&model_dir.join("dt_model.json"))?;
        let random_forest = RandomForestModel::load(&model_dir.join("rf_model.json"))?;

        tracing::info!(
            dimension = vectorizer.dimension(),
            "model artifacts loaded"
        );

        Ok(Self::new(
            vectorizer,
            Box::new(decision_tree),
            Box::new(random_forest),
        ))
    }

    /// Score a submitted text.
    ///
    /// Empty or whitespace-only input is rejected as invalid before any
    /// other work. Input that normalizes below `MIN_CONTENT_TOKENS` yields
    /// the uncertain response without invoking the classifiers. Otherwise
    /// both models score the same feature vector and the response carries
    /// their comparison.
    pub fn score(&self, raw: &str) -> DetectorResult<Detection> {
        if raw.trim().is_empty() {
            return Err(DetectorError::InvalidInput(
                "text cannot be empty".to_string(),
            ));
        }

        let normalized = text::normalize(raw);
        let tokens = text::token_count(&normalized);
        if tokens < MIN_CONTENT_TOKENS {
            tracing::debug!(tokens, "input below content threshold, not scored");
            return Ok(Detection::uncertain());
        }

        let features = self.vectorizer.transform(&normalized);
        let (dt_label, dt_conf) = model_verdict(self.decision_tree.as_ref(), &features)?;
        let (rf_label, rf_conf) = model_verdict(self.random_forest.as_ref(), &features)?;

        // Raw confidences decide the winner; ties go to the decision tree.
        let (best_algorithm, best_label, best_conf) = if rf_conf > dt_conf {
            (RANDOM_FOREST, rf_label, rf_conf)
        } else {
            (DECISION_TREE, dt_label, dt_conf)
        };

        let explanation = format!(
            "Comparison: Decision Tree says {} ({:.1}%), Random Forest says {} ({:.1}%). Best: {}.",
            dt_label.as_str(),
            round_confidence(dt_conf),
            rf_label.as_str(),
            round_confidence(rf_conf),
            best_algorithm
        );

        Ok(Detection {
            prediction: best_label.as_str().to_string(),
            confidence: round_confidence(best_conf),
            explanation,
            comparison: Comparison {
                decision_tree: ModelVerdict {
                    prediction: dt_label.as_str().to_string(),
                    confidence: round_confidence(dt_conf),
                },
                random_forest: ModelVerdict {
                    prediction: rf_label.as_str().to_string(),
                    confidence: round_confidence(rf_conf),
                },
            },
            best_algorithm: best_algorithm.to_string(),
        })
    }
}

/// Label and raw percentage confidence for one classifier over the shared
/// vector. Confidence is the maximum class probability scaled to percent.
fn model_verdict(
    model: &dyn Classifier,
    features: &FeatureVector,
) -> DetectorResult<(Label, f64)> {
    let class_index = model.predict(features)?;
    let probs = model.predict_proba(features)?;
    let confidence = 100.0 * probs[0].max(probs[1]);
    Ok((Label::from_class_index(class_index), confidence))
}

/// Round a percentage to one decimal place for the response contract.
fn round_confidence(confidence: f64) -> f64 {
    (confidence * 10.0).round() / 10.0
}
