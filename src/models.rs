// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Hyperpolymath

//! Inference-side classifier models
//!
//! Provides:
//! - `Label` and the class-index contract shared with the training pipeline
//! - The `Classifier` trait over the shared TF-IDF feature space
//! - Decision-tree and random-forest inference restored from artifacts
//!
//! Training lives in the offline pipeline; these models only walk trees that
//! were fitted elsewhere.

use crate::error::{DetectorError, DetectorResult};
use crate::features::FeatureVector;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Class-label ordering fixed by the training pipeline. Index 0 is Fake,
/// index 1 is Real; artifacts are checked against this at load time.
pub const CLASS_LABELS: [&str; 2] = ["Fake", "Real"];
pub const FAKE_CLASS_INDEX: usize = 0;
pub const REAL_CLASS_INDEX: usize = 1;

/// Binary label for a scored text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Label {
    Fake,
    Real,
}

impl Label {
    /// Convert a predicted class index per the training-time ordering.
    pub fn from_class_index(index: usize) -> Self {
        if index == FAKE_CLASS_INDEX {
            Label::Fake
        } else {
            Label::Real
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Label::Fake => CLASS_LABELS[FAKE_CLASS_INDEX],
            Label::Real => CLASS_LABELS[REAL_CLASS_INDEX],
        }
    }
}

/// A trained binary classifier over the shared feature space.
///
/// Implementations are immutable after loading and shared read-only across
/// all concurrent requests.
pub trait Classifier: Send + Sync {
    /// Class probability distribution, indexed per `CLASS_LABELS`.
    fn predict_proba(&self, features: &FeatureVector) -> DetectorResult<[f64; 2]>;

    /// Predicted class index: arg-max of the distribution, lower index on
    /// ties.
    fn predict(&self, features: &FeatureVector) -> DetectorResult<usize> {
        let probs = self.predict_proba(features)?;
        Ok(if probs[REAL_CLASS_INDEX] > probs[FAKE_CLASS_INDEX] {
            REAL_CLASS_INDEX
        } else {
            FAKE_CLASS_INDEX
        })
    }
}

/// One node of a serialized decision tree. Split nodes route on
/// `weight(feature) <= threshold` (left when true); leaves carry the class
/// distribution observed at fit time.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TreeNode {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        probabilities: [f64; 2],
    },
}

/// Walk a flat node array from the root. Any walk longer than the node count
/// means the artifact encodes a cycle.
fn evaluate_tree(nodes: &[TreeNode], features: &FeatureVector) -> DetectorResult<[f64; 2]> {
    let mut index = 0usize;
    for _ in 0..=nodes.len() {
        match nodes.get(index) {
            Some(TreeNode::Split {
                feature,
                threshold,
                left,
                right,
            }) => {
                if *feature >= features.dimension() {
                    return Err(DetectorError::Inference(format!(
                        "split on feature {feature} outside the {}-column feature space",
                        features.dimension()
                    )));
                }
                index = if features.weight(*feature) <= *threshold {
                    *left
                } else {
                    *right
                };
            }
            Some(TreeNode::Leaf { probabilities }) => return Ok(*probabilities),
            None => {
                return Err(DetectorError::Inference(format!(
                    "tree node index {index} out of range"
                )))
            }
        }
    }
    Err(DetectorError::Inference(
        "tree walk exceeded node count without reaching a leaf".to_string(),
    ))
}

fn read_artifact<T: serde::de::DeserializeOwned>(path: &Path, kind: &str) -> DetectorResult<T> {
    let file = File::open(path).map_err(|e| {
        DetectorError::Artifact(format!(
            "failed to open {kind} artifact {}: {e}",
            path.display()
        ))
    })?;
    serde_json::from_reader(BufReader::new(file)).map_err(|e| {
        DetectorError::Artifact(format!(
            "failed to parse {kind} artifact {}: {e}",
            path.display()
        ))
    })
}

/// Fail fast when an artifact was fitted with a different label encoding.
fn check_class_order(class_labels: &[String; 2], kind: &str) -> DetectorResult<()> {
    if class_labels[FAKE_CLASS_INDEX] != CLASS_LABELS[FAKE_CLASS_INDEX]
        || class_labels[REAL_CLASS_INDEX] != CLASS_LABELS[REAL_CLASS_INDEX]
    {
        return Err(DetectorError::Artifact(format!(
            "{kind} class order {class_labels:?} does not match expected {CLASS_LABELS:?}"
        )));
    }
    Ok(())
}

fn expected_class_labels() -> [String; 2] {
    [CLASS_LABELS[0].to_string(), CLASS_LABELS[1].to_string()]
}

/// Decision-tree classifier restored from a training artifact.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionTreeModel {
    class_labels: [String; 2],
    nodes: Vec<TreeNode>,
}

impl DecisionTreeModel {
    pub fn new(nodes: Vec<TreeNode>) -> Self {
        Self {
            class_labels: expected_class_labels(),
            nodes,
        }
    }

    pub fn load(path: &Path) -> DetectorResult<Self> {
        let model: Self = read_artifact(path, "decision tree")?;
        model.validate()?;
        Ok(model)
    }

    fn validate(&self) -> DetectorResult<()> {
        check_class_order(&self.class_labels, "decision tree")?;
        if self.nodes.is_empty() {
            return Err(DetectorError::Artifact(
                "decision tree artifact has no nodes".to_string(),
            ));
        }
        Ok(())
    }
}

impl Classifier for DecisionTreeModel {
    fn predict_proba(&self, features: &FeatureVector) -> DetectorResult<[f64; 2]> {
        evaluate_tree(&self.nodes, features)
    }
}

/// Random-forest classifier: member trees vote by averaging their class
/// distributions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RandomForestModel {
    class_labels: [String; 2],
    trees: Vec<Vec<TreeNode>>,
}

impl RandomForestModel {
    pub fn new(trees: Vec<Vec<TreeNode>>) -> Self {
        Self {
            class_labels: expected_class_labels(),
            trees,
        }
    }

    pub fn load(path: &Path) -> DetectorResult<Self> {
        let model: Self = read_artifact(path, "random forest")?;
        model.validate()?;
        Ok(model)
    }

    fn validate(&self) -> DetectorResult<()> {
        check_class_order(&self.class_labels, "random forest")?;
        if self.trees.is_empty() || self.trees.iter().any(Vec::is_empty) {
            return Err(DetectorError::Artifact(
                "random forest artifact has an empty tree".to_string(),
            ));
        }
        Ok(())
    }
}

impl Classifier for RandomForestModel {
    fn predict_proba(&self, features: &FeatureVector) -> DetectorResult<[f64; 2]> {
        let mut sums = [0.0f64; 2];
        for tree in &self.trees {
            let probs = evaluate_tree(tree, features)?;
            sums[0] += probs[0];
            sums[1] += probs[1];
        }
        let n = self.trees.len() as f64;
        Ok([sums[0] / n, sums[1] / n])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn vector(weights: &[(usize, f64)]) -> FeatureVector {
        FeatureVector::new(4, weights.iter().copied().collect::<HashMap<_, _>>())
    }

    fn split(feature: usize, threshold: f64, left: usize, right: usize) -> TreeNode {
        TreeNode::Split {
            feature,
            threshold,
            left,
            right,
        }
    }

    fn leaf(fake: f64, real: f64) -> TreeNode {
        TreeNode::Leaf {
            probabilities: [fake, real],
        }
    }

    #[test]
    fn test_label_from_class_index() {
        assert_eq!(Label::from_class_index(FAKE_CLASS_INDEX), Label::Fake);
        assert_eq!(Label::from_class_index(REAL_CLASS_INDEX), Label::Real);
        assert_eq!(Label::Fake.as_str(), "Fake");
        assert_eq!(Label::Real.as_str(), "Real");
    }

    #[test]
    fn test_tree_routes_on_threshold() {
        // root splits on feature 0 at 0.5: left leaf says Fake, right Real
        let model = DecisionTreeModel::new(vec![
            split(0, 0.5, 1, 2),
            leaf(0.9, 0.1),
            leaf(0.2, 0.8),
        ]);

        let low = vector(&[(0, 0.3)]);
        assert_eq!(model.predict_proba(&low).unwrap(), [0.9, 0.1]);
        assert_eq!(model.predict(&low).unwrap(), FAKE_CLASS_INDEX);

        let high = vector(&[(0, 0.7)]);
        assert_eq!(model.predict_proba(&high).unwrap(), [0.2, 0.8]);
        assert_eq!(model.predict(&high).unwrap(), REAL_CLASS_INDEX);
    }

    #[test]
    fn test_missing_feature_weight_is_zero_and_routes_left() {
        let model = DecisionTreeModel::new(vec![
            split(3, 0.0, 1, 2),
            leaf(1.0, 0.0),
            leaf(0.0, 1.0),
        ]);
        // feature 3 absent from the sparse vector: weight 0.0 <= 0.0
        let verdict = model.predict_proba(&vector(&[(0, 1.0)])).unwrap();
        assert_eq!(verdict, [1.0, 0.0]);
    }

    #[test]
    fn test_predict_ties_resolve_to_fake() {
        let model = DecisionTreeModel::new(vec![leaf(0.5, 0.5)]);
        assert_eq!(model.predict(&vector(&[])).unwrap(), FAKE_CLASS_INDEX);
    }

    #[test]
    fn test_split_on_out_of_range_feature_is_inference_error() {
        let model = DecisionTreeModel::new(vec![split(99, 0.5, 1, 1), leaf(1.0, 0.0)]);
        let result = model.predict_proba(&vector(&[]));
        assert!(matches!(result, Err(DetectorError::Inference(_))));
    }

    #[test]
    fn test_dangling_child_index_is_inference_error() {
        let model = DecisionTreeModel::new(vec![split(0, 0.5, 7, 7)]);
        let result = model.predict_proba(&vector(&[]));
        assert!(matches!(result, Err(DetectorError::Inference(_))));
    }

    #[test]
    fn test_cyclic_tree_is_inference_error() {
        let model = DecisionTreeModel::new(vec![split(0, 0.5, 0, 0)]);
        let result = model.predict_proba(&vector(&[]));
        assert!(matches!(result, Err(DetectorError::Inference(_))));
    }

    #[test]
    fn test_forest_averages_member_distributions() {
        let model = RandomForestModel::new(vec![
            vec![leaf(0.8, 0.2)],
            vec![leaf(0.6, 0.4)],
            vec![leaf(1.0, 0.0)],
        ]);
        let probs = model.predict_proba(&vector(&[])).unwrap();
        assert!((probs[0] - 0.8).abs() < 1e-12);
        assert!((probs[1] - 0.2).abs() < 1e-12);
    }

    #[test]
    fn test_load_decision_tree_artifact() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        write!(
            file,
            r#"{{"class_labels": ["Fake", "Real"],
                "nodes": [
                  {{"split": {{"feature": 0, "threshold": 0.5, "left": 1, "right": 2}}}},
                  {{"leaf": {{"probabilities": [0.9, 0.1]}}}},
                  {{"leaf": {{"probabilities": [0.1, 0.9]}}}}
                ]}}"#
        )
        .expect("write artifact");

        let model = DecisionTreeModel::load(file.path()).expect("load artifact");
        let probs = model.predict_proba(&vector(&[(0, 0.9)])).unwrap();
        assert_eq!(probs, [0.1, 0.9]);
    }

    #[test]
    fn test_load_rejects_swapped_class_order() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        write!(
            file,
            r#"{{"class_labels": ["Real", "Fake"],
                "nodes": [{{"leaf": {{"probabilities": [1.0, 0.0]}}}}]}}"#
        )
        .expect("write artifact");

        let result = DecisionTreeModel::load(file.path());
        assert!(matches!(result, Err(DetectorError::Artifact(_))));
    }

    #[test]
    fn test_load_rejects_empty_forest() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        write!(file, r#"{{"class_labels": ["Fake", "Real"], "trees": []}}"#).expect("write");

        let result = RandomForestModel::load(file.path());
        assert!(matches!(result, Err(DetectorError::Artifact(_))));
    }
}
