// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Hyperpolymath

//! Fake news detection service core
//!
//! This crate provides:
//! - Text normalization (non-alphabetic strip, stopword and short-token
//!   filtering)
//! - TF-IDF vectorization over a vocabulary fitted offline
//! - Decision-tree and random-forest inference from persisted artifacts
//! - The dual-model scoring orchestrator with its short-input guard
//! - An axum serving layer and environment-based configuration
//!
//! The vectorizer and both classifiers are loaded once at process start and
//! shared read-only across all concurrent requests; scoring is deterministic
//! and stateless per request.

pub mod config;
pub mod error;
pub mod features;
pub mod models;
pub mod scoring;
pub mod server;
pub mod text;

pub use config::AppConfig;
pub use error::{DetectorError, DetectorResult};
pub use features::{FeatureVector, TfidfVectorizer};
pub use models::{Classifier, DecisionTreeModel, Label, RandomForestModel};
pub use scoring::{Comparison, Detection, Detector, ModelVerdict, MIN_CONTENT_TOKENS};
pub use text::normalize;
