// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Hyperpolymath

//! Error taxonomy for the detection service
//!
//! Only `InvalidInput` and `Inference` surface to API callers; `Config` and
//! `Artifact` abort startup. An input that is merely too short is not an
//! error at all — it produces the `Uncertain` response (see `scoring`).

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DetectorError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("artifact error: {0}")]
    Artifact(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("inference error: {0}")]
    Inference(String),
}

pub type DetectorResult<T> = Result<T, DetectorError>;
