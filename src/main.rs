// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Hyperpolymath

//! Fake News Detector API server
//!
//! Loads the fitted vectorizer and both classifier artifacts once at
//! startup, then serves the scoring endpoint. The artifacts are immutable
//! and shared by every request; a bad or missing artifact aborts startup.

use anyhow::Result;
use fakenews_detector::config::{init_tracing, AppConfig};
use fakenews_detector::scoring::Detector;
use fakenews_detector::server::{build_router, AppState};
use std::net::SocketAddr;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing("info");

    let config = AppConfig::from_env()?;
    tracing::info!(
        service = "fakenews-api",
        model_dir = %config.model_dir.display(),
        "starting"
    );

    let detector = Detector::load(&config.model_dir)?;
    let state = AppState {
        detector: Arc::new(detector),
    };

    let app = build_router(state, &config.allowed_origins);
    let addr: SocketAddr = config.bind_addr().parse()?;

    tracing::info!(%addr, "listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
