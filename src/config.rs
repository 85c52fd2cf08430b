// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Hyperpolymath

//! Environment-based configuration and tracing setup

use crate::error::{DetectorError, DetectorResult};
use serde::Deserialize;
use std::env;
use std::path::PathBuf;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Directory holding vectorizer.json, dt_model.json, rf_model.json.
    pub model_dir: PathBuf,
    pub host: String,
    pub port: u16,
    pub log_level: String,
    /// Origins the browser frontend is served from.
    pub allowed_origins: Vec<String>,
}

impl AppConfig {
    /// Load configuration from environment variables.
    /// Loads `.env` file if present, then reads vars with defaults.
    pub fn from_env() -> DetectorResult<Self> {
        // Best-effort .env load; ignore if missing
        let _ = dotenvy::dotenv();

        Ok(Self {
            model_dir: PathBuf::from(get_var_or("MODEL_DIR", "models")),
            host: get_var_or("HOST", "0.0.0.0"),
            port: get_var_or("PORT", "8080")
                .parse()
                .map_err(|e| DetectorError::Config(format!("invalid PORT: {e}")))?,
            log_level: get_var_or("LOG_LEVEL", "info"),
            allowed_origins: get_var_or(
                "ALLOWED_ORIGINS",
                "http://localhost:5173,http://127.0.0.1:5173",
            )
            .split(',')
            .map(|origin| origin.trim().to_owned())
            .filter(|origin| !origin.is_empty())
            .collect(),
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn get_var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_owned())
}

/// Initialize the tracing subscriber with env-based filtering.
///
/// Reads `RUST_LOG` (or `LOG_LEVEL`) to set the filter.
/// Defaults to the given level if neither is set.
pub fn init_tracing(default_level: &str) {
    let filter = EnvFilter::try_from_env("RUST_LOG")
        .or_else(|_| EnvFilter::try_from_env("LOG_LEVEL"))
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    fmt().with_env_filter(filter).with_target(true).init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    static ENV_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn config_defaults_apply_without_env() {
        let _guard = ENV_LOCK.lock().expect("env lock poisoned");

        for key in ["MODEL_DIR", "HOST", "PORT", "LOG_LEVEL", "ALLOWED_ORIGINS"] {
            env::remove_var(key);
        }

        let cfg = AppConfig::from_env().expect("should parse config");
        assert_eq!(cfg.model_dir, PathBuf::from("models"));
        assert_eq!(cfg.host, "0.0.0.0");
        assert_eq!(cfg.port, 8080);
        assert_eq!(cfg.log_level, "info");
        assert_eq!(
            cfg.allowed_origins,
            vec![
                "http://localhost:5173".to_string(),
                "http://127.0.0.1:5173".to_string()
            ]
        );
    }

    #[test]
    fn config_rejects_invalid_port() {
        let _guard = ENV_LOCK.lock().expect("env lock poisoned");

        env::set_var("PORT", "not-a-port");
        let result = AppConfig::from_env();
        env::remove_var("PORT");

        assert!(matches!(result, Err(DetectorError::Config(_))));
    }

    #[test]
    fn config_splits_and_trims_origins() {
        let _guard = ENV_LOCK.lock().expect("env lock poisoned");

        env::set_var("ALLOWED_ORIGINS", "https://a.example , https://b.example,");
        let cfg = AppConfig::from_env().expect("should parse config");
        env::remove_var("ALLOWED_ORIGINS");

        assert_eq!(
            cfg.allowed_origins,
            vec![
                "https://a.example".to_string(),
                "https://b.example".to_string()
            ]
        );
    }

    #[test]
    fn bind_addr_formats_correctly() {
        let cfg = AppConfig {
            model_dir: PathBuf::from("models"),
            host: "127.0.0.1".to_owned(),
            port: 3000,
            log_level: "debug".to_owned(),
            allowed_origins: vec![],
        };
        assert_eq!(cfg.bind_addr(), "127.0.0.1:3000");
    }
}
