use anyhow::{Context, Result};

use crate::llm_client::DEFAULT_MODEL;
use crate::pipeline::normalize::NormalizerConfig;

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub anthropic_api_key: String,
    pub anthropic_model: String,
    pub port: u16,
    pub rust_log: String,
    pub normalizer: NormalizerConfig,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let defaults = NormalizerConfig::default();

        Ok(Config {
            anthropic_api_key: require_env("ANTHROPIC_API_KEY")?,
            anthropic_model: std::env::var("ANTHROPIC_MODEL")
                .unwrap_or_else(|_| DEFAULT_MODEL.to_string()),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            normalizer: NormalizerConfig {
                tolerance: optional_f64("NORMALIZER_TOLERANCE", defaults.tolerance)?,
                min_block_hours: optional_f64(
                    "NORMALIZER_MIN_BLOCK_HOURS",
                    defaults.min_block_hours,
                )?,
                ..defaults
            },
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn optional_f64(key: &str, default: f64) -> Result<f64> {
    match std::env::var(key) {
        Ok(raw) => {
            let value = raw
                .parse::<f64>()
                .with_context(|| format!("{key} must be a number, got '{raw}'"))?;
            anyhow::ensure!(
                value.is_finite() && value > 0.0,
                "{key} must be a positive number"
            );
            Ok(value)
        }
        Err(_) => Ok(default),
    }
}
