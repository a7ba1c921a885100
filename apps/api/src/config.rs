use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::analysis::thresholds::MatchThresholds;

const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Application configuration loaded from environment variables.
/// Every variable is optional; malformed values fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    pub max_upload_bytes: usize,
    pub analysis_timeout_secs: u64,
    pub thresholds: MatchThresholds,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let defaults = MatchThresholds::default();
        let thresholds = MatchThresholds {
            matched_cutoff: env_or("ATS_MATCH_THRESHOLD", defaults.matched_cutoff)?,
            fuzzy_min_ratio: env_or("ATS_FUZZY_MIN_RATIO", defaults.fuzzy_min_ratio)?,
            ..defaults
        };

        Ok(Config {
            port: env_or("PORT", 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            max_upload_bytes: env_or("MAX_UPLOAD_BYTES", DEFAULT_MAX_UPLOAD_BYTES)?,
            analysis_timeout_secs: env_or("ANALYSIS_TIMEOUT_SECS", 10)?,
            thresholds,
        })
    }

    pub fn analysis_timeout(&self) -> Duration {
        Duration::from_secs(self.analysis_timeout_secs)
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            port: 8080,
            rust_log: "info".to_string(),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            analysis_timeout_secs: 10,
            thresholds: MatchThresholds::default(),
        }
    }
}

fn env_or<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has an invalid value '{raw}'")),
        Err(_) => Ok(default),
    }
}
