use std::path::PathBuf;

use serde::Deserialize;

use markscan_core::{DEFAULT_MAX_UPLOAD_BYTES, DEFAULT_MODEL};
use markscan_understanding::OcrConfig;

/// MarkScan runtime configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// HTTP server bind address
    pub bind_address: String,
    /// HTTP server port
    pub port: u16,
    /// Vision model sent with every request
    pub model: String,
    /// Override for the Together AI endpoint
    pub api_base: Option<String>,
    /// Where `temp_<filename>` copies live during an analysis
    pub staging_dir: PathBuf,
    pub max_upload_bytes: usize,
    /// Directory for the rolling NDJSON log
    pub log_dir: PathBuf,
    /// Log level
    pub log_level: String,
    /// Fallback key for `markscan scan`
    pub together_api_key: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0".to_string(),
            port: 8501,
            model: DEFAULT_MODEL.to_string(),
            api_base: None,
            staging_dir: PathBuf::from("."),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            log_dir: PathBuf::from("logs"),
            log_level: "info".to_string(),
            together_api_key: None,
        }
    }
}

impl Config {
    /// Load configuration from environment variables with sensible defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(var: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            bind_address: var("MARKSCAN_BIND").unwrap_or(defaults.bind_address),
            port: var("MARKSCAN_PORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.port),
            model: var("MARKSCAN_MODEL").unwrap_or(defaults.model),
            api_base: var("MARKSCAN_API_BASE").filter(|s| !s.trim().is_empty()),
            staging_dir: var("MARKSCAN_STAGING_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.staging_dir),
            max_upload_bytes: var("MARKSCAN_MAX_UPLOAD_BYTES")
                .and_then(|n| n.parse().ok())
                .unwrap_or(defaults.max_upload_bytes),
            log_dir: var("MARKSCAN_LOG_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.log_dir),
            log_level: var("RUST_LOG").unwrap_or(defaults.log_level),
            together_api_key: var("TOGETHER_API_KEY").filter(|s| !s.trim().is_empty()),
        }
    }

    pub fn ocr_config(&self) -> OcrConfig {
        OcrConfig {
            model: self.model.clone(),
            staging_dir: self.staging_dir.clone(),
            max_upload_bytes: self.max_upload_bytes,
        }
    }
}
