//! API configuration.

use std::path::PathBuf;
use std::time::Duration;

use odr_vision::config::{DEFAULT_CLASS_NAMES_FILE, DEFAULT_MODEL_FILE};
use odr_vision::DetectorConfig;

/// API server configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// CORS origins
    pub cors_origins: Vec<String>,
    /// Max request body size
    pub max_body_size: usize,
    /// Environment (development/production)
    pub environment: String,
    /// Directory holding the model and class-names files
    pub models_dir: PathBuf,
    /// ONNX model file name inside `models_dir`
    pub model_file: String,
    /// Class-names file name inside `models_dir`
    pub class_names_file: String,
    /// Root of the per-request scratch directories
    pub scratch_dir: PathBuf,
    /// Maximum number of detections running at once
    pub max_concurrent_inference: usize,
    /// Age after which scratch directories are swept; `None` disables sweeping
    pub scratch_ttl: Option<Duration>,
    /// Rewrite error statuses to 200 for clients that read only the body
    pub legacy_error_status: bool,
    /// Expose Prometheus metrics at /metrics
    pub metrics_enabled: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            cors_origins: vec!["http://localhost:3000".to_string()],
            max_body_size: 20 * 1024 * 1024, // 20MB
            environment: "development".to_string(),
            models_dir: PathBuf::from("models"),
            model_file: DEFAULT_MODEL_FILE.to_string(),
            class_names_file: DEFAULT_CLASS_NAMES_FILE.to_string(),
            scratch_dir: PathBuf::from("temp"),
            max_concurrent_inference: 2,
            scratch_ttl: None,
            legacy_error_status: false,
            metrics_enabled: true,
        }
    }
}

impl ApiConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            host: std::env::var("API_HOST").unwrap_or(defaults.host),
            port: std::env::var("API_PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.port),
            cors_origins: std::env::var("CORS_ORIGINS")
                .map(|s| {
                    s.split(',')
                        .map(|s| s.trim().to_string())
                        .filter(|s| !s.is_empty())
                        .collect()
                })
                .unwrap_or(defaults.cors_origins),
            max_body_size: std::env::var("MAX_BODY_SIZE")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.max_body_size),
            environment: std::env::var("ENVIRONMENT").unwrap_or(defaults.environment),
            models_dir: std::env::var("MODELS_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.models_dir),
            model_file: std::env::var("MODEL_FILE").unwrap_or(defaults.model_file),
            class_names_file: std::env::var("CLASS_NAMES_FILE")
                .unwrap_or(defaults.class_names_file),
            scratch_dir: std::env::var("SCRATCH_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.scratch_dir),
            max_concurrent_inference: std::env::var("MAX_CONCURRENT_INFERENCE")
                .ok()
                .and_then(|s| s.parse().ok())
                .filter(|n: &usize| *n > 0)
                .unwrap_or(defaults.max_concurrent_inference),
            scratch_ttl: std::env::var("SCRATCH_TTL_SECS")
                .ok()
                .and_then(|s| s.parse::<u64>().ok())
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs),
            legacy_error_status: env_flag("LEGACY_ERROR_STATUS").unwrap_or(false),
            metrics_enabled: env_flag("METRICS_ENABLED").unwrap_or(defaults.metrics_enabled),
        }
    }

    /// Check if running in production mode.
    pub fn is_production(&self) -> bool {
        self.environment.to_lowercase() == "production"
    }

    /// Detector settings for the configured model files.
    pub fn detector_config(&self) -> DetectorConfig {
        DetectorConfig::with_files(&self.models_dir, &self.model_file, &self.class_names_file)
    }
}

fn env_flag(name: &str) -> Option<bool> {
    std::env::var(name).ok().map(|v| {
        let v = v.to_lowercase();
        v == "true" || v == "1"
    })
}
