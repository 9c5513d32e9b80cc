//! Error types for detection operations.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for detection operations.
pub type VisionResult<T> = Result<T, VisionError>;

/// Errors that can occur while loading or running the detector.
#[derive(Debug, Error)]
pub enum VisionError {
    #[error("Model not found: {0}")]
    ModelNotFound(String),

    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Invalid label list: {0}")]
    InvalidLabels(String),

    #[error("Image decode failed: {0}")]
    Decode(String),

    #[error("Image encode failed: {0}")]
    Encode(String),

    #[error("Inference failed: {0}")]
    Inference(String),

    #[error("Model output does not match labels: {0}")]
    ModelMismatch(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl VisionError {
    /// Create a model not found error.
    pub fn model_not_found(path: impl Into<String>) -> Self {
        Self::ModelNotFound(path.into())
    }

    /// Create a decode error.
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode(message.into())
    }

    /// Create an encode error.
    pub fn encode(message: impl Into<String>) -> Self {
        Self::Encode(message.into())
    }

    /// Create an inference failure error.
    pub fn inference(message: impl Into<String>) -> Self {
        Self::Inference(message.into())
    }

    /// Create a model/label mismatch error.
    pub fn model_mismatch(message: impl Into<String>) -> Self {
        Self::ModelMismatch(message.into())
    }
}
