//! HTTP response bodies.

use serde::{Deserialize, Serialize};

/// Successful `POST /process-image/` response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessImageResponse {
    pub request_id: String,
    pub filename: String,
    pub annotated_filename: String,
    pub pdf_filename: String,
}

/// Error body shared by every endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

/// `DELETE /cleanup/{request_id}` response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CleanupResponse {
    pub status: String,
}

impl CleanupResponse {
    pub fn cleaned() -> Self {
        Self {
            status: "cleaned".to_string(),
        }
    }
}
