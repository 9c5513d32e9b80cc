//! Batch error types.

use std::path::PathBuf;

use thiserror::Error;

use odr_report::ReportError;
use odr_vision::VisionError;

/// Result type for batch operations.
pub type BatchResult<T> = Result<T, BatchError>;

/// Errors that stop a batch run or a single image within it.
#[derive(Debug, Error)]
pub enum BatchError {
    #[error("Input directory {0} does not exist")]
    InputMissing(PathBuf),

    #[error("Detection failed: {0}")]
    Vision(#[from] VisionError),

    #[error("Report failed: {0}")]
    Report(#[from] ReportError),

    #[error("Report for {0} could not be created from its inputs")]
    ReportSkipped(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
