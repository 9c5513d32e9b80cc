//! Error types for report generation.

use thiserror::Error;

/// Result type for report operations.
pub type ReportResult<T> = Result<T, ReportError>;

/// Errors that can occur while building a report.
///
/// Missing or undecodable inputs are not errors; `ReportBuilder::create`
/// reports them as `Ok(false)`.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("Image conversion failed: {0}")]
    Image(String),

    #[error("PDF generation failed: {0}")]
    Pdf(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ReportError {
    pub fn image(message: impl Into<String>) -> Self {
        Self::Image(message.into())
    }

    pub fn pdf(message: impl Into<String>) -> Self {
        Self::Pdf(message.into())
    }
}

impl From<tempfile::PersistError> for ReportError {
    fn from(err: tempfile::PersistError) -> Self {
        Self::Io(err.error)
    }
}
