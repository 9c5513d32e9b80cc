//! Scratch storage for in-flight requests.
//!
//! Every request gets its own directory `{root}/{request_id}/` holding the
//! uploaded original, the annotated copy and the PDF report. Directories live
//! until explicitly cleaned up or swept after a TTL.

pub mod error;
pub mod filename;
pub mod scratch;

pub use error::{StorageError, StorageResult};
pub use filename::{sanitize_upload_filename, validate_filename, DEFAULT_UPLOAD_FILENAME};
pub use scratch::ScratchStore;
