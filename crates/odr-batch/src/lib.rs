//! Batch driver.
//!
//! Runs detection, annotation and report generation over every image in a
//! directory, writing one output folder per image:
//!
//! ```text
//! {output}/{stem}/{stem}_annotated{.ext}
//! {output}/{stem}/{stem}_report.pdf
//! ```

pub mod args;
pub mod driver;
pub mod error;
pub mod scan;

pub use args::BatchArgs;
pub use driver::{BatchDriver, BatchSummary, ImageOutcome};
pub use error::{BatchError, BatchResult};
pub use scan::{get_image_files, IMAGE_EXTENSIONS};
