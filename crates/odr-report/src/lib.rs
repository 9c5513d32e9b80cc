//! PDF report generation.
//!
//! A report is an A4 document with two pages: the original image titled
//! "Original Image" and the annotated image titled "Annotated Image".

pub mod builder;
pub mod error;
pub mod layout;

pub use builder::ReportBuilder;
pub use error::{ReportError, ReportResult};
