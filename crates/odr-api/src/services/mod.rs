//! Processing pipelines and background services.

pub mod pipeline;
pub mod scratch_sweeper;

pub use scratch_sweeper::ScratchSweeper;
