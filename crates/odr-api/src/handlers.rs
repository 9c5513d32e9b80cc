//! Request handlers.

pub mod downloads;
pub mod frames;
pub mod health;
pub mod images;

pub use downloads::*;
pub use frames::*;
pub use health::*;
pub use images::*;
