//! Shared data models for the object detection report service.
//!
//! This crate provides Serde-serializable types for:
//! - Detections and their pixel-space bounding boxes
//! - Request identifiers for per-request scratch space
//! - HTTP response bodies shared by the API and its clients

pub mod detection;
pub mod request;
pub mod response;

// Re-export common types
pub use detection::{BoundingBox, Detection};
pub use request::{InvalidRequestId, RequestId};
pub use response::{CleanupResponse, ErrorResponse, ProcessImageResponse};
