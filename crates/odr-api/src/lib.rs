//! Axum HTTP API server.
//!
//! This crate provides:
//! - Image upload with detection, annotation and a PDF report per request
//! - Annotated JPEG responses for live-preview frames
//! - Download and cleanup of per-request scratch files
//! - Health probes, security headers and Prometheus metrics

pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod routes;
pub mod services;
pub mod state;

pub use config::ApiConfig;
pub use error::{ApiError, ApiResult};
pub use routes::create_router;
pub use services::ScratchSweeper;
pub use state::AppState;
