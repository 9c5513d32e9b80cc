//! API routes.

use axum::extract::DefaultBodyLimit;
use axum::middleware;
use axum::routing::{delete, get, post};
use axum::Router;
use metrics_exporter_prometheus::PrometheusHandle;

use crate::handlers::{cleanup, download_file, health, process_frame, process_image, ready};
use crate::metrics::metrics_middleware;
use crate::middleware::{cors_layer, legacy_error_status, request_trace, security_headers};
use crate::state::AppState;

/// Create the API router.
pub fn create_router(state: AppState, metrics_handle: Option<PrometheusHandle>) -> Router {
    let processing_routes = Router::new()
        .route("/process-image/", post(process_image))
        .route("/process-frame/", post(process_frame))
        .route("/download/:request_id/:filename", get(download_file))
        .route("/cleanup/:request_id", delete(cleanup));

    let health_routes = Router::new()
        .route("/health", get(health))
        .route("/healthz", get(health))
        .route("/ready", get(ready));

    // Metrics endpoint (if enabled)
    let metrics_routes = if let Some(handle) = metrics_handle {
        Router::new().route("/metrics", get(move || async move { handle.render() }))
    } else {
        Router::new()
    };

    Router::new()
        .merge(processing_routes)
        .merge(health_routes)
        .merge(metrics_routes)
        .layer(middleware::from_fn_with_state(
            state.config.legacy_error_status,
            legacy_error_status,
        ))
        // Oversize uploads surface as multipart errors, so they get the JSON
        // error body and the legacy status rewrite like any other failure
        .layer(DefaultBodyLimit::max(state.config.max_body_size))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(middleware::from_fn(security_headers))
        .layer(middleware::from_fn(request_trace))
        .layer(cors_layer(&state.config.cors_origins))
        .with_state(state)
}
