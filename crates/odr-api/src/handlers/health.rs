//! Liveness and readiness probes.

use std::time::Instant;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::Utc;
use serde::Serialize;

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub timestamp: String,
}

/// Liveness: the process is up and serving.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        timestamp: Utc::now().to_rfc3339(),
    })
}

#[derive(Debug, Serialize)]
pub struct ReadinessResponse {
    pub status: &'static str,
    pub detector: DetectorProbe,
    pub scratch: ScratchProbe,
}

#[derive(Debug, Serialize)]
pub struct DetectorProbe {
    pub ok: bool,
    pub classes: usize,
    pub input_size: u32,
}

#[derive(Debug, Serialize)]
pub struct ScratchProbe {
    pub ok: bool,
    pub root: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latency_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Readiness: the detector has classes and the scratch root accepts writes.
///
/// Answers 503 with the same body when either probe fails.
pub async fn ready(State(state): State<AppState>) -> Response {
    let classes = state.detector.labels().len();
    let detector = DetectorProbe {
        ok: classes > 0,
        classes,
        input_size: state.detector.config().input_size,
    };

    let start = Instant::now();
    let root = state.scratch.root().display().to_string();
    let scratch = match state.scratch.check_writable().await {
        Ok(()) => ScratchProbe {
            ok: true,
            root,
            latency_ms: Some(start.elapsed().as_millis() as u64),
            error: None,
        },
        Err(e) => ScratchProbe {
            ok: false,
            root,
            latency_ms: None,
            error: Some(e.to_string()),
        },
    };

    let ready = detector.ok && scratch.ok;
    let body = ReadinessResponse {
        status: if ready { "ready" } else { "degraded" },
        detector,
        scratch,
    };
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (status, Json(body)).into_response()
}
