//! Prometheus metrics for the API server.

use std::sync::OnceLock;
use std::time::Instant;

use axum::body::Body;
use axum::http::{Request, Response};
use axum::middleware::Next;
use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};
use regex_lite::Regex;

/// Initialize the Prometheus metrics recorder.
/// Returns a handle that can be used to render metrics.
pub fn init_metrics() -> Result<PrometheusHandle, BuildError> {
    PrometheusBuilder::new().install_recorder()
}

/// Metric names as constants for consistency.
pub mod names {
    // HTTP metrics
    pub const HTTP_REQUESTS_TOTAL: &str = "odr_http_requests_total";
    pub const HTTP_REQUEST_DURATION_SECONDS: &str = "odr_http_request_duration_seconds";
    pub const HTTP_REQUESTS_IN_FLIGHT: &str = "odr_http_requests_in_flight";

    // Processing metrics
    pub const INFERENCE_DURATION_SECONDS: &str = "odr_inference_duration_seconds";
    pub const DETECTIONS_TOTAL: &str = "odr_detections_total";
    pub const REPORTS_GENERATED_TOTAL: &str = "odr_reports_generated_total";
    pub const FRAMES_PROCESSED_TOTAL: &str = "odr_frames_processed_total";

    // Scratch metrics
    pub const SCRATCH_DIRS_SWEPT_TOTAL: &str = "odr_scratch_dirs_swept_total";
}

/// Record an HTTP request.
pub fn record_http_request(method: &str, path: &str, status: u16, duration_secs: f64) {
    let labels = [
        ("method", method.to_string()),
        ("path", sanitize_path(path)),
        ("status", status.to_string()),
    ];

    counter!(names::HTTP_REQUESTS_TOTAL, &labels).increment(1);
    histogram!(names::HTTP_REQUEST_DURATION_SECONDS, &labels).record(duration_secs);
}

/// Record one detector run.
pub fn record_inference(source: &'static str, duration_secs: f64, detections: usize) {
    let labels = [("source", source)];
    histogram!(names::INFERENCE_DURATION_SECONDS, &labels).record(duration_secs);
    counter!(names::DETECTIONS_TOTAL, &labels).increment(detections as u64);
}

/// Record a generated PDF report.
pub fn record_report_generated() {
    counter!(names::REPORTS_GENERATED_TOTAL).increment(1);
}

/// Record a processed preview frame.
pub fn record_frame_processed() {
    counter!(names::FRAMES_PROCESSED_TOTAL).increment(1);
}

/// Record scratch directories removed by the sweeper.
pub fn record_scratch_swept(count: usize) {
    counter!(names::SCRATCH_DIRS_SWEPT_TOTAL).increment(count as u64);
}

/// Sanitize path for metrics labels (remove IDs, etc.).
fn sanitize_path(path: &str) -> String {
    static UUID: OnceLock<Regex> = OnceLock::new();
    static DOWNLOAD_FILE: OnceLock<Regex> = OnceLock::new();

    let uuid = UUID.get_or_init(|| {
        Regex::new(r"[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}")
            .expect("valid regex")
    });
    let download_file = DOWNLOAD_FILE
        .get_or_init(|| Regex::new(r"^/download/([^/]+)/[^/]+$").expect("valid regex"));

    let path = uuid.replace_all(path, ":request_id");
    download_file
        .replace_all(&path, "/download/$1/:filename")
        .to_string()
}

/// Metrics middleware for HTTP requests.
pub async fn metrics_middleware(request: Request<Body>, next: Next) -> Response<Body> {
    let method = request.method().to_string();
    let path = request.uri().path().to_string();
    let start = Instant::now();

    gauge!(names::HTTP_REQUESTS_IN_FLIGHT).increment(1.0);

    let response = next.run(request).await;

    gauge!(names::HTTP_REQUESTS_IN_FLIGHT).decrement(1.0);

    let status = response.status().as_u16();
    let duration = start.elapsed().as_secs_f64();

    record_http_request(&method, &path, status, duration);

    response
}
