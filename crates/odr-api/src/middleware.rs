//! API middleware.

use std::time::{Duration, Instant};

use axum::body::Body;
use axum::extract::State;
use axum::http::{header, HeaderName, HeaderValue, Method, Request, Response, StatusCode};
use axum::middleware::Next;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tracing::{info, info_span, Instrument};
use uuid::Uuid;

/// Correlation header echoed on every response.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Probe endpoints excluded from request logs.
const PROBE_PATHS: [&str; 3] = ["/health", "/healthz", "/ready"];

const CORS_MAX_AGE: Duration = Duration::from_secs(600);

const SECURITY_HEADERS: [(&str, &str); 4] = [
    ("x-content-type-options", "nosniff"),
    ("x-frame-options", "DENY"),
    ("referrer-policy", "strict-origin-when-cross-origin"),
    ("x-permitted-cross-domain-policies", "none"),
];

/// CORS for the browser front end.
///
/// A `*` entry allows any origin without credentials; otherwise only the
/// listed origins are allowed, with credentials.
pub fn cors_layer(origins: &[String]) -> CorsLayer {
    let base = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .max_age(CORS_MAX_AGE);

    if origins.iter().any(|o| o == "*") {
        return base
            .allow_origin(Any)
            .allow_headers(Any)
            .expose_headers(Any);
    }

    let allowed: Vec<HeaderValue> = origins.iter().filter_map(|o| o.parse().ok()).collect();
    base.allow_origin(AllowOrigin::list(allowed))
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT, header::ORIGIN])
        .expose_headers([header::CONTENT_LENGTH, header::CONTENT_TYPE])
        .allow_credentials(true)
}

/// Add hardening headers to every response.
pub async fn security_headers(request: Request<Body>, next: Next) -> Response<Body> {
    let mut response = next.run(request).await;
    let headers = response.headers_mut();
    for (name, value) in SECURITY_HEADERS {
        headers.insert(HeaderName::from_static(name), HeaderValue::from_static(value));
    }
    response
}

/// Tag the exchange with a correlation id and log its outcome.
///
/// An incoming `X-Request-ID` is reused, otherwise a fresh UUID is minted.
/// This id only correlates log lines; it is unrelated to the scratch
/// `request_id` returned by `/process-image/`.
pub async fn request_trace(mut request: Request<Body>, next: Next) -> Response<Body> {
    let correlation_id = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .map(str::to_owned)
        .unwrap_or_else(|| Uuid::new_v4().to_string());
    request.extensions_mut().insert(correlation_id.clone());

    let method = request.method().clone();
    let path = request.uri().path().to_owned();
    let span = info_span!("http", %method, %path, correlation_id = %correlation_id);
    let start = Instant::now();

    let mut response = next.run(request).instrument(span.clone()).await;

    if !PROBE_PATHS.contains(&path.as_str()) {
        span.in_scope(|| {
            info!(
                status = response.status().as_u16(),
                duration_ms = start.elapsed().as_millis() as u64,
                "Request completed"
            );
        });
    }

    if let Ok(value) = HeaderValue::from_str(&correlation_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    response
}

/// Rewrite error statuses to 200, keeping the `{error}` body.
///
/// Enabled by `LEGACY_ERROR_STATUS` for clients that only inspect the body.
pub async fn legacy_error_status(
    State(enabled): State<bool>,
    request: Request<Body>,
    next: Next,
) -> Response<Body> {
    let mut response = next.run(request).await;
    let status = response.status();
    if enabled && (status.is_client_error() || status.is_server_error()) {
        *response.status_mut() = StatusCode::OK;
    }
    response
}
