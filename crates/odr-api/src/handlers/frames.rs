//! Live preview frame handler.

use axum::extract::{Multipart, Query, State};
use axum::extract::multipart::MultipartRejection;
use axum::extract::rejection::QueryRejection;
use axum::http::header;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;

use crate::error::{ApiError, ApiResult};
use crate::handlers::images::UPLOAD_FIELD;
use crate::services::pipeline;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct FrameQuery {
    /// Pre-detection downscale factor in (0, 1]
    pub scale: Option<f32>,
}

/// `POST /process-frame/`
///
/// Annotates a single camera frame and returns it as JPEG. Nothing is
/// written to disk.
pub async fn process_frame(
    State(state): State<AppState>,
    query: Result<Query<FrameQuery>, QueryRejection>,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<Response> {
    let Query(query) = query.map_err(|e| ApiError::bad_request(e.body_text()))?;
    let scale = match query.scale {
        None => 1.0,
        Some(s) if s > 0.0 && s <= 1.0 => s,
        Some(s) => return Err(ApiError::bad_request(format!("scale must be in (0, 1], got {s}"))),
    };

    let mut multipart = multipart.map_err(|e| ApiError::bad_request(e.body_text()))?;

    // Prefer the `file` field; otherwise take the first field that has data.
    let mut frame: Option<Vec<u8>> = None;
    while let Some(field) = multipart.next_field().await? {
        let is_file = field.name() == Some(UPLOAD_FIELD);
        let data = field.bytes().await?;
        if data.is_empty() {
            continue;
        }
        if is_file {
            frame = Some(data.to_vec());
            break;
        }
        frame.get_or_insert_with(|| data.to_vec());
    }

    let bytes = frame.ok_or_else(|| ApiError::bad_request("No frame in request"))?;
    let jpeg = pipeline::process_frame(&state, bytes, scale).await?;

    Ok(([(header::CONTENT_TYPE, "image/jpeg")], jpeg).into_response())
}
