//! Download and cleanup handlers.

use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::Response;
use axum::Json;
use tracing::info;

use odr_models::{CleanupResponse, RequestId};
use odr_storage::StorageError;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

const FILE_NOT_FOUND: &str = "File not found";

/// Content type by file extension.
pub fn content_type_for(filename: &str) -> &'static str {
    let lower = filename.to_lowercase();
    match lower.rsplit('.').next() {
        Some("pdf") => "application/pdf",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("bmp") => "image/bmp",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("tif") | Some("tiff") => "image/tiff",
        _ => "application/octet-stream",
    }
}

/// `GET /download/:request_id/:filename`
pub async fn download_file(
    State(state): State<AppState>,
    Path((request_id, filename)): Path<(String, String)>,
) -> ApiResult<Response> {
    let request_id: RequestId = request_id
        .parse()
        .map_err(|_| ApiError::not_found(FILE_NOT_FOUND))?;

    let bytes = state
        .scratch
        .read(&request_id, &filename)
        .await
        .map_err(|e| match e {
            StorageError::NotFound(_) | StorageError::InvalidFilename(_) => {
                ApiError::not_found(FILE_NOT_FOUND)
            }
            other => ApiError::Storage(other),
        })?;

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type_for(&filename))
        .header(header::CONTENT_LENGTH, bytes.len())
        .body(Body::from(bytes))
        .map_err(|e| ApiError::internal(format!("Failed to build response: {}", e)))
}

/// `DELETE /cleanup/:request_id`
///
/// Always reports `cleaned`; unknown or already removed ids are not errors.
pub async fn cleanup(
    State(state): State<AppState>,
    Path(request_id): Path<String>,
) -> ApiResult<Json<CleanupResponse>> {
    if let Ok(request_id) = request_id.parse::<RequestId>() {
        let removed = state.scratch.cleanup(&request_id).await?;
        info!(request_id = %request_id, removed, "Cleanup requested");
    }
    Ok(Json(CleanupResponse::cleaned()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_type_for() {
        assert_eq!(content_type_for("test.jpg_report.pdf"), "application/pdf");
        assert_eq!(content_type_for("annotated_a.JPG"), "image/jpeg");
        assert_eq!(content_type_for("x.png"), "image/png");
        assert_eq!(content_type_for("noext"), "application/octet-stream");
    }
}
