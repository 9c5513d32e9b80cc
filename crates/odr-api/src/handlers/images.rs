//! Still image upload handler.

use axum::extract::{Multipart, State};
use axum::extract::multipart::MultipartRejection;
use axum::Json;
use tracing::debug;

use odr_models::ProcessImageResponse;
use odr_storage::sanitize_upload_filename;

use crate::error::{ApiError, ApiResult};
use crate::services::pipeline;
use crate::state::AppState;

/// Multipart field carrying the uploaded file.
pub const UPLOAD_FIELD: &str = "file";

/// `POST /process-image/`
///
/// Detects objects in the uploaded image and stores the original, an
/// annotated copy and a two-page PDF report under a fresh request id.
pub async fn process_image(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<Json<ProcessImageResponse>> {
    let mut multipart = multipart.map_err(|e| ApiError::bad_request(e.body_text()))?;
    let mut upload = None;

    while let Some(field) = multipart.next_field().await? {
        if field.name() == Some(UPLOAD_FIELD) {
            let filename = sanitize_upload_filename(field.file_name());
            let data = field.bytes().await?;
            upload = Some((filename, data.to_vec()));
            break;
        }
    }

    let (filename, bytes) =
        upload.ok_or_else(|| ApiError::bad_request("No file field in request"))?;
    if bytes.is_empty() {
        return Err(ApiError::bad_request("Uploaded file is empty"));
    }

    debug!(filename = %filename, size = bytes.len(), "Received image upload");

    let response = pipeline::process_upload(&state, filename, bytes).await?;
    Ok(Json(response))
}
