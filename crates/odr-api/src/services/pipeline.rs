//! Detection pipelines behind the HTTP handlers.
//!
//! Both pipelines run the CPU-heavy part on the blocking pool after taking an
//! inference permit, so at most `max_concurrent_inference` detections are in
//! flight at once.

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use tracing::{info, warn};

use odr_models::{ProcessImageResponse, RequestId};
use odr_report::ReportBuilder;
use odr_vision::{
    decode_image, detect_downscaled, encode_jpeg, save_image, ObjectDetector,
    JPEG_PREVIEW_QUALITY,
};

use crate::error::{ApiError, ApiResult};
use crate::metrics;
use crate::state::AppState;

/// Name of the annotated copy of an upload.
pub fn annotated_filename(filename: &str) -> String {
    format!("annotated_{}", filename)
}

/// Name of the PDF report for an upload.
pub fn report_filename(filename: &str) -> String {
    format!("{}_report.pdf", filename)
}

/// Store an upload, detect, annotate and build its report.
///
/// On any failure the request's scratch directory is removed again.
pub async fn process_upload(
    state: &AppState,
    filename: String,
    bytes: Vec<u8>,
) -> ApiResult<ProcessImageResponse> {
    let request_id = RequestId::new();
    let dir = state.scratch.create(&request_id).await?;

    match run_upload(state, &request_id, &dir, &filename, bytes).await {
        Ok(response) => Ok(response),
        Err(e) => {
            if let Err(cleanup_err) = state.scratch.cleanup(&request_id).await {
                warn!(
                    request_id = %request_id,
                    error = %cleanup_err,
                    "Failed to remove scratch directory after error"
                );
            }
            Err(e)
        }
    }
}

async fn run_upload(
    state: &AppState,
    request_id: &RequestId,
    dir: &Path,
    filename: &str,
    bytes: Vec<u8>,
) -> ApiResult<ProcessImageResponse> {
    let original_path = state.scratch.write(request_id, filename, &bytes).await?;

    let annotated_name = annotated_filename(filename);
    let pdf_name = report_filename(filename);
    let annotated_path = dir.join(&annotated_name);
    let pdf_path = dir.join(&pdf_name);

    let _permit = state
        .inference_permits
        .acquire()
        .await
        .map_err(|_| ApiError::internal("Inference pool closed"))?;

    let detector = Arc::clone(&state.detector);
    let reports = state.reports.clone();
    let start = Instant::now();

    let detections = tokio::task::spawn_blocking(move || -> ApiResult<usize> {
        let image = decode_image(&bytes)?;
        let detections = detector.detect(&image)?;
        let annotated = detector.render(&image, &detections);
        save_image(&annotated, &annotated_path)?;

        build_report(&reports, &original_path, &annotated_path, &pdf_path)?;
        Ok(detections.len())
    })
    .await
    .map_err(|e| ApiError::internal(format!("Processing task failed: {}", e)))??;

    metrics::record_inference("image", start.elapsed().as_secs_f64(), detections);
    metrics::record_report_generated();

    info!(
        request_id = %request_id,
        filename = %filename,
        detections,
        duration_ms = start.elapsed().as_millis() as u64,
        "Image processed"
    );

    Ok(ProcessImageResponse {
        request_id: request_id.to_string(),
        filename: filename.to_string(),
        annotated_filename: annotated_name,
        pdf_filename: pdf_name,
    })
}

fn build_report(
    reports: &ReportBuilder,
    original: &Path,
    annotated: &Path,
    output: &Path,
) -> ApiResult<()> {
    if reports.create(original, annotated, output)? {
        Ok(())
    } else {
        Err(ApiError::processing("Failed to generate PDF report"))
    }
}

/// Detect and annotate one preview frame, returning JPEG bytes.
///
/// With `scale` in (0, 1) detection runs on a downscaled copy; boxes are
/// mapped back and drawn on the full-resolution frame.
pub async fn process_frame(state: &AppState, bytes: Vec<u8>, scale: f32) -> ApiResult<Vec<u8>> {
    let _permit = state
        .inference_permits
        .acquire()
        .await
        .map_err(|_| ApiError::internal("Inference pool closed"))?;

    let detector: Arc<ObjectDetector> = Arc::clone(&state.detector);
    let start = Instant::now();

    let (jpeg, detections) = tokio::task::spawn_blocking(move || -> ApiResult<(Vec<u8>, usize)> {
        let frame = decode_image(&bytes)?;
        let detections = detect_downscaled(&detector, &frame, scale)?;
        let annotated = detector.render(&frame, &detections);
        Ok((encode_jpeg(&annotated, JPEG_PREVIEW_QUALITY)?, detections.len()))
    })
    .await
    .map_err(|e| ApiError::internal(format!("Frame task failed: {}", e)))??;

    metrics::record_inference("frame", start.elapsed().as_secs_f64(), detections);
    metrics::record_frame_processed();

    Ok(jpeg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_filenames() {
        assert_eq!(annotated_filename("test.jpg"), "annotated_test.jpg");
        assert_eq!(report_filename("test.jpg"), "test.jpg_report.pdf");
    }
}
