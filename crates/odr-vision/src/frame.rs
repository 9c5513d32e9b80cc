//! Live-preview frame helpers.
//!
//! Frames may be detected at a reduced resolution to save inference time.
//! Boxes found on the small copy are mapped back by `1/scale` and clamped to
//! the full frame before rendering.

use image::imageops::{self, FilterType};
use image::RgbImage;

use odr_models::Detection;

use crate::detector::ObjectDetector;
use crate::error::VisionResult;

/// Downscale a frame by `scale` in (0, 1]. Other values return a copy.
pub fn downscale(image: &RgbImage, scale: f32) -> RgbImage {
    if !(scale > 0.0 && scale < 1.0) {
        return image.clone();
    }
    let width = ((image.width() as f32 * scale).round() as u32).max(1);
    let height = ((image.height() as f32 * scale).round() as u32).max(1);
    imageops::resize(image, width, height, FilterType::Triangle)
}

/// Detect on a downscaled copy of `image`, returning boxes in full-frame
/// coordinates.
pub fn detect_downscaled(
    detector: &ObjectDetector,
    image: &RgbImage,
    scale: f32,
) -> VisionResult<Vec<Detection>> {
    let small = downscale(image, scale);
    if small.dimensions() == image.dimensions() {
        return detector.detect(image);
    }

    let (w, h) = (image.width() as f32, image.height() as f32);
    Ok(detector
        .detect(&small)?
        .into_iter()
        .map(|d| {
            let full = d.rescaled(scale);
            Detection {
                bbox: full.bbox.clamped(w, h),
                ..full
            }
        })
        .collect())
}
