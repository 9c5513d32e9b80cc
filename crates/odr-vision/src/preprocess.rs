//! Blob preprocessing.

use image::imageops::{self, FilterType};
use image::RgbImage;
use ndarray::Array4;

/// Fixed scale that maps 8-bit pixel values into [0, 1].
pub const PIXEL_SCALE: f32 = 1.0 / 255.0;

/// Preprocess an image for a square-input detection network.
///
/// - Stretch-resize to `input_size` x `input_size` (no letterbox padding)
/// - Normalize pixel values to [0, 1]
/// - Convert to NCHW format (batch, channels, height, width), RGB order
pub fn to_blob(image: &RgbImage, input_size: u32) -> Array4<f32> {
    let resized = imageops::resize(image, input_size, input_size, FilterType::Triangle);
    let size = input_size as usize;

    let mut blob = Array4::<f32>::zeros((1, 3, size, size));
    for (x, y, pixel) in resized.enumerate_pixels() {
        for c in 0..3 {
            blob[[0, c, y as usize, x as usize]] = pixel[c] as f32 * PIXEL_SCALE;
        }
    }
    blob
}
