//! Image decode/encode helpers shared by the HTTP and batch front ends.

use std::io::Cursor;
use std::path::Path;

use image::codecs::jpeg::JpegEncoder;
use image::io::Reader as ImageReader;
use image::{ImageFormat, RgbImage};
use tracing::{debug, warn};

use crate::error::{VisionError, VisionResult};

/// JPEG quality used for live-preview frames.
pub const JPEG_PREVIEW_QUALITY: u8 = 75;

/// Decode uploaded bytes into an RGB buffer.
pub fn decode_image(bytes: &[u8]) -> VisionResult<RgbImage> {
    let image = image::load_from_memory(bytes).map_err(|e| VisionError::decode(e.to_string()))?;
    let rgb = image.to_rgb8();
    if rgb.width() == 0 || rgb.height() == 0 {
        return Err(VisionError::decode("image has zero dimensions"));
    }
    Ok(rgb)
}

/// Encode an RGB buffer as JPEG.
pub fn encode_jpeg(image: &RgbImage, quality: u8) -> VisionResult<Vec<u8>> {
    let mut buffer = Cursor::new(Vec::new());
    JpegEncoder::new_with_quality(&mut buffer, quality)
        .encode_image(image)
        .map_err(|e| VisionError::encode(e.to_string()))?;
    Ok(buffer.into_inner())
}

/// Open an image file, detecting the format from its content rather than
/// trusting the extension.
pub fn open_image(path: impl AsRef<Path>) -> VisionResult<RgbImage> {
    let reader = ImageReader::open(path.as_ref())?.with_guessed_format()?;
    let image = reader.decode().map_err(|e| VisionError::decode(e.to_string()))?;
    Ok(image.to_rgb8())
}

/// Check if the file at `path` can be opened and decoded as an image.
pub fn is_valid_image(path: impl AsRef<Path>) -> bool {
    open_image(path).is_ok()
}

/// Save an image, creating parent directories as needed.
///
/// The format follows the file extension; unknown extensions fall back to PNG.
pub fn save_image(image: &RgbImage, path: impl AsRef<Path>) -> VisionResult<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let format = ImageFormat::from_path(path).unwrap_or_else(|_| {
        warn!(path = %path.display(), "Unknown image extension, writing PNG");
        ImageFormat::Png
    });

    image
        .save_with_format(path, format)
        .map_err(|e| match e {
            image::ImageError::IoError(io) => VisionError::Io(io),
            other => VisionError::encode(other.to_string()),
        })?;

    debug!(path = %path.display(), "Saved image");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn test_jpeg_roundtrip_dimensions() {
        let image = RgbImage::from_pixel(64, 48, Rgb([10, 200, 30]));
        let bytes = encode_jpeg(&image, JPEG_PREVIEW_QUALITY).unwrap();
        assert_eq!(&bytes[..2], &[0xFF, 0xD8]);

        let decoded = decode_image(&bytes).unwrap();
        assert_eq!(decoded.dimensions(), (64, 48));
    }

    #[test]
    fn test_decode_garbage_is_decode_error() {
        let err = decode_image(b"definitely not an image").unwrap_err();
        assert!(matches!(err, VisionError::Decode(_)));
    }

    #[test]
    fn test_save_image_creates_parents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/deeper/out.png");
        let image = RgbImage::from_pixel(8, 8, Rgb([1, 2, 3]));

        save_image(&image, &path).unwrap();
        assert!(path.exists());
        assert!(is_valid_image(&path));
    }

    #[test]
    fn test_is_valid_image_rejects_text_and_missing_files() {
        let dir = tempfile::tempdir().unwrap();
        let text = dir.path().join("invalid.txt");
        std::fs::write(&text, "hello").unwrap();

        assert!(!is_valid_image(&text));
        assert!(!is_valid_image(dir.path().join("nonexistent.jpg")));
    }

    #[test]
    fn test_open_image_ignores_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("frame.jpg");
        RgbImage::from_pixel(5, 7, Rgb([9, 9, 9]))
            .save_with_format(&path, ImageFormat::Png)
            .unwrap();

        assert_eq!(open_image(&path).unwrap().dimensions(), (5, 7));
    }
}
