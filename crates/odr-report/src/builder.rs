//! Report builder.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use image::codecs::jpeg::JpegEncoder;
use image::io::Reader as ImageReader;
use image::RgbImage;
use printpdf::image_crate::codecs::jpeg::JpegDecoder;
use printpdf::{
    BuiltinFont, Image, ImageTransform, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference,
    PdfLayerReference,
};
use tempfile::{NamedTempFile, TempDir};
use tracing::{debug, info, warn};

use crate::error::{ReportError, ReportResult};
use crate::layout::{
    centered_title_x, image_bottom_pdf_y, image_dpi, to_pdf_y, IMAGE_X_MM, PAGE_HEIGHT_MM,
    PAGE_WIDTH_MM, TITLE_BASELINE_MM, TITLE_FONT_SIZE,
};

const ORIGINAL_TITLE: &str = "Original Image";
const ANNOTATED_TITLE: &str = "Annotated Image";
const LAYER_NAME: &str = "Layer 1";
const EMBED_JPEG_QUALITY: u8 = 90;

/// Builds the two-page original/annotated PDF.
#[derive(Debug, Clone)]
pub struct ReportBuilder {
    title: String,
}

impl Default for ReportBuilder {
    fn default() -> Self {
        Self::new("Object Detection Report")
    }
}

impl ReportBuilder {
    /// Create a builder; `title` goes into the PDF metadata.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
        }
    }

    /// Write a report for `original` and `annotated` to `output`.
    ///
    /// Returns `Ok(false)` without touching `output` when either input is
    /// missing or cannot be decoded. The document is written to a temporary
    /// file next to `output` and moved into place once complete.
    pub fn create(
        &self,
        original: impl AsRef<Path>,
        annotated: impl AsRef<Path>,
        output: impl AsRef<Path>,
    ) -> ReportResult<bool> {
        let (original, annotated, output) = (original.as_ref(), annotated.as_ref(), output.as_ref());

        let Some(original_image) = load_input(original) else {
            return Ok(false);
        };
        let Some(annotated_image) = load_input(annotated) else {
            return Ok(false);
        };

        // Re-encoded JPEG copies live only for the duration of this call
        let scratch = TempDir::new()?;
        let pages = [
            (ORIGINAL_TITLE, write_jpeg(&original_image, scratch.path(), "original.jpg")?),
            (ANNOTATED_TITLE, write_jpeg(&annotated_image, scratch.path(), "annotated.jpg")?),
        ];

        let doc = self.build_document(&pages)?;

        let output_dir = match output.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(output_dir)?;

        let mut staged = NamedTempFile::new_in(output_dir)?;
        {
            let mut writer = BufWriter::new(staged.as_file_mut());
            doc.save(&mut writer)
                .map_err(|e| ReportError::pdf(e.to_string()))?;
            writer.flush()?;
        }
        staged.persist(output)?;

        info!(output = %output.display(), "PDF report created");
        Ok(true)
    }

    fn build_document(&self, pages: &[(&str, PathBuf)]) -> ReportResult<PdfDocumentReference> {
        let (doc, first_page, first_layer) =
            PdfDocument::new(&self.title, Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), LAYER_NAME);
        let font = doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(|e| ReportError::pdf(e.to_string()))?;

        for (index, (title, jpeg_path)) in pages.iter().enumerate() {
            let layer = if index == 0 {
                doc.get_page(first_page).get_layer(first_layer)
            } else {
                let (page, layer) = doc.add_page(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), LAYER_NAME);
                doc.get_page(page).get_layer(layer)
            };
            write_page(&layer, &font, title, jpeg_path)?;
        }

        Ok(doc)
    }
}

fn write_page(
    layer: &PdfLayerReference,
    font: &IndirectFontRef,
    title: &str,
    jpeg_path: &Path,
) -> ReportResult<()> {
    layer.use_text(
        title,
        TITLE_FONT_SIZE,
        Mm(centered_title_x(title, TITLE_FONT_SIZE)),
        Mm(to_pdf_y(TITLE_BASELINE_MM)),
        font,
    );

    let reader = BufReader::new(File::open(jpeg_path)?);
    let decoder = JpegDecoder::new(reader).map_err(|e| ReportError::image(e.to_string()))?;
    let image = Image::try_from(decoder).map_err(|e| ReportError::image(e.to_string()))?;

    let (width_px, height_px) = (image.image.width.0 as u32, image.image.height.0 as u32);
    image.add_to_layer(
        layer.clone(),
        ImageTransform {
            translate_x: Some(Mm(IMAGE_X_MM)),
            translate_y: Some(Mm(image_bottom_pdf_y(width_px, height_px))),
            dpi: Some(image_dpi(width_px)),
            ..Default::default()
        },
    );

    debug!(title, width_px, height_px, "Report page written");
    Ok(())
}

/// Open an input image, logging and returning `None` when unusable.
fn load_input(path: &Path) -> Option<RgbImage> {
    if !path.exists() {
        warn!(path = %path.display(), "Report input not found");
        return None;
    }
    let decoded = ImageReader::open(path)
        .and_then(|reader| reader.with_guessed_format())
        .map_err(image::ImageError::IoError)
        .and_then(|reader| reader.decode());
    match decoded {
        Ok(image) => Some(image.to_rgb8()),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Report input could not be decoded");
            None
        }
    }
}

fn write_jpeg(image: &RgbImage, dir: &Path, name: &str) -> ReportResult<PathBuf> {
    let path = dir.join(name);
    let mut writer = BufWriter::new(File::create(&path)?);
    JpegEncoder::new_with_quality(&mut writer, EMBED_JPEG_QUALITY)
        .encode_image(image)
        .map_err(|e| ReportError::image(e.to_string()))?;
    writer.flush()?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    fn write_png(dir: &Path, name: &str, w: u32, h: u32) -> PathBuf {
        let path = dir.join(name);
        RgbImage::from_pixel(w, h, Rgb([200, 30, 30])).save(&path).unwrap();
        path
    }

    #[test]
    fn test_create_two_page_report() {
        let dir = tempfile::tempdir().unwrap();
        let original = write_png(dir.path(), "test.png", 640, 480);
        let annotated = write_png(dir.path(), "annotated_test.png", 640, 480);
        let output = dir.path().join("test.png_report.pdf");

        let created = ReportBuilder::default().create(&original, &annotated, &output).unwrap();
        assert!(created);

        let pdf = lopdf::Document::load(&output).unwrap();
        assert_eq!(pdf.get_pages().len(), 2);
    }

    #[test]
    fn test_create_creates_output_directory() {
        let dir = tempfile::tempdir().unwrap();
        let original = write_png(dir.path(), "a.png", 32, 64);
        let output = dir.path().join("out/nested/a_report.pdf");

        assert!(ReportBuilder::default().create(&original, &original, &output).unwrap());
        assert!(output.exists());
    }

    #[test]
    fn test_missing_original_returns_false() {
        let dir = tempfile::tempdir().unwrap();
        let annotated = write_png(dir.path(), "annotated.png", 16, 16);
        let output = dir.path().join("report.pdf");

        let created = ReportBuilder::default()
            .create(dir.path().join("missing.png"), &annotated, &output)
            .unwrap();
        assert!(!created);
        assert!(!output.exists());
    }

    #[test]
    fn test_undecodable_annotated_returns_false() {
        let dir = tempfile::tempdir().unwrap();
        let original = write_png(dir.path(), "original.png", 16, 16);
        let broken = dir.path().join("broken.png");
        std::fs::write(&broken, b"not a png").unwrap();
        let output = dir.path().join("report.pdf");

        assert!(!ReportBuilder::default().create(&original, &broken, &output).unwrap());
        assert!(!output.exists());
    }

    #[test]
    fn test_no_stray_files_left_next_to_output() {
        let dir = tempfile::tempdir().unwrap();
        let original = write_png(dir.path(), "x.png", 20, 10);
        let output = dir.path().join("x_report.pdf");
        ReportBuilder::default().create(&original, &original, &output).unwrap();

        let mut names: Vec<String> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        assert_eq!(names, vec!["x.png", "x_report.pdf"]);
    }
}
