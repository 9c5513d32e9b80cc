//! Batch processing loop.

use std::path::{Path, PathBuf};
use std::time::Instant;

use tracing::{error, info, warn};

use odr_report::ReportBuilder;
use odr_vision::{open_image, save_image, ObjectDetector};

use crate::error::{BatchError, BatchResult};
use crate::scan::get_image_files;

/// Files written for one input image.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageOutcome {
    pub input: PathBuf,
    pub annotated: PathBuf,
    pub report: PathBuf,
    pub detections: usize,
    /// A report from an earlier input with the same stem was overwritten
    pub replaced_report: bool,
}

/// Result of a batch run.
#[derive(Debug, Default)]
pub struct BatchSummary {
    pub processed: Vec<ImageOutcome>,
    pub failed: Vec<(PathBuf, String)>,
}

impl BatchSummary {
    pub fn total(&self) -> usize {
        self.processed.len() + self.failed.len()
    }
}

/// Runs detection, annotation and reporting image by image.
pub struct BatchDriver {
    detector: ObjectDetector,
    reports: ReportBuilder,
}

impl BatchDriver {
    pub fn new(detector: ObjectDetector) -> Self {
        Self {
            detector,
            reports: ReportBuilder::default(),
        }
    }

    /// Process every image in `input`, writing results under `output`.
    ///
    /// A missing input directory is an error. A failure on one image is
    /// logged and recorded in the summary; the remaining images still run.
    pub fn run(&self, input: &Path, output: &Path) -> BatchResult<BatchSummary> {
        let files = get_image_files(input)?;
        info!(
            input = %input.display(),
            count = files.len(),
            "Found images to process"
        );

        let mut summary = BatchSummary::default();
        for path in files {
            match self.process_image(&path, output) {
                Ok(outcome) => summary.processed.push(outcome),
                Err(e) => {
                    error!(path = %path.display(), error = %e, "Failed to process image");
                    summary.failed.push((path, e.to_string()));
                }
            }
        }

        info!(
            processed = summary.processed.len(),
            failed = summary.failed.len(),
            "Batch processing finished"
        );
        Ok(summary)
    }

    /// Process a single image into `{output}/{stem}/`.
    pub fn process_image(&self, path: &Path, output: &Path) -> BatchResult<ImageOutcome> {
        let start = Instant::now();
        let (stem, extension) = split_name(path);
        let image_dir = create_output_directory(output, &stem)?;

        let annotated_path = image_dir.join(format!("{}_annotated{}", stem, extension));
        let report_path = image_dir.join(format!("{}_report.pdf", stem));
        let replaced_report = report_path.exists();
        if replaced_report {
            warn!(
                path = %path.display(),
                report = %report_path.display(),
                "Output directory already holds a report for this stem, overwriting"
            );
        }

        let image = open_image(path)?;
        let detections = self.detector.detect(&image)?;
        let annotated = self.detector.render(&image, &detections);
        save_image(&annotated, &annotated_path)?;

        if !self.reports.create(path, &annotated_path, &report_path)? {
            return Err(BatchError::ReportSkipped(path.to_path_buf()));
        }

        info!(
            path = %path.display(),
            detections = detections.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Image processed"
        );

        Ok(ImageOutcome {
            input: path.to_path_buf(),
            annotated: annotated_path,
            report: report_path,
            detections: detections.len(),
            replaced_report,
        })
    }
}

/// Create `{base}/{stem}` and return it.
pub fn create_output_directory(base: &Path, stem: &str) -> BatchResult<PathBuf> {
    let dir = base.join(stem);
    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}

/// File stem and dotted extension (empty when there is none).
fn split_name(path: &Path) -> (String, String) {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let extension = path
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();
    (stem, extension)
}
