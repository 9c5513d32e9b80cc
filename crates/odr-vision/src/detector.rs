//! Object detector.
//!
//! Owns the loaded network, the class label list and the annotation font. One
//! instance is built at process start and shared read-only by every request.

use std::time::Instant;

use image::RgbImage;
use ndarray::Array2;
use tracing::debug;

use odr_models::{BoundingBox, Detection};

use crate::backend::{InferenceBackend, OrtBackend, BOX_COLUMNS};
use crate::config::DetectorConfig;
use crate::error::{VisionError, VisionResult};
use crate::labels::LabelList;
use crate::nms::non_maximum_suppression;
use crate::preprocess::to_blob;
use crate::render::Annotator;

/// Detector over a square-input network with darknet-style output rows.
pub struct ObjectDetector {
    backend: Box<dyn InferenceBackend>,
    labels: LabelList,
    config: DetectorConfig,
    annotator: Annotator,
}

impl ObjectDetector {
    /// Load the ONNX model and class names named by `config`.
    pub fn from_config(config: DetectorConfig) -> VisionResult<Self> {
        let labels = LabelList::from_file(&config.labels_path)?;
        let backend = OrtBackend::new(&config.model_path)?;
        debug!(
            classes = labels.len(),
            input_size = config.input_size,
            "Object detector initialized"
        );
        Ok(Self::with_backend(Box::new(backend), labels, config))
    }

    /// Build a detector around an already constructed backend.
    pub fn with_backend(
        backend: Box<dyn InferenceBackend>,
        labels: LabelList,
        config: DetectorConfig,
    ) -> Self {
        Self {
            backend,
            labels,
            config,
            annotator: Annotator::default(),
        }
    }

    /// Detect objects in an image.
    ///
    /// Returned boxes are in pixel coordinates of `image`, clamped to its
    /// extent. No surviving detection is an empty vector, not an error.
    pub fn detect(&self, image: &RgbImage) -> VisionResult<Vec<Detection>> {
        let start = Instant::now();
        let (width, height) = image.dimensions();

        // 1. Preprocess: resize to input_size, normalize to [0,1], NCHW format
        let blob = to_blob(image, self.config.input_size);

        // 2. Run inference
        let layers = self.backend.forward(blob)?;

        // 3. Decode confident rows straight into original-image pixels
        let candidates = self.decode(&layers, width, height)?;
        let candidate_count = candidates.len();

        // 4. Suppress overlapping boxes
        let detections = non_maximum_suppression(
            candidates,
            self.config.score_threshold,
            self.config.nms_threshold,
        );

        debug!(
            backend = self.backend.name(),
            candidates = candidate_count,
            count = detections.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Object detection completed"
        );

        Ok(detections)
    }

    /// Draw boxes and label tags on a copy of `image`.
    ///
    /// # Panics
    /// If a detection's `class_id` is outside the label list.
    pub fn render(&self, image: &RgbImage, detections: &[Detection]) -> RgbImage {
        self.annotator.render(image, detections, &self.labels)
    }

    /// Decode raw rows into candidates.
    ///
    /// Each row is `[cx, cy, w, h, objectness, scores...]`; box values are
    /// relative to the network input, which maps onto the whole original
    /// image, so multiplying by the original size decodes and rescales at once.
    fn decode(
        &self,
        layers: &[Array2<f32>],
        width: u32,
        height: u32,
    ) -> VisionResult<Vec<Detection>> {
        let expected_cols = BOX_COLUMNS + self.labels.len();
        let (w_f, h_f) = (width as f32, height as f32);
        let mut candidates = Vec::new();

        for layer in layers {
            if layer.ncols() != expected_cols {
                return Err(VisionError::model_mismatch(format!(
                    "output rows have {} columns, expected {} for {} classes",
                    layer.ncols(),
                    expected_cols,
                    self.labels.len()
                )));
            }

            for row in layer.rows() {
                let mut best_class = 0;
                let mut best_score = f32::MIN;
                for (c, &score) in row.iter().skip(BOX_COLUMNS).enumerate() {
                    if score > best_score {
                        best_score = score;
                        best_class = c;
                    }
                }

                if !(best_score > self.config.confidence_threshold) {
                    continue;
                }

                let center_x = row[0] * w_f;
                let center_y = row[1] * h_f;
                let box_w = row[2] * w_f;
                let box_h = row[3] * h_f;

                // NaN or infinite box values cannot be placed on the image
                if ![center_x, center_y, box_w, box_h].iter().all(|v| v.is_finite()) {
                    continue;
                }

                let bbox = BoundingBox::from_xywh(
                    center_x - box_w / 2.0,
                    center_y - box_h / 2.0,
                    box_w,
                    box_h,
                )
                .clamped(w_f, h_f);
                debug_assert!(bbox.is_within(w_f, h_f), "{:?}", bbox);

                candidates.push(Detection::new(bbox, best_class, best_score.min(1.0)));
            }
        }

        Ok(candidates)
    }

    pub fn labels(&self) -> &LabelList {
        &self.labels
    }

    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }
}
