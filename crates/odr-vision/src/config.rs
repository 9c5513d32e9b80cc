//! Detector configuration.

use std::path::{Path, PathBuf};

/// Default network file inside the models directory.
pub const DEFAULT_MODEL_FILE: &str = "yolov3.onnx";

/// Default class-names file inside the models directory.
pub const DEFAULT_CLASS_NAMES_FILE: &str = "coco.names";

/// Configuration for object detection.
#[derive(Debug, Clone, PartialEq)]
pub struct DetectorConfig {
    /// Path to ONNX model file (weights and topology)
    pub model_path: PathBuf,
    /// Path to class-names file, one name per line
    pub labels_path: PathBuf,
    /// Square network input resolution
    pub input_size: u32,
    /// Minimum argmax class score for a candidate (exclusive)
    pub confidence_threshold: f32,
    /// Score prefilter applied by NMS (exclusive)
    pub score_threshold: f32,
    /// IoU above which a lower-scored box is suppressed
    pub nms_threshold: f32,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self::from_models_dir("models")
    }
}

impl DetectorConfig {
    /// Build a config that loads the default model files from `dir`.
    pub fn from_models_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            model_path: dir.join(DEFAULT_MODEL_FILE),
            labels_path: dir.join(DEFAULT_CLASS_NAMES_FILE),
            input_size: 416,
            confidence_threshold: 0.5,
            score_threshold: 0.5,
            nms_threshold: 0.4,
        }
    }

    /// Override the model and class-names file names inside `dir`.
    pub fn with_files(
        dir: impl AsRef<Path>,
        model_file: impl AsRef<Path>,
        class_names_file: impl AsRef<Path>,
    ) -> Self {
        let dir = dir.as_ref();
        Self {
            model_path: dir.join(model_file),
            labels_path: dir.join(class_names_file),
            ..Self::from_models_dir(dir)
        }
    }
}
