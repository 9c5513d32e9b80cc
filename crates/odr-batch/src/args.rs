//! Command-line arguments.

use std::path::PathBuf;

use clap::Parser;

use odr_vision::config::{DEFAULT_CLASS_NAMES_FILE, DEFAULT_MODEL_FILE};
use odr_vision::DetectorConfig;

#[derive(Debug, Clone, Parser)]
#[command(name = "odr-batch")]
#[command(about = "Detect objects in a directory of images and write annotated copies and PDF reports")]
pub struct BatchArgs {
    /// Directory of input images
    #[arg(short, long, value_name = "DIR", default_value = "resources/images")]
    pub input: PathBuf,

    /// Directory receiving one sub-folder per image
    #[arg(short, long, value_name = "DIR", default_value = "resources/output")]
    pub output: PathBuf,

    /// Directory holding the model and class-names files
    #[arg(long, value_name = "DIR", env = "MODELS_DIR", default_value = "models")]
    pub models_dir: PathBuf,

    /// ONNX model file inside the models directory
    #[arg(long, env = "MODEL_FILE", default_value = DEFAULT_MODEL_FILE)]
    pub model_file: String,

    /// Class-names file inside the models directory
    #[arg(long, env = "CLASS_NAMES_FILE", default_value = DEFAULT_CLASS_NAMES_FILE)]
    pub class_names_file: String,

    /// Minimum class score for a detection (exclusive)
    #[arg(long, default_value_t = 0.5)]
    pub confidence: f32,

    /// IoU above which overlapping boxes are suppressed
    #[arg(long, default_value_t = 0.4)]
    pub nms_threshold: f32,

    /// Square network input size
    #[arg(long, default_value_t = 416)]
    pub input_size: u32,
}

impl BatchArgs {
    /// Detector settings for these arguments.
    pub fn detector_config(&self) -> DetectorConfig {
        DetectorConfig {
            input_size: self.input_size,
            confidence_threshold: self.confidence,
            score_threshold: self.confidence,
            nms_threshold: self.nms_threshold,
            ..DetectorConfig::with_files(&self.models_dir, &self.model_file, &self.class_names_file)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_detector_defaults() {
        let args = BatchArgs::parse_from(["odr-batch"]);
        assert_eq!(args.input, PathBuf::from("resources/images"));
        assert_eq!(args.output, PathBuf::from("resources/output"));

        let from_args = args.detector_config();
        let defaults = DetectorConfig::from_models_dir(&args.models_dir);
        assert_eq!(from_args.input_size, defaults.input_size);
        assert_eq!(from_args.confidence_threshold, defaults.confidence_threshold);
        assert_eq!(from_args.nms_threshold, defaults.nms_threshold);
    }

    #[test]
    fn test_overrides() {
        let args = BatchArgs::parse_from([
            "odr-batch",
            "--input",
            "in",
            "-o",
            "out",
            "--confidence",
            "0.3",
            "--model-file",
            "tiny.onnx",
        ]);
        assert_eq!(args.input, PathBuf::from("in"));
        assert_eq!(args.output, PathBuf::from("out"));
        let config = args.detector_config();
        assert!((config.confidence_threshold - 0.3).abs() < 1e-6);
        assert!(config.model_path.ends_with("tiny.onnx"));
    }
}
