//! Object detection and annotation.
//!
//! This crate provides:
//! - A pluggable inference backend with an ONNX Runtime implementation
//! - Blob preprocessing for square-input detection networks
//! - Box decoding, confidence filtering and class-agnostic NMS
//! - Annotation rendering (box outlines plus label tags)
//! - Helpers for the downscaled live-preview frame path

pub mod backend;
pub mod codec;
pub mod config;
pub mod detector;
pub mod error;
pub mod frame;
pub mod labels;
pub mod nms;
pub mod preprocess;
pub mod render;

pub use backend::{InferenceBackend, OrtBackend};
pub use codec::{
    decode_image, encode_jpeg, is_valid_image, open_image, save_image, JPEG_PREVIEW_QUALITY,
};
pub use config::DetectorConfig;
pub use detector::ObjectDetector;
pub use error::{VisionError, VisionResult};
pub use frame::{detect_downscaled, downscale};
pub use labels::{LabelList, COCO_CLASSES};
pub use nms::non_maximum_suppression;
pub use render::{Annotator, LabelTag};

pub use odr_models::{BoundingBox, Detection};
