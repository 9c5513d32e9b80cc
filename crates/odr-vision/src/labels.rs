//! Class label list.

use std::ops::Index;
use std::path::Path;

use crate::error::{VisionError, VisionResult};

/// COCO class names (80 classes).
pub const COCO_CLASSES: &[&str] = &[
    "person", "bicycle", "car", "motorcycle", "airplane", "bus", "train", "truck",
    "boat", "traffic light", "fire hydrant", "stop sign", "parking meter", "bench",
    "bird", "cat", "dog", "horse", "sheep", "cow", "elephant", "bear", "zebra",
    "giraffe", "backpack", "umbrella", "handbag", "tie", "suitcase", "frisbee",
    "skis", "snowboard", "sports ball", "kite", "baseball bat", "baseball glove",
    "skateboard", "surfboard", "tennis racket", "bottle", "wine glass", "cup",
    "fork", "knife", "spoon", "bowl", "banana", "apple", "sandwich", "orange",
    "broccoli", "carrot", "hot dog", "pizza", "donut", "cake", "chair", "couch",
    "potted plant", "bed", "dining table", "toilet", "tv", "laptop", "mouse",
    "remote", "keyboard", "cell phone", "microwave", "oven", "toaster", "sink",
    "refrigerator", "book", "clock", "vase", "scissors", "teddy bear", "hair drier",
    "toothbrush",
];

/// Ordered class names, addressed by class id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelList {
    names: Vec<String>,
}

impl LabelList {
    /// Create from an explicit list of names.
    pub fn new<S: Into<String>>(names: impl IntoIterator<Item = S>) -> VisionResult<Self> {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        if names.is_empty() {
            return Err(VisionError::InvalidLabels("label list is empty".to_string()));
        }
        Ok(Self { names })
    }

    /// Parse a class-names file body: one name per line, surrounding
    /// whitespace stripped. Trailing blank lines are ignored.
    pub fn parse(text: &str) -> VisionResult<Self> {
        let mut names: Vec<String> = text.lines().map(|l| l.trim().to_string()).collect();
        while names.last().is_some_and(|n| n.is_empty()) {
            names.pop();
        }
        Self::new(names)
    }

    /// Load a class-names file.
    pub fn from_file(path: impl AsRef<Path>) -> VisionResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(VisionError::FileNotFound(path.to_path_buf()));
        }
        let text = std::fs::read_to_string(path)?;
        Self::parse(&text)
    }

    /// The 80 COCO classes.
    pub fn coco() -> Self {
        Self {
            names: COCO_CLASSES.iter().map(|s| s.to_string()).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl Index<usize> for LabelList {
    type Output = str;

    fn index(&self, class_id: usize) -> &str {
        &self.names[class_id]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coco_classes() {
        let labels = LabelList::coco();
        assert_eq!(labels.len(), 80);
        assert_eq!(&labels[0], "person");
        assert_eq!(&labels[2], "car");
    }

    #[test]
    fn test_parse_strips_whitespace_and_trailing_blanks() {
        let labels = LabelList::parse("person\r\n bicycle \ncar\n\n\n").unwrap();
        assert_eq!(labels.len(), 3);
        assert_eq!(&labels[0], "person");
        assert_eq!(&labels[1], "bicycle");
        assert_eq!(&labels[2], "car");
    }

    #[test]
    fn test_parse_empty_is_error() {
        assert!(matches!(LabelList::parse("\n\n"), Err(VisionError::InvalidLabels(_))));
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("coco.names");
        std::fs::write(&path, COCO_CLASSES.join("\n")).unwrap();

        let labels = LabelList::from_file(&path).unwrap();
        assert_eq!(labels, LabelList::coco());
    }

    #[test]
    fn test_from_missing_file() {
        let err = LabelList::from_file("/nonexistent/coco.names").unwrap_err();
        assert!(matches!(err, VisionError::FileNotFound(_)));
    }

    #[test]
    #[should_panic]
    fn test_index_out_of_range_panics() {
        let labels = LabelList::new(["a", "b"]).unwrap();
        let _ = &labels[2];
    }
}
