//! Detection models.

use serde::{Deserialize, Serialize};

/// Axis-aligned box in pixel coordinates of the original image.
///
/// Corners are stored as `(x1, y1)` top-left and `(x2, y2)` bottom-right.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
}

impl BoundingBox {
    /// Create a box from its two corners.
    pub fn new(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Create a box from top-left corner plus size.
    pub fn from_xywh(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x1: x,
            y1: y,
            x2: x + width,
            y2: y + height,
        }
    }

    pub fn width(&self) -> f32 {
        self.x2 - self.x1
    }

    pub fn height(&self) -> f32 {
        self.y2 - self.y1
    }

    pub fn area(&self) -> f32 {
        self.width().max(0.0) * self.height().max(0.0)
    }

    /// Intersection over Union with another box.
    ///
    /// Returns 0.0 when the union is empty.
    pub fn iou(&self, other: &BoundingBox) -> f32 {
        let ix1 = self.x1.max(other.x1);
        let iy1 = self.y1.max(other.y1);
        let ix2 = self.x2.min(other.x2);
        let iy2 = self.y2.min(other.y2);

        let intersection = (ix2 - ix1).max(0.0) * (iy2 - iy1).max(0.0);
        let union = self.area() + other.area() - intersection;

        if union > 0.0 {
            intersection / union
        } else {
            0.0
        }
    }

    /// Multiply every coordinate by `factor`.
    pub fn scaled(&self, factor: f32) -> Self {
        Self {
            x1: self.x1 * factor,
            y1: self.y1 * factor,
            x2: self.x2 * factor,
            y2: self.y2 * factor,
        }
    }

    /// Clamp both corners into `[0, width] x [0, height]`.
    ///
    /// A NaN coordinate collapses onto the nearest valid bound instead of
    /// propagating, so the result always satisfies `is_within`.
    pub fn clamped(&self, width: f32, height: f32) -> Self {
        let x1 = self.x1.max(0.0).min(width);
        let y1 = self.y1.max(0.0).min(height);
        Self {
            x1,
            y1,
            x2: self.x2.min(width).max(x1),
            y2: self.y2.min(height).max(y1),
        }
    }

    /// Check `0 <= x1 <= x2 <= width` and `0 <= y1 <= y2 <= height`.
    pub fn is_within(&self, width: f32, height: f32) -> bool {
        0.0 <= self.x1
            && self.x1 <= self.x2
            && self.x2 <= width
            && 0.0 <= self.y1
            && self.y1 <= self.y2
            && self.y2 <= height
    }
}

/// A detected object that survived suppression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    /// Box in pixel coordinates of the image passed to `detect`
    pub bbox: BoundingBox,
    /// Index into the detector's label list
    pub class_id: usize,
    /// Raw argmax class score, in (0, 1]
    pub confidence: f32,
}

impl Detection {
    pub fn new(bbox: BoundingBox, class_id: usize, confidence: f32) -> Self {
        Self {
            bbox,
            class_id,
            confidence,
        }
    }

    /// Map a detection made on a frame downscaled by `scale` back to the
    /// full-resolution frame.
    pub fn rescaled(&self, scale: f32) -> Self {
        Self {
            bbox: self.bbox.scaled(1.0 / scale),
            ..self.clone()
        }
    }
}
