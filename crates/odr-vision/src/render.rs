//! Detection annotation rendering.

use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_filled_rect_mut, draw_hollow_rect_mut, draw_text_mut, text_size};
use imageproc::rect::Rect;
use rusttype::{Font, Scale};

use odr_models::{BoundingBox, Detection};

use crate::labels::LabelList;

const LABEL_FONT_SIZE: f32 = 16.0;
const OUTLINE_COLOR: Rgb<u8> = Rgb([0, 255, 0]);
const TAG_COLOR: Rgb<u8> = Rgb([255, 255, 255]);
const TEXT_COLOR: Rgb<u8> = Rgb([0, 0, 0]);

// Text origin relative to the box's top-left corner
const TEXT_OFFSET_X: i32 = 5;
const TEXT_OFFSET_Y: i32 = 10;

// Tag padding around the measured text extent
const TAG_PAD_X: i32 = 2;
const TAG_PAD_TOP: i32 = 6;
const TAG_PAD_BOTTOM: i32 = 2;

/// A label tag: the text and the filled rectangle behind it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelTag {
    pub text: String,
    /// Text origin (top-left of the glyph run)
    pub origin: (i32, i32),
    /// Tag rectangle, `None` when the measured text is empty
    pub rect: Option<Rect>,
}

/// Draws box outlines and label tags with an embedded font.
pub struct Annotator {
    font: Font<'static>,
    scale: Scale,
}

impl Default for Annotator {
    fn default() -> Self {
        let font_data: &'static [u8] = include_bytes!("../assets/fonts/DejaVuSans.ttf");
        let font = Font::try_from_bytes(font_data).expect("embedded font is a valid TrueType file");
        Self {
            font,
            scale: Scale::uniform(LABEL_FONT_SIZE),
        }
    }
}

impl Annotator {
    /// Label text for a detection, `"{name}: {confidence:.2}"`.
    ///
    /// # Panics
    /// If `class_id` is outside `labels`.
    pub fn label_text(detection: &Detection, labels: &LabelList) -> String {
        format!("{}: {:.2}", &labels[detection.class_id], detection.confidence)
    }

    /// Lay out the tag for one detection without drawing it.
    pub fn label_tag(&self, detection: &Detection, labels: &LabelList) -> LabelTag {
        let text = Self::label_text(detection, labels);
        let (text_w, text_h) = text_size(self.scale, &self.font, &text);

        let x = detection.bbox.x1 as i32 + TEXT_OFFSET_X;
        let y = detection.bbox.y1 as i32 + TEXT_OFFSET_Y;

        let tag_w = text_w + 2 * TAG_PAD_X;
        let tag_h = text_h + TAG_PAD_TOP + TAG_PAD_BOTTOM;
        let rect = (text_w > 0 && text_h > 0)
            .then(|| Rect::at(x - TAG_PAD_X, y - TAG_PAD_TOP).of_size(tag_w as u32, tag_h as u32));

        LabelTag {
            text,
            origin: (x, y),
            rect,
        }
    }

    /// Draw every detection onto a copy of `image`.
    ///
    /// Outlines are drawn 2 px wide along the box edges; tags sit inside the
    /// box near its top-left corner. Shapes running off the canvas are clipped.
    ///
    /// # Panics
    /// If a detection's `class_id` is outside `labels`.
    pub fn render(&self, image: &RgbImage, detections: &[Detection], labels: &LabelList) -> RgbImage {
        let mut canvas = image.clone();

        for detection in detections {
            self.draw_outline(&mut canvas, &detection.bbox);

            let tag = self.label_tag(detection, labels);
            if let Some(rect) = tag.rect {
                draw_filled_rect_mut(&mut canvas, rect, TAG_COLOR);
            }
            draw_text_mut(
                &mut canvas,
                TEXT_COLOR,
                tag.origin.0,
                tag.origin.1,
                self.scale,
                &self.font,
                &tag.text,
            );
        }

        canvas
    }

    fn draw_outline(&self, canvas: &mut RgbImage, bbox: &BoundingBox) {
        let x1 = bbox.x1 as i32;
        let y1 = bbox.y1 as i32;
        let x2 = bbox.x2 as i32;
        let y2 = bbox.y2 as i32;

        // Two nested 1 px rectangles make the 2 px line
        for inset in 0..2 {
            let w = x2 - x1 + 1 - 2 * inset;
            let h = y2 - y1 + 1 - 2 * inset;
            if w <= 0 || h <= 0 {
                break;
            }
            let rect = Rect::at(x1 + inset, y1 + inset).of_size(w as u32, h as u32);
            draw_hollow_rect_mut(canvas, rect, OUTLINE_COLOR);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn det(x1: f32, y1: f32, x2: f32, y2: f32, class_id: usize, confidence: f32) -> Detection {
        Detection::new(BoundingBox::new(x1, y1, x2, y2), class_id, confidence)
    }

    fn is_white(p: &Rgb<u8>) -> bool {
        p.0 == [255, 255, 255]
    }

    #[test]
    fn test_label_text_format() {
        let labels = LabelList::coco();
        let text = Annotator::label_text(&det(0.0, 0.0, 10.0, 10.0, 0, 0.876), &labels);
        assert_eq!(text, "person: 0.88");
    }

    #[test]
    fn test_render_keeps_dimensions_and_input() {
        let annotator = Annotator::default();
        let image = RgbImage::from_pixel(320, 240, Rgb([40, 40, 40]));
        let out = annotator.render(&image, &[det(10.0, 10.0, 200.0, 150.0, 2, 0.9)], &LabelList::coco());

        assert_eq!(out.dimensions(), image.dimensions());
        assert_eq!(image.get_pixel(10, 10).0, [40, 40, 40]);
    }

    #[test]
    fn test_render_draws_green_outline() {
        let annotator = Annotator::default();
        let image = RgbImage::from_pixel(200, 200, Rgb([0, 0, 0]));
        let out = annotator.render(&image, &[det(20.0, 100.0, 180.0, 190.0, 0, 0.7)], &LabelList::coco());

        // Bottom and right edges are clear of the tag.
        assert_eq!(out.get_pixel(100, 190).0, [0, 255, 0]);
        assert_eq!(out.get_pixel(100, 189).0, [0, 255, 0]);
        assert_eq!(out.get_pixel(180, 150).0, [0, 255, 0]);
        assert_eq!(out.get_pixel(179, 150).0, [0, 255, 0]);
        assert_eq!(out.get_pixel(100, 150).0, [0, 0, 0]);
    }

    #[test]
    fn test_render_draws_one_tag_per_detection() {
        let annotator = Annotator::default();
        let labels = LabelList::coco();
        let image = RgbImage::from_pixel(600, 300, Rgb([0, 0, 0]));
        let detections = vec![
            det(10.0, 10.0, 190.0, 140.0, 0, 0.91),
            det(210.0, 10.0, 390.0, 140.0, 2, 0.65),
            det(410.0, 150.0, 590.0, 290.0, 16, 0.55),
        ];
        let out = annotator.render(&image, &detections, &labels);

        let mut tags = 0;
        for detection in &detections {
            let tag = annotator.label_tag(detection, &labels);
            let rect = tag.rect.unwrap();
            // The tag's top-left corner lies in padding, never under a glyph.
            if is_white(out.get_pixel(rect.left() as u32, rect.top() as u32)) {
                tags += 1;
            }
        }
        assert_eq!(tags, detections.len());
    }

    #[test]
    fn test_tag_layout_follows_box_corner() {
        let annotator = Annotator::default();
        let tag = annotator.label_tag(&det(50.0, 40.0, 300.0, 200.0, 0, 0.5), &LabelList::coco());

        assert_eq!(tag.origin, (55, 50));
        let rect = tag.rect.unwrap();
        assert_eq!(rect.left(), 53);
        assert_eq!(rect.top(), 44);
        assert!(rect.width() > 8);
    }

    #[test]
    fn test_render_clips_shapes_at_canvas_edge() {
        let annotator = Annotator::default();
        let image = RgbImage::new(60, 30);
        let out = annotator.render(&image, &[det(40.0, 20.0, 60.0, 30.0, 0, 0.99)], &LabelList::coco());
        assert_eq!(out.dimensions(), (60, 30));
    }

    #[test]
    fn test_degenerate_box_renders() {
        let annotator = Annotator::default();
        let image = RgbImage::new(50, 50);
        let out = annotator.render(&image, &[det(25.0, 25.0, 25.0, 25.0, 0, 0.8)], &LabelList::coco());
        assert_eq!(out.get_pixel(25, 25).0, [0, 255, 0]);
    }

    #[test]
    #[should_panic]
    fn test_out_of_range_class_panics() {
        let annotator = Annotator::default();
        let image = RgbImage::new(50, 50);
        annotator.render(&image, &[det(0.0, 0.0, 10.0, 10.0, 80, 0.9)], &LabelList::coco());
    }
}
