//! Page geometry.
//!
//! All lengths are millimetres measured from the top-left corner of the page,
//! the way the report is described. `to_pdf_y` converts to PDF's bottom-left
//! origin.

/// A4 page width.
pub const PAGE_WIDTH_MM: f32 = 210.0;
/// A4 page height.
pub const PAGE_HEIGHT_MM: f32 = 297.0;

/// Page margin; the title is centred between the left and right margins.
pub const MARGIN_MM: f32 = 10.0;
/// Title font size in points.
pub const TITLE_FONT_SIZE: f32 = 16.0;
/// Baseline of the title line, from the top edge.
pub const TITLE_BASELINE_MM: f32 = 17.0;

/// Left edge of the placed image.
pub const IMAGE_X_MM: f32 = 10.0;
/// Top edge of the placed image.
pub const IMAGE_TOP_MM: f32 = 30.0;
/// Width of the placed image; height follows the aspect ratio.
pub const IMAGE_WIDTH_MM: f32 = 190.0;

const MM_PER_INCH: f32 = 25.4;
const PT_PER_MM: f32 = 72.0 / MM_PER_INCH;

/// Convert a distance from the top edge into a PDF y coordinate.
pub fn to_pdf_y(top_mm: f32) -> f32 {
    PAGE_HEIGHT_MM - top_mm
}

/// DPI at which an image `width_px` wide renders exactly `IMAGE_WIDTH_MM`.
pub fn image_dpi(width_px: u32) -> f32 {
    width_px as f32 * MM_PER_INCH / IMAGE_WIDTH_MM
}

/// Rendered height of a `width_px` x `height_px` image placed at
/// `IMAGE_WIDTH_MM`.
pub fn image_height_mm(width_px: u32, height_px: u32) -> f32 {
    IMAGE_WIDTH_MM * height_px as f32 / width_px as f32
}

/// PDF y coordinate of the bottom edge of a placed image.
pub fn image_bottom_pdf_y(width_px: u32, height_px: u32) -> f32 {
    to_pdf_y(IMAGE_TOP_MM + image_height_mm(width_px, height_px))
}

/// Left x of a title line centred between the margins.
pub fn centered_title_x(text: &str, font_size_pt: f32) -> f32 {
    let usable = PAGE_WIDTH_MM - 2.0 * MARGIN_MM;
    let width = helvetica_bold_width_mm(text, font_size_pt);
    MARGIN_MM + ((usable - width) / 2.0).max(0.0)
}

/// Advance width of `text` set in Helvetica-Bold.
pub fn helvetica_bold_width_mm(text: &str, font_size_pt: f32) -> f32 {
    let units: u32 = text.chars().map(helvetica_bold_advance).sum();
    units as f32 / 1000.0 * font_size_pt / PT_PER_MM
}

// Glyph advances from the standard Helvetica-Bold metrics, in 1/1000 em.
fn helvetica_bold_advance(c: char) -> u32 {
    match c {
        ' ' => 278,
        '0'..='9' => 556,
        'I' => 278,
        'J' => 556,
        'E' | 'P' | 'S' | 'V' | 'X' | 'Y' => 667,
        'F' | 'L' | 'T' | 'Z' => 611,
        'G' | 'O' | 'Q' => 778,
        'M' => 833,
        'W' => 944,
        'A'..='Z' => 722,
        'f' | 't' => 333,
        'i' | 'j' | 'l' => 278,
        'm' => 889,
        'r' => 389,
        'w' => 778,
        'z' => 500,
        'b' | 'd' | 'g' | 'h' | 'n' | 'o' | 'p' | 'q' | 'u' => 611,
        _ => 556,
    }
}
