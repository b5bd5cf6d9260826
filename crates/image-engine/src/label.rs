//! Label canvas rendering.

use ab_glyph::Font;
use image::RgbaImage;
use imageproc::drawing::draw_text_mut;
use tracing::debug;

use crate::LabelError;
use crate::layout::{LabelAlign, LayoutConfig};
use crate::text::{ascent, measure_text_width, missing_glyphs, pt_to_scale};

/// Blank label canvas, filled with the band color when the layout has one.
pub fn new_label_canvas(layout: &LayoutConfig) -> RgbaImage {
    match layout.background {
        Some(bg) => RgbaImage::from_pixel(layout.label_width, layout.label_height, bg),
        None => RgbaImage::new(layout.label_width, layout.label_height),
    }
}

/// Left edge of the label text.
///
/// `CharCount` ignores the measured width and counts bytes, matching labels
/// produced before text measurement existed.
pub fn text_start_x(align: LabelAlign, canvas_width: u32, text: &str, text_width: u32) -> i32 {
    match align {
        LabelAlign::Measured => (canvas_width as i32 - text_width as i32).max(0) / 2,
        LabelAlign::CharCount => {
            let n = text.len() as i32;
            let condition = n * 2;
            ((canvas_width as i32 / 2) - n * 7) + (n - condition) * 3
        }
    }
}

/// Baseline of the label text, measured from the top of the canvas.
pub fn baseline_y(layout: &LayoutConfig) -> f32 {
    layout.label_height as f32 - layout.font_size_pt
}

/// Draw `text` onto the canvas.
///
/// The text is always drawn, clipped to the canvas. An error reports that
/// the result is degraded, either because glyphs are missing or because the
/// text does not fit horizontally.
pub fn draw_label<F: Font>(
    canvas: &mut RgbaImage,
    font: &F,
    text: &str,
    layout: &LayoutConfig,
) -> Result<(), LabelError> {
    let scale = pt_to_scale(font, layout.font_size_pt);
    let width = measure_text_width(font, scale, text);
    let x = text_start_x(layout.align, canvas.width(), text, width);
    let y = (baseline_y(layout) - ascent(font, scale)).round() as i32;

    debug!(x, y, width, scale = scale.y, "Drawing label text");
    draw_text_mut(canvas, layout.text_color, x, y, scale, font, text);

    let missing = missing_glyphs(font, text);
    if !missing.is_empty() {
        return Err(LabelError::MissingGlyphs(missing));
    }
    if x < 0 || i64::from(x) + i64::from(width) > i64::from(canvas.width()) {
        return Err(LabelError::OffCanvas {
            x,
            width,
            canvas_width: canvas.width(),
        });
    }
    Ok(())
}
