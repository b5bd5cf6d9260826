//! Font metrics helpers for label layout.

use ab_glyph::{Font, PxScale, ScaleFont};

/// Output resolution assumed when converting point sizes to pixels.
pub const DPI: f32 = 72.0;

/// Scale that renders the font's em square at `pt` points.
///
/// ab_glyph scales by ascent-minus-descent height, while point sizes refer
/// to the em square, so the two differ by `height / units_per_em`.
pub fn pt_to_scale<F: Font>(font: &F, pt: f32) -> PxScale {
    let em_px = pt * DPI / 72.0;
    match font.units_per_em() {
        Some(upem) if upem > 0.0 => PxScale::from(em_px * font.height_unscaled() / upem),
        _ => PxScale::from(em_px),
    }
}

/// Measure the pixel width of a string at the given font and scale.
pub fn measure_text_width<F: Font>(font: &F, scale: PxScale, text: &str) -> u32 {
    let scaled = font.as_scaled(scale);
    let mut width = 0.0f32;
    let mut prev_glyph: Option<ab_glyph::GlyphId> = None;

    for ch in text.chars() {
        let glyph_id = scaled.glyph_id(ch);
        if let Some(prev) = prev_glyph {
            width += scaled.kern(prev, glyph_id);
        }
        width += scaled.h_advance(glyph_id);
        prev_glyph = Some(glyph_id);
    }

    width.ceil().max(0.0) as u32
}

/// Ascent in pixels at the given scale.
pub fn ascent<F: Font>(font: &F, scale: PxScale) -> f32 {
    font.as_scaled(scale).ascent()
}

/// Characters the font cannot render, in order of first appearance.
///
/// Whitespace and control characters are ignored.
pub fn missing_glyphs<F: Font>(font: &F, text: &str) -> String {
    let mut missing = String::new();
    for ch in text.chars() {
        if ch.is_whitespace() || ch.is_control() || missing.contains(ch) {
            continue;
        }
        if font.glyph_id(ch).0 == 0 {
            missing.push(ch);
        }
    }
    missing
}
