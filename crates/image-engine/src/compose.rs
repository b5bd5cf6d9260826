//! Image composition utilities: centering, overlay, canvas growth.

use image::{Rgba, RgbaImage};

/// Top-left position that centers `inner` inside `outer`.
///
/// Odd remainders truncate; an inner image larger than the outer one is
/// pinned to the origin on that axis.
pub fn centered_offset(outer: (u32, u32), inner: (u32, u32)) -> (u32, u32) {
    (
        outer.0.saturating_sub(inner.0) / 2,
        outer.1.saturating_sub(inner.1) / 2,
    )
}

/// Overlay `top` image onto `base` at the given position.
///
/// The `top` image is alpha-composited over the base at full opacity.
/// Pixels falling outside `base` are dropped.
pub fn overlay(base: &mut RgbaImage, top: &RgbaImage, x: u32, y: u32) {
    for (dx, dy, pixel) in top.enumerate_pixels() {
        let target_x = x + dx;
        let target_y = y + dy;
        if target_x < base.width() && target_y < base.height() {
            let alpha = pixel[3] as f32 / 255.0;
            if alpha > 0.99 {
                base.put_pixel(target_x, target_y, *pixel);
            } else if alpha > 0.01 {
                let bg = *base.get_pixel(target_x, target_y);
                base.put_pixel(target_x, target_y, blend_pixel(&bg, pixel, alpha));
            }
        }
    }
}

/// Copy `base` into the top of a taller, transparent canvas.
pub fn extend_height(base: &RgbaImage, extra: u32) -> RgbaImage {
    let mut result = RgbaImage::new(base.width(), base.height() + extra);
    for (x, y, pixel) in base.enumerate_pixels() {
        result.put_pixel(x, y, *pixel);
    }
    result
}

/// Source-over blend of `fg` with coverage `alpha` onto `bg`.
fn blend_pixel(bg: &Rgba<u8>, fg: &Rgba<u8>, alpha: f32) -> Rgba<u8> {
    let bg_alpha = bg[3] as f32 / 255.0;
    let out_alpha = alpha + bg_alpha * (1.0 - alpha);
    if out_alpha <= 0.0 {
        return Rgba([0, 0, 0, 0]);
    }
    let channel = |i: usize| {
        let c = (fg[i] as f32 * alpha + bg[i] as f32 * bg_alpha * (1.0 - alpha)) / out_alpha;
        c.round().clamp(0.0, 255.0) as u8
    };
    Rgba([
        channel(0),
        channel(1),
        channel(2),
        (out_alpha * 255.0).round() as u8,
    ])
}
