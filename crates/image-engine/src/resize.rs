//! Aspect-ratio-preserving resize operations using Lanczos3 filtering.

use image::DynamicImage;
use image::imageops::FilterType;
use tracing::debug;

/// Resize an image to a target width while maintaining aspect ratio.
///
/// Returns the original image unchanged if it already matches the target width.
pub fn resize_to_width(img: &DynamicImage, width: u32) -> DynamicImage {
    let (orig_w, orig_h) = (img.width(), img.height());

    if orig_w == width {
        debug!(width, "Image already at target width, skipping resize");
        return img.clone();
    }

    let ratio = f64::from(width) / f64::from(orig_w);
    let new_height = (f64::from(orig_h) * ratio).round() as u32;
    let new_height = new_height.max(1);

    debug!(
        orig_w,
        orig_h,
        new_width = width,
        new_height,
        "Resizing image to target width"
    );

    img.resize_exact(width, new_height, FilterType::Lanczos3)
}

/// Resize an image to a target height while maintaining aspect ratio.
///
/// Returns the original image unchanged if it already matches the target height.
pub fn resize_to_height(img: &DynamicImage, height: u32) -> DynamicImage {
    let (orig_w, orig_h) = (img.width(), img.height());

    if orig_h == height {
        debug!(height, "Image already at target height, skipping resize");
        return img.clone();
    }

    let ratio = f64::from(height) / f64::from(orig_h);
    let new_width = (f64::from(orig_w) * ratio).round() as u32;
    let new_width = new_width.max(1);

    debug!(
        orig_w,
        orig_h,
        new_width,
        new_height = height,
        "Resizing image to target height"
    );

    img.resize_exact(new_width, height, FilterType::Lanczos3)
}

/// Shrink an image to fit inside `max_width` x `max_height`.
///
/// Images already inside the box are returned as-is, never enlarged.
pub fn fit_within(img: &DynamicImage, max_width: u32, max_height: u32) -> DynamicImage {
    let (w, h) = (img.width(), img.height());
    if w <= max_width && h <= max_height {
        return img.clone();
    }

    // Compare w/h against max_width/max_height without floats.
    if u64::from(w) * u64::from(max_height) > u64::from(h) * u64::from(max_width) {
        resize_to_width(img, max_width)
    } else {
        resize_to_height(img, max_height)
    }
}
