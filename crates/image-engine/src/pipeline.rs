//! End-to-end SmartQR composition.

use std::io::Cursor;

use ab_glyph::{Font, FontRef};
use image::{DynamicImage, ImageFormat, RgbaImage};
use tracing::debug;

use crate::compose::{centered_offset, extend_height, overlay};
use crate::label::{draw_label, new_label_canvas};
use crate::layout::{LabelStyle, LayoutConfig};
use crate::qr::generate_qr;
use crate::resize::fit_within;
use crate::{EngineError, LabelError};

/// A composed image plus what happened along the way.
#[derive(Debug)]
pub struct Composed {
    pub image: RgbaImage,
    /// Top-left corner of the logo on the QR bitmap.
    pub logo_position: (u32, u32),
    pub logo_size: (u32, u32),
    /// Set when the label was drawn degraded.
    pub label_issue: Option<LabelError>,
}

/// Decode logo bytes in any format `image` recognizes.
pub fn decode_logo(bytes: &[u8]) -> Result<DynamicImage, EngineError> {
    image::load_from_memory(bytes).map_err(EngineError::LogoDecode)
}

/// Parse TrueType/OpenType font bytes.
pub fn parse_font(bytes: &[u8]) -> Result<FontRef<'_>, EngineError> {
    Ok(FontRef::try_from_slice(bytes)?)
}

/// Encode an image as PNG bytes.
pub fn encode_png(image: &RgbaImage) -> Result<Vec<u8>, EngineError> {
    let mut cursor = Cursor::new(Vec::new());
    image
        .write_to(&mut cursor, ImageFormat::Png)
        .map_err(EngineError::Encode)?;
    Ok(cursor.into_inner())
}

/// Build the QR bitmap for `data`, center `logo` on it and attach `label`.
pub fn compose_smart_qr<F: Font>(
    data: &str,
    label: &str,
    logo: &DynamicImage,
    font: &F,
    layout: &LayoutConfig,
) -> Result<Composed, EngineError> {
    let mut canvas = generate_qr(data, layout.qr_size)?.to_rgba8();

    let logo = fit_within(logo, layout.logo_box.0, layout.logo_box.1).to_rgba8();
    let logo_position = centered_offset(canvas.dimensions(), logo.dimensions());
    overlay(&mut canvas, &logo, logo_position.0, logo_position.1);
    debug!(
        x = logo_position.0,
        y = logo_position.1,
        width = logo.width(),
        height = logo.height(),
        "Logo placed"
    );

    let mut label_canvas = new_label_canvas(layout);
    let label_issue = draw_label(&mut label_canvas, font, label, layout).err();

    let image = match layout.style {
        LabelStyle::Plain => {
            let x = canvas.width().saturating_sub(label_canvas.width()) / 2;
            let y = canvas.height().saturating_sub(label_canvas.height());
            overlay(&mut canvas, &label_canvas, x, y);
            canvas
        }
        LabelStyle::Banner => {
            let qr_height = canvas.height();
            let mut grown = extend_height(&canvas, layout.label_height);
            overlay(&mut grown, &label_canvas, 0, qr_height);
            grown
        }
    };

    Ok(Composed {
        image,
        logo_position,
        logo_size: logo.dimensions(),
        label_issue,
    })
}
