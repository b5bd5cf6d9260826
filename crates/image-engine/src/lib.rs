//! Image pipeline for SmartQR codes.
//!
//! Generates a QR bitmap, fits a logo into its center, renders a text label
//! and merges everything into one RGBA image ready to be encoded as PNG.

pub mod compose;
pub mod label;
pub mod layout;
pub mod pipeline;
pub mod qr;
pub mod resize;
pub mod text;

// Re-exports for convenience
pub use layout::{LabelAlign, LabelStyle, LayoutConfig};
pub use pipeline::{Composed, compose_smart_qr, decode_logo, encode_png, parse_font};
pub use qr::generate_qr;
pub use resize::fit_within;

/// Errors that abort composition of a SmartQR image.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("QR encode error: {0}")]
    QrEncode(#[from] qrcode::types::QrError),

    #[error("Failed to decode logo image: {0}")]
    LogoDecode(#[source] image::ImageError),

    #[error("Failed to parse font: {0}")]
    FontParse(#[from] ab_glyph::InvalidFont),

    #[error("Failed to encode image: {0}")]
    Encode(#[source] image::ImageError),
}

/// Problems while drawing the label text.
///
/// These never abort a request; the label may come out blank or clipped.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LabelError {
    #[error("Font has no glyphs for: {0:?}")]
    MissingGlyphs(String),

    #[error("Label text at x={x} with width {width} does not fit canvas width {canvas_width}")]
    OffCanvas { x: i32, width: u32, canvas_width: u32 },
}
