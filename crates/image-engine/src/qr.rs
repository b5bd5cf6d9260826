//! QR code rasterization.

use image::{DynamicImage, GrayImage, Luma};
use qrcode::{EcLevel, QrCode};
use tracing::debug;

use crate::EngineError;

/// Light modules kept around the symbol on every side.
pub const QUIET_ZONE: u32 = 4;

/// Error correction level used for every code.
pub const EC_LEVEL: EcLevel = EcLevel::M;

/// Generate a square QR bitmap of `size` pixels.
///
/// The symbol and its quiet zone are scaled by the largest whole number of
/// pixels per module that fits, then centered. If the symbol needs more than
/// `size` pixels at one pixel per module, the bitmap grows to fit it.
pub fn generate_qr(data: &str, size: u32) -> Result<DynamicImage, EngineError> {
    let code = QrCode::with_error_correction_level(data.as_bytes(), EC_LEVEL)?;
    let modules = code.to_colors();
    let module_count = code.width() as u32;

    let real_size = module_count + QUIET_ZONE * 2;
    let size = size.max(real_size);
    let scale = size / real_size;
    let offset = (size - real_size * scale) / 2 + QUIET_ZONE * scale;

    debug!(module_count, size, scale, offset, "Rendering QR bitmap");

    let mut img = GrayImage::from_pixel(size, size, Luma([255u8]));

    for (i, color) in modules.iter().enumerate() {
        let x = (i as u32) % module_count;
        let y = (i as u32) / module_count;

        if *color == qrcode::Color::Dark {
            for dx in 0..scale {
                for dy in 0..scale {
                    img.put_pixel(
                        offset + x * scale + dx,
                        offset + y * scale + dy,
                        Luma([0u8]),
                    );
                }
            }
        }
    }

    Ok(DynamicImage::ImageLuma8(img))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(img: &DynamicImage) -> Option<String> {
        let gray = img.to_luma8();
        let (w, h) = (gray.width() as usize, gray.height() as usize);
        let mut prepared = rqrr::PreparedImage::prepare_from_greyscale(w, h, |x, y| {
            gray.get_pixel(x as u32, y as u32)[0]
        });
        prepared
            .detect_grids()
            .first()
            .and_then(|g| g.decode().ok())
            .map(|(_, content)| content)
    }

    #[test]
    fn generate_qr_has_exact_requested_size() {
        let img = generate_qr("https://example.com", 256).unwrap();
        assert_eq!((img.width(), img.height()), (256, 256));

        let img = generate_qr("https://example.com", 1024).unwrap();
        assert_eq!((img.width(), img.height()), (1024, 1024));
    }

    #[test]
    fn generate_qr_grows_when_symbol_does_not_fit() {
        // Version 1 is 21 modules plus 8 quiet-zone modules.
        let img = generate_qr("a", 10).unwrap();
        assert_eq!(img.width(), 29);
        assert_eq!(img.width(), img.height());
    }

    #[test]
    fn generate_qr_keeps_quiet_zone_white() {
        let img = generate_qr("quiet zone", 256).unwrap().to_luma8();
        for x in 0..img.width() {
            assert_eq!(img.get_pixel(x, 0)[0], 255);
            assert_eq!(img.get_pixel(x, img.height() - 1)[0], 255);
        }
    }

    #[test]
    fn generate_qr_round_trips_through_decoder() {
        let img = generate_qr("https://example.com/?q=1&r=2", 256).unwrap();
        assert_eq!(decode(&img).as_deref(), Some("https://example.com/?q=1&r=2"));
    }

    #[test]
    fn generate_qr_rejects_data_over_capacity() {
        // Version 40-M holds at most 2331 bytes.
        let data = "x".repeat(3000);
        let err = generate_qr(&data, 256).unwrap_err();
        assert!(matches!(err, EngineError::QrEncode(_)));
    }
}
