//! QR symbol rendering.

use image::GrayImage;
use qrcode::types::QrError;
use qrcode::{Color, EcLevel, QrCode};

use super::raster;
use crate::error::CodeError;

/// Light modules kept around the symbol on every side.
pub const QUIET_ZONE: u32 = 4;

/// Medium error correction, roughly 15% of codewords recoverable.
pub const EC_LEVEL: EcLevel = EcLevel::M;

/// Encode `text` at the smallest fitting version and draw it on a `size × size` canvas.
///
/// # Errors
///
/// Returns [`CodeError::Validation`] if the text cannot be encoded.
pub(crate) fn render(text: &str, size: u32) -> Result<GrayImage, CodeError> {
    let code = QrCode::with_error_correction_level(text.as_bytes(), EC_LEVEL).map_err(qr_error)?;
    let width = u32::try_from(code.width())
        .map_err(|_| CodeError::Encode("QR symbol is too large".to_string()))?;
    let grid = width + 2 * QUIET_ZONE;
    if grid > size {
        tracing::warn!(
            modules = grid,
            size,
            "QR symbol has more modules than pixels; modules will be dropped"
        );
    }

    Ok(raster::rasterize(size, size, grid, grid, |col, row| {
        let (Some(x), Some(y)) = (col.checked_sub(QUIET_ZONE), row.checked_sub(QUIET_ZONE)) else {
            return false;
        };
        x < width && y < width && code[(x as usize, y as usize)] == Color::Dark
    }))
}

fn qr_error(err: QrError) -> CodeError {
    match err {
        QrError::DataTooLong => {
            CodeError::Validation("text is too long to encode as a QR code".to_string())
        }
        other => CodeError::Validation(format!("cannot encode text as a QR code: {other}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canvas_matches_requested_size() {
        for size in [64, 100, 128, 333] {
            let img = render("https://example.com", size).unwrap();
            assert_eq!(img.dimensions(), (size, size));
        }
    }

    #[test]
    fn quiet_zone_is_light() {
        let img = render("hello", 256).unwrap();
        for i in 0..256 {
            assert_eq!(img.get_pixel(i, 0).0[0], 255);
            assert_eq!(img.get_pixel(0, i).0[0], 255);
        }
    }

    #[test]
    fn finder_pattern_corner_is_dark() {
        // "hello" fits version 1: 21 modules + 8 quiet = 29, 8 px per module, 12 px offset.
        let img = render("hello", 256).unwrap();
        let first_module = 12 + QUIET_ZONE * 8;
        assert_eq!(img.get_pixel(first_module, first_module).0[0], 0);
        assert_eq!(img.get_pixel(first_module - 1, first_module - 1).0[0], 255);
    }

    #[test]
    fn only_black_and_white_pixels() {
        let img = render("sharp edges", 300).unwrap();
        assert!(img.pixels().all(|p| p.0[0] == 0 || p.0[0] == 255));
    }

    #[test]
    fn oversized_text_is_rejected() {
        let text = "x".repeat(5000);
        let err = render(&text, 256).unwrap_err();
        assert!(matches!(err, CodeError::Validation(_)));
    }
}
