//! Rendering of KHQR payload strings as PNG images.

use crate::bakong::error::{BakongError, BakongResult};
use image::{DynamicImage, ImageFormat, Luma};
use qrcode::{EcLevel, QrCode};
use std::io::Cursor;

/// Rendered image edge length in pixels
const QR_IMAGE_SIZE: u32 = 300;

/// Render a KHQR payload string to PNG bytes.
///
/// Error correction level H matches what payment apps expect from printed
/// merchant QRs (partially occluded codes still scan).
pub fn render_png(payload: &str) -> BakongResult<Vec<u8>> {
    if payload.trim().is_empty() {
        return Err(BakongError::invalid_request(
            "qr payload is required",
            "qr",
        ));
    }

    let code = QrCode::with_error_correction_level(payload.as_bytes(), EcLevel::H).map_err(
        |e| BakongError::QrEncodingFailed {
            message: format!("payload cannot be encoded as a QR code: {}", e),
        },
    )?;

    let buffer = code
        .render::<Luma<u8>>()
        .min_dimensions(QR_IMAGE_SIZE, QR_IMAGE_SIZE)
        .build();

    let mut bytes = Cursor::new(Vec::new());
    DynamicImage::ImageLuma8(buffer)
        .write_to(&mut bytes, ImageFormat::Png)
        .map_err(|e| BakongError::QrEncodingFailed {
            message: format!("PNG encoding failed: {}", e),
        })?;

    Ok(bytes.into_inner())
}
