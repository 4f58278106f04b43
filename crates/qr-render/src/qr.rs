//! QR code generation.

use std::io::Cursor;

use image::{DynamicImage, GrayImage, Luma};
use qrcode::QrCode;
use qrcode::render::svg;
use tracing::debug;

use crate::capacity::{self, QUIET_ZONE};
use crate::{EncodeError, ErrorCorrection, ImageFormat};

/// Smallest edge length that holds a version 1 symbol with its quiet zone.
pub const MIN_SIZE: u32 = 17 + 4 + 2 * QUIET_ZONE;

/// Largest edge length the encoder will render.
pub const MAX_SIZE: u32 = 4096;

/// Encode `payload` at the default error-correction level.
pub fn encode(payload: &str, size: u32, format: ImageFormat) -> Result<Vec<u8>, EncodeError> {
    QrEncoder::default().encode(payload, size, format)
}

/// QR encoder bound to an error-correction level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QrEncoder {
    ec_level: ErrorCorrection,
}

impl QrEncoder {
    pub fn new(ec_level: ErrorCorrection) -> Self {
        Self { ec_level }
    }

    pub fn ec_level(&self) -> ErrorCorrection {
        self.ec_level
    }

    /// Longest payload this encoder accepts for `size`.
    pub fn max_payload_len(&self, size: u32) -> Option<usize> {
        capacity::max_payload_len(size, self.ec_level)
    }

    /// Validate that `payload` fits into a `size`-pixel symbol.
    pub fn check_capacity(&self, payload: &str, size: u32) -> Result<(), EncodeError> {
        if size > MAX_SIZE {
            return Err(EncodeError::SizeTooLarge {
                size,
                max: MAX_SIZE,
            });
        }
        let max = self.max_payload_len(size).ok_or(EncodeError::SizeTooSmall {
            size,
            min: MIN_SIZE,
        })?;
        let len = payload.len();
        if len > max {
            return Err(EncodeError::PayloadTooLong { len, max });
        }
        Ok(())
    }

    /// Encode `payload` into image bytes of the requested format.
    ///
    /// The symbol is drawn with an integer pixels-per-module scale, so the
    /// edge of the output is the largest multiple of the module count that
    /// does not exceed `size`.
    pub fn encode(
        &self,
        payload: &str,
        size: u32,
        format: ImageFormat,
    ) -> Result<Vec<u8>, EncodeError> {
        let code = self.build_code(payload, size)?;
        let scale = module_scale(&code, size);
        debug!(
            payload_len = payload.len(),
            size,
            scale,
            %format,
            "Encoding QR image"
        );

        match format {
            ImageFormat::Png => {
                let img = DynamicImage::ImageLuma8(draw_luma(&code, scale));
                let mut buf = Vec::new();
                img.write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)?;
                Ok(buf)
            }
            ImageFormat::Svg => {
                let doc = code
                    .render::<svg::Color<'_>>()
                    .quiet_zone(true)
                    .module_dimensions(scale, scale)
                    .dark_color(svg::Color("#000000"))
                    .light_color(svg::Color("#ffffff"))
                    .build();
                Ok(doc.into_bytes())
            }
        }
    }

    /// Render `payload` as a grayscale bitmap, quiet zone included.
    pub fn render_luma(&self, payload: &str, size: u32) -> Result<GrayImage, EncodeError> {
        let code = self.build_code(payload, size)?;
        let scale = module_scale(&code, size);
        Ok(draw_luma(&code, scale))
    }

    fn build_code(&self, payload: &str, size: u32) -> Result<QrCode, EncodeError> {
        self.check_capacity(payload, size)?;
        let code = QrCode::with_error_correction_level(payload.as_bytes(), self.ec_level.into())
            .map_err(|e| EncodeError::Qr(e.to_string()))?;

        let edge = code.width() as u32 + 2 * QUIET_ZONE;
        if edge > size {
            // Only reachable if the segment optimizer did worse than byte mode.
            return Err(EncodeError::PayloadTooLong {
                len: payload.len(),
                max: self.max_payload_len(size).unwrap_or(0),
            });
        }
        Ok(code)
    }
}

fn module_scale(code: &QrCode, size: u32) -> u32 {
    let edge = code.width() as u32 + 2 * QUIET_ZONE;
    (size / edge).max(1)
}

fn draw_luma(code: &QrCode, scale: u32) -> GrayImage {
    let module_count = code.width() as u32;
    let img_size = (module_count + 2 * QUIET_ZONE) * scale;
    let mut img = GrayImage::from_pixel(img_size, img_size, Luma([255u8]));

    for (i, color) in code.to_colors().iter().enumerate() {
        if *color != qrcode::Color::Dark {
            continue;
        }
        let x = (i as u32 % module_count + QUIET_ZONE) * scale;
        let y = (i as u32 / module_count + QUIET_ZONE) * scale;
        for dx in 0..scale {
            for dy in 0..scale {
                img.put_pixel(x + dx, y + dy, Luma([0u8]));
            }
        }
    }

    img
}

#[cfg(test)]
mod tests {
    use super::*;

    const LINK: &str = "artqr://artwork/scan?token=2f1c8a54-4d0e-4c7a-9b1e-6a1f0b7c3d21";

    #[test]
    fn png_output_is_deterministic() {
        let a = encode(LINK, 256, ImageFormat::Png).unwrap();
        let b = encode(LINK, 256, ImageFormat::Png).unwrap();
        assert_eq!(a, b);
        assert_eq!(&a[..8], b"\x89PNG\r\n\x1a\n");
    }

    #[test]
    fn svg_output_is_deterministic() {
        let a = encode(LINK, 256, ImageFormat::Svg).unwrap();
        let b = encode(LINK, 256, ImageFormat::Svg).unwrap();
        assert_eq!(a, b);
        let doc = String::from_utf8(a).unwrap();
        assert!(doc.contains("<svg"));
        assert!(doc.contains("#000000"));
    }

    #[test]
    fn png_fits_within_requested_size() {
        let bytes = encode(LINK, 300, ImageFormat::Png).unwrap();
        let img = image::load_from_memory(&bytes).unwrap();
        assert_eq!(img.width(), img.height());
        assert!(img.width() <= 300);
        assert!(img.width() > 150);
    }

    #[test]
    fn render_luma_keeps_quiet_zone_light() {
        let img = QrEncoder::default().render_luma(LINK, 200).unwrap();
        assert_eq!(img.get_pixel(0, 0), &Luma([255u8]));
        assert_eq!(img.width(), img.height());
    }

    #[test]
    fn different_payloads_give_different_images() {
        let a = encode("artqr://a", 128, ImageFormat::Png).unwrap();
        let b = encode("artqr://b", 128, ImageFormat::Png).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn payload_over_capacity_is_rejected() {
        let encoder = QrEncoder::new(ErrorCorrection::M);
        // 64px fits up to version 9 with the quiet zone.
        let max = encoder.max_payload_len(64).unwrap();
        let payload = "x".repeat(max + 1);
        let err = encoder.encode(&payload, 64, ImageFormat::Png).unwrap_err();
        assert!(matches!(err, EncodeError::PayloadTooLong { len, max: m } if len == max + 1 && m == max));
    }

    #[test]
    fn payload_at_capacity_is_accepted() {
        let encoder = QrEncoder::new(ErrorCorrection::H);
        let max = encoder.max_payload_len(64).unwrap();
        let payload = "x".repeat(max);
        assert!(encoder.encode(&payload, 64, ImageFormat::Png).is_ok());
    }

    #[test]
    fn tiny_size_is_rejected() {
        let err = encode("a", MIN_SIZE - 1, ImageFormat::Png).unwrap_err();
        assert!(matches!(err, EncodeError::SizeTooSmall { .. }));
        assert!(encode("a", MIN_SIZE, ImageFormat::Png).is_ok());
    }

    #[test]
    fn oversized_size_is_rejected() {
        let err = encode("artqr://a", u32::MAX, ImageFormat::Png).unwrap_err();
        assert!(matches!(err, EncodeError::SizeTooLarge { size: u32::MAX, max: MAX_SIZE }));
        let err = encode("artqr://a", MAX_SIZE + 1, ImageFormat::Svg).unwrap_err();
        assert!(matches!(err, EncodeError::SizeTooLarge { .. }));
        assert!(encode("artqr://a", MAX_SIZE, ImageFormat::Png).is_ok());
    }

    #[test]
    fn format_and_level_parse() {
        assert_eq!("PNG".parse::<ImageFormat>().unwrap(), ImageFormat::Png);
        assert_eq!("svg".parse::<ImageFormat>().unwrap(), ImageFormat::Svg);
        assert!("gif".parse::<ImageFormat>().is_err());
        assert_eq!("q".parse::<ErrorCorrection>().unwrap(), ErrorCorrection::Q);
        assert!("Z".parse::<ErrorCorrection>().is_err());
    }
}
