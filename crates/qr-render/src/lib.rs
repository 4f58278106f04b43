//! QR code rendering for artwork scan links.
//!
//! Encodes a payload into PNG or SVG bytes. Output is a pure function of the
//! payload, size, format and error-correction level, and capacity is
//! validated before any encoding is attempted.

pub mod capacity;
pub mod qr;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub use capacity::max_payload_len;
pub use qr::{QrEncoder, encode};

/// Image container produced by the encoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    #[default]
    Png,
    Svg,
}

impl ImageFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Svg => "svg",
        }
    }
}

impl fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ImageFormat {
    type Err = EncodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "png" => Ok(Self::Png),
            "svg" => Ok(Self::Svg),
            other => Err(EncodeError::UnknownFormat(other.to_string())),
        }
    }
}

/// QR error-correction level. Higher levels survive more damage and hold
/// less data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ErrorCorrection {
    L,
    #[default]
    M,
    Q,
    H,
}

impl ErrorCorrection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::L => "L",
            Self::M => "M",
            Self::Q => "Q",
            Self::H => "H",
        }
    }
}

impl From<ErrorCorrection> for qrcode::EcLevel {
    fn from(ec: ErrorCorrection) -> Self {
        match ec {
            ErrorCorrection::L => qrcode::EcLevel::L,
            ErrorCorrection::M => qrcode::EcLevel::M,
            ErrorCorrection::Q => qrcode::EcLevel::Q,
            ErrorCorrection::H => qrcode::EcLevel::H,
        }
    }
}

impl FromStr for ErrorCorrection {
    type Err = EncodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "L" => Ok(Self::L),
            "M" => Ok(Self::M),
            "Q" => Ok(Self::Q),
            "H" => Ok(Self::H),
            other => Err(EncodeError::UnknownEcLevel(other.to_string())),
        }
    }
}

/// Errors that can occur while encoding a QR image.
#[derive(Debug, thiserror::Error)]
pub enum EncodeError {
    #[error("Payload of {len} bytes exceeds QR capacity of {max} bytes")]
    PayloadTooLong { len: usize, max: usize },

    #[error("Image size {size}px is below the {min}px minimum")]
    SizeTooSmall { size: u32, min: u32 },

    #[error("Image size {size}px exceeds the {max}px maximum")]
    SizeTooLarge { size: u32, max: u32 },

    #[error("Unknown image format: {0}")]
    UnknownFormat(String),

    #[error("Unknown error-correction level: {0}")]
    UnknownEcLevel(String),

    #[error("QR encode error: {0}")]
    Qr(String),

    #[error("Image write error: {0}")]
    Image(#[from] image::ImageError),
}
