//! QR service options.

use qr_render::{ErrorCorrection, ImageFormat};
use uuid::Uuid;

pub const DEFAULT_DEEP_LINK_BASE: &str = "artqr://artwork/scan?token=";
pub const DEFAULT_IMAGE_SIZE: u32 = 512;
pub const DEFAULT_MAX_GENERATION_ATTEMPTS: u32 = 3;

/// Options controlling how QR tokens are issued and rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QrConfig {
    /// Prefix of the deep link; the token is appended verbatim.
    pub deep_link_base: String,

    /// Target edge length of the rendered image in pixels.
    pub image_size: u32,

    pub image_format: ImageFormat,

    pub ec_level: ErrorCorrection,

    /// Tokens tried before giving up when the store reports a collision.
    pub max_generation_attempts: u32,
}

impl Default for QrConfig {
    fn default() -> Self {
        Self {
            deep_link_base: DEFAULT_DEEP_LINK_BASE.into(),
            image_size: DEFAULT_IMAGE_SIZE,
            image_format: ImageFormat::Png,
            ec_level: ErrorCorrection::M,
            max_generation_attempts: DEFAULT_MAX_GENERATION_ATTEMPTS,
        }
    }
}

impl QrConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_deep_link_base(mut self, val: impl Into<String>) -> Self {
        self.deep_link_base = val.into();
        self
    }

    pub fn with_image_size(mut self, val: u32) -> Self {
        self.image_size = val;
        self
    }

    pub fn with_image_format(mut self, val: ImageFormat) -> Self {
        self.image_format = val;
        self
    }

    pub fn with_ec_level(mut self, val: ErrorCorrection) -> Self {
        self.ec_level = val;
        self
    }

    /// # Panics
    /// Panics if `val` is zero.
    pub fn with_max_generation_attempts(mut self, val: u32) -> Self {
        assert!(val > 0, "max_generation_attempts must be at least 1");
        self.max_generation_attempts = val;
        self
    }

    /// The string encoded into the QR image for `token`.
    pub fn payload_for(&self, token: &Uuid) -> String {
        format!("{}{}", self.deep_link_base, token.hyphenated())
    }
}
