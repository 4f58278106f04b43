//! Runtime application configuration loaded from DB + environment overrides.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use qr_service::QrConfig;

use super::defaults::get_default;
use super::manager::SettingsManager;
use super::validation::validate_setting;

/// Runtime configuration populated from the settings DB.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub qr: QrConfig,
    pub public_base_url: String,
    pub image_dir: PathBuf,
}

impl AppConfig {
    /// Load configuration from the settings manager (DB-first, env overrides).
    ///
    /// Invalid values are logged and replaced by their defaults.
    pub fn load(sm: &SettingsManager, data_dir: &Path) -> Result<Self, anyhow::Error> {
        let g = |key: &str| -> String {
            let value = std::env::var(key)
                .ok()
                .or_else(|| sm.get_setting(key).ok())
                .unwrap_or_default();
            match validate_setting(key, &value) {
                Ok(()) => value,
                Err(e) => {
                    tracing::warn!(key, value = %value, "Invalid setting, using default: {e}");
                    get_default(key).unwrap_or_default().to_string()
                }
            }
        };

        let qr = QrConfig::new()
            .with_deep_link_base(g("QR_DEEP_LINK_BASE"))
            .with_image_size(parse_or_default(&g("QR_IMAGE_SIZE"), "QR_IMAGE_SIZE"))
            .with_image_format(parse_or_default(&g("QR_IMAGE_FORMAT"), "QR_IMAGE_FORMAT"))
            .with_ec_level(parse_or_default(&g("QR_EC_LEVEL"), "QR_EC_LEVEL"))
            .with_max_generation_attempts(parse_or_default(
                &g("QR_MAX_GENERATION_ATTEMPTS"),
                "QR_MAX_GENERATION_ATTEMPTS",
            ));

        let image_dir = match g("QR_IMAGE_DIR") {
            dir if dir.trim().is_empty() => data_dir.join("qr"),
            dir => PathBuf::from(dir),
        };

        Ok(Self {
            qr,
            public_base_url: g("QR_PUBLIC_BASE_URL"),
            image_dir,
        })
    }
}

/// Parse a validated value, falling back to the built-in default.
fn parse_or_default<T>(value: &str, key: &str) -> T
where
    T: FromStr + Default,
{
    value
        .trim()
        .parse()
        .ok()
        .or_else(|| get_default(key).and_then(|d| d.parse().ok()))
        .unwrap_or_default()
}
