//! All setting definitions with their default values.

use std::collections::BTreeMap;
use std::sync::LazyLock;

/// A single setting definition.
#[derive(Debug, Clone)]
pub struct SettingDef {
    pub key: &'static str,
    pub default: &'static str,
    pub description: &'static str,
}

const DEFS: &[(&str, &str, &str)] = &[
    (
        "QR_DEEP_LINK_BASE",
        "artqr://artwork/scan?token=",
        "Prefix of the link encoded in QR images; the token is appended",
    ),
    ("QR_IMAGE_SIZE", "512", "Edge length of QR images in pixels"),
    ("QR_IMAGE_FORMAT", "png", "QR image format: png or svg"),
    ("QR_EC_LEVEL", "M", "QR error-correction level: L, M, Q or H"),
    (
        "QR_MAX_GENERATION_ATTEMPTS",
        "3",
        "Token regenerations allowed after a collision",
    ),
    (
        "QR_PUBLIC_BASE_URL",
        "http://localhost:8080/qr",
        "Public URL prefix under which stored QR images are served",
    ),
    (
        "QR_IMAGE_DIR",
        "",
        "Directory QR images are written to (empty: <data dir>/qr)",
    ),
];

/// Global setting definitions indexed by key.
pub static DEFAULT_SETTINGS: LazyLock<BTreeMap<&'static str, SettingDef>> = LazyLock::new(|| {
    DEFS.iter()
        .map(|&(key, default, description)| {
            (
                key,
                SettingDef {
                    key,
                    default,
                    description,
                },
            )
        })
        .collect()
});

/// Get the default value for a setting key, or `None` if not defined.
pub fn get_default(key: &str) -> Option<&'static str> {
    DEFAULT_SETTINGS.get(key).map(|d| d.default)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::validation::validate_setting;

    #[test]
    fn defaults_pass_validation() {
        for def in DEFAULT_SETTINGS.values() {
            assert!(
                validate_setting(def.key, def.default).is_ok(),
                "default for {} is invalid",
                def.key
            );
        }
    }

    #[test]
    fn unknown_key_has_no_default() {
        assert_eq!(get_default("QR_IMAGE_SIZE"), Some("512"));
        assert_eq!(get_default("NOPE"), None);
    }
}
