//! Setting value validation.

use qr_render::{
    ErrorCorrection, ImageFormat,
    qr::{MAX_SIZE, MIN_SIZE},
};
use url::Url;

/// Validate a setting value. Returns `Ok(())` if valid, or an error message.
pub fn validate_setting(key: &str, value: &str) -> Result<(), String> {
    match key {
        "QR_DEEP_LINK_BASE" | "QR_PUBLIC_BASE_URL" => {
            Url::parse(value).map_err(|e| format!("must be an absolute URL: {e}"))?;
        }
        "QR_IMAGE_SIZE" => validate_int_range(value, i64::from(MIN_SIZE), i64::from(MAX_SIZE))?,
        "QR_IMAGE_FORMAT" => {
            value
                .parse::<ImageFormat>()
                .map_err(|_| "must be 'png' or 'svg'")?;
        }
        "QR_EC_LEVEL" => {
            value
                .parse::<ErrorCorrection>()
                .map_err(|_| "must be one of L, M, Q, H")?;
        }
        "QR_MAX_GENERATION_ATTEMPTS" => validate_int_range(value, 1, 10)?,
        _ => {}
    }
    Ok(())
}

fn validate_int_range(value: &str, min: i64, max: i64) -> Result<(), String> {
    let v: i64 = value.trim().parse().map_err(|_| "must be an integer")?;
    if !(min..=max).contains(&v) {
        return Err(format!("must be between {min} and {max}"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_urls() {
        assert!(validate_setting("QR_DEEP_LINK_BASE", "artqr://artwork/scan?token=").is_ok());
        assert!(validate_setting("QR_PUBLIC_BASE_URL", "https://cdn.example/qr").is_ok());
        assert!(validate_setting("QR_PUBLIC_BASE_URL", "/relative/path").is_err());
    }

    #[test]
    fn test_image_size_bounds() {
        assert!(validate_setting("QR_IMAGE_SIZE", "512").is_ok());
        assert!(validate_setting("QR_IMAGE_SIZE", "29").is_ok());
        assert!(validate_setting("QR_IMAGE_SIZE", "28").is_err());
        assert!(validate_setting("QR_IMAGE_SIZE", "4096").is_ok());
        assert!(validate_setting("QR_IMAGE_SIZE", "4097").is_err());
        assert!(validate_setting("QR_IMAGE_SIZE", "big").is_err());
    }

    #[test]
    fn test_enums() {
        assert!(validate_setting("QR_IMAGE_FORMAT", "svg").is_ok());
        assert!(validate_setting("QR_IMAGE_FORMAT", "jpeg").is_err());
        assert!(validate_setting("QR_EC_LEVEL", "h").is_ok());
        assert!(validate_setting("QR_EC_LEVEL", "X").is_err());
    }

    #[test]
    fn test_attempts() {
        assert!(validate_setting("QR_MAX_GENERATION_ATTEMPTS", "3").is_ok());
        assert!(validate_setting("QR_MAX_GENERATION_ATTEMPTS", "0").is_err());
    }
}
