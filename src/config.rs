use serde::Deserialize;
use thiserror::Error;

use crate::types::Size;

pub const MAX_IMAGE_WIDTH: f64 = 600.0;
pub const MAX_IMAGE_HEIGHT: f64 = 400.0;
pub const PAGE_WIDTH: f64 = 1080.0;
pub const PAGE_HEIGHT: f64 = 1080.0;
pub const EXPORT_PIXEL_RATIO: f64 = 1.0;
pub const UPLOAD_ACCEPT: &str = "image/*";

/// Id of the optional `<script type="application/json">` element in the
/// host page that overrides the defaults below.
pub const CONFIG_ELEMENT_ID: &str = "editor-config";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("malformed config: {0}")]
    Json(#[from] serde_json::Error),
    #[error("{field} must be a finite number greater than zero, got {value}")]
    NotPositive { field: &'static str, value: f64 },
}

fn check_positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NotPositive { field, value })
    }
}

/// Editor settings. Every field falls back to its default when omitted.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Largest size an inserted image may occupy before it is downscaled.
    pub max_image_size: Size,
    pub page_size: Size,
    pub pixel_ratio: f64,
    /// `accept` attribute for the upload file picker.
    pub accept: String,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            max_image_size: Size::new(MAX_IMAGE_WIDTH, MAX_IMAGE_HEIGHT),
            page_size: Size::new(PAGE_WIDTH, PAGE_HEIGHT),
            pixel_ratio: EXPORT_PIXEL_RATIO,
            accept: UPLOAD_ACCEPT.to_string(),
        }
    }
}

impl EditorConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Every size and the pixel ratio must be finite and positive.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_positive("max_image_size.width", self.max_image_size.width)?;
        check_positive("max_image_size.height", self.max_image_size.height)?;
        check_positive("page_size.width", self.page_size.width)?;
        check_positive("page_size.height", self.page_size.height)?;
        check_positive("pixel_ratio", self.pixel_ratio)
    }

    /// Reads the config embedded in the host page, falling back to the
    /// defaults when it is absent or malformed.
    pub fn from_document() -> Self {
        let Some(text) = gloo_utils::document()
            .get_element_by_id(CONFIG_ELEMENT_ID)
            .and_then(|el| el.text_content())
        else {
            return Self::default();
        };

        match Self::from_json(&text) {
            Ok(config) => config,
            Err(e) => {
                log::warn!("ignoring invalid #{}: {}", CONFIG_ELEMENT_ID, e);
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EditorConfig::default();
        assert_eq!(config.max_image_size, Size::new(600.0, 400.0));
        assert_eq!(config.accept, "image/*");
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config =
            EditorConfig::from_json(r#"{"max_image_size": {"width": 300, "height": 200}}"#)
                .unwrap();
        assert_eq!(config.max_image_size, Size::new(300.0, 200.0));
        assert_eq!(config.page_size, Size::new(PAGE_WIDTH, PAGE_HEIGHT));
        assert_eq!(config.pixel_ratio, 1.0);
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(
            EditorConfig::from_json("{not json"),
            Err(ConfigError::Json(_))
        ));
    }

    #[test]
    fn test_negative_bound_rejected() {
        let err = EditorConfig::from_json(r#"{"max_image_size": {"width": -600, "height": 400}}"#)
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::NotPositive { field: "max_image_size.width", .. }
        ));
    }

    #[test]
    fn test_zero_pixel_ratio_rejected() {
        let err = EditorConfig::from_json(r#"{"pixel_ratio": 0}"#).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::NotPositive { field: "pixel_ratio", .. }
        ));
    }

    #[test]
    fn test_zero_page_height_rejected() {
        assert!(EditorConfig::from_json(r#"{"page_size": {"width": 100, "height": 0}}"#).is_err());
    }
}
