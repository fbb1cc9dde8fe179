//! Editor configuration.

use crate::error::{EditorError, EditorResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Maximum delay between two presses for them to form a double-click.
pub const DEFAULT_DOUBLE_CLICK_MS: u64 = 300;
/// Maximum pointer travel (device pixels) between the two presses of a double-click.
pub const DEFAULT_DOUBLE_CLICK_DISTANCE: f64 = 5.0;

/// Tunables for input interpretation and editing helpers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Double-click window in milliseconds (inclusive).
    pub double_click_ms: u64,
    /// Double-click distance tolerance in device pixels.
    pub double_click_distance: f64,
    pub min_zoom: f64,
    pub max_zoom: f64,
    /// Zoom factor applied per wheel notch when zooming.
    pub wheel_zoom_step: f64,
    /// Arrow-key nudge distance in logical units.
    pub nudge_step: f64,
    /// Arrow-key nudge distance with shift held.
    pub nudge_step_large: f64,
    /// Offset applied to each successive paste.
    pub paste_offset: f64,
    /// Hit-test tolerance in logical units.
    pub hit_tolerance: f64,
    /// Maximum undo entries to keep (`None` keeps everything).
    pub undo_limit: Option<usize>,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            double_click_ms: DEFAULT_DOUBLE_CLICK_MS,
            double_click_distance: DEFAULT_DOUBLE_CLICK_DISTANCE,
            min_zoom: 0.1,
            max_zoom: 10.0,
            wheel_zoom_step: 1.1,
            nudge_step: 1.0,
            nudge_step_large: 10.0,
            paste_offset: 10.0,
            hit_tolerance: 4.0,
            undo_limit: None,
        }
    }
}

impl EditorConfig {
    /// Parse a configuration from JSON. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> EditorResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration file.
    pub fn load(path: impl AsRef<Path>) -> EditorResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        log::debug!("Loaded editor config from {}", path.display());
        Self::from_json_str(&json)
    }

    /// Serialize the configuration to pretty JSON.
    pub fn to_json(&self) -> EditorResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject values the editor cannot work with.
    pub fn validate(&self) -> EditorResult<()> {
        if !(self.min_zoom > 0.0 && self.min_zoom <= self.max_zoom) {
            return Err(EditorError::Config(format!(
                "zoom range {}..{} is invalid",
                self.min_zoom, self.max_zoom
            )));
        }
        if self.wheel_zoom_step <= 1.0 {
            return Err(EditorError::Config(
                "wheel_zoom_step must be greater than 1".to_string(),
            ));
        }
        if self.double_click_distance < 0.0 || self.hit_tolerance < 0.0 {
            return Err(EditorError::Config(
                "distances must not be negative".to_string(),
            ));
        }
        if self.undo_limit == Some(0) {
            return Err(EditorError::Config(
                "undo_limit must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_are_valid() {
        let config = EditorConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.double_click_ms, 300);
        assert!(config.undo_limit.is_none());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = EditorConfig::from_json_str(r#"{ "double_click_ms": 250 }"#).unwrap();
        assert_eq!(config.double_click_ms, 250);
        assert!((config.max_zoom - 10.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_invalid_zoom_range_rejected() {
        let result = EditorConfig::from_json_str(r#"{ "min_zoom": 5.0, "max_zoom": 2.0 }"#);
        assert!(matches!(result, Err(EditorError::Config(_))));
    }

    #[test]
    fn test_zero_undo_limit_rejected() {
        let result = EditorConfig::from_json_str(r#"{ "undo_limit": 0 }"#);
        assert!(matches!(result, Err(EditorError::Config(_))));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "nudge_step": 2.5, "undo_limit": 20 }}"#).unwrap();

        let config = EditorConfig::load(file.path()).unwrap();
        assert!((config.nudge_step - 2.5).abs() < f64::EPSILON);
        assert_eq!(config.undo_limit, Some(20));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = EditorConfig::load(dir.path().join("missing.json"));
        assert!(matches!(result, Err(EditorError::Io(_))));
    }

    #[test]
    fn test_json_roundtrip() {
        let mut config = EditorConfig::default();
        config.paste_offset = 24.0;
        let json = config.to_json().unwrap();
        assert_eq!(EditorConfig::from_json_str(&json).unwrap(), config);
    }
}
