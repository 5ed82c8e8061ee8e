use std::fs;
use std::path::Path;

use gesture::GestureConfig;
use serde::{Deserialize, Serialize};
use terrain::TessellationConfig;

use crate::error::ConfigError;

/// Camera navigation tunables. Times are milliseconds, angles degrees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavigationConfig {
    /// Wheel events closer together than this reuse the working look-at.
    pub wheel_resync_interval: f64,
    pub wheel_pixel_scale: f64,
    pub wheel_line_scale: f64,
    pub wheel_page_scale: f64,
    /// Normalized wheel delta that changes the range by 100%.
    pub wheel_zoom_divisor: f64,
    /// Heading change for a secondary drag across the full canvas width.
    pub drag_heading_scale: f64,
    /// Tilt change for a drag across the full canvas height.
    pub drag_tilt_scale: f64,
    pub field_of_view: f64,
    pub min_range: f64,
    pub keyboard_zoom_increment: f64,
    /// Great-circle radians moved per meter of range, per repeat.
    pub keyboard_pan_increment: f64,
    pub keyboard_repeat_interval: f64,
    /// Install click and tap recognizers that record pick requests.
    pub pick_gestures: bool,
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            wheel_resync_interval: 500.0,
            wheel_pixel_scale: 1.0,
            wheel_line_scale: 40.0,
            wheel_page_scale: 400.0,
            wheel_zoom_divisor: 1000.0,
            drag_heading_scale: 180.0,
            drag_tilt_scale: 90.0,
            field_of_view: 45.0,
            min_range: 1.0,
            keyboard_zoom_increment: 0.01,
            keyboard_pan_increment: 0.000_000_000_5,
            keyboard_repeat_interval: 50.0,
            pick_gestures: true,
        }
    }
}

impl NavigationConfig {
    pub fn invalid_fields(&self) -> Vec<&'static str> {
        let positive = [
            ("wheel_pixel_scale", self.wheel_pixel_scale),
            ("wheel_line_scale", self.wheel_line_scale),
            ("wheel_page_scale", self.wheel_page_scale),
            ("wheel_zoom_divisor", self.wheel_zoom_divisor),
            ("min_range", self.min_range),
            ("keyboard_repeat_interval", self.keyboard_repeat_interval),
        ];
        let non_negative = [
            ("wheel_resync_interval", self.wheel_resync_interval),
            ("drag_heading_scale", self.drag_heading_scale),
            ("drag_tilt_scale", self.drag_tilt_scale),
            ("keyboard_zoom_increment", self.keyboard_zoom_increment),
            ("keyboard_pan_increment", self.keyboard_pan_increment),
        ];

        let mut bad: Vec<&'static str> = positive
            .into_iter()
            .filter(|(_, v)| !(v.is_finite() && *v > 0.0))
            .map(|(name, _)| name)
            .collect();
        bad.extend(
            non_negative
                .into_iter()
                .filter(|(_, v)| !(v.is_finite() && *v >= 0.0))
                .map(|(name, _)| name),
        );
        if !(self.field_of_view > 0.0 && self.field_of_view < 180.0) {
            bad.push("field_of_view");
        }
        if self.keyboard_zoom_increment >= 1.0 {
            bad.push("keyboard_zoom_increment");
        }
        bad
    }
}

/// Everything a window needs, loadable from one JSON document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub gesture: GestureConfig,
    pub navigation: NavigationConfig,
    pub tessellation: TessellationConfig,
}

impl EngineConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let payload = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&payload)
    }

    /// Parses and validates. Missing fields take their defaults.
    pub fn from_json(payload: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = serde_json::from_str(payload)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json_pretty(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(field) = self.gesture.invalid_fields().first().copied() {
            return Err(ConfigError::Gesture(field));
        }
        if let Some(field) = self.navigation.invalid_fields().first().copied() {
            return Err(ConfigError::Navigation(field));
        }
        self.tessellation.level_set()?;
        Ok(())
    }
}
