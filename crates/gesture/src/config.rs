use serde::{Deserialize, Serialize};

/// Thresholds shared by the recognizers. Distances are CSS pixels, times are
/// milliseconds, angles are degrees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GestureConfig {
    pub translation_weight: f64,
    pub drag_interpret_distance: f64,
    pub pan_interpret_distance: f64,
    pub pinch_interpret_distance: f64,
    pub pinch_weight: f64,
    pub rotation_interpret_angle: f64,
    pub rotation_weight: f64,
    pub tilt_max_touch_distance: f64,
    pub tilt_max_touch_divergence: f64,
    pub tap_max_touch_movement: f64,
    pub tap_max_duration: f64,
    pub tap_max_interval: f64,
    pub click_max_mouse_movement: f64,
    pub click_max_duration: f64,
    pub click_max_interval: f64,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            translation_weight: 0.4,
            drag_interpret_distance: 5.0,
            pan_interpret_distance: 20.0,
            pinch_interpret_distance: 20.0,
            pinch_weight: 0.4,
            rotation_interpret_angle: 20.0,
            rotation_weight: 0.4,
            tilt_max_touch_distance: 250.0,
            tilt_max_touch_divergence: 50.0,
            tap_max_touch_movement: 20.0,
            tap_max_duration: 500.0,
            tap_max_interval: 400.0,
            click_max_mouse_movement: 5.0,
            click_max_duration: 500.0,
            click_max_interval: 400.0,
        }
    }
}

impl GestureConfig {
    /// Names of fields that are out of range.
    pub fn invalid_fields(&self) -> Vec<&'static str> {
        let mut bad = Vec::new();
        let weights = [
            ("translation_weight", self.translation_weight),
            ("pinch_weight", self.pinch_weight),
            ("rotation_weight", self.rotation_weight),
        ];
        for (name, w) in weights {
            if !(w > 0.0 && w <= 1.0) {
                bad.push(name);
            }
        }
        let non_negative = [
            ("drag_interpret_distance", self.drag_interpret_distance),
            ("pan_interpret_distance", self.pan_interpret_distance),
            ("pinch_interpret_distance", self.pinch_interpret_distance),
            ("rotation_interpret_angle", self.rotation_interpret_angle),
            ("tilt_max_touch_distance", self.tilt_max_touch_distance),
            ("tilt_max_touch_divergence", self.tilt_max_touch_divergence),
            ("tap_max_touch_movement", self.tap_max_touch_movement),
            ("tap_max_duration", self.tap_max_duration),
            ("tap_max_interval", self.tap_max_interval),
            ("click_max_mouse_movement", self.click_max_mouse_movement),
            ("click_max_duration", self.click_max_duration),
            ("click_max_interval", self.click_max_interval),
        ];
        for (name, v) in non_negative {
            if !(v >= 0.0 && v.is_finite()) {
                bad.push(name);
            }
        }
        bad
    }
}
