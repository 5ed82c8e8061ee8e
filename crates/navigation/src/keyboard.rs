use foundation::time::{Deadline, Millis};
use gesture::KeyEvent;
use globe::LookAt;
use serde::Serialize;
use tracing::{debug, trace};

use crate::config::NavigationConfig;
use crate::view::View;

pub const KEY_LEFT: u32 = 37;
pub const KEY_UP: u32 = 38;
pub const KEY_RIGHT: u32 = 39;
pub const KEY_DOWN: u32 = 40;
pub const KEY_N: u32 = 78;
pub const KEY_R: u32 = 82;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
pub enum KeyOperation {
    ZoomIn,
    ZoomOut,
    PanUp,
    PanDown,
    PanLeft,
    PanRight,
}

impl KeyOperation {
    pub fn from_key_code(key_code: u32) -> Option<Self> {
        match key_code {
            187 | 61 => Some(KeyOperation::ZoomIn),
            189 | 173 => Some(KeyOperation::ZoomOut),
            KEY_UP => Some(KeyOperation::PanUp),
            KEY_DOWN => Some(KeyOperation::PanDown),
            KEY_LEFT => Some(KeyOperation::PanLeft),
            KEY_RIGHT => Some(KeyOperation::PanRight),
            _ => None,
        }
    }

    fn heading_offset(self) -> f64 {
        match self {
            KeyOperation::PanDown => -180.0,
            KeyOperation::PanLeft => -90.0,
            KeyOperation::PanRight => 90.0,
            _ => 0.0,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
struct ActiveOperation {
    operation: KeyOperation,
    next: Deadline,
}

/// Keyboard zoom, pan and reset.
///
/// Holding a zoom or pan key repeats its step every
/// `keyboard_repeat_interval` as [`KeyboardControls::advance`] moves the
/// clock forward, until the key is released.
#[derive(Debug)]
pub struct KeyboardControls {
    pub enabled: bool,
    zoom_increment: f64,
    pan_increment: f64,
    repeat_interval: f64,
    look_at: LookAt,
    active: Option<ActiveOperation>,
}

impl KeyboardControls {
    pub fn new(config: &NavigationConfig) -> Self {
        Self {
            enabled: true,
            zoom_increment: config.keyboard_zoom_increment,
            pan_increment: config.keyboard_pan_increment,
            repeat_interval: config.keyboard_repeat_interval,
            look_at: LookAt::default(),
            active: None,
        }
    }

    pub fn active_operation(&self) -> Option<KeyOperation> {
        self.active.map(|a| a.operation)
    }

    /// Returns true when the key was consumed.
    pub fn key_down(&mut self, view: &mut View, event: &KeyEvent) -> bool {
        if !self.enabled {
            return false;
        }
        match event.key_code {
            KEY_N => {
                self.look_at = view.camera_as_look_at();
                self.look_at.heading = 0.0;
                self.push(view);
                true
            }
            KEY_R => {
                self.look_at = view.camera_as_look_at();
                self.look_at.heading = 0.0;
                self.look_at.tilt = 0.0;
                self.push(view);
                true
            }
            code => match KeyOperation::from_key_code(code) {
                Some(operation) => {
                    self.start(view, operation, event.time);
                    true
                }
                None => false,
            },
        }
    }

    /// Stops a repeating operation. Returns true if one was running.
    pub fn key_up(&mut self, _event: &KeyEvent) -> bool {
        match self.active.take() {
            Some(a) => {
                debug!(operation = ?a.operation, "key operation stopped");
                true
            }
            None => false,
        }
    }

    /// Runs every repeat step due by `now`.
    pub fn advance(&mut self, view: &mut View, now: Millis) {
        while let Some(mut active) = self.active {
            if !active.next.is_due(now) {
                break;
            }
            self.step(active.operation);
            self.push(view);
            active.next = Deadline::after(active.next.at, self.repeat_interval);
            self.active = Some(active);
        }
    }

    fn start(&mut self, view: &View, operation: KeyOperation, now: Millis) {
        // Key auto-repeat sends more downs for a held key.
        if self.active_operation() == Some(operation) {
            trace!(?operation, "key operation already running");
            return;
        }
        self.look_at = view.camera_as_look_at();
        self.active = Some(ActiveOperation {
            operation,
            next: Deadline::after(now, self.repeat_interval),
        });
        debug!(?operation, "key operation started");
    }

    fn step(&mut self, operation: KeyOperation) {
        match operation {
            KeyOperation::ZoomIn => self.look_at.range *= 1.0 - self.zoom_increment,
            KeyOperation::ZoomOut => self.look_at.range *= 1.0 + self.zoom_increment,
            _ => {
                let heading = self.look_at.heading + operation.heading_offset();
                let distance = self.pan_increment * self.look_at.range;
                let moved = self
                    .look_at
                    .position
                    .location()
                    .great_circle_location(heading, distance);
                self.look_at.position.latitude = moved.latitude;
                self.look_at.position.longitude = moved.longitude;
            }
        }
    }

    fn push(&self, view: &mut View) {
        view.camera_from_look_at(&self.look_at);
        view.redraw();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use foundation::math::Position;
    use globe::{Globe, Projection};
    use pretty_assertions::assert_eq;

    fn assert_close(a: f64, b: f64, eps: f64) {
        let diff = (a - b).abs();
        assert!(diff <= eps, "expected {a} ~= {b} (diff {diff})");
    }

    fn key(key_code: u32, t: f64) -> KeyEvent {
        KeyEvent {
            key_code,
            time: Millis(t),
        }
    }

    fn view_at(look_at: LookAt) -> View {
        let mut view = View::new(Globe::wgs84(), Projection::default());
        view.camera_from_look_at(&look_at);
        view
    }

    #[test]
    fn held_zoom_key_repeats_until_released() {
        let mut view = view_at(LookAt::new(Position::new(0.0, 0.0, 0.0), 10_000.0));
        let mut keys = KeyboardControls::new(&NavigationConfig::default());

        assert!(keys.key_down(&mut view, &key(187, 0.0)));
        keys.advance(&mut view, Millis(40.0));
        assert_close(view.camera_as_look_at().range, 10_000.0, 1e-3);

        keys.advance(&mut view, Millis(160.0));
        // Steps at 50, 100 and 150.
        assert_close(view.camera_as_look_at().range, 10_000.0 * 0.99f64.powi(3), 1e-3);

        // A repeated down for the held key does not restart the timer.
        assert!(keys.key_down(&mut view, &key(187, 170.0)));
        keys.advance(&mut view, Millis(200.0));
        assert_close(view.camera_as_look_at().range, 10_000.0 * 0.99f64.powi(4), 1e-3);

        assert!(keys.key_up(&key(187, 210.0)));
        assert!(!keys.key_up(&key(187, 220.0)));
        keys.advance(&mut view, Millis(1000.0));
        assert_close(view.camera_as_look_at().range, 10_000.0 * 0.99f64.powi(4), 1e-3);
    }

    #[test]
    fn pan_keys_follow_the_heading() {
        let mut view = view_at(LookAt::new(Position::new(0.0, 0.0, 0.0), 1.0e7));
        let mut keys = KeyboardControls::new(&NavigationConfig::default());

        keys.key_down(&mut view, &key(KEY_UP, 0.0));
        keys.advance(&mut view, Millis(50.0));
        keys.key_up(&key(KEY_UP, 60.0));
        let la = view.camera_as_look_at();
        assert!(la.position.latitude > 0.0);
        assert_close(la.position.longitude, 0.0, 1e-9);

        keys.key_down(&mut view, &key(KEY_RIGHT, 100.0));
        keys.advance(&mut view, Millis(150.0));
        let la = view.camera_as_look_at();
        assert!(la.position.longitude > 0.0);
        assert_eq!(keys.active_operation(), Some(KeyOperation::PanRight));
    }

    #[test]
    fn reset_keys_level_the_view() {
        let la = LookAt::new(Position::new(20.0, 30.0, 0.0), 50_000.0).with_orientation(60.0, 40.0, 0.0);
        let mut view = view_at(la);
        let mut keys = KeyboardControls::new(&NavigationConfig::default());

        assert!(keys.key_down(&mut view, &key(KEY_N, 0.0)));
        let after = view.camera_as_look_at();
        assert_close(after.heading, 0.0, 1e-6);
        assert_close(after.tilt, 40.0, 1e-6);

        assert!(keys.key_down(&mut view, &key(KEY_R, 10.0)));
        let after = view.camera_as_look_at();
        assert_close(after.tilt, 0.0, 1e-6);
        assert_close(after.position.latitude, 20.0, 1e-6);
        assert!(view.redraw_requested());
    }

    #[test]
    fn disabled_or_unknown_keys_are_ignored() {
        let mut view = view_at(LookAt::default());
        let mut keys = KeyboardControls::new(&NavigationConfig::default());
        assert!(!keys.key_down(&mut view, &key(65, 0.0)));
        keys.enabled = false;
        assert!(!keys.key_down(&mut view, &key(187, 0.0)));
        assert_eq!(keys.active_operation(), None);
    }
}
