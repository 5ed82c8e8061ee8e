use std::fmt;

use foundation::math::{
    Line, RADIANS_TO_DEGREES, Vec2, normalized_degrees, normalized_degrees_longitude,
};
use foundation::time::Millis;
use gesture::{
    ClickRecognizer, DeltaMode, DragRecognizer, GestureConfig, GestureError, GestureSnapshot,
    GestureState, PanRecognizer, PinchRecognizer, RecognizerId, RecognizerRegistry,
    RotationRecognizer, TapRecognizer, TargetId, TiltRecognizer, WheelEvent,
};
use globe::{LookAt, extract_viewing_parameters, look_at_viewing_transform};
use tracing::{debug, trace};

use crate::config::NavigationConfig;
use crate::view::View;

/// Turns gesture notifications and wheel input into camera changes.
pub trait WorldWindowController: fmt::Debug {
    fn gesture_state_changed(&mut self, view: &mut View, gesture: &GestureSnapshot);

    fn handle_wheel(&mut self, view: &mut View, event: &WheelEvent);

    /// Canvas points the user clicked or tapped since the last call.
    fn take_pick_requests(&mut self) -> Vec<Vec2> {
        Vec::new()
    }
}

/// Recognizers a [`BasicWorldWindowController`] listens to.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct NavigationRecognizers {
    pub primary_drag: RecognizerId,
    pub secondary_drag: RecognizerId,
    pub pan: RecognizerId,
    pub pinch: RecognizerId,
    pub rotation: RecognizerId,
    pub tilt: RecognizerId,
    pub click: Option<RecognizerId>,
    pub tap: Option<RecognizerId>,
}

impl NavigationRecognizers {
    /// Adds the navigation recognizers for `target` and wires up their
    /// relationships.
    pub fn install(
        registry: &mut RecognizerRegistry,
        target: TargetId,
        config: &GestureConfig,
        pick_gestures: bool,
    ) -> Result<Self, GestureError> {
        let primary_drag = registry.add(target, DragRecognizer::new(config));
        let secondary_drag = registry.add(target, DragRecognizer::new(config).with_button(2));
        let pan = registry.add(target, PanRecognizer::new(config));
        let pinch = registry.add(target, PinchRecognizer::new(config));
        let rotation = registry.add(target, RotationRecognizer::new(config));
        let tilt = registry.add(target, TiltRecognizer::new(config).with_max_touches(2));

        registry.recognize_simultaneously(pan, pinch)?;
        registry.recognize_simultaneously(pan, rotation)?;
        registry.recognize_simultaneously(pinch, rotation)?;
        registry.require_failure(tilt, pan)?;
        registry.require_failure(tilt, pinch)?;
        registry.require_failure(tilt, rotation)?;

        let (click, tap) = if pick_gestures {
            let click = registry.add(target, ClickRecognizer::new(config));
            let tap = registry.add(target, TapRecognizer::new(config));
            (Some(click), Some(tap))
        } else {
            (None, None)
        };

        Ok(Self {
            primary_drag,
            secondary_drag,
            pan,
            pinch,
            rotation,
            tilt,
            click,
            tap,
        })
    }

    fn is_pick(&self, id: RecognizerId) -> bool {
        self.click == Some(id) || self.tap == Some(id)
    }
}

/// Latitude and longitude change, in degrees, for a surface drag of
/// `(dx, dy)` pixels at `heading`.
pub fn pan_delta_3d(
    heading: f64,
    meters_per_pixel: f64,
    globe_radius: f64,
    dx: f64,
    dy: f64,
) -> (f64, f64) {
    let forward = dy * meters_per_pixel / globe_radius * RADIANS_TO_DEGREES;
    let side = -dx * meters_per_pixel / globe_radius * RADIANS_TO_DEGREES;
    let (sin_h, cos_h) = heading.to_radians().sin_cos();
    (
        forward * cos_h - side * sin_h,
        forward * sin_h + side * cos_h,
    )
}

/// The default navigation: drag or one-finger pan moves across the globe,
/// secondary drag turns and tilts, pinch zooms, two-finger rotation turns,
/// two-finger vertical drag tilts, the wheel zooms.
#[derive(Debug)]
pub struct BasicWorldWindowController {
    config: NavigationConfig,
    recognizers: NavigationRecognizers,
    begin_look_at: LookAt,
    look_at: LookAt,
    begin_point: Vec2,
    last_point: Vec2,
    last_rotation: f64,
    last_wheel_event: Option<Millis>,
    active_gestures: u32,
    pick_requests: Vec<Vec2>,
}

impl BasicWorldWindowController {
    pub fn new(
        registry: &mut RecognizerRegistry,
        target: TargetId,
        gesture: &GestureConfig,
        config: &NavigationConfig,
    ) -> Result<Self, GestureError> {
        let recognizers =
            NavigationRecognizers::install(registry, target, gesture, config.pick_gestures)?;
        Ok(Self {
            config: config.clone(),
            recognizers,
            begin_look_at: LookAt::default(),
            look_at: LookAt::default(),
            begin_point: Vec2::ZERO,
            last_point: Vec2::ZERO,
            last_rotation: 0.0,
            last_wheel_event: None,
            active_gestures: 0,
            pick_requests: Vec::new(),
        })
    }

    pub fn recognizers(&self) -> &NavigationRecognizers {
        &self.recognizers
    }

    /// The working look-at edited by the current gesture.
    pub fn look_at(&self) -> &LookAt {
        &self.look_at
    }

    pub fn active_gestures(&self) -> u32 {
        self.active_gestures
    }

    pub fn gesture_did_begin(&mut self, view: &View) {
        if self.active_gestures == 0 {
            self.begin_look_at = view.camera_as_look_at();
            self.look_at = self.begin_look_at;
            debug!(range = self.look_at.range, "navigation began");
        }
        self.active_gestures += 1;
    }

    pub fn gesture_did_end(&mut self) {
        if self.active_gestures > 0 {
            self.active_gestures -= 1;
            if self.active_gestures == 0 {
                debug!(range = self.look_at.range, "navigation ended");
            }
        }
    }

    /// Clamps and normalizes the working look-at, then moves the camera to it.
    pub fn apply_changes(&mut self, view: &mut View) {
        let la = &mut self.look_at;
        la.position.latitude = la.position.latitude.clamp(-90.0, 90.0);
        la.position.longitude = normalized_degrees_longitude(la.position.longitude);
        la.range = la.range.max(self.config.min_range);
        la.heading = normalized_degrees(la.heading);
        la.tilt = la.tilt.clamp(0.0, 90.0);
        la.roll = normalized_degrees(la.roll);

        if view.globe.is_2d() {
            let max_range = 2.0 * std::f64::consts::PI * view.globe.equatorial_radius();
            la.range = la.range.min(max_range);
            la.tilt = 0.0;
        }

        view.camera_from_look_at(la);
        view.redraw();
    }

    fn handle_pan_or_drag(&mut self, view: &mut View, g: &GestureSnapshot) {
        if view.globe.is_2d() {
            self.handle_pan_or_drag_2d(view, g);
        } else {
            self.handle_pan_or_drag_3d(view, g);
        }
    }

    fn handle_pan_or_drag_3d(&mut self, view: &mut View, g: &GestureSnapshot) {
        match g.state {
            GestureState::Began => {
                self.gesture_did_begin(view);
                self.last_point = Vec2::ZERO;
            }
            GestureState::Changed => {
                let translation = Vec2::new(g.translation_x, g.translation_y);
                let delta = translation - self.last_point;
                self.last_point = translation;

                let vp = view.viewport();
                let mpp = view.projection.perspective_pixel_size(
                    vp.width,
                    vp.height,
                    self.look_at.range.max(1.0),
                );
                let (d_lat, d_lon) = pan_delta_3d(
                    self.look_at.heading,
                    mpp,
                    view.globe.radius(),
                    delta.x,
                    delta.y,
                );
                self.look_at.position.latitude += d_lat;
                self.look_at.position.longitude += d_lon;
                self.apply_changes(view);
            }
            GestureState::Ended | GestureState::Cancelled => self.gesture_did_end(),
            _ => {}
        }
    }

    fn handle_pan_or_drag_2d(&mut self, view: &mut View, g: &GestureSnapshot) {
        match g.state {
            GestureState::Began => {
                self.gesture_did_begin(view);
                self.begin_point = Vec2::new(g.client_x, g.client_y);
                self.last_point = self.begin_point;
            }
            GestureState::Changed => {
                let from = self.last_point;
                let to = self.begin_point + Vec2::new(g.translation_x, g.translation_y);
                self.last_point = to;
                if self.drag_flat_view(view, from, to).is_none() {
                    trace!("drag left the map, view unchanged");
                    return;
                }
                self.apply_changes(view);
            }
            GestureState::Ended | GestureState::Cancelled => self.gesture_did_end(),
            _ => {}
        }
    }

    /// Moves the working look-at so the map point under `from` ends up
    /// under `to`. `None` when either point is off the map.
    fn drag_flat_view(&mut self, view: &View, from: Vec2, to: Vec2) -> Option<()> {
        let modelview = look_at_viewing_transform(&view.globe, &self.look_at);
        let p1 = view.canvas_coordinates(from.x, from.y);
        let p2 = view.canvas_coordinates(to.x, to.y);
        let ray1 = view.projection.ray_through_screen_point(&modelview, p1)?;
        let ray2 = view.projection.ray_through_screen_point(&modelview, p2)?;
        let point1 = view.globe.intersects_line(&ray1)?;
        let point2 = view.globe.intersects_line(&ray2)?;

        let mut moved = modelview;
        let d = point2 - point1;
        moved.multiply_by_translation(d.x, d.y, d.z);

        let center = Line::new(moved.extract_eye_point(), moved.extract_forward_vector());
        let origin = view.globe.intersects_line(&center)?;
        let params = extract_viewing_parameters(&view.globe, &moved, origin, self.look_at.roll);

        self.look_at.position = params.origin;
        self.look_at.range = params.range;
        self.look_at.heading = params.heading;
        self.look_at.tilt = params.tilt;
        self.look_at.roll = params.roll;
        Some(())
    }

    fn handle_secondary_drag(&mut self, view: &mut View, g: &GestureSnapshot) {
        match g.state {
            GestureState::Began => self.gesture_did_begin(view),
            GestureState::Changed => {
                let vp = view.viewport();
                let heading = self.config.drag_heading_scale * g.translation_x / vp.width;
                let tilt = self.config.drag_tilt_scale * g.translation_y / vp.height;
                self.look_at.heading = self.begin_look_at.heading + heading;
                self.look_at.tilt = self.begin_look_at.tilt + tilt;
                self.apply_changes(view);
            }
            GestureState::Ended | GestureState::Cancelled => self.gesture_did_end(),
            _ => {}
        }
    }

    fn handle_pinch(&mut self, view: &mut View, g: &GestureSnapshot) {
        match g.state {
            GestureState::Began => self.gesture_did_begin(view),
            GestureState::Changed => {
                let scale = g.scale.unwrap_or(1.0);
                if scale != 0.0 {
                    self.look_at.range = self.begin_look_at.range / scale;
                    self.apply_changes(view);
                }
            }
            GestureState::Ended | GestureState::Cancelled => self.gesture_did_end(),
            _ => {}
        }
    }

    fn handle_rotation(&mut self, view: &mut View, g: &GestureSnapshot) {
        match g.state {
            GestureState::Began => {
                self.gesture_did_begin(view);
                self.last_rotation = 0.0;
            }
            GestureState::Changed => {
                let rotation = g.rotation.unwrap_or(0.0);
                self.look_at.heading -= rotation - self.last_rotation;
                self.last_rotation = rotation;
                self.apply_changes(view);
            }
            GestureState::Ended | GestureState::Cancelled => self.gesture_did_end(),
            _ => {}
        }
    }

    fn handle_tilt(&mut self, view: &mut View, g: &GestureSnapshot) {
        match g.state {
            GestureState::Began => self.gesture_did_begin(view),
            GestureState::Changed => {
                let tilt = self.config.drag_tilt_scale * g.translation_y / view.viewport().height;
                self.look_at.tilt = self.begin_look_at.tilt - tilt;
                self.apply_changes(view);
            }
            GestureState::Ended | GestureState::Cancelled => self.gesture_did_end(),
            _ => {}
        }
    }

    fn handle_pick(&mut self, view: &View, g: &GestureSnapshot) {
        if g.state == GestureState::Recognized {
            let point = view.canvas_coordinates(g.client_x, g.client_y);
            debug!(x = point.x, y = point.y, kind = ?g.kind, "pick requested");
            self.pick_requests.push(point);
        }
    }

    fn wheel_scale(&self, mode: DeltaMode) -> f64 {
        match mode {
            DeltaMode::Pixel => self.config.wheel_pixel_scale,
            DeltaMode::Line => self.config.wheel_line_scale,
            DeltaMode::Page => self.config.wheel_page_scale,
        }
    }
}

impl WorldWindowController for BasicWorldWindowController {
    fn gesture_state_changed(&mut self, view: &mut View, g: &GestureSnapshot) {
        let r = self.recognizers;
        if g.id == r.primary_drag || g.id == r.pan {
            self.handle_pan_or_drag(view, g);
        } else if g.id == r.secondary_drag {
            self.handle_secondary_drag(view, g);
        } else if g.id == r.pinch {
            self.handle_pinch(view, g);
        } else if g.id == r.rotation {
            self.handle_rotation(view, g);
        } else if g.id == r.tilt {
            self.handle_tilt(view, g);
        } else if r.is_pick(g.id) {
            self.handle_pick(view, g);
        } else {
            trace!(id = g.id.0, kind = ?g.kind, "gesture not handled");
        }
    }

    fn handle_wheel(&mut self, view: &mut View, event: &WheelEvent) {
        let resync = self.last_wheel_event.is_none_or(|last| {
            event.time.elapsed_since(last) > self.config.wheel_resync_interval
        });
        if resync {
            self.look_at = view.camera_as_look_at();
            self.last_wheel_event = Some(event.time);
            debug!(range = self.look_at.range, "wheel resynced look-at");
        }

        let delta = event.delta_y * self.wheel_scale(event.delta_mode);
        self.look_at.range *= 1.0 + delta / self.config.wheel_zoom_divisor;
        self.apply_changes(view);
    }

    fn take_pick_requests(&mut self) -> Vec<Vec2> {
        std::mem::take(&mut self.pick_requests)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use foundation::math::{Ellipsoid, Position};
    use gesture::GestureKind;
    use globe::{Globe, GlobeProjection, Projection, ZeroElevation};
    use pretty_assertions::assert_eq;

    fn assert_close(a: f64, b: f64, eps: f64) {
        let diff = (a - b).abs();
        assert!(diff <= eps, "expected {a} ~= {b} (diff {diff})");
    }

    fn setup(globe: Globe) -> (View, RecognizerRegistry, BasicWorldWindowController) {
        let mut registry = RecognizerRegistry::default();
        let controller = BasicWorldWindowController::new(
            &mut registry,
            TargetId(0),
            &GestureConfig::default(),
            &NavigationConfig::default(),
        )
        .unwrap();
        let mut view = View::new(globe, Projection::default());
        view.camera_from_look_at(&LookAt::new(Position::new(10.0, 20.0, 0.0), 1000.0));
        (view, registry, controller)
    }

    fn snapshot(id: RecognizerId, kind: GestureKind, state: GestureState) -> GestureSnapshot {
        GestureSnapshot {
            id,
            target: TargetId(0),
            kind,
            state,
            client_x: 0.0,
            client_y: 0.0,
            translation_x: 0.0,
            translation_y: 0.0,
            mouse_button_mask: 0,
            touch_count: 0,
            scale: None,
            rotation: None,
        }
    }

    fn wheel(delta_y: f64, mode: DeltaMode, t: f64) -> WheelEvent {
        WheelEvent {
            client_x: 0.0,
            client_y: 0.0,
            delta_y,
            delta_mode: mode,
            time: Millis(t),
        }
    }

    #[test]
    fn heading_east_pan_moves_only_longitude() {
        let radius = 6_378_137.0;
        let (d_lat, d_lon) = pan_delta_3d(90.0, 2.0, radius, 0.0, 10.0);
        let forward_degrees = 20.0 / radius * RADIANS_TO_DEGREES;
        assert_close(d_lat, 0.0, 1e-15);
        assert_close(d_lon, forward_degrees, 1e-15);

        let (d_lat, d_lon) = pan_delta_3d(0.0, 2.0, radius, 0.0, 10.0);
        assert_close(d_lat, forward_degrees, 1e-15);
        assert_close(d_lon, 0.0, 1e-15);
    }

    #[test]
    fn horizontal_drag_at_north_heading_moves_west() {
        let (d_lat, d_lon) = pan_delta_3d(0.0, 1.0, 1000.0, 10.0, 0.0);
        assert_close(d_lat, 0.0, 1e-12);
        assert!(d_lon < 0.0);
    }

    #[test]
    fn line_wheel_events_zoom_by_twelve_percent_with_one_resync() {
        let (mut view, _registry, mut c) = setup(Globe::wgs84());
        let start = view.camera_as_look_at().range;

        c.handle_wheel(&mut view, &wheel(3.0, DeltaMode::Line, 1000.0));
        assert_close(c.look_at().range, start * 1.12, 1e-6 * start);

        // Move the camera behind the controller's back; a second event
        // inside the resync window must not pick that up.
        view.camera_from_look_at(&LookAt::new(Position::new(0.0, 0.0, 0.0), 5.0e6));
        c.handle_wheel(&mut view, &wheel(3.0, DeltaMode::Line, 1200.0));
        assert_close(c.look_at().range, start * 1.12 * 1.12, 1e-6 * start);
        assert_close(c.look_at().position.latitude, 10.0, 1e-6);

        // Past the window the look-at follows the camera again.
        c.handle_wheel(&mut view, &wheel(0.0, DeltaMode::Pixel, 1800.0));
        assert_close(c.look_at().range, start * 1.12 * 1.12, 1e-3);
        view.camera_from_look_at(&LookAt::new(Position::new(0.0, 0.0, 0.0), 5.0e6));
        c.handle_wheel(&mut view, &wheel(0.0, DeltaMode::Pixel, 2400.0));
        assert_close(c.look_at().range, 5.0e6, 1.0);
        assert!(view.redraw_requested());
    }

    #[test]
    fn wheel_delta_modes_scale_differently() {
        let (mut view, _registry, mut c) = setup(Globe::wgs84());
        c.handle_wheel(&mut view, &wheel(100.0, DeltaMode::Pixel, 0.0));
        assert_close(c.look_at().range, 1100.0, 1e-3);
        c.handle_wheel(&mut view, &wheel(1.0, DeltaMode::Page, 10.0));
        assert_close(c.look_at().range, 1100.0 * 1.4, 1e-3);
    }

    #[test]
    fn pinch_scale_two_halves_the_range() {
        let (mut view, _registry, mut c) = setup(Globe::wgs84());
        let pinch = c.recognizers().pinch;
        c.gesture_state_changed(&mut view, &snapshot(pinch, GestureKind::Pinch, GestureState::Began));
        let mut changed = snapshot(pinch, GestureKind::Pinch, GestureState::Changed);
        changed.scale = Some(2.0);
        c.gesture_state_changed(&mut view, &changed);
        assert_close(c.look_at().range, 500.0, 1e-6);
        assert_close(view.camera_as_look_at().range, 500.0, 1e-3);

        changed.scale = Some(0.0);
        c.gesture_state_changed(&mut view, &changed);
        assert_close(c.look_at().range, 500.0, 1e-6);

        c.gesture_state_changed(&mut view, &snapshot(pinch, GestureKind::Pinch, GestureState::Ended));
        assert_eq!(c.active_gestures(), 0);
    }

    #[test]
    fn overlapping_gestures_share_one_begin_look_at() {
        let (mut view, _registry, mut c) = setup(Globe::wgs84());
        let r = *c.recognizers();
        c.gesture_state_changed(&mut view, &snapshot(r.pan, GestureKind::Pan, GestureState::Began));
        c.gesture_state_changed(&mut view, &snapshot(r.pinch, GestureKind::Pinch, GestureState::Began));
        assert_eq!(c.active_gestures(), 2);

        let mut changed = snapshot(r.pinch, GestureKind::Pinch, GestureState::Changed);
        changed.scale = Some(4.0);
        c.gesture_state_changed(&mut view, &changed);
        assert_close(c.look_at().range, 250.0, 1e-6);

        c.gesture_state_changed(&mut view, &snapshot(r.pan, GestureKind::Pan, GestureState::Ended));
        c.gesture_state_changed(&mut view, &snapshot(r.pinch, GestureKind::Pinch, GestureState::Ended));
        c.gesture_did_end();
        assert_eq!(c.active_gestures(), 0);
    }

    #[test]
    fn rotation_turns_heading_incrementally() {
        let (mut view, _registry, mut c) = setup(Globe::wgs84());
        let id = c.recognizers().rotation;
        c.gesture_state_changed(&mut view, &snapshot(id, GestureKind::Rotation, GestureState::Began));
        let mut changed = snapshot(id, GestureKind::Rotation, GestureState::Changed);
        changed.rotation = Some(30.0);
        c.gesture_state_changed(&mut view, &changed);
        assert_close(c.look_at().heading, -30.0, 1e-9);
        changed.rotation = Some(45.0);
        c.gesture_state_changed(&mut view, &changed);
        assert_close(c.look_at().heading, -45.0, 1e-9);
    }

    #[test]
    fn secondary_drag_and_tilt_are_relative_to_the_begin_look_at() {
        let (mut view, _registry, mut c) = setup(Globe::wgs84());
        let r = *c.recognizers();
        let vp = view.viewport();

        c.gesture_state_changed(&mut view, &snapshot(r.secondary_drag, GestureKind::Drag, GestureState::Began));
        let mut changed = snapshot(r.secondary_drag, GestureKind::Drag, GestureState::Changed);
        changed.translation_x = vp.width / 4.0;
        changed.translation_y = vp.height / 3.0;
        c.gesture_state_changed(&mut view, &changed);
        assert_close(c.look_at().heading, 45.0, 1e-9);
        assert_close(c.look_at().tilt, 30.0, 1e-9);
        c.gesture_state_changed(&mut view, &changed);
        assert_close(c.look_at().heading, 45.0, 1e-9);
        c.gesture_state_changed(&mut view, &snapshot(r.secondary_drag, GestureKind::Drag, GestureState::Ended));

        c.gesture_state_changed(&mut view, &snapshot(r.tilt, GestureKind::Tilt, GestureState::Began));
        let begin_tilt = view.camera_as_look_at().tilt;
        let mut changed = snapshot(r.tilt, GestureKind::Tilt, GestureState::Changed);
        changed.translation_y = -vp.height / 9.0;
        c.gesture_state_changed(&mut view, &changed);
        assert_close(c.look_at().tilt, begin_tilt + 10.0, 1e-6);
    }

    #[test]
    fn apply_changes_clamps_and_normalizes() {
        let (mut view, _registry, mut c) = setup(Globe::wgs84());
        c.look_at = LookAt::new(Position::new(95.0, 190.0, 0.0), 0.25).with_orientation(270.0, 120.0, -200.0);
        c.apply_changes(&mut view);
        let la = c.look_at();
        assert_eq!(la.position.latitude, 90.0);
        assert_close(la.position.longitude, -170.0, 1e-9);
        assert_eq!(la.range, 1.0);
        assert_close(la.heading, -90.0, 1e-9);
        assert_eq!(la.tilt, 90.0);
        assert_close(la.roll, 160.0, 1e-9);
    }

    #[test]
    fn flat_globe_forces_zero_tilt_and_caps_range() {
        let flat = Globe::new(
            Ellipsoid::WGS84,
            GlobeProjection::Equirectangular2D,
            Box::new(ZeroElevation),
        );
        let (mut view, _registry, mut c) = setup(flat);
        c.look_at = LookAt::new(Position::new(0.0, 0.0, 0.0), 1.0e9).with_orientation(0.0, 45.0, 0.0);
        c.apply_changes(&mut view);
        assert_eq!(c.look_at().tilt, 0.0);
        assert_close(
            c.look_at().range,
            2.0 * std::f64::consts::PI * Ellipsoid::WGS84.equatorial_radius,
            1e-6,
        );
    }

    #[test]
    fn flat_drag_keeps_the_grabbed_point_under_the_cursor() {
        let flat = Globe::new(
            Ellipsoid::WGS84,
            GlobeProjection::Equirectangular2D,
            Box::new(ZeroElevation),
        );
        let (mut view, _registry, mut c) = setup(flat);
        view.camera_from_look_at(&LookAt::new(Position::new(0.0, 0.0, 0.0), 1.0e6));
        let pan = c.recognizers().pan;
        let vp = view.viewport();

        let grab = Vec2::new(vp.mid_x(), vp.mid_y());
        let grabbed = view.pick_terrain(grab).unwrap();

        let mut began = snapshot(pan, GestureKind::Pan, GestureState::Began);
        began.client_x = grab.x;
        began.client_y = grab.y;
        c.gesture_state_changed(&mut view, &began);
        let mut changed = began;
        changed.state = GestureState::Changed;
        changed.translation_x = 100.0;
        changed.translation_y = 50.0;
        c.gesture_state_changed(&mut view, &changed);

        let now_under = view.pick_terrain(grab + Vec2::new(100.0, 50.0)).unwrap();
        assert_close(now_under.x, grabbed.x, 1e-2);
        assert_close(now_under.y, grabbed.y, 1e-2);
        // Dragging right and down moves the view west and north.
        assert!(c.look_at().position.longitude < 0.0);
        assert!(c.look_at().position.latitude > 0.0);
    }

    #[test]
    fn recognized_clicks_become_pick_requests() {
        let (mut view, _registry, mut c) = setup(Globe::wgs84());
        let click = c.recognizers().click.unwrap();
        let mut g = snapshot(click, GestureKind::Click, GestureState::Recognized);
        g.client_x = 12.0;
        g.client_y = 34.0;
        c.gesture_state_changed(&mut view, &g);
        assert_eq!(c.take_pick_requests(), vec![Vec2::new(12.0, 34.0)]);
        assert!(c.take_pick_requests().is_empty());
    }

    #[test]
    fn relationships_are_installed() {
        let (_view, registry, c) = setup(Globe::wgs84());
        let r = c.recognizers();
        let tilt = &registry.get(r.tilt).unwrap().core;
        assert!(tilt.requires_recognizer_to_fail(r.pan));
        assert!(tilt.requires_recognizer_to_fail(r.pinch));
        assert!(tilt.requires_recognizer_to_fail(r.rotation));
        let pan = &registry.get(r.pan).unwrap().core;
        assert!(pan.can_recognize_simultaneously_with(r.pinch));
        assert!(pan.can_recognize_simultaneously_with(r.rotation));
        assert_eq!(registry.len(), 8);
    }
}
