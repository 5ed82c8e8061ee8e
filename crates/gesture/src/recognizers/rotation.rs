use foundation::math::{RADIANS_TO_DEGREES, normalized_degrees};

use crate::base::{RecognizerCore, Touch};
use crate::config::GestureConfig;
use crate::event::MouseEvent;
use crate::recognizer::Gesture;
use crate::recognizers::pan::last_touch_gone;
use crate::state::{GestureKind, GestureState};

/// Two-finger twist. `rotation` is in degrees, positive clockwise on screen.
#[derive(Debug, Clone)]
pub struct RotationRecognizer {
    pub interpret_angle: f64,
    pub weight: f64,
    rotation: f64,
    offset_rotation: f64,
    reference_angle: f64,
    rotation_touches: Vec<i64>,
}

impl RotationRecognizer {
    pub fn new(config: &GestureConfig) -> Self {
        Self {
            interpret_angle: config.rotation_interpret_angle,
            weight: config.rotation_weight,
            rotation: 0.0,
            offset_rotation: 0.0,
            reference_angle: 0.0,
            rotation_touches: Vec::new(),
        }
    }

    fn current_angle(&self, core: &RecognizerCore) -> Option<f64> {
        let a = core.touch_with_id(*self.rotation_touches.first()?)?;
        let b = core.touch_with_id(*self.rotation_touches.get(1)?)?;
        Some((a.client_y - b.client_y).atan2(a.client_x - b.client_x) * RADIANS_TO_DEGREES)
    }
}

impl Gesture for RotationRecognizer {
    fn kind(&self) -> GestureKind {
        GestureKind::Rotation
    }

    fn mouse_down(&mut self, core: &mut RecognizerCore, _event: &MouseEvent) -> Option<GestureState> {
        core.state().is_possible().then_some(GestureState::Failed)
    }

    fn touch_start(&mut self, core: &mut RecognizerCore, touch: &Touch) -> Option<GestureState> {
        if self.rotation_touches.len() < 2 {
            self.rotation_touches.push(touch.identifier);
            if self.rotation_touches.len() == 2 {
                self.reference_angle = self.current_angle(core).unwrap_or(0.0);
                self.offset_rotation += self.rotation;
                self.rotation = 0.0;
            }
        }
        None
    }

    fn touch_move(&mut self, core: &mut RecognizerCore, _touch: &Touch) -> Option<GestureState> {
        if self.rotation_touches.len() != 2 {
            return None;
        }
        let angle = self.current_angle(core)?;
        let change = normalized_degrees(angle - self.reference_angle);
        let state = core.state();
        if state.is_possible() {
            (change.abs() > self.interpret_angle).then_some(GestureState::Began)
        } else if state.is_active() {
            let w = self.weight;
            self.rotation = self.rotation * (1.0 - w) + change * w;
            Some(GestureState::Changed)
        } else {
            None
        }
    }

    fn touch_end(&mut self, core: &mut RecognizerCore, touch: &Touch) -> Option<GestureState> {
        self.rotation_touches.retain(|id| *id != touch.identifier);
        last_touch_gone(core, GestureState::Ended)
    }

    fn touch_cancel(&mut self, core: &mut RecognizerCore, touch: &Touch) -> Option<GestureState> {
        let before = self.rotation_touches.len();
        self.rotation_touches.retain(|id| *id != touch.identifier);
        if self.rotation_touches.len() == before {
            return None;
        }
        last_touch_gone(core, GestureState::Cancelled)
    }

    fn prepare_to_recognize(&mut self, core: &mut RecognizerCore) {
        self.reference_angle = self.current_angle(core).unwrap_or(0.0);
        self.rotation = 0.0;
    }

    fn reset(&mut self) {
        self.rotation = 0.0;
        self.offset_rotation = 0.0;
        self.reference_angle = 0.0;
        self.rotation_touches.clear();
    }

    fn rotation(&self) -> Option<f64> {
        Some(self.rotation + self.offset_rotation)
    }
}

#[cfg(test)]
mod tests {
    use super::RotationRecognizer;
    use crate::config::GestureConfig;
    use crate::recognizers::testing::*;
    use crate::state::GestureState;
    use pretty_assertions::assert_eq;

    // Second finger orbiting the first at radius 100.
    fn at(deg: f64) -> (i64, f64, f64) {
        let r = deg.to_radians();
        (2, 100.0 + 100.0 * r.cos(), 100.0 + 100.0 * r.sin())
    }

    #[test]
    fn twisting_past_twenty_degrees_begins_and_tracks_rotation() {
        let mut h = Harness::new();
        let id = h.add(RotationRecognizer::new(&GestureConfig::default()));
        h.send(touch_start(&[(1, 100.0, 100.0), at(0.0)], 0.0));

        h.send(touch_move(&[at(15.0)], 1.0));
        assert_eq!(h.state(id), GestureState::Possible);
        h.send(touch_move(&[at(25.0)], 2.0));
        assert_eq!(h.state(id), GestureState::Began);
        assert_eq!(h.events[0].rotation, Some(0.0));

        // Overshoot then hold at +30 from the Began reference so the filter settles.
        for i in 0..40 {
            let wobble = if i % 2 == 0 { 0.0 } else { 1e-6 };
            h.send(touch_move(&[at(55.0 + wobble)], 3.0 + i as f64));
        }
        let rotation = h.events.last().unwrap().rotation.unwrap();
        assert!((rotation - 30.0).abs() < 1e-3, "{rotation}");

        h.send(touch_end(&[(1, 100.0, 100.0), at(55.0)], 100.0));
        assert_eq!(h.states(id).last(), Some(&GestureState::Ended));
    }

    #[test]
    fn a_single_touch_never_rotates() {
        let mut h = Harness::new();
        let id = h.add(RotationRecognizer::new(&GestureConfig::default()));
        h.send(touch_start(&[(1, 0.0, 0.0)], 0.0));
        h.send(touch_move(&[(1, 300.0, 300.0)], 1.0));
        assert_eq!(h.state(id), GestureState::Possible);
        h.send(touch_end(&[(1, 300.0, 300.0)], 2.0));
        assert_eq!(h.state(id), GestureState::Possible);
    }
}
