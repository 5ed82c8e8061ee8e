use crate::base::{RecognizerCore, Touch};
use crate::config::GestureConfig;
use crate::event::MouseEvent;
use crate::recognizer::Gesture;
use crate::recognizers::pan::last_touch_gone;
use crate::state::{GestureKind, GestureState};

/// Two-finger pinch. `scale` is the filtered ratio of the current to the
/// reference finger distance, times the scale of earlier pinches in the same
/// gesture.
#[derive(Debug, Clone)]
pub struct PinchRecognizer {
    pub interpret_distance: f64,
    pub weight: f64,
    scale: f64,
    offset_scale: f64,
    reference_distance: f64,
    pinch_touches: Vec<i64>,
}

impl PinchRecognizer {
    pub fn new(config: &GestureConfig) -> Self {
        Self {
            interpret_distance: config.pinch_interpret_distance,
            weight: config.pinch_weight,
            scale: 1.0,
            offset_scale: 1.0,
            reference_distance: 0.0,
            pinch_touches: Vec::new(),
        }
    }

    fn current_distance(&self, core: &RecognizerCore) -> Option<f64> {
        let a = core.touch_with_id(*self.pinch_touches.first()?)?;
        let b = core.touch_with_id(*self.pinch_touches.get(1)?)?;
        Some((a.client_x - b.client_x).hypot(a.client_y - b.client_y))
    }

    fn forget(&mut self, touch: &Touch) {
        self.pinch_touches.retain(|id| *id != touch.identifier);
    }
}

impl Gesture for PinchRecognizer {
    fn kind(&self) -> GestureKind {
        GestureKind::Pinch
    }

    fn mouse_down(&mut self, core: &mut RecognizerCore, _event: &MouseEvent) -> Option<GestureState> {
        core.state().is_possible().then_some(GestureState::Failed)
    }

    fn touch_start(&mut self, core: &mut RecognizerCore, touch: &Touch) -> Option<GestureState> {
        if self.pinch_touches.len() < 2 {
            self.pinch_touches.push(touch.identifier);
            if self.pinch_touches.len() == 2 {
                self.reference_distance = self.current_distance(core).unwrap_or(0.0);
                self.offset_scale *= self.scale;
                self.scale = 1.0;
            }
        }
        None
    }

    fn touch_move(&mut self, core: &mut RecognizerCore, _touch: &Touch) -> Option<GestureState> {
        if self.pinch_touches.len() != 2 {
            return None;
        }
        let distance = self.current_distance(core)?;
        let state = core.state();
        if state.is_possible() {
            ((distance - self.reference_distance).abs() > self.interpret_distance)
                .then_some(GestureState::Began)
        } else if state.is_active() {
            if self.reference_distance != 0.0 {
                let new_scale = (distance / self.reference_distance).abs();
                let w = self.weight;
                self.scale = self.scale * (1.0 - w) + new_scale * w;
            }
            Some(GestureState::Changed)
        } else {
            None
        }
    }

    fn touch_end(&mut self, core: &mut RecognizerCore, touch: &Touch) -> Option<GestureState> {
        self.forget(touch);
        last_touch_gone(core, GestureState::Ended)
    }

    fn touch_cancel(&mut self, core: &mut RecognizerCore, touch: &Touch) -> Option<GestureState> {
        self.forget(touch);
        last_touch_gone(core, GestureState::Cancelled)
    }

    fn prepare_to_recognize(&mut self, core: &mut RecognizerCore) {
        self.reference_distance = self.current_distance(core).unwrap_or(0.0);
        self.scale = 1.0;
    }

    fn reset(&mut self) {
        self.scale = 1.0;
        self.offset_scale = 1.0;
        self.reference_distance = 0.0;
        self.pinch_touches.clear();
    }

    fn scale(&self) -> Option<f64> {
        Some(self.scale * self.offset_scale)
    }
}
