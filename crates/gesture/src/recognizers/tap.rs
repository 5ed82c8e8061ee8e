use crate::base::{RecognizerCore, Touch};
use crate::config::GestureConfig;
use crate::event::MouseEvent;
use crate::recognizer::Gesture;
use crate::state::{GestureKind, GestureState};

#[derive(Debug, Copy, Clone, PartialEq)]
struct Tap {
    touch_count: usize,
    client_x: f64,
    client_y: f64,
}

/// Discrete touch tap, optionally multi-tap or multi-finger.
#[derive(Debug, Clone)]
pub struct TapRecognizer {
    pub number_of_taps: usize,
    pub number_of_touches: usize,
    pub max_touch_movement: f64,
    pub max_tap_duration: f64,
    pub max_tap_interval: f64,
    taps: Vec<Tap>,
}

impl TapRecognizer {
    pub fn new(config: &GestureConfig) -> Self {
        Self {
            number_of_taps: 1,
            number_of_touches: 1,
            max_touch_movement: config.tap_max_touch_movement,
            max_tap_duration: config.tap_max_duration,
            max_tap_interval: config.tap_max_interval,
            taps: Vec::new(),
        }
    }

    pub fn with_taps(mut self, taps: usize, touches: usize) -> Self {
        self.number_of_taps = taps;
        self.number_of_touches = touches;
        self
    }
}

impl Gesture for TapRecognizer {
    fn kind(&self) -> GestureKind {
        GestureKind::Tap
    }

    fn mouse_down(&mut self, core: &mut RecognizerCore, _event: &MouseEvent) -> Option<GestureState> {
        core.state().is_possible().then_some(GestureState::Failed)
    }

    fn touch_start(&mut self, core: &mut RecognizerCore, _touch: &Touch) -> Option<GestureState> {
        if !core.state().is_possible() {
            return None;
        }
        let count = core.touch_count();
        if count > self.number_of_touches {
            return Some(GestureState::Failed);
        }
        if count == 1 {
            self.taps.push(Tap {
                touch_count: count,
                client_x: core.client_x(),
                client_y: core.client_y(),
            });
            core.fail_after_delay(self.max_tap_duration);
        } else if let Some(tap) = self.taps.last_mut() {
            tap.touch_count = count;
            tap.client_x = core.client_x();
            tap.client_y = core.client_y();
        }
        None
    }

    fn touch_move(&mut self, core: &mut RecognizerCore, _touch: &Touch) -> Option<GestureState> {
        if !core.state().is_possible() {
            return None;
        }
        (core.translation_distance() > self.max_touch_movement).then_some(GestureState::Failed)
    }

    fn touch_end(&mut self, core: &mut RecognizerCore, _touch: &Touch) -> Option<GestureState> {
        if !core.state().is_possible() || core.touch_count() != 0 {
            return None;
        }
        let tap = *self.taps.last()?;
        if tap.touch_count != self.number_of_touches {
            return Some(GestureState::Failed);
        }
        if self.taps.len() == self.number_of_taps {
            let first = self.taps[0];
            core.set_client(first.client_x, first.client_y);
            return Some(GestureState::Recognized);
        }
        core.fail_after_delay(self.max_tap_interval);
        None
    }

    fn touch_cancel(&mut self, core: &mut RecognizerCore, _touch: &Touch) -> Option<GestureState> {
        core.state().is_possible().then_some(GestureState::Failed)
    }

    fn reset(&mut self) {
        self.taps.clear();
    }
}
