use crate::base::{RecognizerCore, Touch};
use crate::config::GestureConfig;
use crate::event::{Button, MouseEvent};
use crate::recognizer::Gesture;
use crate::state::{GestureKind, GestureState};

/// Mouse drag with one button held.
#[derive(Debug, Clone)]
pub struct DragRecognizer {
    pub button: Button,
    pub interpret_distance: f64,
}

impl DragRecognizer {
    pub fn new(config: &GestureConfig) -> Self {
        Self {
            button: 0,
            interpret_distance: config.drag_interpret_distance,
        }
    }

    pub fn with_button(mut self, button: Button) -> Self {
        self.button = button;
        self
    }

    fn should_recognize(&self, core: &RecognizerCore) -> bool {
        core.mouse_button_mask() == 1u32 << self.button.min(31)
    }
}

impl Gesture for DragRecognizer {
    fn kind(&self) -> GestureKind {
        GestureKind::Drag
    }

    fn mouse_move(&mut self, core: &mut RecognizerCore, _event: &MouseEvent) -> Option<GestureState> {
        let state = core.state();
        if state.is_possible() {
            if core.translation_distance() > self.interpret_distance {
                if self.should_recognize(core) {
                    core.set_translation(0.0, 0.0);
                    return Some(GestureState::Began);
                }
                return Some(GestureState::Failed);
            }
            None
        } else if state.is_active() {
            Some(GestureState::Changed)
        } else {
            None
        }
    }

    fn mouse_up(&mut self, core: &mut RecognizerCore, _event: &MouseEvent) -> Option<GestureState> {
        if core.mouse_button_mask() != 0 {
            return None;
        }
        let state = core.state();
        if state.is_possible() {
            Some(GestureState::Failed)
        } else if state.is_active() {
            Some(GestureState::Ended)
        } else {
            None
        }
    }

    fn touch_start(&mut self, core: &mut RecognizerCore, _touch: &Touch) -> Option<GestureState> {
        core.state().is_possible().then_some(GestureState::Failed)
    }
}
