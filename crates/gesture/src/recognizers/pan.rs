use crate::base::{RecognizerCore, Touch};
use crate::config::GestureConfig;
use crate::event::MouseEvent;
use crate::recognizer::Gesture;
use crate::state::{GestureKind, GestureState};

/// Touch pan: the touch centroid moves far enough with an allowed number of
/// touches down.
#[derive(Debug, Clone)]
pub struct PanRecognizer {
    pub min_touches: usize,
    pub max_touches: usize,
    pub interpret_distance: f64,
}

impl PanRecognizer {
    pub fn new(config: &GestureConfig) -> Self {
        Self {
            min_touches: 1,
            max_touches: usize::MAX,
            interpret_distance: config.pan_interpret_distance,
        }
    }

    pub fn with_touches(mut self, min: usize, max: usize) -> Self {
        self.min_touches = min;
        self.max_touches = max;
        self
    }

    fn should_recognize(&self, core: &RecognizerCore) -> bool {
        let n = core.touch_count();
        n != 0 && n >= self.min_touches && n <= self.max_touches
    }
}

/// Shared pan-style move handling: decide once the centroid travels past
/// `interpret_distance`, then report Changed while active.
pub(crate) fn pan_touch_move(
    core: &RecognizerCore,
    interpret_distance: f64,
    should_recognize: impl FnOnce(&RecognizerCore) -> bool,
) -> Option<GestureState> {
    let state = core.state();
    if state.is_possible() {
        if core.translation_distance() > interpret_distance {
            return Some(if should_recognize(core) {
                GestureState::Began
            } else {
                GestureState::Failed
            });
        }
        None
    } else if state.is_active() {
        Some(GestureState::Changed)
    } else {
        None
    }
}

/// State after a touch leaves: undecided gestures fail, active ones finish
/// with `finished` once the last touch is gone.
pub(crate) fn last_touch_gone(core: &RecognizerCore, finished: GestureState) -> Option<GestureState> {
    if core.touch_count() != 0 {
        return None;
    }
    let state = core.state();
    if state.is_possible() {
        Some(GestureState::Failed)
    } else if state.is_active() {
        Some(finished)
    } else {
        None
    }
}

impl Gesture for PanRecognizer {
    fn kind(&self) -> GestureKind {
        GestureKind::Pan
    }

    fn mouse_down(&mut self, core: &mut RecognizerCore, _event: &MouseEvent) -> Option<GestureState> {
        core.state().is_possible().then_some(GestureState::Failed)
    }

    fn touch_move(&mut self, core: &mut RecognizerCore, _touch: &Touch) -> Option<GestureState> {
        pan_touch_move(core, self.interpret_distance, |c| self.should_recognize(c))
    }

    fn touch_end(&mut self, core: &mut RecognizerCore, _touch: &Touch) -> Option<GestureState> {
        last_touch_gone(core, GestureState::Ended)
    }

    fn touch_cancel(&mut self, core: &mut RecognizerCore, _touch: &Touch) -> Option<GestureState> {
        last_touch_gone(core, GestureState::Cancelled)
    }

    fn prepare_to_recognize(&mut self, core: &mut RecognizerCore) {
        core.set_translation(0.0, 0.0);
    }
}
