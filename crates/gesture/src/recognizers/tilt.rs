use crate::base::{RecognizerCore, Touch};
use crate::config::GestureConfig;
use crate::event::MouseEvent;
use crate::recognizer::Gesture;
use crate::recognizers::pan::{PanRecognizer, last_touch_gone, pan_touch_move};
use crate::state::{GestureKind, GestureState};

const UP: u8 = 1 << 2;
const DOWN: u8 = 1 << 3;
const LEFT: u8 = 1 << 0;
const RIGHT: u8 = 1 << 1;

/// Two close fingers dragged together vertically.
#[derive(Debug, Clone)]
pub struct TiltRecognizer {
    pub pan: PanRecognizer,
    pub max_touch_distance: f64,
    pub max_touch_divergence: f64,
}

impl TiltRecognizer {
    pub fn new(config: &GestureConfig) -> Self {
        Self {
            pan: PanRecognizer::new(config),
            max_touch_distance: config.tilt_max_touch_distance,
            max_touch_divergence: config.tilt_max_touch_divergence,
        }
    }

    pub fn with_max_touches(mut self, max: usize) -> Self {
        self.pan.max_touches = max;
        self
    }

    fn should_recognize(&self, core: &RecognizerCore) -> bool {
        let n = core.touch_count();
        if n < 2 || n > self.pan.max_touches {
            return false;
        }
        let touches = core.touches();
        let (a, b) = (&touches[0], &touches[1]);

        let distance = (a.client_x - b.client_x).hypot(a.client_y - b.client_y);
        if distance > self.max_touch_distance {
            return false;
        }

        let divergence = (a.translation_x() - b.translation_x()).hypot(a.translation_y() - b.translation_y());
        if divergence > self.max_touch_divergence {
            return false;
        }

        let vertical = UP | DOWN;
        (touch_direction(a) & vertical) & (touch_direction(b) & vertical) != 0
    }
}

fn touch_direction(touch: &Touch) -> u8 {
    let dx = touch.translation_x();
    let dy = touch.translation_y();
    if dx.abs() > dy.abs() {
        if dx < 0.0 {
            LEFT
        } else if dx > 0.0 {
            RIGHT
        } else {
            0
        }
    } else if dy < 0.0 {
        UP
    } else if dy > 0.0 {
        DOWN
    } else {
        0
    }
}

impl Gesture for TiltRecognizer {
    fn kind(&self) -> GestureKind {
        GestureKind::Tilt
    }

    fn mouse_down(&mut self, core: &mut RecognizerCore, _event: &MouseEvent) -> Option<GestureState> {
        core.state().is_possible().then_some(GestureState::Failed)
    }

    fn touch_move(&mut self, core: &mut RecognizerCore, _touch: &Touch) -> Option<GestureState> {
        pan_touch_move(core, self.pan.interpret_distance, |c| self.should_recognize(c))
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
