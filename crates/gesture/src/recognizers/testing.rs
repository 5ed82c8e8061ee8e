use foundation::time::Millis;

use crate::config::GestureConfig;
use crate::event::{InputEvent, MouseEvent, TouchEvent, TouchPoint};
use crate::recognizer::{Gesture, GestureSnapshot};
use crate::registry::{RecognizerId, RecognizerRegistry, TargetId};
use crate::state::GestureState;

pub const TARGET: TargetId = TargetId(0);

pub struct Harness {
    pub registry: RecognizerRegistry,
    pub events: Vec<GestureSnapshot>,
}

impl Harness {
    pub fn new() -> Self {
        Self {
            registry: RecognizerRegistry::new(&GestureConfig::default()),
            events: Vec::new(),
        }
    }

    pub fn add(&mut self, gesture: impl Gesture + 'static) -> RecognizerId {
        self.registry.add(TARGET, gesture)
    }

    pub fn send(&mut self, event: InputEvent) {
        self.registry.dispatch(TARGET, &event, &mut self.events);
    }

    pub fn advance(&mut self, ms: f64) {
        self.registry.advance_time(Millis(ms), &mut self.events);
    }

    pub fn state(&self, id: RecognizerId) -> GestureState {
        self.registry.state(id).unwrap()
    }

    /// States reported to the listener for `id`, in order.
    pub fn states(&self, id: RecognizerId) -> Vec<GestureState> {
        self.events
            .iter()
            .filter(|e| e.id == id)
            .map(|e| e.state)
            .collect()
    }
}

pub fn mouse_down(x: f64, y: f64, button: u8, t: f64) -> InputEvent {
    InputEvent::MouseDown(MouseEvent::new(x, y, button, Millis(t)))
}

pub fn mouse_move(x: f64, y: f64, t: f64) -> InputEvent {
    InputEvent::MouseMove(MouseEvent::new(x, y, 0, Millis(t)))
}

pub fn mouse_up(x: f64, y: f64, button: u8, t: f64) -> InputEvent {
    InputEvent::MouseUp(MouseEvent::new(x, y, button, Millis(t)))
}

fn touches(points: &[(i64, f64, f64)], t: f64) -> TouchEvent {
    TouchEvent::new(
        points
            .iter()
            .map(|&(id, x, y)| TouchPoint::new(id, x, y))
            .collect(),
        Millis(t),
    )
}

pub fn touch_start(points: &[(i64, f64, f64)], t: f64) -> InputEvent {
    InputEvent::TouchStart(touches(points, t))
}

pub fn touch_move(points: &[(i64, f64, f64)], t: f64) -> InputEvent {
    InputEvent::TouchMove(touches(points, t))
}

pub fn touch_end(points: &[(i64, f64, f64)], t: f64) -> InputEvent {
    InputEvent::TouchEnd(touches(points, t))
}

pub fn touch_cancel(points: &[(i64, f64, f64)], t: f64) -> InputEvent {
    InputEvent::TouchCancel(touches(points, t))
}
