use std::fmt;

use serde::Serialize;

use crate::base::{RecognizerCore, Touch};
use crate::event::MouseEvent;
use crate::registry::{RecognizerId, TargetId};
use crate::state::{GestureKind, GestureState};

/// Behavior of one kind of recognizer.
///
/// The registry updates the shared [`RecognizerCore`] before calling a hook.
/// A hook returns the state to move to, and the registry performs the
/// transition, including arbitration with other recognizers.
pub trait Gesture: fmt::Debug {
    fn kind(&self) -> GestureKind;

    fn mouse_down(&mut self, _core: &mut RecognizerCore, _event: &MouseEvent) -> Option<GestureState> {
        None
    }

    fn mouse_move(&mut self, _core: &mut RecognizerCore, _event: &MouseEvent) -> Option<GestureState> {
        None
    }

    fn mouse_up(&mut self, _core: &mut RecognizerCore, _event: &MouseEvent) -> Option<GestureState> {
        None
    }

    fn touch_start(&mut self, _core: &mut RecognizerCore, _touch: &Touch) -> Option<GestureState> {
        None
    }

    fn touch_move(&mut self, _core: &mut RecognizerCore, _touch: &Touch) -> Option<GestureState> {
        None
    }

    fn touch_end(&mut self, _core: &mut RecognizerCore, _touch: &Touch) -> Option<GestureState> {
        None
    }

    fn touch_cancel(&mut self, _core: &mut RecognizerCore, _touch: &Touch) -> Option<GestureState> {
        None
    }

    /// Runs right before the recognizer enters Recognized or Began.
    fn prepare_to_recognize(&mut self, _core: &mut RecognizerCore) {}

    /// Runs as the recognizer enters Failed, before anything that made it
    /// fail is notified.
    fn did_fail(&mut self, _core: &RecognizerCore) {}

    /// Clears per-gesture state. The core is reset separately.
    fn reset(&mut self) {}

    fn scale(&self) -> Option<f64> {
        None
    }

    fn rotation(&self) -> Option<f64> {
        None
    }
}

/// What a listener sees when a recognizer changes state.
#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct GestureSnapshot {
    pub id: RecognizerId,
    pub target: TargetId,
    pub kind: GestureKind,
    pub state: GestureState,
    pub client_x: f64,
    pub client_y: f64,
    pub translation_x: f64,
    pub translation_y: f64,
    pub mouse_button_mask: u32,
    pub touch_count: usize,
    pub scale: Option<f64>,
    pub rotation: Option<f64>,
}

impl GestureSnapshot {
    pub(crate) fn capture(id: RecognizerId, core: &RecognizerCore, gesture: &dyn Gesture) -> Self {
        Self {
            id,
            target: core.target,
            kind: gesture.kind(),
            state: core.state(),
            client_x: core.client_x(),
            client_y: core.client_y(),
            translation_x: core.translation_x(),
            translation_y: core.translation_y(),
            mouse_button_mask: core.mouse_button_mask(),
            touch_count: core.touch_count(),
            scale: gesture.scale(),
            rotation: gesture.rotation(),
        }
    }
}

pub trait GestureListener {
    fn gesture_state_changed(&mut self, snapshot: &GestureSnapshot);
}

impl GestureListener for Vec<GestureSnapshot> {
    fn gesture_state_changed(&mut self, snapshot: &GestureSnapshot) {
        self.push(*snapshot);
    }
}

/// Listener that drops every notification.
#[derive(Debug, Default)]
pub struct NoListener;

impl GestureListener for NoListener {
    fn gesture_state_changed(&mut self, _snapshot: &GestureSnapshot) {}
}

pub type GestureCallback = Box<dyn FnMut(&GestureSnapshot)>;
