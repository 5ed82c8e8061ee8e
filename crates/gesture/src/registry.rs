use std::fmt;

use foundation::time::Millis;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace};

use crate::base::{RecognizerCore, Touch};
use crate::config::GestureConfig;
use crate::error::GestureError;
use crate::event::{InputEvent, MouseEvent, PointerEvent, PointerType, TouchPoint};
use crate::recognizer::{Gesture, GestureCallback, GestureListener, GestureSnapshot};
use crate::state::{GestureState, PendingTransition};

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RecognizerId(pub usize);

/// The element a recognizer listens on. Arbitration only happens between
/// recognizers with the same target.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TargetId(pub u32);

pub struct Recognizer {
    pub core: RecognizerCore,
    gesture: Box<dyn Gesture>,
    callbacks: Vec<GestureCallback>,
}

impl fmt::Debug for Recognizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Recognizer")
            .field("core", &self.core)
            .field("gesture", &self.gesture)
            .field("callbacks", &self.callbacks.len())
            .finish()
    }
}

impl Recognizer {
    pub fn gesture(&self) -> &dyn Gesture {
        self.gesture.as_ref()
    }
}

/// Every recognizer of one window, in registration order.
#[derive(Debug)]
pub struct RecognizerRegistry {
    translation_weight: f64,
    recognizers: Vec<Recognizer>,
}

impl Default for RecognizerRegistry {
    fn default() -> Self {
        Self::new(&GestureConfig::default())
    }
}

impl RecognizerRegistry {
    pub fn new(config: &GestureConfig) -> Self {
        Self {
            translation_weight: config.translation_weight,
            recognizers: Vec::new(),
        }
    }

    pub fn add(&mut self, target: TargetId, gesture: impl Gesture + 'static) -> RecognizerId {
        let id = RecognizerId(self.recognizers.len());
        self.recognizers.push(Recognizer {
            core: RecognizerCore::new(target, self.translation_weight),
            gesture: Box::new(gesture),
            callbacks: Vec::new(),
        });
        id
    }

    pub fn len(&self) -> usize {
        self.recognizers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recognizers.is_empty()
    }

    pub fn get(&self, id: RecognizerId) -> Option<&Recognizer> {
        self.recognizers.get(id.0)
    }

    fn get_mut(&mut self, id: RecognizerId) -> Result<&mut Recognizer, GestureError> {
        self.recognizers
            .get_mut(id.0)
            .ok_or(GestureError::UnknownRecognizer(id))
    }

    pub fn state(&self, id: RecognizerId) -> Option<GestureState> {
        self.get(id).map(|r| r.core.state())
    }

    pub fn snapshot(&self, id: RecognizerId) -> Option<GestureSnapshot> {
        self.get(id)
            .map(|r| GestureSnapshot::capture(id, &r.core, r.gesture.as_ref()))
    }

    pub fn set_enabled(&mut self, id: RecognizerId, enabled: bool) -> Result<(), GestureError> {
        self.get_mut(id)?.core.enabled = enabled;
        Ok(())
    }

    pub fn add_callback(
        &mut self,
        id: RecognizerId,
        callback: impl FnMut(&GestureSnapshot) + 'static,
    ) -> Result<(), GestureError> {
        self.get_mut(id)?.callbacks.push(Box::new(callback));
        Ok(())
    }

    fn check_pair(&self, a: RecognizerId, b: RecognizerId) -> Result<(), GestureError> {
        for id in [a, b] {
            if id.0 >= self.recognizers.len() {
                return Err(GestureError::UnknownRecognizer(id));
            }
        }
        if a == b {
            return Err(GestureError::SelfRelation(a));
        }
        Ok(())
    }

    /// Lets `a` and `b` recognize at the same time. The relation is symmetric.
    pub fn recognize_simultaneously(&mut self, a: RecognizerId, b: RecognizerId) -> Result<(), GestureError> {
        self.check_pair(a, b)?;
        if !self.recognizers[a.0].core.can_recognize_with.contains(&b) {
            self.recognizers[a.0].core.can_recognize_with.push(b);
            self.recognizers[b.0].core.can_recognize_with.push(a);
        }
        Ok(())
    }

    /// Makes `recognizer` wait until `other` fails before it recognizes.
    pub fn require_failure(&mut self, recognizer: RecognizerId, other: RecognizerId) -> Result<(), GestureError> {
        self.check_pair(recognizer, other)?;
        if !self.recognizers[recognizer.0].core.requires_failure_of.contains(&other) {
            self.recognizers[recognizer.0].core.requires_failure_of.push(other);
            self.recognizers[other.0].core.required_to_fail_by.push(recognizer);
        }
        Ok(())
    }

    /// Returns a recognizer to Possible.
    pub fn reset(&mut self, id: RecognizerId) -> Result<(), GestureError> {
        let r = self.get_mut(id)?;
        r.core.reset();
        r.gesture.reset();
        Ok(())
    }

    /// Fails every still-possible recognizer whose deadline has passed.
    pub fn advance_time(&mut self, now: Millis, listener: &mut dyn GestureListener) {
        for idx in 0..self.recognizers.len() {
            let core = &mut self.recognizers[idx].core;
            let due = core.deadline.is_some_and(|d| d.is_due(now));
            if !due {
                continue;
            }
            core.deadline = None;
            if core.state.is_possible() {
                trace!(recognizer = idx, "deadline passed");
                self.transition(idx, GestureState::Failed, listener);
            }
        }
    }

    /// Delivers `event` to every recognizer on `target`, in registration order.
    pub fn dispatch(&mut self, target: TargetId, event: &InputEvent, listener: &mut dyn GestureListener) {
        self.advance_time(event.time(), listener);
        for idx in 0..self.recognizers.len() {
            if self.recognizers[idx].core.target == target {
                self.deliver(idx, event, listener);
            }
        }
    }

    fn deliver(&mut self, idx: usize, event: &InputEvent, listener: &mut dyn GestureListener) {
        let core = &mut self.recognizers[idx].core;
        if !core.enabled {
            return;
        }
        if event.default_prevented() && core.state.is_possible() {
            return;
        }
        core.now = event.time();

        match event {
            InputEvent::MouseDown(e) => self.handle_mouse_down(idx, e, true, listener),
            InputEvent::MouseMove(e) => self.handle_mouse_move(idx, e, listener),
            InputEvent::MouseUp(e) => self.handle_mouse_up(idx, e, listener),
            InputEvent::TouchStart(e) => {
                for t in &e.changed_touches {
                    self.handle_touch_start(idx, t, listener);
                }
            }
            InputEvent::TouchMove(e) => {
                for t in &e.changed_touches {
                    self.handle_touch_move(idx, t, listener);
                }
            }
            InputEvent::TouchEnd(e) => {
                for t in &e.changed_touches {
                    self.handle_touch_end(idx, t, false, listener);
                }
            }
            InputEvent::TouchCancel(e) => {
                for t in &e.changed_touches {
                    self.handle_touch_end(idx, t, true, listener);
                }
            }
            InputEvent::PointerDown(p) => self.handle_pointer(idx, event, p, listener),
            InputEvent::PointerMove(p) => self.handle_pointer(idx, event, p, listener),
            InputEvent::PointerUp(p) => self.handle_pointer(idx, event, p, listener),
            InputEvent::PointerCancel(p) => self.handle_pointer(idx, event, p, listener),
            InputEvent::Wheel(_) | InputEvent::KeyDown(_) | InputEvent::KeyUp(_) => {}
        }
    }

    fn handle_pointer(
        &mut self,
        idx: usize,
        event: &InputEvent,
        p: &PointerEvent,
        listener: &mut dyn GestureListener,
    ) {
        match (event, p.pointer_type) {
            (InputEvent::PointerDown(_), PointerType::Mouse) => {
                self.handle_mouse_down(idx, &p.as_mouse(), false, listener)
            }
            (InputEvent::PointerMove(_), PointerType::Mouse) => {
                self.handle_mouse_move(idx, &p.as_mouse(), listener)
            }
            (InputEvent::PointerUp(_), PointerType::Mouse) => {
                self.handle_mouse_up(idx, &p.as_mouse(), listener)
            }
            (InputEvent::PointerCancel(_), PointerType::Mouse) => {}
            (InputEvent::PointerDown(_), PointerType::Touch) => {
                self.handle_touch_start(idx, &p.as_touch(), listener)
            }
            (InputEvent::PointerMove(_), PointerType::Touch) => {
                self.handle_touch_move(idx, &p.as_touch(), listener)
            }
            (InputEvent::PointerUp(_), PointerType::Touch) => {
                self.handle_touch_end(idx, &p.as_touch(), false, listener)
            }
            (InputEvent::PointerCancel(_), PointerType::Touch) => {
                self.handle_touch_end(idx, &p.as_touch(), true, listener)
            }
            _ => info!(
                event = event.name(),
                pointer_type = ?p.pointer_type,
                "unrecognized event type"
            ),
        }
    }

    fn handle_mouse_down(
        &mut self,
        idx: usize,
        e: &MouseEvent,
        is_mouse_event: bool,
        listener: &mut dyn GestureListener,
    ) {
        let r = &mut self.recognizers[idx];
        // Browsers synthesize mouse downs for touches.
        if is_mouse_event && !r.core.touches.is_empty() {
            return;
        }
        let bit = 1u32 << e.button.min(31);
        if r.core.mouse_button_mask & bit != 0 {
            return;
        }
        if r.core.mouse_button_mask == 0 {
            r.core.begin_mouse(e.client_x, e.client_y);
        }
        r.core.mouse_button_mask |= bit;
        let next = r.gesture.mouse_down(&mut r.core, e);
        self.apply(idx, next, listener);
    }

    fn handle_mouse_move(&mut self, idx: usize, e: &MouseEvent, listener: &mut dyn GestureListener) {
        let r = &mut self.recognizers[idx];
        if r.core.mouse_button_mask == 0 {
            return;
        }
        if r.core.client_x == e.client_x && r.core.client_y == e.client_y {
            return;
        }
        r.core.track_mouse(e.client_x, e.client_y);
        let next = r.gesture.mouse_move(&mut r.core, e);
        self.apply(idx, next, listener);
    }

    fn handle_mouse_up(&mut self, idx: usize, e: &MouseEvent, listener: &mut dyn GestureListener) {
        let r = &mut self.recognizers[idx];
        let bit = 1u32 << e.button.min(31);
        if r.core.mouse_button_mask & bit == 0 {
            return;
        }
        r.core.mouse_button_mask &= !bit;
        let next = r.gesture.mouse_up(&mut r.core, e);
        self.apply(idx, next, listener);
        if self.recognizers[idx].core.mouse_button_mask == 0 {
            self.reset_if_events_ended(idx);
        }
    }

    fn handle_touch_start(&mut self, idx: usize, t: &TouchPoint, listener: &mut dyn GestureListener) {
        let r = &mut self.recognizers[idx];
        let touch = Touch::new(t.identifier, t.client_x, t.client_y);
        r.core.add_touch(touch);
        let next = r.gesture.touch_start(&mut r.core, &touch);
        self.apply(idx, next, listener);
    }

    fn handle_touch_move(&mut self, idx: usize, t: &TouchPoint, listener: &mut dyn GestureListener) {
        let r = &mut self.recognizers[idx];
        let Some(touch) = r.core.move_touch(t.identifier, t.client_x, t.client_y) else {
            return;
        };
        let next = r.gesture.touch_move(&mut r.core, &touch);
        self.apply(idx, next, listener);
    }

    fn handle_touch_end(
        &mut self,
        idx: usize,
        t: &TouchPoint,
        cancelled: bool,
        listener: &mut dyn GestureListener,
    ) {
        let r = &mut self.recognizers[idx];
        let Some(touch) = r.core.remove_touch(t.identifier) else {
            return;
        };
        let next = if cancelled {
            r.gesture.touch_cancel(&mut r.core, &touch)
        } else {
            r.gesture.touch_end(&mut r.core, &touch)
        };
        self.apply(idx, next, listener);
        self.reset_if_events_ended(idx);
    }

    fn apply(&mut self, idx: usize, next: Option<GestureState>, listener: &mut dyn GestureListener) {
        if let Some(state) = next {
            self.transition(idx, state, listener);
        }
    }

    fn transition(&mut self, idx: usize, new_state: GestureState, listener: &mut dyn GestureListener) {
        {
            let core = &mut self.recognizers[idx].core;
            if core.state.pending().is_some() {
                core.state = GestureState::Possible;
            }
            trace!(recognizer = idx, from = ?core.state, to = ?new_state, "transition");
        }

        match new_state {
            GestureState::Failed => {
                let r = &mut self.recognizers[idx];
                r.core.state = GestureState::Failed;
                r.gesture.did_fail(&r.core);
                self.update_recognizers_waiting_for_failure(idx, listener);
                self.reset_if_events_ended(idx);
            }
            GestureState::Recognized | GestureState::Began => {
                let pending = if new_state == GestureState::Recognized {
                    PendingTransition::Recognized
                } else {
                    PendingTransition::Began
                };
                self.try_to_recognize(idx, pending, listener);
                if self.recognizers[idx].core.state == new_state {
                    let r = &mut self.recognizers[idx];
                    r.gesture.prepare_to_recognize(&mut r.core);
                    debug!(recognizer = idx, kind = ?r.gesture.kind(), state = ?new_state, "gesture recognized");
                    self.notify(idx, listener);
                    if new_state == GestureState::Recognized {
                        self.reset_if_events_ended(idx);
                    }
                }
            }
            GestureState::Changed => {
                self.recognizers[idx].core.state = new_state;
                self.notify(idx, listener);
            }
            GestureState::Ended | GestureState::Cancelled => {
                self.recognizers[idx].core.state = new_state;
                debug!(recognizer = idx, state = ?new_state, "gesture finished");
                self.notify(idx, listener);
                self.reset_if_events_ended(idx);
            }
            GestureState::Possible | GestureState::Pending(_) => {
                self.recognizers[idx].core.state = new_state;
            }
        }
    }

    fn update_recognizers_waiting_for_failure(&mut self, idx: usize, listener: &mut dyn GestureListener) {
        let waiting = self.recognizers[idx].core.required_to_fail_by.clone();
        for other in waiting {
            if let Some(pending) = self.recognizers[other.0].core.state.pending() {
                self.transition(other.0, pending.into(), listener);
            }
        }
    }

    fn try_to_recognize(&mut self, idx: usize, new_state: PendingTransition, listener: &mut dyn GestureListener) {
        let n = self.recognizers.len();
        if (0..n).any(|j| self.can_be_prevented_by(idx, j)) {
            self.transition(idx, GestureState::Failed, listener);
            return;
        }
        if (0..n).any(|j| self.is_waiting_for(idx, j)) {
            self.recognizers[idx].core.state = GestureState::Pending(new_state);
            return;
        }
        let prevented: Vec<usize> = (0..n).filter(|&j| self.can_prevent(idx, j)).collect();
        for j in prevented {
            self.transition(j, GestureState::Failed, listener);
        }
        self.recognizers[idx].core.state = new_state.into();
    }

    /// `a` forces `b` to fail when it recognizes.
    fn can_prevent(&self, a: usize, b: usize) -> bool {
        let (ca, cb) = (&self.recognizers[a].core, &self.recognizers[b].core);
        a != b
            && ca.target == cb.target
            && cb.state.is_possible()
            && (ca.required_to_fail_by(RecognizerId(b))
                || !ca.can_recognize_simultaneously_with(RecognizerId(b)))
    }

    /// `b` has already recognized and keeps `a` from recognizing.
    fn can_be_prevented_by(&self, a: usize, b: usize) -> bool {
        let (ca, cb) = (&self.recognizers[a].core, &self.recognizers[b].core);
        a != b
            && ca.target == cb.target
            && cb.state == GestureState::Recognized
            && (ca.requires_recognizer_to_fail(RecognizerId(b))
                || !ca.can_recognize_simultaneously_with(RecognizerId(b)))
    }

    fn is_waiting_for(&self, a: usize, b: usize) -> bool {
        let (ca, cb) = (&self.recognizers[a].core, &self.recognizers[b].core);
        a != b
            && ca.target == cb.target
            && cb.state.is_possible()
            && ca.requires_recognizer_to_fail(RecognizerId(b))
    }

    fn reset_if_events_ended(&mut self, idx: usize) {
        let r = &mut self.recognizers[idx];
        if r.core.state != GestureState::Possible
            && r.core.state.pending().is_none()
            && r.core.events_ended()
        {
            r.core.reset();
            r.gesture.reset();
        }
    }

    fn notify(&mut self, idx: usize, listener: &mut dyn GestureListener) {
        let r = &mut self.recognizers[idx];
        let snapshot = GestureSnapshot::capture(RecognizerId(idx), &r.core, r.gesture.as_ref());
        listener.gesture_state_changed(&snapshot);
        for callback in r.callbacks.iter_mut() {
            callback(&snapshot);
        }
    }
}
