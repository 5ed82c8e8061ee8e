use foundation::time::{Deadline, Millis};

use crate::error::GestureError;
use crate::registry::{RecognizerId, TargetId};
use crate::state::GestureState;

/// One active touch as a recognizer tracks it.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Touch {
    pub identifier: i64,
    pub client_x: f64,
    pub client_y: f64,
    pub client_start_x: f64,
    pub client_start_y: f64,
}

impl Touch {
    pub fn new(identifier: i64, client_x: f64, client_y: f64) -> Self {
        Self {
            identifier,
            client_x,
            client_y,
            client_start_x: client_x,
            client_start_y: client_y,
        }
    }

    pub fn translation_x(&self) -> f64 {
        self.client_x - self.client_start_x
    }

    pub fn translation_y(&self) -> f64 {
        self.client_y - self.client_start_y
    }
}

/// Input bookkeeping every recognizer shares: position, filtered
/// translation, buttons, touches, relationships and the fail-after-delay
/// deadline.
#[derive(Debug, Clone)]
pub struct RecognizerCore {
    pub target: TargetId,
    pub enabled: bool,
    pub(crate) state: GestureState,
    pub(crate) client_x: f64,
    pub(crate) client_y: f64,
    pub(crate) client_start_x: f64,
    pub(crate) client_start_y: f64,
    pub(crate) translation_x: f64,
    pub(crate) translation_y: f64,
    pub translation_weight: f64,
    pub(crate) mouse_button_mask: u32,
    pub(crate) touches: Vec<Touch>,
    pub(crate) centroid_shift_x: f64,
    pub(crate) centroid_shift_y: f64,
    pub(crate) can_recognize_with: Vec<RecognizerId>,
    pub(crate) requires_failure_of: Vec<RecognizerId>,
    pub(crate) required_to_fail_by: Vec<RecognizerId>,
    pub(crate) deadline: Option<Deadline>,
    pub(crate) now: Millis,
}

impl RecognizerCore {
    pub fn new(target: TargetId, translation_weight: f64) -> Self {
        Self {
            target,
            enabled: true,
            state: GestureState::Possible,
            client_x: 0.0,
            client_y: 0.0,
            client_start_x: 0.0,
            client_start_y: 0.0,
            translation_x: 0.0,
            translation_y: 0.0,
            translation_weight,
            mouse_button_mask: 0,
            touches: Vec::new(),
            centroid_shift_x: 0.0,
            centroid_shift_y: 0.0,
            can_recognize_with: Vec::new(),
            requires_failure_of: Vec::new(),
            required_to_fail_by: Vec::new(),
            deadline: None,
            now: Millis::ZERO,
        }
    }

    pub fn state(&self) -> GestureState {
        self.state
    }

    pub fn client_x(&self) -> f64 {
        self.client_x
    }

    pub fn client_y(&self) -> f64 {
        self.client_y
    }

    pub fn set_client(&mut self, x: f64, y: f64) {
        self.client_x = x;
        self.client_y = y;
    }

    pub fn translation_x(&self) -> f64 {
        self.translation_x
    }

    pub fn translation_y(&self) -> f64 {
        self.translation_y
    }

    /// Overrides the translation and restarts accumulation from the current
    /// client point.
    pub fn set_translation(&mut self, x: f64, y: f64) {
        self.translation_x = x;
        self.translation_y = y;
        self.client_start_x = self.client_x;
        self.client_start_y = self.client_y;
        self.centroid_shift_x = 0.0;
        self.centroid_shift_y = 0.0;
    }

    pub fn translation_distance(&self) -> f64 {
        self.translation_x.hypot(self.translation_y)
    }

    pub fn mouse_button_mask(&self) -> u32 {
        self.mouse_button_mask
    }

    pub fn touch_count(&self) -> usize {
        self.touches.len()
    }

    pub fn touch(&self, index: usize) -> Result<&Touch, GestureError> {
        self.touches
            .get(index)
            .ok_or(GestureError::TouchIndexOutOfRange {
                index,
                count: self.touches.len(),
            })
    }

    pub fn touch_with_id(&self, identifier: i64) -> Option<&Touch> {
        self.touches.iter().find(|t| t.identifier == identifier)
    }

    pub fn touches(&self) -> &[Touch] {
        &self.touches
    }

    /// Time of the event being handled.
    pub fn now(&self) -> Millis {
        self.now
    }

    /// Arms (or re-arms) the deadline after which a still-possible
    /// recognizer fails.
    pub fn fail_after_delay(&mut self, delay_ms: f64) {
        self.deadline = Some(Deadline::after(self.now, delay_ms));
    }

    pub fn cancel_fail_after_delay(&mut self) {
        self.deadline = None;
    }

    pub fn deadline(&self) -> Option<Deadline> {
        self.deadline
    }

    pub fn can_recognize_simultaneously_with(&self, other: RecognizerId) -> bool {
        self.can_recognize_with.contains(&other)
    }

    pub fn requires_recognizer_to_fail(&self, other: RecognizerId) -> bool {
        self.requires_failure_of.contains(&other)
    }

    pub fn required_to_fail_by(&self, other: RecognizerId) -> bool {
        self.required_to_fail_by.contains(&other)
    }

    pub(crate) fn reset(&mut self) {
        self.state = GestureState::Possible;
        self.client_x = 0.0;
        self.client_y = 0.0;
        self.client_start_x = 0.0;
        self.client_start_y = 0.0;
        self.translation_x = 0.0;
        self.translation_y = 0.0;
        self.mouse_button_mask = 0;
        self.touches.clear();
        self.centroid_shift_x = 0.0;
        self.centroid_shift_y = 0.0;
        self.deadline = None;
    }

    pub(crate) fn begin_mouse(&mut self, x: f64, y: f64) {
        self.client_x = x;
        self.client_y = y;
        self.client_start_x = x;
        self.client_start_y = y;
        self.translation_x = 0.0;
        self.translation_y = 0.0;
    }

    /// Weighted translation update for a mouse at `x`, `y`.
    pub(crate) fn track_mouse(&mut self, x: f64, y: f64) {
        let dx = x - self.client_start_x;
        let dy = y - self.client_start_y;
        let w = self.translation_weight;
        self.client_x = x;
        self.client_y = y;
        self.translation_x = self.translation_x * (1.0 - w) + dx * w;
        self.translation_y = self.translation_y * (1.0 - w) + dy * w;
    }

    pub(crate) fn add_touch(&mut self, touch: Touch) {
        self.touches.push(touch);
        if self.touches.len() == 1 {
            self.begin_mouse(touch.client_x, touch.client_y);
            self.centroid_shift_x = 0.0;
            self.centroid_shift_y = 0.0;
        } else {
            self.touches_added_or_removed();
        }
    }

    /// Moves a tracked touch and updates the centroid translation. Returns
    /// the updated touch, or `None` for unknown or unmoved touches.
    pub(crate) fn move_touch(&mut self, identifier: i64, x: f64, y: f64) -> Option<Touch> {
        let touch = self.touches.iter_mut().find(|t| t.identifier == identifier)?;
        if touch.client_x == x && touch.client_y == y {
            return None;
        }
        touch.client_x = x;
        touch.client_y = y;
        let moved = *touch;

        let (cx, cy) = self.touch_centroid();
        let dx = cx - self.client_start_x + self.centroid_shift_x;
        let dy = cy - self.client_start_y + self.centroid_shift_y;
        let w = self.translation_weight;
        self.client_x = cx;
        self.client_y = cy;
        self.translation_x = self.translation_x * (1.0 - w) + dx * w;
        self.translation_y = self.translation_y * (1.0 - w) + dy * w;
        Some(moved)
    }

    pub(crate) fn remove_touch(&mut self, identifier: i64) -> Option<Touch> {
        let index = self.touches.iter().position(|t| t.identifier == identifier)?;
        let touch = self.touches.remove(index);
        self.touches_added_or_removed();
        Some(touch)
    }

    pub fn touch_centroid(&self) -> (f64, f64) {
        let n = self.touches.len() as f64;
        self.touches.iter().fold((0.0, 0.0), |(x, y), t| {
            (x + t.client_x / n, y + t.client_y / n)
        })
    }

    // Shift the start point by the centroid jump so translation stays put.
    fn touches_added_or_removed(&mut self) {
        self.centroid_shift_x += self.client_x;
        self.centroid_shift_y += self.client_y;
        let (cx, cy) = self.touch_centroid();
        self.client_x = cx;
        self.client_y = cy;
        self.centroid_shift_x -= cx;
        self.centroid_shift_y -= cy;
    }

    pub(crate) fn events_ended(&self) -> bool {
        self.mouse_button_mask == 0 && self.touches.is_empty()
    }
}
