use crate::base::{RecognizerCore, Touch};
use crate::config::GestureConfig;
use crate::event::{Button, MouseEvent};
use crate::recognizer::Gesture;
use crate::state::{GestureKind, GestureState};

/// Discrete mouse click, optionally multi-click.
#[derive(Debug, Clone)]
pub struct ClickRecognizer {
    pub number_of_clicks: usize,
    pub button: Button,
    pub max_mouse_movement: f64,
    pub max_click_duration: f64,
    pub max_click_interval: f64,
    clicks: Vec<(f64, f64)>,
}

impl ClickRecognizer {
    pub fn new(config: &GestureConfig) -> Self {
        Self {
            number_of_clicks: 1,
            button: 0,
            max_mouse_movement: config.click_max_mouse_movement,
            max_click_duration: config.click_max_duration,
            max_click_interval: config.click_max_interval,
            clicks: Vec::new(),
        }
    }

    pub fn with_clicks(mut self, clicks: usize, button: Button) -> Self {
        self.number_of_clicks = clicks;
        self.button = button;
        self
    }
}

impl Gesture for ClickRecognizer {
    fn kind(&self) -> GestureKind {
        GestureKind::Click
    }

    fn mouse_down(&mut self, core: &mut RecognizerCore, event: &MouseEvent) -> Option<GestureState> {
        if !core.state().is_possible() {
            return None;
        }
        if event.button != self.button {
            return Some(GestureState::Failed);
        }
        self.clicks.push((event.client_x, event.client_y));
        core.fail_after_delay(self.max_click_duration);
        None
    }

    fn mouse_move(&mut self, core: &mut RecognizerCore, _event: &MouseEvent) -> Option<GestureState> {
        if !core.state().is_possible() {
            return None;
        }
        (core.translation_distance() > self.max_mouse_movement).then_some(GestureState::Failed)
    }

    fn mouse_up(&mut self, core: &mut RecognizerCore, _event: &MouseEvent) -> Option<GestureState> {
        if !core.state().is_possible() || core.mouse_button_mask() != 0 {
            return None;
        }
        if self.clicks.len() == self.number_of_clicks {
            let (x, y) = self.clicks[0];
            core.set_client(x, y);
            return Some(GestureState::Recognized);
        }
        core.fail_after_delay(self.max_click_interval);
        None
    }

    fn touch_start(&mut self, core: &mut RecognizerCore, _touch: &Touch) -> Option<GestureState> {
        core.state().is_possible().then_some(GestureState::Failed)
    }

    fn reset(&mut self) {
        self.clicks.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::ClickRecognizer;
    use crate::config::GestureConfig;
    use crate::recognizers::testing::*;
    use crate::state::GestureState;
    use pretty_assertions::assert_eq;

    #[test]
    fn click_is_recognized_where_the_button_went_down() {
        let mut h = Harness::new();
        let id = h.add(ClickRecognizer::new(&GestureConfig::default()));
        h.send(mouse_down(300.0, 200.0, 0, 0.0));
        h.send(mouse_move(302.0, 201.0, 40.0));
        h.send(mouse_up(302.0, 201.0, 0, 90.0));
        assert_eq!(h.states(id), vec![GestureState::Recognized]);
        assert_eq!((h.events[0].client_x, h.events[0].client_y), (300.0, 200.0));
    }

    #[test]
    fn wrong_button_slow_or_moving_clicks_fail() {
        let config = GestureConfig::default();

        let mut h = Harness::new();
        let id = h.add(ClickRecognizer::new(&config));
        h.send(mouse_down(0.0, 0.0, 2, 0.0));
        assert_eq!(h.state(id), GestureState::Failed);
        h.send(mouse_up(0.0, 0.0, 2, 10.0));

        h.send(mouse_down(0.0, 0.0, 0, 100.0));
        h.send(mouse_up(0.0, 0.0, 0, 700.0));
        assert!(h.states(id).is_empty());

        for i in 1..=6 {
            if i == 1 {
                h.send(mouse_down(0.0, 0.0, 0, 1000.0));
            }
            h.send(mouse_move(10.0 * i as f64, 0.0, 1000.0 + i as f64));
        }
        assert_eq!(h.state(id), GestureState::Failed);
        h.send(mouse_up(60.0, 0.0, 0, 1010.0));
        assert!(h.states(id).is_empty());
    }

    #[test]
    fn double_click_reports_the_first_click_point() {
        let mut h = Harness::new();
        let id = h.add(ClickRecognizer::new(&GestureConfig::default()).with_clicks(2, 0));
        h.send(mouse_down(5.0, 5.0, 0, 0.0));
        h.send(mouse_up(5.0, 5.0, 0, 50.0));
        h.send(mouse_down(6.0, 5.0, 0, 200.0));
        h.send(mouse_up(6.0, 5.0, 0, 250.0));
        assert_eq!(h.states(id), vec![GestureState::Recognized]);
        assert_eq!(h.events[0].client_x, 5.0);
    }

    #[test]
    fn touch_fails_a_click() {
        let mut h = Harness::new();
        let id = h.add(ClickRecognizer::new(&GestureConfig::default()));
        h.send(touch_start(&[(1, 0.0, 0.0)], 0.0));
        assert_eq!(h.state(id), GestureState::Failed);
    }
}
