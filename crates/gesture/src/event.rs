use foundation::time::Millis;
use serde::{Deserialize, Serialize};

/// Mouse button number as reported by the host: 0 primary, 1 middle, 2 secondary.
pub type Button = u8;

#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct MouseEvent {
    pub client_x: f64,
    pub client_y: f64,
    #[serde(default)]
    pub button: Button,
    #[serde(default)]
    pub time: Millis,
    #[serde(default)]
    pub default_prevented: bool,
}

impl MouseEvent {
    pub fn new(client_x: f64, client_y: f64, button: Button, time: Millis) -> Self {
        Self {
            client_x,
            client_y,
            button,
            time,
            default_prevented: false,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct TouchPoint {
    pub identifier: i64,
    pub client_x: f64,
    pub client_y: f64,
}

impl TouchPoint {
    pub fn new(identifier: i64, client_x: f64, client_y: f64) -> Self {
        Self {
            identifier,
            client_x,
            client_y,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TouchEvent {
    pub changed_touches: Vec<TouchPoint>,
    #[serde(default)]
    pub time: Millis,
    #[serde(default)]
    pub default_prevented: bool,
}

impl TouchEvent {
    pub fn new(changed_touches: Vec<TouchPoint>, time: Millis) -> Self {
        Self {
            changed_touches,
            time,
            default_prevented: false,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointerType {
    Mouse,
    Touch,
    Pen,
}

#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointerEvent {
    pub pointer_id: i64,
    pub pointer_type: PointerType,
    pub client_x: f64,
    pub client_y: f64,
    #[serde(default)]
    pub button: Button,
    #[serde(default)]
    pub time: Millis,
    #[serde(default)]
    pub default_prevented: bool,
}

impl PointerEvent {
    pub fn as_mouse(&self) -> MouseEvent {
        MouseEvent {
            client_x: self.client_x,
            client_y: self.client_y,
            button: self.button,
            time: self.time,
            default_prevented: self.default_prevented,
        }
    }

    pub fn as_touch(&self) -> TouchPoint {
        TouchPoint::new(self.pointer_id, self.client_x, self.client_y)
    }
}

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeltaMode {
    #[default]
    Pixel,
    Line,
    Page,
}

#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct WheelEvent {
    #[serde(default)]
    pub client_x: f64,
    #[serde(default)]
    pub client_y: f64,
    pub delta_y: f64,
    #[serde(default)]
    pub delta_mode: DeltaMode,
    #[serde(default)]
    pub time: Millis,
}

#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyEvent {
    pub key_code: u32,
    #[serde(default)]
    pub time: Millis,
}

/// Input delivered to a window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InputEvent {
    MouseDown(MouseEvent),
    MouseMove(MouseEvent),
    MouseUp(MouseEvent),
    TouchStart(TouchEvent),
    TouchMove(TouchEvent),
    TouchEnd(TouchEvent),
    TouchCancel(TouchEvent),
    PointerDown(PointerEvent),
    PointerMove(PointerEvent),
    PointerUp(PointerEvent),
    PointerCancel(PointerEvent),
    Wheel(WheelEvent),
    KeyDown(KeyEvent),
    KeyUp(KeyEvent),
}

impl InputEvent {
    pub fn time(&self) -> Millis {
        match self {
            InputEvent::MouseDown(e) | InputEvent::MouseMove(e) | InputEvent::MouseUp(e) => e.time,
            InputEvent::TouchStart(e)
            | InputEvent::TouchMove(e)
            | InputEvent::TouchEnd(e)
            | InputEvent::TouchCancel(e) => e.time,
            InputEvent::PointerDown(e)
            | InputEvent::PointerMove(e)
            | InputEvent::PointerUp(e)
            | InputEvent::PointerCancel(e) => e.time,
            InputEvent::Wheel(e) => e.time,
            InputEvent::KeyDown(e) | InputEvent::KeyUp(e) => e.time,
        }
    }

    pub fn default_prevented(&self) -> bool {
        match self {
            InputEvent::MouseDown(e) | InputEvent::MouseMove(e) | InputEvent::MouseUp(e) => {
                e.default_prevented
            }
            InputEvent::TouchStart(e)
            | InputEvent::TouchMove(e)
            | InputEvent::TouchEnd(e)
            | InputEvent::TouchCancel(e) => e.default_prevented,
            InputEvent::PointerDown(e)
            | InputEvent::PointerMove(e)
            | InputEvent::PointerUp(e)
            | InputEvent::PointerCancel(e) => e.default_prevented,
            InputEvent::Wheel(_) | InputEvent::KeyDown(_) | InputEvent::KeyUp(_) => false,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            InputEvent::MouseDown(_) => "mousedown",
            InputEvent::MouseMove(_) => "mousemove",
            InputEvent::MouseUp(_) => "mouseup",
            InputEvent::TouchStart(_) => "touchstart",
            InputEvent::TouchMove(_) => "touchmove",
            InputEvent::TouchEnd(_) => "touchend",
            InputEvent::TouchCancel(_) => "touchcancel",
            InputEvent::PointerDown(_) => "pointerdown",
            InputEvent::PointerMove(_) => "pointermove",
            InputEvent::PointerUp(_) => "pointerup",
            InputEvent::PointerCancel(_) => "pointercancel",
            InputEvent::Wheel(_) => "wheel",
            InputEvent::KeyDown(_) => "keydown",
            InputEvent::KeyUp(_) => "keyup",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{DeltaMode, InputEvent, PointerType};
    use foundation::time::Millis;
    use pretty_assertions::assert_eq;

    #[test]
    fn events_deserialize_from_tagged_json() {
        let json = r#"[
            {"type": "mouse_down", "client_x": 10, "client_y": 20, "button": 2, "time": 5},
            {"type": "touch_move", "changed_touches": [{"identifier": 1, "client_x": 3, "client_y": 4}]},
            {"type": "pointer_down", "pointer_id": 7, "pointer_type": "touch", "client_x": 1, "client_y": 2},
            {"type": "wheel", "delta_y": -3, "delta_mode": "line", "time": 100}
        ]"#;
        let events: Vec<InputEvent> = serde_json::from_str(json).unwrap();
        assert_eq!(events.len(), 4);

        match &events[0] {
            InputEvent::MouseDown(e) => {
                assert_eq!((e.client_x, e.button), (10.0, 2));
                assert!(!e.default_prevented);
            }
            other => panic!("unexpected {other:?}"),
        }
        match &events[2] {
            InputEvent::PointerDown(p) => assert_eq!(p.pointer_type, PointerType::Touch),
            other => panic!("unexpected {other:?}"),
        }
        match &events[3] {
            InputEvent::Wheel(w) => assert_eq!(w.delta_mode, DeltaMode::Line),
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(events[3].time(), Millis(100.0));
        assert_eq!(events[1].time(), Millis::ZERO);
        assert_eq!(events[1].name(), "touchmove");
    }
}
