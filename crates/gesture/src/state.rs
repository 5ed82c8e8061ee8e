use serde::{Deserialize, Serialize};

/// A recognition deferred until the recognizers this one waits on fail.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PendingTransition {
    Recognized,
    Began,
}

impl From<PendingTransition> for GestureState {
    fn from(p: PendingTransition) -> Self {
        match p {
            PendingTransition::Recognized => GestureState::Recognized,
            PendingTransition::Began => GestureState::Began,
        }
    }
}

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GestureState {
    #[default]
    Possible,
    /// Still possible, with a recognition waiting on other recognizers.
    Pending(PendingTransition),
    Failed,
    Recognized,
    Began,
    Changed,
    Ended,
    Cancelled,
}

impl GestureState {
    pub fn is_possible(self) -> bool {
        matches!(self, GestureState::Possible | GestureState::Pending(_))
    }

    /// Began or Changed.
    pub fn is_active(self) -> bool {
        matches!(self, GestureState::Began | GestureState::Changed)
    }

    pub fn pending(self) -> Option<PendingTransition> {
        match self {
            GestureState::Pending(p) => Some(p),
            _ => None,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GestureKind {
    Drag,
    Pan,
    Pinch,
    Rotation,
    Tilt,
    Tap,
    Click,
}
