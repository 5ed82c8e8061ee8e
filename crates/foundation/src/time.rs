use serde::{Deserialize, Serialize};

/// Host clock reading in milliseconds.
///
/// Input events carry one of these, and every timer in the engine is a
/// deadline expressed against the same clock so replays stay deterministic.
#[derive(Copy, Clone, Debug, Default, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Millis(pub f64);

impl Millis {
    pub const ZERO: Millis = Millis(0.0);

    pub fn after(self, delay_ms: f64) -> Self {
        Millis(self.0 + delay_ms)
    }

    pub fn elapsed_since(self, earlier: Millis) -> f64 {
        self.0 - earlier.0
    }

    pub fn as_seconds(self) -> f64 {
        self.0 / 1000.0
    }
}

/// A point in time after which something should happen.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Deadline {
    pub at: Millis,
}

impl Deadline {
    pub fn after(now: Millis, delay_ms: f64) -> Self {
        Self {
            at: now.after(delay_ms),
        }
    }

    pub fn is_due(&self, now: Millis) -> bool {
        now.0 >= self.at.0
    }
}

#[cfg(test)]
mod tests {
    use super::{Deadline, Millis};

    #[test]
    fn deadline_is_due_at_and_after_its_instant() {
        let d = Deadline::after(Millis(100.0), 400.0);
        assert!(!d.is_due(Millis(499.9)));
        assert!(d.is_due(Millis(500.0)));
        assert!(d.is_due(Millis(900.0)));
    }

    #[test]
    fn elapsed_is_signed() {
        assert_eq!(Millis(1500.0).elapsed_since(Millis(1000.0)), 500.0);
        assert_eq!(Millis(1000.0).elapsed_since(Millis(1500.0)), -500.0);
    }
}
