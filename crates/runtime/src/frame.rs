use foundation::time::Millis;

/// Deterministic frame metadata.
///
/// Frames are stamped with the host clock reading that produced them so a
/// recorded input script replays into the same frame sequence.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Frame {
    /// 0-based frame index.
    pub index: u64,
    /// Host time at the start of the frame.
    pub time: Millis,
}

impl Frame {
    pub fn first(time: Millis) -> Self {
        Self { index: 0, time }
    }

    /// Fixed-step frame `index` of a clock starting at zero.
    pub fn fixed(index: u64, dt_ms: f64) -> Self {
        Self {
            index,
            time: Millis(index as f64 * dt_ms),
        }
    }

    pub fn next_at(self, time: Millis) -> Self {
        Self {
            index: self.index + 1,
            time,
        }
    }

    pub fn elapsed_since(&self, earlier: &Frame) -> f64 {
        self.time.elapsed_since(earlier.time)
    }
}
