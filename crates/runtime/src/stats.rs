use std::collections::BTreeMap;

use serde::Serialize;

/// Running summary of integer samples.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Histogram {
    pub count: u64,
    pub sum: i64,
    pub min: i64,
    pub max: i64,
}

impl Histogram {
    pub fn record(&mut self, value: i64) {
        if self.count == 0 {
            self.min = value;
            self.max = value;
        } else {
            self.min = self.min.min(value);
            self.max = self.max.max(value);
        }
        self.count += 1;
        self.sum += value;
    }

    pub fn mean(&self) -> Option<f64> {
        (self.count > 0).then(|| self.sum as f64 / self.count as f64)
    }
}

/// Per-window frame statistics: how often the view moved and how much
/// terrain each frame selected.
///
/// Names are static so the sorted maps give a stable report order.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct FrameStatistics {
    frames: u64,
    counters: BTreeMap<&'static str, u64>,
    samples: BTreeMap<&'static str, Histogram>,
}

impl FrameStatistics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin_frame(&mut self) {
        self.frames += 1;
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn increment(&mut self, name: &'static str) {
        *self.counters.entry(name).or_insert(0) += 1;
    }

    pub fn counter(&self, name: &str) -> u64 {
        self.counters.get(name).copied().unwrap_or(0)
    }

    pub fn sample(&mut self, name: &'static str, value: i64) {
        self.samples.entry(name).or_default().record(value);
    }

    pub fn histogram(&self, name: &str) -> Option<Histogram> {
        self.samples.get(name).copied()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
