use foundation::math::Position;
use serde::{Deserialize, Serialize};

/// A view described by the point looked at.
///
/// `range` is the eye's distance from `position` in meters. Heading turns
/// clockwise from north, tilt leans from straight down (0) towards the
/// horizon (90), roll spins about the view axis; all in degrees.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct LookAt {
    pub position: Position,
    pub range: f64,
    pub heading: f64,
    pub tilt: f64,
    pub roll: f64,
}

impl LookAt {
    pub fn new(position: Position, range: f64) -> Self {
        Self {
            position,
            range,
            heading: 0.0,
            tilt: 0.0,
            roll: 0.0,
        }
    }

    pub fn with_orientation(mut self, heading: f64, tilt: f64, roll: f64) -> Self {
        self.heading = heading;
        self.tilt = tilt;
        self.roll = roll;
        self
    }
}

impl Default for LookAt {
    fn default() -> Self {
        Self::new(Position::ZERO, 10.0e6)
    }
}

/// The eye itself: where it is and how it is oriented.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    pub position: Position,
    pub heading: f64,
    pub tilt: f64,
    pub roll: f64,
}

impl Camera {
    pub fn new(position: Position) -> Self {
        Self {
            position,
            heading: 0.0,
            tilt: 0.0,
            roll: 0.0,
        }
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(Position::new(0.0, 0.0, 10.0e6))
    }
}
