use super::Vec3;

/// A ray: origin plus (not necessarily unit) direction.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Line {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Line {
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self { origin, direction }
    }

    /// Ray from `origin` through `target`.
    pub fn from_segment(origin: Vec3, target: Vec3) -> Self {
        Self::new(origin, target - origin)
    }

    /// Ray with a unit direction, or `None` if the direction is degenerate.
    pub fn normalized(self) -> Option<Self> {
        Some(Self::new(self.origin, self.direction.normalize()?))
    }

    pub fn point_at(&self, distance: f64) -> Vec3 {
        self.origin + self.direction * distance
    }
}
