use serde::{Deserialize, Serialize};

use super::Vec2;

/// Screen-space rectangle; origin is its minimum corner.
#[derive(Debug, Copy, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Rectangle {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rectangle {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn min_x(&self) -> f64 {
        self.x
    }

    pub fn min_y(&self) -> f64 {
        self.y
    }

    pub fn max_x(&self) -> f64 {
        self.x + self.width
    }

    pub fn max_y(&self) -> f64 {
        self.y + self.height
    }

    pub fn mid_x(&self) -> f64 {
        self.x + 0.5 * self.width
    }

    pub fn mid_y(&self) -> f64 {
        self.y + 0.5 * self.height
    }

    pub fn aspect_ratio(&self) -> f64 {
        if self.height == 0.0 {
            1.0
        } else {
            self.width / self.height
        }
    }

    /// Edge-inclusive containment.
    pub fn contains_point(&self, p: Vec2) -> bool {
        self.x <= p.x && p.x <= self.max_x() && self.y <= p.y && p.y <= self.max_y()
    }

    /// True when the rectangles share interior area; empty rectangles never intersect.
    pub fn intersects(&self, other: &Rectangle) -> bool {
        if self.width <= 0.0 || self.height <= 0.0 || other.width <= 0.0 || other.height <= 0.0 {
            return false;
        }
        self.x < other.max_x()
            && other.x < self.max_x()
            && self.y < other.max_y()
            && other.y < self.max_y()
    }

    pub fn intersects_any(&self, others: &[Rectangle]) -> bool {
        others.iter().any(|r| self.intersects(r))
    }
}

#[cfg(test)]
mod tests {
    use super::Rectangle;
    use crate::math::Vec2;

    #[test]
    fn contains_point_includes_edges() {
        let r = Rectangle::new(0.0, 0.0, 10.0, 5.0);
        assert!(r.contains_point(Vec2::new(10.0, 5.0)));
        assert!(r.contains_point(Vec2::new(0.0, 0.0)));
        assert!(!r.contains_point(Vec2::new(10.1, 2.0)));
    }

    #[test]
    fn touching_rectangles_do_not_intersect() {
        let a = Rectangle::new(0.0, 0.0, 10.0, 10.0);
        let b = Rectangle::new(10.0, 0.0, 5.0, 5.0);
        let c = Rectangle::new(5.0, 5.0, 10.0, 10.0);
        assert!(!a.intersects(&b));
        assert!(a.intersects(&c));
        assert!(a.intersects_any(&[b, c]));
        assert!(!a.intersects(&Rectangle::new(1.0, 1.0, 0.0, 3.0)));
    }
}
