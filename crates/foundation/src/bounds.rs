use crate::math::Vec3;

/// Axis-aligned bounding box in model coordinates.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Aabb3 {
    pub min: [f64; 3],
    pub max: [f64; 3],
}

impl Aabb3 {
    pub fn new(min: [f64; 3], max: [f64; 3]) -> Self {
        Aabb3 { min, max }
    }

    /// Tightest box around the points, or `None` for an empty slice.
    pub fn from_points(points: &[Vec3]) -> Option<Self> {
        let first = points.first()?;
        let mut b = Aabb3::new(first.to_array(), first.to_array());
        for p in &points[1..] {
            b.include(*p);
        }
        Some(b)
    }

    pub fn include(&mut self, p: Vec3) {
        let p = p.to_array();
        for i in 0..3 {
            self.min[i] = self.min[i].min(p[i]);
            self.max[i] = self.max[i].max(p[i]);
        }
    }

    pub fn center(&self) -> Vec3 {
        Vec3::new(
            0.5 * (self.min[0] + self.max[0]),
            0.5 * (self.min[1] + self.max[1]),
            0.5 * (self.min[2] + self.max[2]),
        )
    }

    pub fn contains_point(&self, p: Vec3) -> bool {
        let p = p.to_array();
        (0..3).all(|i| self.min[i] <= p[i] && p[i] <= self.max[i])
    }
}

#[cfg(test)]
mod tests {
    use super::Aabb3;
    use crate::math::Vec3;

    #[test]
    fn from_points_covers_all_inputs() {
        let pts = [
            Vec3::new(1.0, -2.0, 3.0),
            Vec3::new(-4.0, 5.0, 0.0),
            Vec3::new(2.0, 0.0, -1.0),
        ];
        let b = Aabb3::from_points(&pts).unwrap();
        assert_eq!(b.min, [-4.0, -2.0, -1.0]);
        assert_eq!(b.max, [2.0, 5.0, 3.0]);
        assert!(pts.iter().all(|p| b.contains_point(*p)));
        assert!(Aabb3::from_points(&[]).is_none());
    }
}
