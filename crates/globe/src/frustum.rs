use foundation::bounds::Aabb3;
use foundation::math::Matrix;

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Plane {
    pub n: [f64; 3],
    pub d: f64,
}

impl Plane {
    pub fn new(n: [f64; 3], d: f64) -> Self {
        Self { n, d }
    }

    pub fn normalize(self) -> Self {
        let l2 = self.n[0] * self.n[0] + self.n[1] * self.n[1] + self.n[2] * self.n[2];
        if l2 <= 0.0 {
            return self;
        }
        let inv = 1.0 / l2.sqrt();
        Self {
            n: [self.n[0] * inv, self.n[1] * inv, self.n[2] * inv],
            d: self.d * inv,
        }
    }

    pub fn distance(&self, p: [f64; 3]) -> f64 {
        self.n[0] * p[0] + self.n[1] * p[1] + self.n[2] * p[2] + self.d
    }
}

/// View frustum as 6 world-space planes.
///
/// A point `p` is inside iff `plane.distance(p) >= 0` for every plane.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Frustum {
    pub planes: [Plane; 6],
}

impl Frustum {
    /// Planes in the order left, right, bottom, top, near, far.
    pub fn new(planes: [Plane; 6]) -> Self {
        Self { planes }
    }

    /// Frustum of a combined projection * modelview matrix whose clip volume
    /// is `-w <= x, y <= w`, `0 <= z <= w`.
    pub fn from_view_projection(view_proj: &Matrix) -> Self {
        let [r0, r1, r2, r3] = view_proj.m;
        let plane = |sign: f64, r: [f64; 4]| {
            Plane::new(
                [r3[0] + sign * r[0], r3[1] + sign * r[1], r3[2] + sign * r[2]],
                r3[3] + sign * r[3],
            )
            .normalize()
        };
        // Near is z >= 0, i.e. r2 alone; far is w - z >= 0.
        let near = Plane::new([r2[0], r2[1], r2[2]], r2[3]).normalize();
        Self::new([
            plane(1.0, r0),
            plane(-1.0, r0),
            plane(1.0, r1),
            plane(-1.0, r1),
            near,
            plane(-1.0, r2),
        ])
    }

    pub fn contains_point(&self, p: [f64; 3]) -> bool {
        self.planes.iter().all(|pl| pl.distance(p) >= 0.0)
    }

    /// Conservative p-vertex test: false only when the box is fully outside
    /// some plane.
    pub fn intersects_aabb(&self, aabb: &Aabb3) -> bool {
        for plane in &self.planes {
            let p = [
                if plane.n[0] >= 0.0 { aabb.max[0] } else { aabb.min[0] },
                if plane.n[1] >= 0.0 { aabb.max[1] } else { aabb.min[1] },
                if plane.n[2] >= 0.0 { aabb.max[2] } else { aabb.min[2] },
            ];
            if plane.distance(p) < 0.0 {
                return false;
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::{Frustum, Plane};
    use foundation::bounds::Aabb3;
    use foundation::math::Matrix;

    fn unit_cube_frustum() -> Frustum {
        Frustum::new([
            Plane::new([1.0, 0.0, 0.0], 1.0),
            Plane::new([-1.0, 0.0, 0.0], 1.0),
            Plane::new([0.0, 1.0, 0.0], 1.0),
            Plane::new([0.0, -1.0, 0.0], 1.0),
            Plane::new([0.0, 0.0, 1.0], 1.0),
            Plane::new([0.0, 0.0, -1.0], 1.0),
        ])
    }

    #[test]
    fn intersects_aabb_basic() {
        let f = unit_cube_frustum();
        assert!(f.intersects_aabb(&Aabb3::new([-0.5, -0.5, -0.5], [0.5, 0.5, 0.5])));
        assert!(f.intersects_aabb(&Aabb3::new([0.5, 0.5, 0.5], [3.0, 3.0, 3.0])));
        assert!(!f.intersects_aabb(&Aabb3::new([2.0, 2.0, 2.0], [3.0, 3.0, 3.0])));
    }

    #[test]
    fn perspective_frustum_keeps_points_in_front_of_eye() {
        let proj = Matrix::perspective(45.0, 1.0, 1.0, 100.0);
        let f = Frustum::from_view_projection(&proj);
        assert!(f.contains_point([0.0, 0.0, -10.0]));
        assert!(!f.contains_point([0.0, 0.0, 10.0]));
        assert!(!f.contains_point([0.0, 0.0, -0.5]));
        assert!(!f.contains_point([0.0, 0.0, -200.0]));
        assert!(!f.contains_point([50.0, 0.0, -10.0]));
    }
}
