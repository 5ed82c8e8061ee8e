use super::{DEGREES_TO_RADIANS, RADIANS_TO_DEGREES, Vec3};

/// Row-major 4x4 transform: `m[row][col]`, translation in column 3.
///
/// Points are column vectors, so `a.multiply(&b)` applies `b` first.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Matrix {
    pub m: [[f64; 4]; 4],
}

impl Matrix {
    pub const IDENTITY: Matrix = Matrix {
        m: [
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ],
    };

    pub fn new(m: [[f64; 4]; 4]) -> Self {
        Self { m }
    }

    pub fn from_translation(x: f64, y: f64, z: f64) -> Self {
        let mut out = Self::IDENTITY;
        out.m[0][3] = x;
        out.m[1][3] = y;
        out.m[2][3] = z;
        out
    }

    /// Rotation matrix from three row basis vectors (no translation).
    pub fn from_rows(r0: Vec3, r1: Vec3, r2: Vec3) -> Self {
        Self::new([
            [r0.x, r0.y, r0.z, 0.0],
            [r1.x, r1.y, r1.z, 0.0],
            [r2.x, r2.y, r2.z, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// Eye-space orientation for the given heading, tilt and roll (degrees).
    ///
    /// Heading turns clockwise about the local up axis, tilt pitches the view
    /// from straight down towards the horizon, roll spins about the view axis.
    /// The result is `roll * tilt * heading`.
    pub fn from_heading_tilt_roll(heading: f64, tilt: f64, roll: f64) -> Self {
        let (sh, ch) = (heading * DEGREES_TO_RADIANS).sin_cos();
        let (st, ct) = (tilt * DEGREES_TO_RADIANS).sin_cos();
        let (sr, cr) = (roll * DEGREES_TO_RADIANS).sin_cos();

        let h = Self::new([
            [ch, -sh, 0.0, 0.0],
            [sh, ch, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ]);
        let t = Self::new([
            [1.0, 0.0, 0.0, 0.0],
            [0.0, ct, st, 0.0],
            [0.0, -st, ct, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ]);
        let r = Self::new([
            [cr, sr, 0.0, 0.0],
            [-sr, cr, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ]);
        r.multiply(&t).multiply(&h)
    }

    /// Right-handed perspective projection mapping view depth to clip z in [0, w].
    pub fn perspective(fovy_degrees: f64, aspect: f64, near: f64, far: f64) -> Self {
        let f = 1.0 / (fovy_degrees * DEGREES_TO_RADIANS * 0.5).tan();
        let nf = near - far;
        Self::new([
            [f / aspect, 0.0, 0.0, 0.0],
            [0.0, f, 0.0, 0.0],
            [0.0, 0.0, far / nf, near * far / nf],
            [0.0, 0.0, -1.0, 0.0],
        ])
    }

    pub fn multiply(&self, other: &Matrix) -> Matrix {
        let mut out = [[0.0; 4]; 4];
        for (r, row) in out.iter_mut().enumerate() {
            for (c, cell) in row.iter_mut().enumerate() {
                *cell = (0..4).map(|k| self.m[r][k] * other.m[k][c]).sum();
            }
        }
        Matrix::new(out)
    }

    /// `self = self * translation(x, y, z)`.
    pub fn multiply_by_translation(&mut self, x: f64, y: f64, z: f64) {
        *self = self.multiply(&Matrix::from_translation(x, y, z));
    }

    /// `self = self * rotation(axis, angle)`; angle in degrees, axis need not be unit.
    pub fn multiply_by_rotation(&mut self, axis: Vec3, angle: f64) {
        let Some(a) = axis.normalize() else {
            return;
        };
        let (s, c) = (angle * DEGREES_TO_RADIANS).sin_cos();
        let t = 1.0 - c;
        let rot = Matrix::new([
            [t * a.x * a.x + c, t * a.x * a.y - s * a.z, t * a.x * a.z + s * a.y, 0.0],
            [t * a.x * a.y + s * a.z, t * a.y * a.y + c, t * a.y * a.z - s * a.x, 0.0],
            [t * a.x * a.z - s * a.y, t * a.y * a.z + s * a.x, t * a.z * a.z + c, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ]);
        *self = self.multiply(&rot);
    }

    pub fn transpose(&self) -> Matrix {
        let mut out = [[0.0; 4]; 4];
        for (r, row) in out.iter_mut().enumerate() {
            for (c, cell) in row.iter_mut().enumerate() {
                *cell = self.m[c][r];
            }
        }
        Matrix::new(out)
    }

    /// Inverse of a rigid transform (orthonormal rotation plus translation).
    pub fn invert_orthonormal(&self) -> Matrix {
        let m = &self.m;
        let mut out = Matrix::IDENTITY;
        for r in 0..3 {
            for c in 0..3 {
                out.m[r][c] = m[c][r];
            }
        }
        for r in 0..3 {
            out.m[r][3] = -(out.m[r][0] * m[0][3] + out.m[r][1] * m[1][3] + out.m[r][2] * m[2][3]);
        }
        out
    }

    /// Affine point transform (w = 1, no perspective divide).
    pub fn transform_point(&self, p: Vec3) -> Vec3 {
        let m = &self.m;
        Vec3::new(
            m[0][0] * p.x + m[0][1] * p.y + m[0][2] * p.z + m[0][3],
            m[1][0] * p.x + m[1][1] * p.y + m[1][2] * p.z + m[1][3],
            m[2][0] * p.x + m[2][1] * p.y + m[2][2] * p.z + m[2][3],
        )
    }

    /// Direction transform (w = 0).
    pub fn transform_vector(&self, v: Vec3) -> Vec3 {
        let m = &self.m;
        Vec3::new(
            m[0][0] * v.x + m[0][1] * v.y + m[0][2] * v.z,
            m[1][0] * v.x + m[1][1] * v.y + m[1][2] * v.z,
            m[2][0] * v.x + m[2][1] * v.y + m[2][2] * v.z,
        )
    }

    pub fn row(&self, r: usize) -> Vec3 {
        Vec3::new(self.m[r][0], self.m[r][1], self.m[r][2])
    }

    pub fn translation(&self) -> Vec3 {
        Vec3::new(self.m[0][3], self.m[1][3], self.m[2][3])
    }

    /// Model-space eye point of a modelview matrix.
    pub fn extract_eye_point(&self) -> Vec3 {
        self.invert_orthonormal().translation()
    }

    /// Model-space unit view direction of a modelview matrix (eye looks down -Z).
    pub fn extract_forward_vector(&self) -> Vec3 {
        -self.row(2)
    }

    /// Heading of a local-frame modelview, disambiguated by a known roll.
    ///
    /// At tilt 0 heading and roll describe the same rotation; the caller's
    /// roll decides how it is split.
    pub fn extract_heading(&self, roll: f64) -> f64 {
        let (sr, cr) = (roll * DEGREES_TO_RADIANS).sin_cos();
        let m = &self.m;
        let ch = cr * m[0][0] - sr * m[1][0];
        let sh = sr * m[1][1] - cr * m[0][1];
        sh.atan2(ch) * RADIANS_TO_DEGREES
    }

    /// Tilt of a local-frame modelview in [0, 180].
    pub fn extract_tilt(&self) -> f64 {
        let m = &self.m;
        let ct = m[2][2];
        let st = m[0][2].hypot(m[1][2]);
        st.atan2(ct) * RADIANS_TO_DEGREES
    }

    /// Roll of a local-frame modelview, or `None` at tilt 0 where it cannot
    /// be separated from heading.
    pub fn extract_roll(&self) -> Option<f64> {
        let m = &self.m;
        let st = m[0][2].hypot(m[1][2]);
        if st < 1e-12 {
            return None;
        }
        Some(m[0][2].atan2(m[1][2]) * RADIANS_TO_DEGREES)
    }

    pub fn is_finite(&self) -> bool {
        self.m.iter().flatten().all(|v| v.is_finite())
    }
}

impl Default for Matrix {
    fn default() -> Self {
        Self::IDENTITY
    }
}

#[cfg(test)]
mod tests {
    use super::Matrix;
    use crate::math::Vec3;

    fn assert_close(a: f64, b: f64, eps: f64) {
        let diff = (a - b).abs();
        assert!(diff <= eps, "expected {a} ~= {b} (diff {diff})");
    }

    fn assert_vec_close(a: Vec3, b: Vec3, eps: f64) {
        assert_close(a.x, b.x, eps);
        assert_close(a.y, b.y, eps);
        assert_close(a.z, b.z, eps);
    }

    #[test]
    fn heading_tilt_roll_extract_round_trip() {
        for (h, t, r) in [(30.0, 45.0, 0.0), (-120.0, 10.0, 5.0), (90.0, 80.0, -20.0), (179.0, 1.0, 0.0)] {
            let m = Matrix::from_heading_tilt_roll(h, t, r);
            assert_close(m.extract_heading(r), h, 1e-9);
            assert_close(m.extract_tilt(), t, 1e-9);
            assert_close(m.extract_roll().unwrap(), r, 1e-9);
        }
    }

    #[test]
    fn zero_tilt_couples_heading_and_roll() {
        let m = Matrix::from_heading_tilt_roll(40.0, 0.0, 10.0);
        // Only the difference heading - roll is observable.
        assert_close(m.extract_heading(0.0), 30.0, 1e-9);
        assert_close(m.extract_heading(10.0), 40.0, 1e-9);
        assert_eq!(m.extract_roll(), None);
    }

    #[test]
    fn orthonormal_inverse_undoes_transform() {
        let mut m = Matrix::from_heading_tilt_roll(25.0, 60.0, 0.0);
        m.multiply_by_translation(10.0, -4.0, 3.0);
        let p = Vec3::new(1.0, 2.0, 3.0);
        let back = m.invert_orthonormal().transform_point(m.transform_point(p));
        assert_vec_close(back, p, 1e-9);
    }

    #[test]
    fn eye_point_and_forward() {
        let m = Matrix::from_translation(0.0, 0.0, -100.0);
        assert_vec_close(m.extract_eye_point(), Vec3::new(0.0, 0.0, 100.0), 1e-12);
        assert_vec_close(m.extract_forward_vector(), Vec3::new(0.0, 0.0, -1.0), 1e-12);
    }

    #[test]
    fn rotation_about_z_turns_x_into_y() {
        let mut m = Matrix::IDENTITY;
        m.multiply_by_rotation(Vec3::new(0.0, 0.0, 2.0), 90.0);
        assert_vec_close(m.transform_vector(Vec3::new(1.0, 0.0, 0.0)), Vec3::new(0.0, 1.0, 0.0), 1e-12);
    }

    #[test]
    fn perspective_maps_near_and_far_to_unit_depth_range() {
        let p = Matrix::perspective(45.0, 1.5, 1.0, 100.0);
        let clip = |z: f64| {
            let m = &p.m;
            let zc = m[2][2] * z + m[2][3];
            let w = m[3][2] * z;
            zc / w
        };
        assert_close(clip(-1.0), 0.0, 1e-12);
        assert_close(clip(-100.0), 1.0, 1e-12);
    }
}
