use serde::{Deserialize, Serialize};

use super::{DEGREES_TO_RADIANS, RADIANS_TO_DEGREES, Vec3};

/// WGS84 semi-major axis (meters).
pub const WGS84_A: f64 = 6_378_137.0;
/// WGS84 flattening.
pub const WGS84_F: f64 = 1.0 / 298.257_223_563;
/// WGS84 semi-minor axis (meters).
pub const WGS84_B: f64 = WGS84_A * (1.0 - WGS84_F);
/// WGS84 first eccentricity squared.
pub const WGS84_E2: f64 = WGS84_F * (2.0 - WGS84_F);

/// Oblate spheroid used as the globe's reference surface.
///
/// Cartesian coordinates are Earth-centered: +X through (0, 0), +Y through
/// (0, 90E), +Z through the north pole.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ellipsoid {
    pub equatorial_radius: f64,
    pub polar_radius: f64,
}

impl Ellipsoid {
    pub const WGS84: Ellipsoid = Ellipsoid {
        equatorial_radius: WGS84_A,
        polar_radius: WGS84_B,
    };

    pub fn sphere(radius: f64) -> Self {
        Self {
            equatorial_radius: radius,
            polar_radius: radius,
        }
    }

    pub fn eccentricity_squared(&self) -> f64 {
        let a = self.equatorial_radius;
        let b = self.polar_radius;
        (a * a - b * b) / (a * a)
    }

    /// The larger of the two radii.
    pub fn max_radius(&self) -> f64 {
        self.equatorial_radius.max(self.polar_radius)
    }

    pub fn geodetic_to_cartesian(&self, latitude: f64, longitude: f64, altitude: f64) -> Vec3 {
        let lat = latitude * DEGREES_TO_RADIANS;
        let lon = longitude * DEGREES_TO_RADIANS;
        let (sin_lat, cos_lat) = lat.sin_cos();
        let (sin_lon, cos_lon) = lon.sin_cos();
        let e2 = self.eccentricity_squared();

        let n = self.equatorial_radius / (1.0 - e2 * sin_lat * sin_lat).sqrt();
        Vec3::new(
            (n + altitude) * cos_lat * cos_lon,
            (n + altitude) * cos_lat * sin_lon,
            (n * (1.0 - e2) + altitude) * sin_lat,
        )
    }

    /// Inverse of [`Ellipsoid::geodetic_to_cartesian`]: `(latitude, longitude, altitude)`.
    ///
    /// Bowring's closed form followed by two refinement steps; sub-millimetre
    /// for anything between the core and geostationary orbit.
    pub fn cartesian_to_geodetic(&self, point: Vec3) -> (f64, f64, f64) {
        let a = self.equatorial_radius;
        let b = self.polar_radius;
        let e2 = self.eccentricity_squared();
        let p = point.x.hypot(point.y);
        let lon = point.y.atan2(point.x);

        if p < 1e-9 {
            let lat = if point.z >= 0.0 { 90.0 } else { -90.0 };
            return (lat, lon * RADIANS_TO_DEGREES, point.z.abs() - b);
        }

        let ep2 = (a * a - b * b) / (b * b);
        let theta = (point.z * a).atan2(p * b);
        let (sin_t, cos_t) = theta.sin_cos();
        let mut lat = (point.z + ep2 * b * sin_t * sin_t * sin_t)
            .atan2(p - e2 * a * cos_t * cos_t * cos_t);

        let mut alt = 0.0;
        for _ in 0..2 {
            let sin_lat = lat.sin();
            let n = a / (1.0 - e2 * sin_lat * sin_lat).sqrt();
            alt = p / lat.cos() - n;
            lat = point.z.atan2(p * (1.0 - e2 * n / (n + alt)));
        }
        let sin_lat = lat.sin();
        let n = a / (1.0 - e2 * sin_lat * sin_lat).sqrt();
        if lat.cos().abs() > 1e-12 {
            alt = p / lat.cos() - n;
        }

        (lat * RADIANS_TO_DEGREES, lon * RADIANS_TO_DEGREES, alt)
    }
}

impl Default for Ellipsoid {
    fn default() -> Self {
        Self::WGS84
    }
}

#[cfg(test)]
mod tests {
    use super::{Ellipsoid, WGS84_A, WGS84_B};

    fn assert_close(a: f64, b: f64, eps: f64) {
        let diff = (a - b).abs();
        assert!(diff <= eps, "expected {a} ~= {b} (diff {diff})");
    }

    #[test]
    fn equator_prime_meridian() {
        let p = Ellipsoid::WGS84.geodetic_to_cartesian(0.0, 0.0, 0.0);
        assert_close(p.x, WGS84_A, 1e-6);
        assert_close(p.y, 0.0, 1e-6);
        assert_close(p.z, 0.0, 1e-6);
    }

    #[test]
    fn equator_90e_and_pole() {
        let p = Ellipsoid::WGS84.geodetic_to_cartesian(0.0, 90.0, 0.0);
        assert_close(p.x, 0.0, 1e-6);
        assert_close(p.y, WGS84_A, 1e-6);
        let n = Ellipsoid::WGS84.geodetic_to_cartesian(90.0, 0.0, 0.0);
        assert_close(n.z, WGS84_B, 1e-6);
    }

    #[test]
    fn round_trip_geodetic_cartesian() {
        for (lat, lon, alt) in [(30.0, -60.0, 120.0), (-45.5, 170.25, 0.0), (10.0, 20.0, 2.5e6)] {
            let p = Ellipsoid::WGS84.geodetic_to_cartesian(lat, lon, alt);
            let (lat_rt, lon_rt, alt_rt) = Ellipsoid::WGS84.cartesian_to_geodetic(p);
            assert_close(lat_rt, lat, 1e-9);
            assert_close(lon_rt, lon, 1e-9);
            assert_close(alt_rt, alt, 1e-5);
        }
    }

    #[test]
    fn pole_round_trip() {
        let p = Ellipsoid::WGS84.geodetic_to_cartesian(-90.0, 0.0, 50.0);
        let (lat, _, alt) = Ellipsoid::WGS84.cartesian_to_geodetic(p);
        assert_close(lat, -90.0, 1e-9);
        assert_close(alt, 50.0, 1e-6);
    }
}
