use foundation::math::{
    DEGREES_TO_RADIANS, Ellipsoid, Line, Matrix, Position, RADIANS_TO_DEGREES, Sector, Vec3,
};
use serde::{Deserialize, Serialize};

use crate::elevation::{ElevationModel, ZeroElevation};

/// How geographic positions map to model coordinates.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GlobeProjection {
    /// Earth-centered ellipsoid.
    #[default]
    Ellipsoid3D,
    /// Flat equirectangular map: x east, y north, z up, scaled by the
    /// equatorial radius.
    Equirectangular2D,
}

/// The reference surface plus its terrain.
#[derive(Debug)]
pub struct Globe {
    ellipsoid: Ellipsoid,
    projection: GlobeProjection,
    elevation: Box<dyn ElevationModel>,
}

impl Globe {
    pub fn new(
        ellipsoid: Ellipsoid,
        projection: GlobeProjection,
        elevation: Box<dyn ElevationModel>,
    ) -> Self {
        Self {
            ellipsoid,
            projection,
            elevation,
        }
    }

    pub fn wgs84() -> Self {
        Self::new(
            Ellipsoid::WGS84,
            GlobeProjection::Ellipsoid3D,
            Box::new(ZeroElevation),
        )
    }

    pub fn ellipsoid(&self) -> &Ellipsoid {
        &self.ellipsoid
    }

    pub fn projection(&self) -> GlobeProjection {
        self.projection
    }

    pub fn set_projection(&mut self, projection: GlobeProjection) {
        self.projection = projection;
    }

    pub fn set_elevation_model(&mut self, elevation: Box<dyn ElevationModel>) {
        self.elevation = elevation;
    }

    pub fn is_2d(&self) -> bool {
        self.projection == GlobeProjection::Equirectangular2D
    }

    pub fn equatorial_radius(&self) -> f64 {
        self.ellipsoid.equatorial_radius
    }

    pub fn polar_radius(&self) -> f64 {
        self.ellipsoid.polar_radius
    }

    /// The larger radius; used to turn surface meters into degrees.
    pub fn radius(&self) -> f64 {
        self.ellipsoid.max_radius()
    }

    pub fn compute_point_from_position(&self, latitude: f64, longitude: f64, altitude: f64) -> Vec3 {
        match self.projection {
            GlobeProjection::Ellipsoid3D => {
                self.ellipsoid
                    .geodetic_to_cartesian(latitude, longitude, altitude)
            }
            GlobeProjection::Equirectangular2D => {
                let r = self.ellipsoid.equatorial_radius;
                Vec3::new(
                    r * longitude * DEGREES_TO_RADIANS,
                    r * latitude * DEGREES_TO_RADIANS,
                    altitude,
                )
            }
        }
    }

    pub fn compute_position_from_point(&self, point: Vec3) -> Position {
        match self.projection {
            GlobeProjection::Ellipsoid3D => {
                let (lat, lon, alt) = self.ellipsoid.cartesian_to_geodetic(point);
                Position::new(lat, lon, alt)
            }
            GlobeProjection::Equirectangular2D => {
                let r = self.ellipsoid.equatorial_radius;
                Position::new(
                    point.y / r * RADIANS_TO_DEGREES,
                    point.x / r * RADIANS_TO_DEGREES,
                    point.z,
                )
            }
        }
    }

    /// Unit east, north and up vectors at a location.
    pub fn local_axes(&self, latitude: f64, longitude: f64) -> (Vec3, Vec3, Vec3) {
        match self.projection {
            GlobeProjection::Ellipsoid3D => {
                let (sin_lat, cos_lat) = (latitude * DEGREES_TO_RADIANS).sin_cos();
                let (sin_lon, cos_lon) = (longitude * DEGREES_TO_RADIANS).sin_cos();
                let east = Vec3::new(-sin_lon, cos_lon, 0.0);
                let north = Vec3::new(-sin_lat * cos_lon, -sin_lat * sin_lon, cos_lat);
                let up = Vec3::new(cos_lat * cos_lon, cos_lat * sin_lon, sin_lat);
                (east, north, up)
            }
            GlobeProjection::Equirectangular2D => (
                Vec3::new(1.0, 0.0, 0.0),
                Vec3::new(0.0, 1.0, 0.0),
                Vec3::new(0.0, 0.0, 1.0),
            ),
        }
    }

    pub fn surface_normal_at_location(&self, latitude: f64, longitude: f64) -> Vec3 {
        self.local_axes(latitude, longitude).2
    }

    /// Transform from the east-north-up frame at `point` to model coordinates.
    pub fn local_transform_at_point(&self, point: Vec3) -> Matrix {
        let pos = self.compute_position_from_point(point);
        let (e, n, u) = self.local_axes(pos.latitude, pos.longitude);
        Matrix::new([
            [e.x, n.x, u.x, point.x],
            [e.y, n.y, u.y, point.y],
            [e.z, n.z, u.z, point.z],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// First point where the ray meets the surface (altitude 0), if any.
    pub fn intersects_line(&self, line: &Line) -> Option<Vec3> {
        let o = line.origin;
        let d = line.direction;
        match self.projection {
            GlobeProjection::Ellipsoid3D => {
                // Scale z so the ellipsoid becomes a sphere of the equatorial radius.
                let a = self.ellipsoid.equatorial_radius;
                let k = a / self.ellipsoid.polar_radius;
                let os = Vec3::new(o.x, o.y, o.z * k);
                let ds = Vec3::new(d.x, d.y, d.z * k);

                let qa = ds.dot(ds);
                if qa <= 0.0 {
                    return None;
                }
                let qb = 2.0 * os.dot(ds);
                let qc = os.dot(os) - a * a;
                let disc = qb * qb - 4.0 * qa * qc;
                if disc < 0.0 {
                    return None;
                }
                let t = (-qb - disc.sqrt()) / (2.0 * qa);
                (t >= 0.0).then(|| line.point_at(t))
            }
            GlobeProjection::Equirectangular2D => {
                if d.z == 0.0 {
                    return None;
                }
                let t = -o.z / d.z;
                (t >= 0.0).then(|| line.point_at(t))
            }
        }
    }

    /// Distance to the horizon from a height above the surface.
    pub fn horizon_distance(&self, altitude: f64) -> f64 {
        if altitude <= 0.0 {
            return 0.0;
        }
        let r = self.radius();
        (altitude * (2.0 * r + altitude)).sqrt()
    }

    pub fn elevation_at_location(&self, latitude: f64, longitude: f64) -> f64 {
        self.elevation.elevation_at(latitude, longitude)
    }

    pub fn min_and_max_elevations_for_sector(&self, sector: &Sector) -> (f64, f64) {
        self.elevation.min_and_max_elevations(sector)
    }
}

impl Default for Globe {
    fn default() -> Self {
        Self::wgs84()
    }
}

#[cfg(test)]
mod tests {
    use super::{Globe, GlobeProjection};
    use crate::elevation::ZeroElevation;
    use foundation::math::{Ellipsoid, Line, Vec3};

    fn assert_close(a: f64, b: f64, eps: f64) {
        let diff = (a - b).abs();
        assert!(diff <= eps, "expected {a} ~= {b} (diff {diff})");
    }

    fn flat() -> Globe {
        Globe::new(
            Ellipsoid::WGS84,
            GlobeProjection::Equirectangular2D,
            Box::new(ZeroElevation),
        )
    }

    #[test]
    fn ray_towards_center_hits_near_side() {
        let g = Globe::wgs84();
        let r = g.equatorial_radius();
        let line = Line::new(Vec3::new(2.0 * r, 0.0, 0.0), Vec3::new(-1.0, 0.0, 0.0));
        let hit = g.intersects_line(&line).unwrap();
        assert_close(hit.x, r, 1e-6);
    }

    #[test]
    fn ray_pointing_away_misses() {
        let g = Globe::wgs84();
        let r = g.equatorial_radius();
        let away = Line::new(Vec3::new(2.0 * r, 0.0, 0.0), Vec3::new(1.0, 0.0, 0.0));
        assert!(g.intersects_line(&away).is_none());
        let past = Line::new(Vec3::new(2.0 * r, 0.0, 0.0), Vec3::new(0.0, 1.0, 0.0));
        assert!(g.intersects_line(&past).is_none());
    }

    #[test]
    fn polar_ray_hits_polar_radius() {
        let g = Globe::wgs84();
        let line = Line::new(Vec3::new(0.0, 0.0, 1e7), Vec3::new(0.0, 0.0, -1.0));
        let hit = g.intersects_line(&line).unwrap();
        assert_close(hit.z, g.polar_radius(), 1e-6);
    }

    #[test]
    fn flat_projection_round_trips_and_intersects_plane() {
        let g = flat();
        let p = g.compute_point_from_position(10.0, -20.0, 500.0);
        let pos = g.compute_position_from_point(p);
        assert_close(pos.latitude, 10.0, 1e-12);
        assert_close(pos.longitude, -20.0, 1e-12);
        assert_close(pos.altitude, 500.0, 1e-12);

        let down = Line::new(p, Vec3::new(0.0, 0.0, -1.0));
        let hit = g.intersects_line(&down).unwrap();
        assert_close(hit.z, 0.0, 1e-12);
        assert!(g.intersects_line(&Line::new(p, Vec3::new(1.0, 0.0, 0.0))).is_none());
    }

    #[test]
    fn local_transform_maps_up_to_surface_normal() {
        let g = Globe::wgs84();
        let p = g.compute_point_from_position(45.0, 45.0, 0.0);
        let m = g.local_transform_at_point(p);
        let up = m.transform_vector(Vec3::new(0.0, 0.0, 1.0));
        let n = g.surface_normal_at_location(45.0, 45.0);
        assert_close(up.dot(n), 1.0, 1e-12);
        let origin = m.transform_point(Vec3::ZERO);
        assert_close(origin.distance_to(p), 0.0, 1e-9);
    }

    #[test]
    fn horizon_grows_with_altitude() {
        let g = Globe::wgs84();
        assert_eq!(g.horizon_distance(0.0), 0.0);
        assert!(g.horizon_distance(1000.0) < g.horizon_distance(10_000.0));
    }
}
