use foundation::bounds::Aabb3;
use foundation::math::{Sector, Vec3};

use crate::globe::Globe;

/// Sector operations that need the globe's shape and terrain.
pub trait SectorGeometry {
    /// Points whose convex hull encloses the terrain inside the sector.
    fn compute_bounding_points(&self, globe: &Globe, vertical_exaggeration: f64) -> Vec<Vec3>;

    /// Axis-aligned box around [`SectorGeometry::compute_bounding_points`].
    fn compute_extent(&self, globe: &Globe, vertical_exaggeration: f64) -> Aabb3;

    fn compute_center_point(&self, globe: &Globe, exaggeration: f64) -> Vec3;

    /// Terrain points at the SW, SE, NE, NW corners.
    fn compute_corner_points(&self, globe: &Globe, exaggeration: f64) -> [Vec3; 4];

    /// Nearest of the four corner points and the center point.
    fn distance_to(&self, globe: &Globe, exaggeration: f64, point: Vec3) -> f64;
}

impl SectorGeometry for Sector {
    fn compute_bounding_points(&self, globe: &Globe, vertical_exaggeration: f64) -> Vec<Vec3> {
        let (min_elev, max_elev) = globe.min_and_max_elevations_for_sector(self);
        let min_height = min_elev * vertical_exaggeration;
        let mut max_height = max_elev * vertical_exaggeration;
        if min_height == max_height {
            max_height = min_height + 10.0;
        }

        let at = |lat: f64, lon: f64, h: f64| globe.compute_point_from_position(lat, lon, h);
        let mut points = Vec::with_capacity(21);

        for c in self.corners() {
            points.push(at(c.latitude, c.longitude, min_height));
            points.push(at(c.latitude, c.longitude, max_height));
        }

        // The centroid captures the bulge of the surface.
        let centroid = self.centroid();
        points.push(at(centroid.latitude, centroid.longitude, max_height));

        if self.min_latitude < 0.0 && self.max_latitude > 0.0 {
            // Spanning the equator: edge midpoints plus the side edges at the equator.
            points.push(at(self.min_latitude, centroid.longitude, max_height));
            points.push(at(self.max_latitude, centroid.longitude, max_height));
            points.push(at(0.0, self.min_longitude, max_height));
            points.push(at(0.0, self.max_longitude, max_height));
        } else if self.min_latitude < 0.0 {
            points.push(at(self.max_latitude, centroid.longitude, max_height));
        } else {
            points.push(at(self.min_latitude, centroid.longitude, max_height));
        }

        if self.delta_longitude() >= 360.0 {
            // A band around the whole globe.
            for lat in [self.min_latitude, self.max_latitude] {
                for lon in [0.0, 90.0, -90.0, 180.0] {
                    points.push(at(lat, lon, max_height));
                }
            }
        } else if self.delta_longitude() > 180.0 {
            let c_lat = centroid.latitude;
            let c_lon = centroid.longitude;
            points.push(at(c_lat, 0.5 * (self.min_longitude + c_lon), max_height));
            points.push(at(c_lat, 0.5 * (c_lon + self.max_longitude), max_height));
            points.push(at(c_lat, self.min_longitude, max_height));
            points.push(at(c_lat, self.max_longitude, max_height));
        }

        points
    }

    fn compute_extent(&self, globe: &Globe, vertical_exaggeration: f64) -> Aabb3 {
        let points = self.compute_bounding_points(globe, vertical_exaggeration);
        // Always at least the eight corner points.
        Aabb3::from_points(&points).unwrap_or_else(|| Aabb3::new([0.0; 3], [0.0; 3]))
    }

    fn compute_center_point(&self, globe: &Globe, exaggeration: f64) -> Vec3 {
        let lat = self.centroid_latitude();
        let lon = self.centroid_longitude();
        globe.compute_point_from_position(
            lat,
            lon,
            exaggeration * globe.elevation_at_location(lat, lon),
        )
    }

    fn compute_corner_points(&self, globe: &Globe, exaggeration: f64) -> [Vec3; 4] {
        self.corners().map(|c| {
            globe.compute_point_from_position(
                c.latitude,
                c.longitude,
                exaggeration * globe.elevation_at_location(c.latitude, c.longitude),
            )
        })
    }

    fn distance_to(&self, globe: &Globe, exaggeration: f64, point: Vec3) -> f64 {
        let corners = self.compute_corner_points(globe, exaggeration);
        let center = self.compute_center_point(globe, exaggeration);
        corners
            .iter()
            .chain(std::iter::once(&center))
            .map(|p| point.distance_to(*p))
            .fold(f64::INFINITY, f64::min)
    }
}
