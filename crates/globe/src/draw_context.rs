use foundation::math::{Matrix, Vec3};

use crate::camera::Camera;
use crate::frustum::Frustum;
use crate::globe::Globe;
use crate::projection::Projection;
use crate::view::camera_viewing_transform;

/// Per-frame view state shared by everything that selects or culls geometry.
#[derive(Debug)]
pub struct DrawContext<'a> {
    pub globe: &'a Globe,
    pub vertical_exaggeration: f64,
    pub projection: Projection,
    pub modelview: Matrix,
    pub projection_matrix: Matrix,
    pub eye_point: Vec3,
    pub frustum: Frustum,
}

impl<'a> DrawContext<'a> {
    pub fn new(
        globe: &'a Globe,
        camera: &Camera,
        projection: Projection,
        vertical_exaggeration: f64,
    ) -> Self {
        let modelview = camera_viewing_transform(globe, camera);
        let eye_point = modelview.extract_eye_point();

        let pos = camera.position;
        let surface = globe.elevation_at_location(pos.latitude, pos.longitude) * vertical_exaggeration;
        let above_surface = (pos.altitude - surface).max(0.0);
        let near = projection.near_distance(above_surface);
        let far = Projection::far_distance(globe.horizon_distance(above_surface)).max(near * 2.0);

        let projection_matrix = projection.matrix(near, far);
        let frustum = Frustum::from_view_projection(&projection_matrix.multiply(&modelview));

        Self {
            globe,
            vertical_exaggeration,
            projection,
            modelview,
            projection_matrix,
            eye_point,
            frustum,
        }
    }

    pub fn pixel_size_at_distance(&self, distance: f64) -> f64 {
        self.projection.pixel_size_at_distance(distance)
    }
}

#[cfg(test)]
mod tests {
    use super::DrawContext;
    use crate::camera::Camera;
    use crate::globe::Globe;
    use crate::projection::Projection;
    use foundation::math::Position;

    #[test]
    fn surface_below_the_eye_is_inside_the_frustum() {
        let g = Globe::wgs84();
        let cam = Camera::new(Position::new(10.0, 20.0, 10_000.0));
        let dc = DrawContext::new(&g, &cam, Projection::default(), 1.0);
        let below = g.compute_point_from_position(10.0, 20.0, 0.0);
        assert!(dc.frustum.contains_point(below.to_array()));
        let antipode = g.compute_point_from_position(-10.0, -160.0, 0.0);
        assert!(!dc.frustum.contains_point(antipode.to_array()));
    }
}
