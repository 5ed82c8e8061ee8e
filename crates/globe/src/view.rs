//! Conversions between the look-at and eye-centric camera models.
//!
//! Both models reduce to a modelview matrix: the east-north-up frame at the
//! anchor point, rotated by heading, tilt and roll, and for a look-at pushed
//! back along the view axis by its range. Conversions rebuild one model's
//! matrix and read the other model's parameters back out of it.

use foundation::math::{Line, Matrix, Position, Vec3, normalized_degrees};

use crate::camera::{Camera, LookAt};
use crate::globe::Globe;

/// Parameters read back from a modelview relative to a chosen origin.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ViewingParameters {
    pub origin: Position,
    pub range: f64,
    pub heading: f64,
    pub tilt: f64,
    pub roll: f64,
}

pub fn look_at_viewing_transform(globe: &Globe, look_at: &LookAt) -> Matrix {
    let p = look_at.position;
    let origin = globe.compute_point_from_position(p.latitude, p.longitude, p.altitude);
    let world_to_local = globe.local_transform_at_point(origin).invert_orthonormal();
    Matrix::from_translation(0.0, 0.0, -look_at.range)
        .multiply(&Matrix::from_heading_tilt_roll(
            look_at.heading,
            look_at.tilt,
            look_at.roll,
        ))
        .multiply(&world_to_local)
}

pub fn camera_viewing_transform(globe: &Globe, camera: &Camera) -> Matrix {
    let p = camera.position;
    let eye = globe.compute_point_from_position(p.latitude, p.longitude, p.altitude);
    let world_to_local = globe.local_transform_at_point(eye).invert_orthonormal();
    Matrix::from_heading_tilt_roll(camera.heading, camera.tilt, camera.roll).multiply(&world_to_local)
}

/// Heading, tilt and roll of a local-frame modelview.
///
/// At tilt 0 heading and roll are one rotation; `roll_hint` is kept as the
/// roll there and the heading absorbs the rest.
fn extract_orientation(local: &Matrix, roll_hint: f64) -> (f64, f64, f64) {
    let roll = local.extract_roll().unwrap_or(roll_hint);
    (
        normalized_degrees(local.extract_heading(roll)),
        local.extract_tilt(),
        normalized_degrees(roll),
    )
}

/// Read position, range and orientation of `modelview` relative to the
/// local frame at `origin`.
pub fn extract_viewing_parameters(
    globe: &Globe,
    modelview: &Matrix,
    origin: Vec3,
    roll_hint: f64,
) -> ViewingParameters {
    let origin_pos = globe.compute_position_from_point(origin);
    let local = modelview.multiply(&globe.local_transform_at_point(origin));
    let (heading, tilt, roll) = extract_orientation(&local, roll_hint);
    ViewingParameters {
        origin: origin_pos,
        range: -local.m[2][3],
        heading,
        tilt,
        roll,
    }
}

/// Eye position and orientation equivalent to a look-at.
pub fn camera_from_look_at(globe: &Globe, look_at: &LookAt) -> Camera {
    let modelview = look_at_viewing_transform(globe, look_at);
    let eye = modelview.extract_eye_point();
    let local = modelview.multiply(&globe.local_transform_at_point(eye));
    let (heading, tilt, roll) = extract_orientation(&local, look_at.roll);
    Camera {
        position: globe.compute_position_from_point(eye),
        heading,
        tilt,
        roll,
    }
}

/// Look-at anchored where the camera's forward ray meets the globe.
///
/// A ray that misses (looking above the horizon) anchors at the horizon
/// distance along the ray instead.
pub fn camera_as_look_at(globe: &Globe, camera: &Camera) -> LookAt {
    let modelview = camera_viewing_transform(globe, camera);
    let forward = Line::new(
        modelview.extract_eye_point(),
        modelview.extract_forward_vector(),
    );
    let origin = globe.intersects_line(&forward).unwrap_or_else(|| {
        let surface = globe
            .elevation_at_location(camera.position.latitude, camera.position.longitude);
        forward.point_at(globe.horizon_distance(camera.position.altitude - surface))
    });

    let params = extract_viewing_parameters(globe, &modelview, origin, camera.roll);
    LookAt {
        position: params.origin,
        range: params.range,
        heading: params.heading,
        tilt: params.tilt,
        roll: params.roll,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elevation::ZeroElevation;
    use crate::globe::GlobeProjection;
    use foundation::math::{Ellipsoid, Position};

    fn assert_close(a: f64, b: f64, eps: f64) {
        let diff = (a - b).abs();
        assert!(diff <= eps, "expected {a} ~= {b} (diff {diff})");
    }

    fn assert_rel(a: f64, b: f64, rel: f64) {
        let scale = a.abs().max(b.abs()).max(1.0);
        assert_close(a, b, rel * scale);
    }

    #[test]
    fn straight_down_camera_sits_range_above_target() {
        let g = Globe::wgs84();
        let la = LookAt::new(Position::new(30.0, -100.0, 0.0), 5000.0);
        let cam = camera_from_look_at(&g, &la);
        assert_close(cam.position.latitude, 30.0, 1e-9);
        assert_close(cam.position.longitude, -100.0, 1e-9);
        assert_close(cam.position.altitude, 5000.0, 1e-6);
        assert_close(cam.tilt, 0.0, 1e-6);
    }

    #[test]
    fn look_at_round_trip_through_camera() {
        let g = Globe::wgs84();
        for (lat, lon, range, heading, tilt) in [
            (30.0, -100.0, 10_000.0, 45.0, 30.0),
            (-12.5, 140.0, 2.0e6, -90.0, 60.0),
            (60.0, 10.0, 500.0, 170.0, 5.0),
        ] {
            let la = LookAt::new(Position::new(lat, lon, 0.0), range).with_orientation(heading, tilt, 0.0);
            let back = camera_as_look_at(&g, &camera_from_look_at(&g, &la));
            assert_rel(back.position.latitude, lat, 1e-6);
            assert_rel(back.position.longitude, lon, 1e-6);
            assert_rel(back.range, range, 1e-6);
            assert_close(back.heading, heading, 1e-6);
            assert_close(back.tilt, tilt, 1e-6);
        }
    }

    #[test]
    fn tilted_camera_leans_towards_horizon() {
        let g = Globe::wgs84();
        let la = LookAt::new(Position::new(0.0, 0.0, 0.0), 10_000.0).with_orientation(0.0, 45.0, 0.0);
        let cam = camera_from_look_at(&g, &la);
        // Looking north with a tilt puts the eye south of the target.
        assert!(cam.position.latitude < 0.0);
        assert!(cam.tilt >= 45.0);
    }

    #[test]
    fn roll_survives_the_round_trip() {
        let g = Globe::wgs84();
        let la = LookAt::new(Position::new(10.0, 10.0, 0.0), 1000.0).with_orientation(20.0, 40.0, 7.5);
        let cam = camera_from_look_at(&g, &la);
        assert_close(cam.roll, 7.5, 1e-6);
        assert_close(camera_as_look_at(&g, &cam).roll, 7.5, 1e-9);
    }

    #[test]
    fn zero_tilt_keeps_roll_and_folds_rest_into_heading() {
        let g = Globe::wgs84();
        let la = LookAt::new(Position::new(10.0, 10.0, 0.0), 1000.0).with_orientation(30.0, 0.0, 10.0);
        let back = camera_as_look_at(&g, &camera_from_look_at(&g, &la));
        assert_close(back.roll, 10.0, 1e-9);
        assert_close(back.heading - back.roll, 20.0, 1e-6);
    }

    #[test]
    fn flat_globe_round_trip() {
        let g = Globe::new(
            Ellipsoid::WGS84,
            GlobeProjection::Equirectangular2D,
            Box::new(ZeroElevation),
        );
        let la = LookAt::new(Position::new(20.0, 30.0, 0.0), 40_000.0);
        let back = camera_as_look_at(&g, &camera_from_look_at(&g, &la));
        assert_rel(back.position.latitude, 20.0, 1e-9);
        assert_rel(back.position.longitude, 30.0, 1e-9);
        assert_rel(back.range, 40_000.0, 1e-9);
    }

    #[test]
    fn camera_above_horizon_still_yields_look_at() {
        let g = Globe::wgs84();
        let mut cam = Camera::new(Position::new(0.0, 0.0, 1000.0));
        cam.tilt = 100.0;
        let la = camera_as_look_at(&g, &cam);
        assert!(la.range > 0.0);
        assert!(la.range.is_finite());
    }
}
