use foundation::math::{DEGREES_TO_RADIANS, Line, Matrix, Rectangle, Vec2, Vec3};
use serde::{Deserialize, Serialize};

/// Smallest near clip distance in meters.
const MIN_NEAR_DISTANCE: f64 = 1.0;
/// Smallest far clip distance in meters.
const MIN_FAR_DISTANCE: f64 = 1.0e3;

/// Perspective projection over a viewport.
///
/// The viewport rectangle is in client pixels: `x`/`y` locate the canvas on
/// the page, width and height are its size. Field of view is vertical.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Projection {
    pub viewport: Rectangle,
    pub field_of_view: f64,
}

impl Projection {
    pub fn new(viewport: Rectangle, field_of_view: f64) -> Self {
        Self {
            viewport,
            field_of_view,
        }
    }

    fn tan_half_fov(&self) -> f64 {
        (self.field_of_view * DEGREES_TO_RADIANS * 0.5).tan()
    }

    /// Model-space size of one pixel at `distance` from the eye, for a
    /// viewport of the given size.
    pub fn perspective_pixel_size(&self, width: f64, height: f64, distance: f64) -> f64 {
        if width <= 0.0 || height <= 0.0 {
            return 0.0;
        }
        let frustum_height = 2.0 * distance * self.tan_half_fov();
        let frustum_width = frustum_height * (width / height);
        (frustum_width / width).max(frustum_height / height)
    }

    pub fn pixel_size_at_distance(&self, distance: f64) -> f64 {
        self.perspective_pixel_size(self.viewport.width, self.viewport.height, distance)
    }

    /// Near distance that keeps the surface below the eye inside the frustum.
    pub fn near_distance(&self, distance_to_surface: f64) -> f64 {
        let t = self.tan_half_fov();
        (distance_to_surface / (2.0 * (2.0 * t * t + 1.0).sqrt())).max(MIN_NEAR_DISTANCE)
    }

    pub fn far_distance(horizon_distance: f64) -> f64 {
        horizon_distance.max(MIN_FAR_DISTANCE)
    }

    pub fn matrix(&self, near: f64, far: f64) -> Matrix {
        Matrix::perspective(self.field_of_view, self.viewport.aspect_ratio(), near, far)
    }

    /// Client coordinates relative to the canvas origin.
    pub fn canvas_coordinates(&self, client_x: f64, client_y: f64) -> Vec2 {
        Vec2::new(client_x - self.viewport.x, client_y - self.viewport.y)
    }

    /// Model-space ray from the eye through a canvas point (y down).
    pub fn ray_through_screen_point(&self, modelview: &Matrix, point: Vec2) -> Option<Line> {
        let w = self.viewport.width;
        let h = self.viewport.height;
        if w <= 0.0 || h <= 0.0 {
            return None;
        }
        let ndc_x = 2.0 * point.x / w - 1.0;
        let ndc_y = 1.0 - 2.0 * point.y / h;
        let t = self.tan_half_fov();
        let eye_dir = Vec3::new(ndc_x * t * (w / h), ndc_y * t, -1.0);

        let inverse = modelview.invert_orthonormal();
        Line::new(inverse.translation(), inverse.transform_vector(eye_dir)).normalized()
    }
}

impl Default for Projection {
    fn default() -> Self {
        Self::new(Rectangle::new(0.0, 0.0, 1024.0, 768.0), 45.0)
    }
}
