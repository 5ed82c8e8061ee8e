use foundation::math::{Line, Rectangle, Vec2, Vec3};
use globe::{Camera, DrawContext, Globe, LookAt, Projection};
use runtime::RedrawRequest;

/// What the controllers see of a window: the globe, the camera and the
/// canvas it is drawn into.
#[derive(Debug)]
pub struct View {
    pub globe: Globe,
    pub camera: Camera,
    pub projection: Projection,
    pub vertical_exaggeration: f64,
    redraw: RedrawRequest,
}

impl View {
    pub fn new(globe: Globe, projection: Projection) -> Self {
        Self {
            globe,
            camera: Camera::default(),
            projection,
            vertical_exaggeration: 1.0,
            redraw: RedrawRequest::new(),
        }
    }

    pub fn viewport(&self) -> Rectangle {
        self.projection.viewport
    }

    /// Ask for a frame. Repeated calls before the next frame collapse.
    pub fn redraw(&mut self) {
        self.redraw.request();
    }

    pub fn redraw_requested(&self) -> bool {
        self.redraw.is_pending()
    }

    pub(crate) fn take_redraw(&mut self) -> bool {
        self.redraw.take()
    }

    pub fn camera_as_look_at(&self) -> LookAt {
        globe::camera_as_look_at(&self.globe, &self.camera)
    }

    pub fn camera_from_look_at(&mut self, look_at: &LookAt) {
        self.camera = globe::camera_from_look_at(&self.globe, look_at);
    }

    pub fn canvas_coordinates(&self, client_x: f64, client_y: f64) -> Vec2 {
        self.projection.canvas_coordinates(client_x, client_y)
    }

    /// Eye ray through a canvas point for the current camera.
    pub fn ray_through_screen_point(&self, point: Vec2) -> Option<Line> {
        let modelview = globe::camera_viewing_transform(&self.globe, &self.camera);
        self.projection.ray_through_screen_point(&modelview, point)
    }

    /// Globe point under a canvas point, if the ray hits the surface.
    pub fn pick_terrain(&self, point: Vec2) -> Option<Vec3> {
        let ray = self.ray_through_screen_point(point)?;
        self.globe.intersects_line(&ray)
    }

    pub fn draw_context(&self) -> DrawContext<'_> {
        DrawContext::new(
            &self.globe,
            &self.camera,
            self.projection,
            self.vertical_exaggeration,
        )
    }
}
