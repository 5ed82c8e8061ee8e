use std::fmt;

use foundation::math::{Rectangle, Vec2};
use foundation::time::Millis;
use gesture::{GestureListener, GestureSnapshot, InputEvent, RecognizerRegistry, TargetId};
use globe::{Globe, LookAt, Projection};
use runtime::{Frame, FrameStatistics};
use terrain::{Terrain, Tessellator, TileDataProvider};
use tracing::{debug, trace};

use crate::config::EngineConfig;
use crate::controller::{BasicWorldWindowController, WorldWindowController};
use crate::error::WindowError;
use crate::keyboard::KeyboardControls;
use crate::view::View;

/// Target id of a window's canvas in its recognizer registry.
pub const CANVAS: TargetId = TargetId(0);

/// Forwards gesture notifications from the registry to the controller.
struct ControllerListener<'a> {
    controller: &'a mut Box<dyn WorldWindowController>,
    view: &'a mut View,
}

impl GestureListener for ControllerListener<'_> {
    fn gesture_state_changed(&mut self, snapshot: &GestureSnapshot) {
        self.controller.gesture_state_changed(self.view, snapshot);
    }
}

/// One globe canvas: its view, input handling and per-frame terrain.
pub struct WorldWindow {
    view: View,
    registry: RecognizerRegistry,
    controller: Box<dyn WorldWindowController>,
    keyboard: KeyboardControls,
    tessellator: Tessellator,
    tile_provider: Option<Box<dyn TileDataProvider>>,
    terrain: Terrain,
    frame: Option<Frame>,
    stats: FrameStatistics,
}

impl fmt::Debug for WorldWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WorldWindow")
            .field("view", &self.view)
            .field("controller", &self.controller)
            .field("recognizers", &self.registry.len())
            .field("tiles", &self.terrain.tiles.len())
            .field("frame", &self.frame)
            .finish()
    }
}

impl WorldWindow {
    /// A window over the WGS84 globe with the basic controller installed.
    pub fn new(config: &EngineConfig, viewport: Rectangle) -> Result<Self, WindowError> {
        config.validate()?;
        if !(viewport.width > 0.0 && viewport.height > 0.0) {
            return Err(WindowError::InvalidViewport {
                width: viewport.width,
                height: viewport.height,
            });
        }

        let mut registry = RecognizerRegistry::new(&config.gesture);
        let controller = BasicWorldWindowController::new(
            &mut registry,
            CANVAS,
            &config.gesture,
            &config.navigation,
        )?;
        let tessellator = Tessellator::new(&config.tessellation)?;

        let projection = Projection::new(viewport, config.navigation.field_of_view);
        let mut view = View::new(Globe::wgs84(), projection);
        view.camera_from_look_at(&LookAt::default());
        view.redraw();

        Ok(Self {
            view,
            registry,
            controller: Box::new(controller),
            keyboard: KeyboardControls::new(&config.navigation),
            tessellator,
            tile_provider: None,
            terrain: Terrain::default(),
            frame: None,
            stats: FrameStatistics::new(),
        })
    }

    /// Swaps the globe, keeping the current look-at.
    pub fn set_globe(&mut self, globe: Globe) {
        let look_at = self.view.camera_as_look_at();
        self.view.globe = globe;
        self.go_to(&look_at);
    }

    pub fn set_tile_provider(&mut self, provider: Box<dyn TileDataProvider>) {
        self.tile_provider = Some(provider);
    }

    pub fn view(&self) -> &View {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut View {
        &mut self.view
    }

    pub fn registry(&self) -> &RecognizerRegistry {
        &self.registry
    }

    pub fn keyboard_mut(&mut self) -> &mut KeyboardControls {
        &mut self.keyboard
    }

    pub fn terrain(&self) -> &Terrain {
        &self.terrain
    }

    pub fn tessellator(&self) -> &Tessellator {
        &self.tessellator
    }

    pub fn stats(&self) -> &FrameStatistics {
        &self.stats
    }

    pub fn frame(&self) -> Option<Frame> {
        self.frame
    }

    pub fn camera_as_look_at(&self) -> LookAt {
        self.view.camera_as_look_at()
    }

    pub fn camera_from_look_at(&mut self, look_at: &LookAt) {
        self.view.camera_from_look_at(look_at);
    }

    /// Moves the camera to `look_at` and asks for a frame.
    pub fn go_to(&mut self, look_at: &LookAt) {
        self.view.camera_from_look_at(look_at);
        self.view.redraw();
    }

    pub fn take_pick_requests(&mut self) -> Vec<Vec2> {
        self.controller.take_pick_requests()
    }

    /// Routes one input event. Wheel and key events go straight to the
    /// controllers, everything else through the gesture recognizers.
    pub fn handle_event(&mut self, event: &InputEvent) {
        self.stats.increment("events");
        self.advance_time(event.time());
        match event {
            InputEvent::Wheel(e) => self.controller.handle_wheel(&mut self.view, e),
            InputEvent::KeyDown(e) => {
                if !self.keyboard.key_down(&mut self.view, e) {
                    trace!(key_code = e.key_code, "key ignored");
                }
            }
            InputEvent::KeyUp(e) => {
                self.keyboard.key_up(e);
            }
            _ => {
                let mut listener = ControllerListener {
                    controller: &mut self.controller,
                    view: &mut self.view,
                };
                self.registry.dispatch(CANVAS, event, &mut listener);
            }
        }
    }

    /// Fires gesture timers and key repeats due by `now`.
    pub fn advance_time(&mut self, now: Millis) {
        let mut listener = ControllerListener {
            controller: &mut self.controller,
            view: &mut self.view,
        };
        self.registry.advance_time(now, &mut listener);
        self.keyboard.advance(&mut self.view, now);
    }

    /// Runs one frame at `now`. Terrain is only reselected when something
    /// asked for a redraw; returns whether it was.
    pub fn render_frame(&mut self, now: Millis) -> bool {
        self.advance_time(now);
        self.frame = Some(match self.frame {
            Some(previous) => previous.next_at(now),
            None => Frame::first(now),
        });
        if !self.view.take_redraw() {
            return false;
        }

        self.stats.begin_frame();
        let dc = self.view.draw_context();
        self.terrain = self.tessellator.tessellate(&dc);
        self.stats.sample("tiles", self.terrain.tiles.len() as i64);

        if let Some(provider) = self.tile_provider.as_mut() {
            provider.tiles_wanted(&self.terrain.keys());
        }
        debug!(
            frame = self.stats.frames(),
            tiles = self.terrain.tiles.len(),
            "frame rendered"
        );
        true
    }
}
