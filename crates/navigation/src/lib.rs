//! Camera navigation for a globe window.
//!
//! A [`WorldWindow`] owns the view, the gesture registry and a controller.
//! Input goes through [`WorldWindow::handle_event`]; gesture notifications
//! reach the controller, which edits a look-at and pushes it into the camera.
//! [`WorldWindow::render_frame`] then selects terrain for the new view.

pub mod config;
pub mod controller;
pub mod error;
pub mod keyboard;
pub mod view;
pub mod window;

pub use config::*;
pub use controller::*;
pub use error::*;
pub use keyboard::*;
pub use view::*;
pub use window::*;
