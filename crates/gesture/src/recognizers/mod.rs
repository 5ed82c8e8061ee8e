mod click;
mod drag;
mod pan;
mod pinch;
mod rotation;
mod tap;
mod tilt;

pub use click::ClickRecognizer;
pub use drag::DragRecognizer;
pub use pan::PanRecognizer;
pub use pinch::PinchRecognizer;
pub use rotation::RotationRecognizer;
pub use tap::TapRecognizer;
pub use tilt::TiltRecognizer;

#[cfg(test)]
pub(crate) mod testing;
