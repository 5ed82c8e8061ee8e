pub mod frame;
pub mod redraw;
pub mod stats;

pub use frame::*;
pub use redraw::*;
pub use stats::*;
