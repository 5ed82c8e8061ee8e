pub mod camera;
pub mod draw_context;
pub mod elevation;
pub mod frustum;
pub mod globe;
pub mod projection;
pub mod sector_ext;
pub mod view;

pub use camera::*;
pub use draw_context::*;
pub use elevation::*;
pub use frustum::*;
pub use globe::*;
pub use projection::*;
pub use sector_ext::*;
pub use view::*;
