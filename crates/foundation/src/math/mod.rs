pub mod angle;
pub mod ellipsoid;
pub mod line;
pub mod location;
pub mod matrix;
pub mod rectangle;
pub mod sector;
pub mod vec;

pub use angle::*;
pub use ellipsoid::*;
pub use line::*;
pub use location::*;
pub use matrix::*;
pub use rectangle::*;
pub use sector::*;
pub use vec::*;
