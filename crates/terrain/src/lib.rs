pub mod cache;
pub mod error;
pub mod imagery;
pub mod level;
pub mod provider;
pub mod selector;
pub mod tessellator;
pub mod tile;
pub mod tile_matrix;

pub use cache::*;
pub use error::*;
pub use imagery::*;
pub use level::*;
pub use provider::*;
pub use selector::*;
pub use tessellator::*;
pub use tile::*;
pub use tile_matrix::*;
