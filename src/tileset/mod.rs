mod tileset;
mod tile;
mod animation;
mod properties;
mod parse;
mod write;

pub use tileset::*;
pub use tile::*;
pub use animation::*;
pub use properties::*;
pub use parse::*;
