//! Reading, validating and writing Tiled tilesets (.tsx).
mod asset;
mod config;
mod tileset;
mod util;
mod validate;

pub use asset::*;
pub use config::*;
pub use tileset::*;
pub use util::*;
pub use validate::*;
