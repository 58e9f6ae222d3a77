mod loader;
mod protocol;
mod path_parts;

pub use loader::*;
pub use protocol::*;
pub use path_parts::*;
