use fxhash::{FxHashMap, FxHashSet};
use serde::Serialize;

/**
 * Hash map with a fast non-cryptographically secure hash function.
 */
pub type HashMap<K, V> = FxHashMap<K, V>;

/**
 * Hash set with a fast non-cryptographically secure hash function.
 */
pub type HashSet<V> = FxHashSet<V>;

/// Pixel rectangle within an image.
#[derive(Copy, Clone, Eq, PartialEq, Default, Debug, Hash, Serialize)]
pub struct URect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl URect {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }
}
