use serde::{Deserialize, Serialize};
use std::fmt;

/// A block coordinate in world space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BlockPosition {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl BlockPosition {
    pub fn new(x: i32, y: i32, z: i32) -> Self {
        BlockPosition { x, y, z }
    }

    /// Packs the coordinate into a single i64 using the vanilla `BlockPos`
    /// layout: 26 bits of x, 26 bits of z, 12 bits of y.
    pub fn as_long(&self) -> i64 {
        ((self.x as i64 & 0x3FF_FFFF) << 38)
            | ((self.z as i64 & 0x3FF_FFFF) << 12)
            | (self.y as i64 & 0xFFF)
    }

    /// Seed for position-keyed randomness. Derived from the packed
    /// coordinate so the same position always draws the same values.
    pub(crate) fn seed(&self) -> u64 {
        self.as_long() as u64
    }
}

impl fmt::Display for BlockPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}
