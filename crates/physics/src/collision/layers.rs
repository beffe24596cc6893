//! Collision layers for sweep filtering.
//!
//! Every brush in the world carries a layer set; queries carry a mask and
//! only see brushes whose layers intersect it. The character's ground
//! filter is just a `Layers` value, exposed so collaborators doing their
//! own raycasts stay consistent with the solver.

use serde::{Deserialize, Serialize};

/// Bit set describing what a collision brush is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Layers(pub u32);

impl Layers {
    /// Nothing.
    pub const NONE: Self = Self(0);

    /// Static walkable/blocking world geometry.
    pub const GROUND: Self = Self(1 << 0);

    /// Kinematic platform geometry - solid, but movable between ticks.
    pub const PLATFORM: Self = Self(1 << 1);

    /// Pass-through trigger volume. Never blocks movement; a sweep that
    /// includes this layer reports the hit with `is_trigger` set.
    pub const TRIGGER: Self = Self(1 << 2);

    /// Debris/prop geometry the character ignores but other queries may not.
    pub const DEBRIS: Self = Self(1 << 3);

    /// Default mask for character movement sweeps: everything solid.
    pub const MASK_WALKABLE: Self = Self(Self::GROUND.0 | Self::PLATFORM.0);

    /// Everything, triggers included.
    pub const ALL: Self = Self(u32::MAX);

    /// Check if all of the given flags are set.
    #[inline]
    pub fn contains(self, other: Self) -> bool {
        (self.0 & other.0) == other.0
    }

    /// Check if any of the given flags are set.
    #[inline]
    pub fn intersects(self, other: Self) -> bool {
        (self.0 & other.0) != 0
    }

    /// This mask with the given flags removed.
    #[inline]
    pub fn without(self, other: Self) -> Self {
        Self(self.0 & !other.0)
    }
}

impl std::ops::BitOr for Layers {
    type Output = Self;
    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl std::ops::BitAnd for Layers {
    type Output = Self;
    fn bitand(self, rhs: Self) -> Self {
        Self(self.0 & rhs.0)
    }
}
