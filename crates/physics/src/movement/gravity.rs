//! Gravity resolution.
//!
//! Gravity is either a constant vector or an ordered list of
//! `{vertical speed threshold, gravity}` bands. The band form lets hosts
//! strengthen gravity past a fall-speed threshold (snappier descents) or
//! weaken it near the jump apex.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// One entry of a threshold-keyed gravity list.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GravityBand {
    /// The band applies while the character's vertical speed is below
    /// this threshold (signed; falling speeds are negative).
    pub vertical_speed_threshold: f32,

    /// Gravity vector while the band applies.
    pub gravity: Vec3,
}

/// Gravity configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GravityConfig {
    /// One gravity vector, always.
    Constant(Vec3),

    /// Ordered band list. Entry 0 is the default; a linear scan keeps the
    /// *last* entry whose threshold exceeds the current vertical speed,
    /// so callers order entries meaningfully.
    Thresholds(Vec<GravityBand>),
}

impl GravityConfig {
    /// Resolve the active gravity for the current vertical speed.
    pub fn resolve(&self, vertical_speed: f32) -> Vec3 {
        match self {
            Self::Constant(g) => *g,
            Self::Thresholds(bands) => {
                let mut active = bands.first().map(|b| b.gravity).unwrap_or(Vec3::ZERO);
                for band in bands.iter().skip(1) {
                    if band.vertical_speed_threshold > vertical_speed {
                        active = band.gravity;
                    }
                }
                active
            }
        }
    }
}
