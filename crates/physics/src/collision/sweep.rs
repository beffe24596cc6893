//! Sweep shapes and results for collision queries.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::layers::Layers;

/// Shape swept through the world by a collision query.
///
/// The solver sweeps the character capsule; the step probes sweep spheres
/// and rays. All shapes are positioned by their center; the capsule's
/// segment endpoints are stored as offsets from that center so the
/// character's up axis is baked in at construction.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub enum SweepShape {
    /// A capsule described by its inner segment endpoints (offsets from
    /// the shape center) and radius.
    Capsule { a: Vec3, b: Vec3, radius: f32 },

    /// A sphere.
    Sphere { radius: f32 },
}

impl SweepShape {
    /// Build an upright capsule along `up` with the given total height and
    /// radius. Degenerate heights collapse to a sphere-like capsule.
    pub fn capsule(up: Vec3, height: f32, radius: f32) -> Self {
        let half = (height * 0.5 - radius).max(0.0);
        Self::Capsule {
            a: up * half,
            b: -up * half,
            radius,
        }
    }
}

/// Result of a shape sweep that hit something.
///
/// A sweep that reaches its full distance returns `None` instead; there is
/// no "miss" variant to inspect.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SweepResult {
    /// Distance traveled along the sweep direction before impact.
    pub distance: f32,

    /// Contact point on the hit brush, world space.
    pub point: Vec3,

    /// Surface normal at the contact, pointing back at the swept shape.
    pub normal: Vec3,

    /// The hit brush is a pass-through trigger volume.
    pub is_trigger: bool,

    /// Brush id of the movable platform that was hit, if any.
    pub platform: Option<u32>,
}

/// Result of a raycast that hit something.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RayHit {
    /// Distance from the ray origin to the hit.
    pub distance: f32,

    /// Hit point, world space.
    pub point: Vec3,

    /// Surface normal at the hit, world space.
    pub normal: Vec3,

    /// Layers of the hit brush.
    pub layers: Layers,
}
