//! Character movement configuration.
//!
//! All movement parameters are grouped here for easy tuning. Values use
//! metric units (meters, seconds, degrees for angles) unless noted.

use glam::Vec3;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::collision::Layers;

use super::gravity::GravityConfig;

/// How object-space velocity approaches its target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SpeedControl {
    /// Snap to the target instantly.
    #[default]
    Constant,
    /// Move toward the target by `move_acceleration * dt` per tick.
    Linear,
    /// Close the gap by `move_damp * dt` of the residual per tick.
    Exponential,
}

/// Configuration validation failure. These are setup-time errors; the
/// solver assumes a validated configuration and never re-checks.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("skin width must be positive, got {0}")]
    NonPositiveSkinWidth(f32),

    #[error("capsule radius {radius} must be smaller than half the height {height}")]
    RadiusTooLarge { radius: f32, height: f32 },

    #[error("gravity magnitude must be nonzero")]
    ZeroGravity,

    #[error("gravity threshold list must not be empty")]
    EmptyGravityList,

    #[error("max slope angle {max_slope} must stay below min ceiling angle {min_ceiling}")]
    SlopeCeilingOverlap { max_slope: f32, min_ceiling: f32 },
}

/// Configuration for the character solver.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CharacterConfig {
    // ========================================================================
    // Movement
    // ========================================================================
    /// Base movement speed (meters/second).
    pub move_speed: f32,

    /// Initial upward jump speed (meters/second). Linked to
    /// `jump_max_height`; editing either recomputes the other at the next
    /// tick's commit.
    pub jump_speed: f32,

    /// Maximum jump height (meters). Linked to `jump_speed`.
    pub jump_max_height: f32,

    /// Number of midair jumps available before landing again.
    pub max_air_jump_count: u32,

    /// Speed multiplier while sprinting.
    pub sprint_multiplier: f32,

    /// Speed multiplier while crouching. Crouch wins over sprint.
    pub crouch_multiplier: f32,

    /// How object-space velocity approaches its target.
    pub speed_control: SpeedControl,

    /// Acceleration for [`SpeedControl::Linear`] (meters/second²).
    pub move_acceleration: f32,

    /// Damping factor for [`SpeedControl::Exponential`] (1/second).
    pub move_damp: f32,

    /// Early-press grace: a jump pressed this long before landing still
    /// executes on the landing tick (seconds).
    pub jump_buffer_time: f32,

    /// Late-press grace: a jump pressed this long after walking off a
    /// ledge still executes at full height (seconds).
    pub coyote_time: f32,

    // ========================================================================
    // Capsule
    // ========================================================================
    /// Capsule height while standing (meters).
    pub idle_height: f32,

    /// Capsule height while crouched (meters).
    pub crouch_height: f32,

    /// Capsule radius (meters).
    pub radius: f32,

    // ========================================================================
    // Physics
    // ========================================================================
    /// Gravity: a constant vector, or an ordered threshold list keyed on
    /// vertical speed.
    pub gravity: GravityConfig,

    /// Geometric inset preventing exactly-touching sweep failures (meters).
    pub skin_width: f32,

    /// Maximum solver recursion depth per pass. Residual motion past this
    /// is discarded.
    pub max_bounces: u32,

    /// Character mass, divides Force/Impulse external forces and drag.
    pub mass: f32,

    /// External-velocity drag while grounded (1/second).
    pub contact_drag: f32,

    /// External-velocity drag while airborne (1/second).
    pub air_drag: f32,

    /// Layers the character collides with.
    pub ground_layers: Layers,

    // ========================================================================
    // Slopes, ceilings, steps
    // ========================================================================
    /// Steepest surface angle still counted as ground (degrees from up).
    pub max_slope_angle: f32,

    /// Shallowest overhead angle that cancels vertical velocity (degrees
    /// from up).
    pub min_ceiling_angle: f32,

    /// Whether wall contacts probe for a climbable ledge.
    pub up_step_enabled: bool,

    /// Maximum ledge height the character steps up onto (meters).
    pub max_step_up_height: f32,

    /// Whether losing ground contact probes for a floor to settle onto.
    pub down_step_enabled: bool,

    /// Maximum drop the character steps down without going airborne
    /// (meters).
    pub max_step_down_height: f32,
}

impl Default for CharacterConfig {
    fn default() -> Self {
        let gravity = Vec3::new(0.0, -20.0, 0.0);
        let jump_speed = 10.0;

        Self {
            move_speed: 4.0,
            jump_speed,
            // jump_max_height = jump_speed^2 / (2 |g.y|)
            jump_max_height: jump_speed * jump_speed * 0.5 / gravity.y.abs(),
            max_air_jump_count: 1,
            sprint_multiplier: 2.0,
            crouch_multiplier: 0.5,
            speed_control: SpeedControl::Constant,
            move_acceleration: 25.0,
            move_damp: 10.0,
            jump_buffer_time: 0.1,
            coyote_time: 0.1,

            idle_height: 2.0,
            crouch_height: 1.2,
            radius: 0.5,

            gravity: GravityConfig::Constant(gravity),
            skin_width: 0.01,
            max_bounces: 5,
            mass: 1.0,
            contact_drag: 0.5,
            air_drag: 1.0,
            ground_layers: Layers::MASK_WALKABLE,

            max_slope_angle: 55.0,
            min_ceiling_angle: 130.0,
            up_step_enabled: true,
            max_step_up_height: 0.4,
            down_step_enabled: true,
            max_step_down_height: 0.4,
        }
    }
}

impl CharacterConfig {
    /// A floatier tuning with generous grace windows, for platformer-style
    /// hosts.
    pub fn platformer() -> Self {
        Self {
            move_speed: 6.0,
            max_air_jump_count: 2,
            jump_buffer_time: 0.15,
            coyote_time: 0.15,
            speed_control: SpeedControl::Exponential,
            ..Default::default()
        }
    }

    /// Validate setup-time invariants. Call once after construction or
    /// deserialization; the solver assumes a validated configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.skin_width <= 0.0 {
            return Err(ConfigError::NonPositiveSkinWidth(self.skin_width));
        }

        let min_height = self.idle_height.min(self.crouch_height);
        if self.radius >= min_height * 0.5 {
            return Err(ConfigError::RadiusTooLarge {
                radius: self.radius,
                height: min_height,
            });
        }

        match &self.gravity {
            GravityConfig::Constant(g) => {
                if g.length_squared() == 0.0 {
                    return Err(ConfigError::ZeroGravity);
                }
            }
            GravityConfig::Thresholds(bands) => {
                if bands.is_empty() {
                    return Err(ConfigError::EmptyGravityList);
                }
                if bands.iter().any(|b| b.gravity.length_squared() == 0.0) {
                    return Err(ConfigError::ZeroGravity);
                }
            }
        }

        if self.max_slope_angle >= self.min_ceiling_angle {
            return Err(ConfigError::SlopeCeilingOverlap {
                max_slope: self.max_slope_angle,
                min_ceiling: self.min_ceiling_angle,
            });
        }

        Ok(())
    }

    /// Speed multiplier for the current mode inputs. Crouch takes
    /// precedence over sprint.
    pub fn mode_multiplier(&self, crouching: bool, sprinting: bool) -> f32 {
        if crouching {
            self.crouch_multiplier
        } else if sprinting {
            self.sprint_multiplier
        } else {
            1.0
        }
    }

    /// Capsule height for the crouch input state.
    pub fn height(&self, crouching: bool) -> f32 {
        if crouching {
            self.crouch_height
        } else {
            self.idle_height
        }
    }
}
