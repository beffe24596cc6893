//! Movement state and input structures.
//!
//! [`CharacterState`] is everything the solver carries between ticks:
//! the two velocity channels with their coordinate-space intermediates,
//! grounding bookkeeping, per-tick contact records, and the jump and
//! external-force sub-states.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use super::config::CharacterConfig;
use super::external::ExternalForceState;
use super::jump::JumpState;
use super::stateful::Stateful;

/// Per-tick input sample.
///
/// `move_dir` is the raw input-space axis pair (x strafe, y forward),
/// expected in the unit disc. Mode axes are analog so hosts can wire
/// triggers directly; anything above zero counts as held.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MoveInput {
    /// Input-space movement axes.
    pub move_dir: Vec2,
    /// Jump axis. Edge-detected; holding does not re-jump.
    pub jump: f32,
    /// Crouch axis.
    pub crouch: f32,
    /// Sprint axis.
    pub sprint: f32,
}

impl MoveInput {
    pub fn crouching(&self) -> bool {
        self.crouch > 0.0
    }

    pub fn sprinting(&self) -> bool {
        self.sprint > 0.0
    }
}

/// The move channel through its coordinate spaces.
///
/// Input space comes in as axes, object space applies speed and smoothing
/// (and persists across ticks so smoothing has a baseline), tangent space
/// orients by the facing basis, and world space redirects along the
/// ground slope.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct MoveVelocity {
    /// Raw input axes sampled this tick.
    pub input: Vec2,
    /// Object-space velocity (x strafe, z forward). Persists across
    /// ticks; speed smoothing integrates on it.
    pub object: Vec3,
    /// Tangent-space velocity, oriented by the facing basis.
    pub tangent: Vec3,
    /// World-space velocity after slope redirection and carried motion.
    pub world: Vec3,
}

/// The vertical channel through its coordinate spaces.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct VerticalVelocity {
    /// Jump axis with last-tick history for rising-edge detection.
    pub input: Stateful<f32>,
    /// World-space vertical velocity. Persists while airborne; gravity
    /// integrates on it.
    pub world: Vec3,
}

/// All solver state carried across ticks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CharacterState {
    /// Capsule bottom (feet) position, world space.
    pub position: Vec3,

    /// Character up axis (opposite the reference gravity direction).
    pub up: Vec3,
    /// Facing direction, perpendicular to `up`.
    pub forward: Vec3,
    /// Right direction completing the basis.
    pub right: Vec3,

    /// Capsule height with change tracking (crouch transitions).
    pub height: Stateful<f32>,

    /// Move channel.
    pub move_velocity: MoveVelocity,
    /// Vertical channel.
    pub vertical_velocity: VerticalVelocity,

    /// Grounded flag with last-tick history.
    pub grounded: Stateful<bool>,

    /// Running average of ground contact normals this tick.
    pub ground_normal: Vec3,
    /// Number of contacts folded into `ground_normal`.
    pub ground_contacts: u32,

    /// A horizontal-pass sweep hit something this tick.
    pub collided_horizontal: bool,
    /// A vertical-pass sweep hit something this tick.
    pub collided_vertical: bool,

    /// Displacement produced by the horizontal pass this tick.
    pub horizontal_displacement: Vec3,
    /// Displacement produced by the vertical pass this tick.
    pub vertical_displacement: Vec3,

    /// Step-up resolved this tick; suppresses the down-step probe.
    pub is_up_step: bool,
    /// Step-down resolved this tick (or last tick, until ground contact
    /// inside tolerance clears it).
    pub is_down_step: bool,

    /// Wall normal recorded by the previous vertical pass, for wedge
    /// detection.
    pub before_wall_normal: Option<Vec3>,

    /// Velocity seeded into the vertical channel on a ground exit, from
    /// the displacement of the exiting tick.
    pub ground_exit_velocity: Option<Vec3>,

    /// Jump sub-state.
    pub jump: JumpState,

    /// External force sub-state.
    pub external: ExternalForceState,

    /// Teleport target; applied instead of solving for one tick.
    pub pending_position: Option<Vec3>,

    /// Gravity resolved for this tick.
    pub active_gravity: Vec3,
}

impl CharacterState {
    pub fn new(position: Vec3, config: &CharacterConfig) -> Self {
        Self {
            position,
            up: Vec3::Y,
            forward: Vec3::NEG_Z,
            right: Vec3::X,
            height: Stateful::new(config.idle_height),
            move_velocity: MoveVelocity::default(),
            vertical_velocity: VerticalVelocity::default(),
            grounded: Stateful::new(false),
            ground_normal: Vec3::Y,
            ground_contacts: 0,
            collided_horizontal: false,
            collided_vertical: false,
            horizontal_displacement: Vec3::ZERO,
            vertical_displacement: Vec3::ZERO,
            is_up_step: false,
            is_down_step: false,
            before_wall_normal: None,
            ground_exit_velocity: None,
            jump: JumpState::new(config),
            external: ExternalForceState::default(),
            pending_position: None,
            active_gravity: Vec3::ZERO,
        }
    }

    /// Capsule center for the current height.
    pub fn center(&self) -> Vec3 {
        self.position + self.up * self.height.get() * 0.5
    }

    /// Point the facing basis along `view`, keeping it perpendicular to
    /// the up axis. A view parallel to up leaves the basis unchanged.
    pub fn set_view_direction(&mut self, view: Vec3) {
        let forward = view.reject_from(self.up).normalize_or_zero();
        if forward == Vec3::ZERO {
            return;
        }
        self.forward = forward;
        self.right = self.forward.cross(self.up);
    }

    /// Reorient the whole basis for a new gravity direction.
    pub fn set_up_direction(&mut self, up: Vec3) {
        let up = up.normalize_or_zero();
        if up == Vec3::ZERO {
            return;
        }
        self.up = up;
        self.set_view_direction(self.forward);
    }

    /// Fold a ground contact normal into the per-tick running average.
    pub fn fold_ground_normal(&mut self, normal: Vec3) {
        if self.ground_contacts == 0 {
            self.ground_normal = normal;
        } else {
            self.ground_normal =
                (self.ground_normal * self.ground_contacts as f32 + normal).normalize_or_zero();
        }
        self.ground_contacts += 1;
    }

    /// Reset the per-tick contact records. Runs at the top of the
    /// horizontal pass; the grounded flag shifts history here so "was
    /// grounded last tick" stays readable all tick.
    pub fn begin_tick_contacts(&mut self) {
        self.grounded.commit(false);
        self.ground_normal = self.up;
        self.ground_contacts = 0;
        self.collided_horizontal = false;
        self.collided_vertical = false;
    }

    /// Signed vertical speed of the vertical channel (positive up).
    pub fn vertical_speed(&self) -> f32 {
        self.vertical_velocity.world.dot(self.up)
    }

    /// Combined velocity reported to hosts (move + vertical + external).
    pub fn velocity(&self) -> Vec3 {
        self.move_velocity.world + self.vertical_velocity.world + self.external.velocity
    }
}
