//! External force integration.
//!
//! Addons push on the character through [`ForceMode`] accumulators; the
//! integrator folds them into an external velocity that decays by drag,
//! feeds its gravity-axis component to the vertical channel, and carries
//! kinematic platform motion in and out of the move channel.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::collision::CollisionWorld;

use super::stateful::Stateful;

/// How an injected force is interpreted, mirroring the usual rigid-body
/// force modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ForceMode {
    /// Continuous force, divided by mass. Re-apply every tick.
    Force,
    /// One-shot impulse, divided by mass.
    Impulse,
    /// Continuous acceleration, mass-independent. Re-apply every tick.
    Acceleration,
    /// One-shot velocity change, mass-independent.
    VelocityChange,
}

/// Last-sampled kinematic platform contact.
///
/// Held as plain data (brush id plus position snapshots) and re-resolved
/// against the world every tick; the platform is never assumed to outlive
/// a tick.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct PlatformContact {
    /// Whether a platform was under the character this tick / last tick.
    pub touching: Stateful<bool>,
    /// Brush id of the platform, when touching.
    pub id: Option<u32>,
    /// Platform position sampled this tick.
    pub pos: Vec3,
    /// Platform position sampled last tick.
    pub pos_prev: Vec3,
}

/// Accumulated external forces and the velocity they produce.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExternalForceState {
    /// Continuous accumulator (Force / Acceleration), cleared every tick.
    pub acceleration_give: Vec3,

    /// One-shot accumulator (Impulse / VelocityChange), cleared every tick.
    pub impulse_give: Vec3,

    /// External velocity, persists across ticks and decays by drag. Its
    /// gravity-axis component is stripped each tick after being folded
    /// into the vertical channel.
    pub velocity: Vec3,

    /// Kinematic platform bookkeeping.
    pub platform: PlatformContact,
}

impl ExternalForceState {
    /// Accumulate an injected force for this tick.
    pub fn add_force(&mut self, force: Vec3, mode: ForceMode, mass: f32) {
        match mode {
            ForceMode::Force => self.acceleration_give += force / mass,
            ForceMode::Impulse => self.impulse_give += force / mass,
            ForceMode::Acceleration => self.acceleration_give += force,
            ForceMode::VelocityChange => self.impulse_give += force,
        }
    }

    /// Replace the external velocity outright (addon override).
    pub fn set_velocity(&mut self, velocity: Vec3) {
        self.velocity = velocity;
    }

    /// Integrate accumulated forces into the external velocity and decay
    /// it by drag. Returns the contributions for the two velocity
    /// channels: `(world-plane move add, vertical delta add)`.
    ///
    /// The vertical contribution is the *change* in the gravity-axis
    /// component since last tick, so gravity integration in the vertical
    /// channel is not double-counted.
    pub fn integrate(
        &mut self,
        gravity_dir: Vec3,
        grounded: bool,
        drag_contact: f32,
        drag_air: f32,
        mass: f32,
        dt: f32,
    ) -> (Vec3, Vec3) {
        let acceleration = self.acceleration_give + self.impulse_give;

        let velocity_before = self.velocity;
        self.velocity += acceleration * dt;

        let drag = if grounded { drag_contact } else { drag_air };
        if self.velocity.length() < drag * dt {
            self.velocity = Vec3::ZERO;
        }
        self.velocity *= 1.0 - drag / mass * dt;

        let vertical_prev = velocity_before.project_onto_normalized(gravity_dir);
        let vertical_now = self.velocity.project_onto_normalized(gravity_dir);
        let vertical_delta = vertical_now - vertical_prev;

        let plane = self.velocity.reject_from_normalized(gravity_dir);

        // The gravity-axis component now lives in the vertical channel,
        // where gravity keeps integrating it; strip it here.
        self.velocity -= vertical_now;

        (plane, vertical_delta)
    }

    /// Clip the external velocity against a contact normal so it stops
    /// pushing into the surface.
    pub fn clip_against(&mut self, normal: Vec3) {
        if self.velocity.dot(normal) < 0.0 {
            self.velocity = self.velocity.reject_from(normal);
        }
    }

    /// Clear the per-tick accumulators. Callers re-invoke `add_force`
    /// every tick for continuous effects.
    pub fn clear_accumulators(&mut self) {
        self.acceleration_give = Vec3::ZERO;
        self.impulse_give = Vec3::ZERO;
    }

    /// Fold kinematic platform motion into the move channel.
    ///
    /// While standing on a platform the platform's per-tick displacement
    /// is added to the move velocity; the tick contact is lost, the same
    /// delta is folded once into the external velocity so momentum
    /// carries over after stepping off.
    ///
    /// Returns the move-velocity contribution for this tick.
    pub fn carry_platform(&mut self, world: &CollisionWorld, dt: f32) -> Vec3 {
        let touching = self.platform.touching.get();
        let touched_before = self.platform.touching.previous();

        if touching {
            // Contact is re-resolved fresh every tick; a vanished brush
            // ends the ride with no carry-over.
            let Some(pos_now) = self.platform.id.and_then(|id| world.brush_position(id)) else {
                self.platform.touching.set(false);
                self.platform.id = None;
                return Vec3::ZERO;
            };

            if !touched_before {
                self.platform.pos = pos_now;
                self.platform.pos_prev = pos_now;
                return Vec3::ZERO;
            }

            self.platform.pos_prev = self.platform.pos;
            self.platform.pos = pos_now;
            (self.platform.pos - self.platform.pos_prev) / dt
        } else if touched_before {
            self.velocity += (self.platform.pos - self.platform.pos_prev) / dt;
            self.platform.id = None;
            Vec3::ZERO
        } else {
            Vec3::ZERO
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 60.0;
    const DOWN: Vec3 = Vec3::NEG_Y;

    fn integrate(state: &mut ExternalForceState, grounded: bool) -> (Vec3, Vec3) {
        state.integrate(DOWN, grounded, 0.5, 1.0, 1.0, DT)
    }

    #[test]
    fn test_force_modes_scale_by_mass() {
        let mut state = ExternalForceState::default();
        state.add_force(Vec3::X * 10.0, ForceMode::Force, 2.0);
        assert_eq!(state.acceleration_give, Vec3::X * 5.0);

        state.add_force(Vec3::X * 10.0, ForceMode::Acceleration, 2.0);
        assert_eq!(state.acceleration_give, Vec3::X * 15.0);

        state.add_force(Vec3::Y * 4.0, ForceMode::Impulse, 2.0);
        assert_eq!(state.impulse_give, Vec3::Y * 2.0);

        state.add_force(Vec3::Y * 4.0, ForceMode::VelocityChange, 2.0);
        assert_eq!(state.impulse_give, Vec3::Y * 6.0);
    }

    #[test]
    fn test_impulse_decays_to_exact_zero() {
        let mut state = ExternalForceState::default();
        state.add_force(Vec3::X * 3.0, ForceMode::VelocityChange, 1.0);

        integrate(&mut state, true);
        state.clear_accumulators();
        assert!(state.velocity.length() > 0.0);

        let mut last = f32::MAX;
        for _ in 0..100_000 {
            integrate(&mut state, true);
            let speed = state.velocity.length();
            if speed == 0.0 {
                return;
            }
            assert!(speed < last, "external speed must strictly decrease");
            last = speed;
        }
        panic!("external velocity never reached zero");
    }

    #[test]
    fn test_vertical_component_moves_to_vertical_channel() {
        let mut state = ExternalForceState::default();
        state.add_force(Vec3::new(2.0, 6.0, 0.0), ForceMode::VelocityChange, 1.0);

        let (plane, vertical) = integrate(&mut state, false);

        // Plane part stays in the move channel.
        assert!(plane.y.abs() < 1e-6);
        assert!(plane.x > 0.0);

        // Vertical delta goes to the vertical channel and is stripped from
        // the external velocity.
        assert!(vertical.y > 0.0);
        assert!(state.velocity.y.abs() < 1e-6);
    }

    #[test]
    fn test_no_vertical_double_fold_across_ticks() {
        let mut state = ExternalForceState::default();
        state.add_force(Vec3::Y * 6.0, ForceMode::VelocityChange, 1.0);

        let (_, v1) = integrate(&mut state, false);
        state.clear_accumulators();
        assert!(v1.y > 0.0);

        // No further forces: the stripped vertical component must not be
        // folded again.
        let (_, v2) = integrate(&mut state, false);
        assert!(v2.y.abs() < 1e-6, "vertical delta re-folded: {v2:?}");
    }

    #[test]
    fn test_clip_against_wall() {
        let mut state = ExternalForceState::default();
        state.velocity = Vec3::new(3.0, 0.0, 1.0);

        state.clip_against(Vec3::NEG_X);
        assert!(state.velocity.x.abs() < 1e-6);
        assert!((state.velocity.z - 1.0).abs() < 1e-6);

        // Moving away from the surface is left alone.
        state.velocity = Vec3::new(-2.0, 0.0, 0.0);
        state.clip_against(Vec3::NEG_X);
        assert_eq!(state.velocity, Vec3::new(-2.0, 0.0, 0.0));
    }
}
