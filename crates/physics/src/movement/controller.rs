//! Character movement controller.
//!
//! This is the main entry point for character movement. Each tick the
//! controller samples input, advances the two velocity channels through
//! their coordinate spaces, runs the horizontal and vertical slide
//! passes, and commits state history.

use glam::{Quat, Vec3};

use crate::collision::{CollisionWorld, Layers};

use super::config::{CharacterConfig, ConfigError};
use super::external::ForceMode;
use super::pipeline;
use super::slide::{Pass, Solver};
use super::state::{CharacterState, MoveInput};

/// Kinematic capsule character controller.
///
/// Owns the configuration; per-character state lives in
/// [`CharacterState`] so one controller can drive many characters.
///
/// # Example
///
/// ```ignore
/// let mut controller = CharacterController::new(CharacterConfig::default())?;
/// let mut state = controller.spawn_at(&world, spawn_pos);
///
/// // Each tick:
/// controller.update(&mut state, &world, input, dt);
/// ```
#[derive(Debug, Clone)]
pub struct CharacterController {
    /// Movement configuration. Host edits are picked up at the next
    /// tick's commit.
    pub config: CharacterConfig,
}

impl CharacterController {
    /// Create a controller, validating the configuration.
    pub fn new(config: CharacterConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Place a character on the ground below `spawn`. A short downward
    /// ray settles the feet a few skin widths above the surface; with no
    /// ground in range the spawn point is used as-is.
    pub fn spawn_at(&self, world: &CollisionWorld, spawn: Vec3) -> CharacterState {
        let mut state = CharacterState::new(spawn, &self.config);
        let up = state.up;

        let mask = self.config.ground_layers.without(Layers::TRIGGER);
        if let Some(hit) = world.raycast(spawn + up, -up, 2.0, mask) {
            state.position = hit.point + up * self.config.skin_width * 3.0;
            state.grounded.commit(true);
            state.ground_normal = hit.normal;
            log::debug!("spawned on ground at {:?}", state.position);
        } else {
            log::debug!("spawned airborne at {spawn:?}");
        }

        state
    }

    /// Inject an external force for this tick.
    pub fn add_force(&self, state: &mut CharacterState, force: Vec3, mode: ForceMode) {
        state.external.add_force(force, mode, self.config.mass);
    }

    /// Replace the external velocity outright.
    pub fn set_velocity(&self, state: &mut CharacterState, velocity: Vec3) {
        state.external.set_velocity(velocity);
    }

    /// Teleport: the next tick applies `position` directly instead of
    /// solving, and the vertical channel resets to its grounded baseline.
    pub fn move_position(&self, state: &mut CharacterState, position: Vec3) {
        state.pending_position = Some(position);
    }

    /// Reorient the character basis from a rotation, bypassing the view
    /// projection.
    pub fn move_rotation(&self, state: &mut CharacterState, rotation: Quat) {
        state.up = rotation * Vec3::Y;
        state.forward = rotation * Vec3::NEG_Z;
        state.right = rotation * Vec3::X;
    }

    /// Advance one fixed tick.
    pub fn update(
        &mut self,
        state: &mut CharacterState,
        world: &CollisionWorld,
        input: MoveInput,
        dt: f32,
    ) {
        let up = state.up;

        // Teleports bypass the solver for a tick.
        if let Some(target) = state.pending_position.take() {
            state.active_gravity = self.config.gravity.resolve(0.0);
            state.vertical_velocity.world = state.active_gravity * dt * 0.5;
            state.position = target;
            state.horizontal_displacement = Vec3::ZERO;
            state.vertical_displacement = Vec3::ZERO;
            log::debug!("teleported to {target:?}");
            self.commit_tick(state, dt);
            return;
        }

        // Gravity bands key on last tick's vertical speed.
        let vertical_speed = state.vertical_displacement.dot(up) / dt;
        state.active_gravity = self.config.gravity.resolve(vertical_speed);
        let gravity = state.active_gravity;

        let grounded = state.grounded.get();
        if grounded {
            state.jump.on_grounded();
        }

        // Input space.
        state.move_velocity.input = input.move_dir;
        state.vertical_velocity.input.set(input.jump);
        let rising_edge =
            state.vertical_velocity.input.get() > 0.0 && state.vertical_velocity.input.previous() == 0.0;

        // Object space.
        let multiplier = self.config.mode_multiplier(input.crouching(), input.sprinting());
        state.move_velocity.object = pipeline::object_space(
            input.move_dir,
            state.move_velocity.object,
            multiplier,
            &self.config,
            dt,
        );
        state.height.commit(self.config.height(input.crouching()));

        // Tangent space.
        state.move_velocity.tangent =
            pipeline::tangent_space(state.move_velocity.object, state.right, state.forward);

        // World space: vertical channel first.
        if grounded {
            if rising_edge {
                state.jump.press(true, &self.config);
                state.vertical_velocity.world =
                    state.jump.launch_velocity(&self.config, gravity, up, dt);
            } else if state.jump.take_buffered() {
                state.vertical_velocity.world =
                    state.jump.launch_velocity(&self.config, gravity, up, dt);
            } else {
                state.vertical_velocity.world = gravity * dt * 0.5;
            }
        } else {
            state.ground_normal = up;

            if let Some(seed) = state.ground_exit_velocity.take() {
                state.vertical_velocity.world = seed;
            }

            if rising_edge && state.jump.press(false, &self.config) {
                state.vertical_velocity.world =
                    state.jump.launch_velocity(&self.config, gravity, up, dt);
            } else {
                state.vertical_velocity.world += gravity * dt;
            }
        }

        // World space: move channel, slope-redirected then carried.
        state.move_velocity.world = pipeline::world_space(
            state.move_velocity.tangent,
            state.ground_normal,
            up,
            grounded,
        );

        let gravity_dir = gravity.normalize_or_zero();
        let gravity_dir = if gravity_dir == Vec3::ZERO { -up } else { gravity_dir };
        let (plane, vertical_delta) = state.external.integrate(
            gravity_dir,
            grounded,
            self.config.contact_drag,
            self.config.air_drag,
            self.config.mass,
            dt,
        );
        state.move_velocity.world += plane;
        state.vertical_velocity.world += vertical_delta;
        state.move_velocity.world += state.external.carry_platform(world, dt);
        // Shift contact history now that this tick's carry has read it;
        // the passes below record the fresh contact.
        state.external.platform.touching.roll();

        // Slide passes.
        state.before_wall_normal = None;
        state.external.platform.touching.set(false);
        state.begin_tick_contacts();

        let solver = Solver {
            world,
            config: &self.config,
            dt,
        };

        let origin = state.center();
        let horizontal = solver.run(state, state.move_velocity.world, origin, Pass::Horizontal);
        state.horizontal_displacement = horizontal;

        let vertical = solver.run(
            state,
            state.vertical_velocity.world,
            origin + horizontal,
            Pass::Vertical,
        );
        state.vertical_displacement = vertical;

        // Leaving the ground carries the exiting tick's real motion into
        // the vertical channel so ramps launch consistently.
        if !state.grounded.get() && state.grounded.previous() {
            let vertical_part = horizontal.dot(gravity_dir) * gravity_dir;
            state.ground_exit_velocity = Some((vertical + vertical_part) / dt);
        }

        state.position += horizontal + vertical;

        self.commit_tick(state, dt);
    }

    /// Tick-end history commit.
    fn commit_tick(&mut self, state: &mut CharacterState, dt: f32) {
        state
            .jump
            .reconcile(&mut self.config, state.active_gravity, state.up);
        state.vertical_velocity.input.roll();
        state.jump.tick_timers(dt);
        state.external.clear_accumulators();
    }
}
