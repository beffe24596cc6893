//! The collide-and-slide solver.
//!
//! Each tick runs two passes through the same recursive resolver: a
//! horizontal pass for the move channel, then a vertical pass for the
//! jump/gravity channel starting where the horizontal pass ended. Every
//! bounce sweeps the capsule, snaps to the contact, classifies the
//! surface by angle, and recurses with the redirected leftover motion.
//! Recursion is bounded by `max_bounces`; motion left when the budget
//! runs out is discarded.

use glam::Vec3;

use crate::collision::{CollisionWorld, Layers, SweepShape};

use super::config::CharacterConfig;
use super::state::CharacterState;
use super::step::{probe_down_step, probe_up_step, ProbeCapsule};

/// Which velocity channel a pass resolves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pass {
    Horizontal,
    Vertical,
}

/// One tick's solver over a collision world.
pub struct Solver<'a> {
    pub world: &'a CollisionWorld,
    pub config: &'a CharacterConfig,
    pub dt: f32,
}

/// Project onto the plane of `n`, never gaining length.
fn project_and_scale(a: Vec3, n: Vec3) -> Vec3 {
    a.reject_from(n).clamp_length_max(a.length())
}

impl Solver<'_> {
    /// Run one pass. `velocity` is in meters/second; the returned
    /// displacement is for this tick. `origin` is the capsule center the
    /// pass starts from.
    pub fn run(&self, state: &mut CharacterState, velocity: Vec3, origin: Vec3, pass: Pass) -> Vec3 {
        let step = velocity * self.dt;
        self.solve(state, step, origin, 0, pass, step)
    }

    fn solve(
        &self,
        state: &mut CharacterState,
        vel: Vec3,
        pos: Vec3,
        depth: u32,
        pass: Pass,
        vel_init: Vec3,
    ) -> Vec3 {
        if depth >= self.config.max_bounces {
            return Vec3::ZERO;
        }

        let up = state.up;
        let skin = self.config.skin_width;
        let dir = vel.normalize_or_zero();
        let shape = SweepShape::capsule(up, state.height.get(), self.config.radius);

        let hit = if dir == Vec3::ZERO {
            None
        } else {
            self.world
                .sweep(shape, pos, dir, vel.length() + skin, self.config.ground_layers)
        };

        let Some(hit) = hit else {
            if let Some(stepped) = self.handle_pass_through(state, pos, depth, pass, vel_init) {
                return stepped;
            }
            return vel;
        };

        // Trigger volumes never block; burn a bounce and keep going.
        if hit.is_trigger {
            return self.solve(state, vel, pos, depth + 1, pass, vel_init);
        }

        match pass {
            Pass::Horizontal => state.collided_horizontal = true,
            Pass::Vertical => state.collided_vertical = true,
        }

        state.external.clip_against(hit.normal);

        let flat_normal = hit.normal.reject_from(up).normalize_or_zero();
        let flat_init = vel_init.reject_from(up).normalize_or_zero();
        let scale = 1.0 - flat_normal.dot(-flat_init);

        let mut snap = dir * (hit.distance - skin);
        // Terrain already inside the skin: stay put instead of jittering.
        if snap.length() <= skin {
            snap = Vec3::ZERO;
        }
        let mut leftover = vel - snap;
        let angle = up.angle_between(hit.normal).to_degrees();

        if angle <= self.config.max_slope_angle || state.is_up_step || state.is_down_step {
            // Ground or walkable slope.
            state.grounded.set(true);
            state.fold_ground_normal(hit.normal);

            if let Some(id) = hit.platform {
                state.external.platform.touching.set(true);
                state.external.platform.id = Some(id);
            }

            if pass == Pass::Vertical {
                if angle <= self.config.max_slope_angle {
                    state.is_up_step = false;
                    state.is_down_step = false;
                }
                return snap;
            }

            leftover = project_and_scale(leftover, state.ground_normal);
        } else if angle >= self.config.min_ceiling_angle {
            // Ceiling: cancel upward motion outright.
            state.vertical_velocity.world = Vec3::ZERO;
            return snap;
        } else {
            // Wall.
            match pass {
                Pass::Horizontal => {
                    if state.grounded.get() {
                        // Slide along the wall/ground crease so the
                        // character neither climbs the wall nor loses
                        // ground contact.
                        let crease = hit.normal.cross(state.ground_normal).normalize_or_zero();
                        leftover = if crease == Vec3::ZERO {
                            Vec3::ZERO
                        } else {
                            leftover.project_onto(crease)
                        };
                    } else {
                        leftover = project_and_scale(leftover, hit.normal) * scale;
                    }

                    if self.config.up_step_enabled
                        && !state.is_down_step
                        && state.grounded.previous()
                    {
                        let capsule = ProbeCapsule {
                            center: pos,
                            height: state.height.get(),
                            radius: self.config.radius,
                            up,
                        };
                        if let Some(lift) = probe_up_step(
                            self.world,
                            self.config,
                            capsule,
                            vel,
                            hit.point,
                            flat_normal,
                            self.probe_mask(),
                        ) {
                            state.is_up_step = true;
                            snap += lift * up;
                        }
                    }
                }
                Pass::Vertical => {
                    leftover = project_and_scale(leftover, hit.normal) * scale;

                    // Two opposing walls in one vertical pass form a
                    // wedge; treat the pinch as standing ground.
                    if let Some(before) = state.before_wall_normal {
                        if before.dot(vel) <= 0.0 {
                            state.grounded.set(true);
                            state.ground_normal = up;
                        }
                    }
                    state.before_wall_normal = Some(hit.normal);
                }
            }
        }

        snap + self.solve(state, leftover, pos + snap, depth + 1, pass, vel_init)
    }

    /// A vertical pass that swept clean while ground was just lost first
    /// re-checks for ground within the zero-snap skin hover, then either
    /// settles onto a nearby lower floor (step-down) or opens the coyote
    /// window. Returns the replacement displacement when a step-down
    /// resolves.
    fn handle_pass_through(
        &self,
        state: &mut CharacterState,
        pos: Vec3,
        depth: u32,
        pass: Pass,
        vel_init: Vec3,
    ) -> Option<Vec3> {
        let grounded_exit = !state.grounded.get() && state.grounded.previous();
        if pass != Pass::Vertical || !grounded_exit {
            return None;
        }

        // A landing whose snap was zeroed leaves the feet hovering up to
        // two skin widths above the surface, just past the grounded
        // baseline sweep's reach. Re-acquire that ground here; only a
        // genuine descent qualifies.
        if vel_init.dot(state.up) <= 0.0 {
            let end_offset = (state.height.get() * 0.5 - self.config.radius).max(0.0) * state.up;
            let settle = self.world.sweep(
                SweepShape::Sphere {
                    radius: self.config.radius,
                },
                pos - end_offset,
                -state.up,
                self.config.skin_width * 2.0,
                self.probe_mask(),
            );
            if let Some(hit) = settle {
                if state.up.angle_between(hit.normal).to_degrees() <= self.config.max_slope_angle {
                    state.grounded.set(true);
                    state.fold_ground_normal(hit.normal);
                    if let Some(id) = hit.platform {
                        state.external.platform.touching.set(true);
                        state.external.platform.id = Some(id);
                    }
                    return None;
                }
            }
        }

        if state.vertical_velocity.input.get() != 0.0 {
            return None;
        }
        if !self.config.down_step_enabled || state.jump.buffer > 0.0 {
            return None;
        }

        let capsule = ProbeCapsule {
            center: pos,
            height: state.height.get(),
            radius: self.config.radius,
            up: state.up,
        };
        let move_step = state.move_velocity.world * self.dt;

        if !state.is_up_step
            && probe_down_step(self.world, self.config, capsule, move_step, self.probe_mask())
        {
            state.is_down_step = true;
            let drop = -state.up * self.config.max_step_down_height;
            Some(self.solve(state, drop, pos, depth + 1, pass, vel_init))
        } else {
            state.jump.start_coyote(self.config);
            None
        }
    }

    fn probe_mask(&self) -> Layers {
        self.config.ground_layers.without(Layers::TRIGGER)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collision::Layers;

    const DT: f32 = 1.0 / 60.0;

    fn flat_world() -> CollisionWorld {
        let mut world = CollisionWorld::new();
        world.add_box(
            Vec3::new(0.0, -0.5, 0.0),
            Vec3::new(50.0, 0.5, 50.0),
            Layers::GROUND,
        );
        world
    }

    fn state_on_floor(config: &CharacterConfig) -> CharacterState {
        // Feet hover a skin above the floor, as the solver leaves them.
        let mut state = CharacterState::new(Vec3::new(0.0, 0.02, 0.0), config);
        state.grounded.commit(true);
        state
    }

    #[test]
    fn test_open_ground_full_displacement() {
        let config = CharacterConfig::default();
        let world = flat_world();
        let solver = Solver {
            world: &world,
            config: &config,
            dt: DT,
        };
        let mut state = state_on_floor(&config);
        state.begin_tick_contacts();

        let origin = state.center();
        let disp = solver.run(&mut state, Vec3::new(4.0, 0.0, 0.0), origin, Pass::Horizontal);
        assert!((disp - Vec3::new(4.0 * DT, 0.0, 0.0)).length() < 1e-5);
    }

    #[test]
    fn test_vertical_pass_grounds_on_floor() {
        let config = CharacterConfig::default();
        let world = flat_world();
        let solver = Solver {
            world: &world,
            config: &config,
            dt: DT,
        };

        // Feet just above the floor, falling.
        let mut state = CharacterState::new(Vec3::new(0.0, 0.005, 0.0), &config);
        state.begin_tick_contacts();

        let origin = state.center();
        let disp = solver.run(&mut state, Vec3::new(0.0, -5.0, 0.0), origin, Pass::Vertical);
        assert!(state.grounded.get());
        assert!(disp.length() <= 0.01, "disp={disp:?}");
        // parry's impact normal carries ~1e-3 noise at near-zero
        // time of impact.
        assert!((state.ground_normal - Vec3::Y).length() < 1e-2);
    }

    #[test]
    fn test_airborne_wall_slide_scales_by_incidence() {
        let config = CharacterConfig {
            up_step_enabled: false,
            ..Default::default()
        };
        let mut world = CollisionWorld::new();
        // Wall face at x=2.0, no floor: airborne slide.
        world.add_box(
            Vec3::new(3.0, 0.0, 0.0),
            Vec3::new(1.0, 10.0, 10.0),
            Layers::GROUND,
        );

        let solver = Solver {
            world: &world,
            config: &config,
            dt: 0.5,
        };
        let mut state = CharacterState::new(Vec3::new(0.0, -1.0, 0.0), &config);
        state.begin_tick_contacts();

        // 45 degree approach at 4 m/s: wall face reached after 1.0 along x.
        let origin = state.center();
        let disp = solver.run(&mut state, Vec3::new(4.0, 0.0, 4.0), origin, Pass::Horizontal);

        assert!(state.collided_horizontal);
        // Never penetrates the wall (capsule radius 0.5).
        assert!(disp.x <= 1.5 + 1e-4, "disp={disp:?}");
        // Keeps sliding along z past the snap distance.
        assert!(disp.z > 1.5, "disp={disp:?}");
        // Glancing scale strictly shrinks the slide below full leftover.
        let straight = 4.0 * 0.5;
        assert!(disp.z < straight);
    }

    #[test]
    fn test_skin_hover_keeps_ground_with_jump_held() {
        let config = CharacterConfig::default();
        let world = flat_world();
        let solver = Solver {
            world: &world,
            config: &config,
            dt: DT,
        };

        // Feet hovering just past the baseline sweep's reach, as a
        // zeroed landing snap leaves them, with jump still held so the
        // down-step probe is unavailable.
        let mut state = CharacterState::new(Vec3::new(0.0, 0.015, 0.0), &config);
        state.grounded.commit(true);
        state.vertical_velocity.input.set(1.0);
        state.begin_tick_contacts();

        let baseline = Vec3::new(0.0, -20.0 * DT * 0.5, 0.0);
        let origin = state.center();
        let disp = solver.run(&mut state, baseline, origin, Pass::Vertical);

        assert!(state.grounded.get(), "skin hover must not drop ground contact");
        assert!(disp.y <= 0.0);
    }

    #[test]
    fn test_ceiling_cancels_vertical_velocity() {
        let config = CharacterConfig::default();
        let mut world = flat_world();
        // Ceiling with its underside at y=2.2.
        world.add_box(
            Vec3::new(0.0, 2.7, 0.0),
            Vec3::new(50.0, 0.5, 50.0),
            Layers::GROUND,
        );

        let solver = Solver {
            world: &world,
            config: &config,
            dt: DT,
        };
        let mut state = CharacterState::new(Vec3::ZERO, &config);
        state.vertical_velocity.world = Vec3::new(0.0, 30.0, 0.0);
        state.begin_tick_contacts();

        let origin = state.center();
        let disp = solver.run(&mut state, Vec3::new(0.0, 30.0, 0.0), origin, Pass::Vertical);

        assert_eq!(state.vertical_velocity.world, Vec3::ZERO);
        // Head stops at the ceiling: at most 0.2 of upward travel.
        assert!(disp.y <= 0.2 + 1e-3, "disp={disp:?}");
    }

    #[test]
    fn test_zero_bounce_budget_discards_motion() {
        let config = CharacterConfig {
            max_bounces: 0,
            ..Default::default()
        };
        let world = flat_world();
        let solver = Solver {
            world: &world,
            config: &config,
            dt: DT,
        };
        let mut state = state_on_floor(&config);
        state.begin_tick_contacts();

        let origin = state.center();
        let disp = solver.run(&mut state, Vec3::new(4.0, 0.0, 0.0), origin, Pass::Horizontal);
        assert_eq!(disp, Vec3::ZERO);
    }

    #[test]
    fn test_walkable_slope_counts_as_ground() {
        let config = CharacterConfig::default();
        let mut world = CollisionWorld::new();
        // 30 degree ramp.
        world.add_oriented_box(
            Vec3::new(0.0, -0.5, 0.0),
            Vec3::new(20.0, 0.5, 20.0),
            glam::Quat::from_rotation_z(30f32.to_radians()),
            Layers::GROUND,
        );

        let solver = Solver {
            world: &world,
            config: &config,
            dt: DT,
        };
        let mut state = CharacterState::new(Vec3::new(0.0, 0.5, 0.0), &config);
        state.begin_tick_contacts();

        let origin = state.center();
        solver.run(&mut state, Vec3::new(0.0, -30.0, 0.0), origin, Pass::Vertical);
        assert!(state.grounded.get());
        let angle = Vec3::Y.angle_between(state.ground_normal).to_degrees();
        assert!((angle - 30.0).abs() < 1.0, "angle={angle}");
    }
}
