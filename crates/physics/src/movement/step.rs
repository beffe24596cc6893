//! Step-up and step-down probes.
//!
//! Both probes run inside the slide solver. The up-step probe fires on a
//! horizontal wall contact and looks for a climbable ledge behind the
//! wall face; the down-step probe fires when the vertical pass finds no
//! ground and looks for a floor close enough below to settle onto
//! instead of going airborne.

use glam::Vec3;

use crate::collision::{CollisionWorld, Layers, SweepShape};

use super::config::CharacterConfig;

/// Clearance margin past the capsule radius for the obstruction ray.
const PROBE_MARGIN: f32 = 0.1;

/// Capsule geometry snapshot the probes work against.
#[derive(Debug, Clone, Copy)]
pub struct ProbeCapsule {
    /// Capsule center, world space.
    pub center: Vec3,
    pub height: f32,
    pub radius: f32,
    pub up: Vec3,
}

impl ProbeCapsule {
    /// Offset from center to a sphere-end center along up.
    fn end_offset(&self) -> Vec3 {
        (self.height * 0.5 - self.radius).max(0.0) * self.up
    }

    /// Lowest point of the capsule (the feet).
    fn feet(&self) -> Vec3 {
        self.center - self.end_offset() - self.up * self.radius
    }
}

/// Probe a horizontal wall contact for a climbable ledge.
///
/// Three casts must agree before a step is taken:
/// - an obstruction ray at ledge height through the wall face must miss,
/// - a downward ray just behind the face must find a walkable surface,
/// - a downward sphere cast ahead of the motion must find ground within
///   the step height.
///
/// Returns the lift along up that snaps the capsule onto the ledge.
pub fn probe_up_step(
    world: &CollisionWorld,
    config: &CharacterConfig,
    capsule: ProbeCapsule,
    vel: Vec3,
    hit_point: Vec3,
    flat_normal: Vec3,
    mask: Layers,
) -> Option<f32> {
    let up = capsule.up;
    let down = -up;
    let radius = capsule.radius;
    let feet = capsule.feet();
    let step_up = config.max_step_up_height;

    // Ledge-height pivot at the contact's horizontal position.
    let pivot = feet + (hit_point - feet).reject_from(up) + up * step_up;

    // Anything blocking at ledge height means this is a wall, not a step.
    let obstructed = world
        .raycast(
            pivot + flat_normal * radius,
            -flat_normal,
            radius + PROBE_MARGIN,
            mask,
        )
        .is_some();
    if obstructed {
        return None;
    }

    // Surface just behind the face must exist and be walkable.
    let surface = world.raycast(pivot - flat_normal * 0.01, down, step_up + 1.0, mask)?;
    if up.angle_between(surface.normal).to_degrees() > config.max_slope_angle {
        return None;
    }

    // Ground ahead of the motion, within step height of the feet.
    let sphere_origin = feet + vel + (step_up + radius + PROBE_MARGIN) * up;
    let landing = world.sweep(
        SweepShape::Sphere { radius },
        sphere_origin,
        down,
        step_up,
        mask,
    )?;

    let lift = (landing.point + landing.normal * radius + down * radius - feet).dot(up)
        + config.skin_width;
    (lift <= step_up).then_some(lift)
}

/// Probe below the character for a floor to settle onto after losing
/// ground contact.
///
/// The downward ray must find a walkable surface past the capsule's own
/// half-height (a genuine drop), and the clearance sphere cast must miss
/// so the capsule is not still resting on something.
pub fn probe_down_step(
    world: &CollisionWorld,
    config: &CharacterConfig,
    capsule: ProbeCapsule,
    move_step: Vec3,
    mask: Layers,
) -> bool {
    let up = capsule.up;
    let down = -up;
    let half_height = capsule.height * 0.5;
    let probe_pos = capsule.center + move_step;

    let Some(floor) = world.raycast(
        probe_pos,
        down,
        config.max_step_down_height + half_height,
        mask,
    ) else {
        return false;
    };

    if floor.distance <= half_height + config.skin_width {
        return false;
    }
    if up.angle_between(floor.normal).to_degrees() > config.max_slope_angle {
        return false;
    }

    let end_offset = capsule.end_offset();
    let blocked = world
        .sweep(
            SweepShape::Sphere {
                radius: capsule.radius,
            },
            probe_pos + end_offset,
            down,
            end_offset.length() * 2.0,
            mask,
        )
        .is_some();

    !blocked
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    fn capsule_at(center: Vec3) -> ProbeCapsule {
        ProbeCapsule {
            center,
            height: 2.0,
            radius: 0.5,
            up: Vec3::Y,
        }
    }

    #[test]
    fn test_up_step_finds_ledge() {
        let config = CharacterConfig {
            max_step_up_height: 0.5,
            ..Default::default()
        };

        let mut world = CollisionWorld::new();
        // Floor at y=0.
        world.add_box(
            Vec3::new(0.0, -0.5, 0.0),
            Vec3::new(20.0, 0.5, 20.0),
            Layers::GROUND,
        );
        // Step with its face at x=0.8, top at y=0.4.
        world.add_box(
            Vec3::new(1.8, 0.2, 0.0),
            Vec3::new(1.0, 0.2, 2.0),
            Layers::GROUND,
        );

        // Capsule resting against the face, walking into it.
        let capsule = capsule_at(Vec3::new(0.3, 1.0, 0.0));
        let lift = probe_up_step(
            &world,
            &config,
            capsule,
            Vec3::new(0.066, 0.0, 0.0),
            Vec3::new(0.8, 0.2, 0.0),
            Vec3::NEG_X,
            Layers::MASK_WALKABLE,
        );

        let lift = lift.expect("ledge should be climbable");
        assert!(lift > 0.0 && lift < 0.4, "lift={lift}");
    }

    #[test]
    fn test_up_step_rejects_tall_wall() {
        let config = CharacterConfig {
            max_step_up_height: 0.5,
            ..Default::default()
        };

        let mut world = CollisionWorld::new();
        world.add_box(
            Vec3::new(0.0, -0.5, 0.0),
            Vec3::new(20.0, 0.5, 20.0),
            Layers::GROUND,
        );
        // Wall taller than the step height: the obstruction ray hits it.
        world.add_box(
            Vec3::new(1.8, 1.0, 0.0),
            Vec3::new(1.0, 1.0, 2.0),
            Layers::GROUND,
        );

        let capsule = capsule_at(Vec3::new(0.3, 1.0, 0.0));
        let lift = probe_up_step(
            &world,
            &config,
            capsule,
            Vec3::new(0.066, 0.0, 0.0),
            Vec3::new(0.8, 0.5, 0.0),
            Vec3::NEG_X,
            Layers::MASK_WALKABLE,
        );
        assert!(lift.is_none());
    }

    #[test]
    fn test_down_step_finds_lower_floor() {
        let config = CharacterConfig::default();

        let mut world = CollisionWorld::new();
        // Lower floor at y=-0.3 only; the character just walked off the
        // upper ledge.
        world.add_box(
            Vec3::new(0.0, -0.8, 0.0),
            Vec3::new(20.0, 0.5, 20.0),
            Layers::GROUND,
        );

        let capsule = capsule_at(Vec3::new(0.0, 1.0, 0.0));
        assert!(probe_down_step(
            &world,
            &config,
            capsule,
            Vec3::new(0.07, 0.0, 0.0),
            Layers::MASK_WALKABLE,
        ));
    }

    #[test]
    fn test_down_step_rejects_deep_drop() {
        let config = CharacterConfig::default();

        let mut world = CollisionWorld::new();
        // Floor far below the step-down range.
        world.add_box(
            Vec3::new(0.0, -3.0, 0.0),
            Vec3::new(20.0, 0.5, 20.0),
            Layers::GROUND,
        );

        let capsule = capsule_at(Vec3::new(0.0, 1.0, 0.0));
        assert!(!probe_down_step(
            &world,
            &config,
            capsule,
            Vec3::new(0.07, 0.0, 0.0),
            Layers::MASK_WALKABLE,
        ));
    }

    #[test]
    fn test_down_step_rejects_steep_surface() {
        let config = CharacterConfig::default();

        let mut world = CollisionWorld::new();
        // 60 degree surface below the probe, inside step-down range but
        // past the walkable slope limit.
        world.add_oriented_box(
            Vec3::new(0.5, -0.45, 0.0),
            Vec3::new(5.0, 0.5, 5.0),
            glam::Quat::from_rotation_z(60f32.to_radians()),
            Layers::GROUND,
        );

        let capsule = capsule_at(Vec3::new(0.0, 1.0, 0.0));
        assert!(!probe_down_step(
            &world,
            &config,
            capsule,
            Vec3::new(0.07, 0.0, 0.0),
            Layers::MASK_WALKABLE,
        ));
    }
}
