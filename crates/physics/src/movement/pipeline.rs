//! The move channel's coordinate pipeline.
//!
//! Input axes pass through three transforms each tick: object space
//! applies speed, mode multipliers, and smoothing; tangent space orients
//! by the facing basis; world space redirects along the ground slope so
//! slopes neither slow down nor speed up movement.

use glam::{Vec2, Vec3};

use super::config::{CharacterConfig, SpeedControl};

/// Residual below which exponential smoothing snaps to the target.
const SPEED_SNAP_EPSILON: f32 = 1e-3;

/// Advance the object-space velocity toward the input target.
///
/// `multiplier` is the resolved mode multiplier (crouch/sprint). The
/// current object-space velocity persists across ticks so Linear and
/// Exponential control have a baseline to integrate from.
pub fn object_space(
    input: Vec2,
    current: Vec3,
    multiplier: f32,
    config: &CharacterConfig,
    dt: f32,
) -> Vec3 {
    let target = Vec3::new(input.x, 0.0, input.y) * config.move_speed * multiplier;

    match config.speed_control {
        SpeedControl::Constant => target,
        SpeedControl::Linear => {
            let residual = target - current;
            let step = config.move_acceleration * dt;
            if residual.length() <= step {
                target
            } else {
                current + residual.normalize() * step
            }
        }
        SpeedControl::Exponential => {
            let next = current + (target - current) * config.move_damp * dt;
            if (target - next).length() < SPEED_SNAP_EPSILON {
                target
            } else {
                next
            }
        }
    }
}

/// Orient object-space velocity by the facing basis. Object-space x is
/// strafe, z is forward; the vertical component never carries move speed.
pub fn tangent_space(object: Vec3, right: Vec3, forward: Vec3) -> Vec3 {
    object.x * right + object.z * forward
}

/// Redirect tangent-space velocity along the ground plane, preserving
/// magnitude.
///
/// Ungrounded movement passes through unchanged. The redirection slides
/// the vector along the up axis onto the contact plane; when the ground
/// normal is perpendicular to up the slide has no solution and the
/// vector passes through unchanged.
pub fn world_space(tangent: Vec3, ground_normal: Vec3, up: Vec3, grounded: bool) -> Vec3 {
    if !grounded || tangent == Vec3::ZERO {
        return tangent;
    }

    let denom = ground_normal.dot(up);
    if denom.abs() < 1e-6 {
        return tangent;
    }

    let onto_plane = tangent - ground_normal.dot(tangent) / denom * up;
    let dir = onto_plane.normalize_or_zero();
    if dir == Vec3::ZERO {
        return tangent;
    }

    dir * tangent.length()
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 60.0;

    #[test]
    fn test_constant_control_snaps() {
        let config = CharacterConfig::default();
        let os = object_space(Vec2::new(0.0, 1.0), Vec3::ZERO, 1.0, &config, DT);
        assert!((os - Vec3::new(0.0, 0.0, config.move_speed)).length() < 1e-6);
    }

    #[test]
    fn test_linear_control_ramps_and_snaps() {
        let config = CharacterConfig {
            speed_control: SpeedControl::Linear,
            ..Default::default()
        };
        let target = config.move_speed;
        let step = config.move_acceleration * DT;

        let os = object_space(Vec2::new(0.0, 1.0), Vec3::ZERO, 1.0, &config, DT);
        assert!((os.z - step).abs() < 1e-5);

        // Within one step of the target: snap exactly.
        let near = Vec3::new(0.0, 0.0, target - step * 0.5);
        let os = object_space(Vec2::new(0.0, 1.0), near, 1.0, &config, DT);
        assert_eq!(os.z, target);
    }

    #[test]
    fn test_exponential_control_converges() {
        let config = CharacterConfig {
            speed_control: SpeedControl::Exponential,
            ..Default::default()
        };

        let mut os = Vec3::ZERO;
        for _ in 0..600 {
            os = object_space(Vec2::new(0.0, 1.0), os, 1.0, &config, DT);
        }
        assert_eq!(os.z, config.move_speed, "must snap, not asymptote");
    }

    #[test]
    fn test_mode_multiplier_scales_target() {
        let config = CharacterConfig::default();
        let mult = config.mode_multiplier(true, true);
        let os = object_space(Vec2::new(0.0, 1.0), Vec3::ZERO, mult, &config, DT);
        assert!((os.z - config.move_speed * config.crouch_multiplier).abs() < 1e-6);
    }

    #[test]
    fn test_tangent_space_uses_basis() {
        let ts = tangent_space(Vec3::new(0.0, 0.0, 4.0), Vec3::X, Vec3::NEG_Z);
        assert!((ts - Vec3::new(0.0, 0.0, -4.0)).length() < 1e-6);

        let ts = tangent_space(Vec3::new(2.0, 0.0, 0.0), Vec3::X, Vec3::NEG_Z);
        assert!((ts - Vec3::new(2.0, 0.0, 0.0)).length() < 1e-6);
    }

    #[test]
    fn test_world_space_preserves_magnitude_on_slope() {
        // 45 degree slope facing +x.
        let normal = Vec3::new(-1.0, 1.0, 0.0).normalize();
        let ts = Vec3::new(3.0, 0.0, 0.0);

        let ws = world_space(ts, normal, Vec3::Y, true);
        assert!((ws.length() - ts.length()).abs() < 1e-5);
        assert!(ws.dot(normal).abs() < 1e-5, "must lie in the slope plane");
        assert!(ws.y > 0.0, "uphill movement points up the slope");
    }

    #[test]
    fn test_world_space_flat_ground_identity() {
        let ts = Vec3::new(1.0, 0.0, 2.0);
        let ws = world_space(ts, Vec3::Y, Vec3::Y, true);
        assert!((ws - ts).length() < 1e-6);
    }

    #[test]
    fn test_world_space_airborne_passthrough() {
        let normal = Vec3::new(-1.0, 1.0, 0.0).normalize();
        let ts = Vec3::new(3.0, 0.0, 0.0);
        let ws = world_space(ts, normal, Vec3::Y, false);
        assert_eq!(ws, ts);
    }

    #[test]
    fn test_world_space_degenerate_normal() {
        // Ground normal perpendicular to up: no redirection possible.
        let ts = Vec3::new(1.0, 0.0, 0.0);
        let ws = world_space(ts, Vec3::X, Vec3::Y, true);
        assert_eq!(ws, ts);
    }
}
