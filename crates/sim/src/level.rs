//! Level geometry and layout.
//!
//! A level owns the collision world the characters move through, plus
//! gameplay annotations that live outside the solver: spawn points,
//! trigger zones, and the animation curves for moving platforms.

use glam::Vec3;
use serde::{Deserialize, Serialize};
use strider_physics::{CollisionWorld, Layers};

/// A complete level.
pub struct Level {
    /// Level identifier.
    pub id: String,

    /// Display name.
    pub name: String,

    /// Collision geometry.
    pub collision: CollisionWorld,

    /// Character spawn points (feet positions).
    pub spawn_points: Vec<SpawnPoint>,

    /// Trigger zones checked against character positions each tick.
    pub triggers: Vec<TriggerZone>,

    /// Moving platform animations.
    pub platforms: Vec<PlatformMover>,
}

/// A character spawn location.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpawnPoint {
    pub position: Vec3,
    /// Facing direction in radians (0 = -Z).
    pub yaw: f32,
}

/// An axis-aligned zone that fires gameplay events on overlap.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TriggerZone {
    pub id: String,
    pub min: Vec3,
    pub max: Vec3,
}

impl TriggerZone {
    /// Check if a point is inside the zone.
    pub fn contains(&self, point: Vec3) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y
            && point.z >= self.min.z
            && point.z <= self.max.z
    }
}

/// Sinusoidal back-and-forth animation for one platform brush.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlatformMover {
    /// Brush id inside the collision world.
    pub brush: u32,
    /// Center of the travel path.
    pub origin: Vec3,
    /// Unit travel direction.
    pub axis: Vec3,
    /// Half travel distance (meters).
    pub amplitude: f32,
    /// Full back-and-forth cycle time (seconds).
    pub period: f32,
}

impl PlatformMover {
    /// Platform center at the given simulation time.
    pub fn position_at(&self, time: f32) -> Vec3 {
        let phase = time * std::f32::consts::TAU / self.period;
        self.origin + self.axis * (phase.sin() * self.amplitude)
    }
}

impl Level {
    /// Create an empty level.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            collision: CollisionWorld::new(),
            spawn_points: Vec::new(),
            triggers: Vec::new(),
            platforms: Vec::new(),
        }
    }

    /// Reposition every moving platform for the given simulation time.
    /// Runs before character updates so platform contacts see this tick's
    /// positions.
    pub fn update_platforms(&mut self, time: f32) {
        for mover in &self.platforms {
            self.collision
                .set_brush_position(mover.brush, mover.position_at(time));
        }
    }

    /// Check which trigger zones contain the given position.
    pub fn zones_containing(&self, position: Vec3) -> Vec<&str> {
        self.triggers
            .iter()
            .filter(|t| t.contains(position))
            .map(|t| t.id.as_str())
            .collect()
    }

    /// Build the test arena: a walled floor with a pillar, a staircase,
    /// a ramp, a pit with a moving platform across it, and a goal zone.
    pub fn test_arena() -> Self {
        let mut level = Self::new("test_arena", "Test Arena");
        let world = &mut level.collision;

        // Floor, 60x60 centered at origin.
        world.add_box(
            Vec3::new(0.0, -0.5, 0.0),
            Vec3::new(30.0, 0.5, 30.0),
            Layers::GROUND,
        );

        // Perimeter walls, 4m tall.
        world.add_box(
            Vec3::new(0.0, 2.0, -30.0),
            Vec3::new(30.0, 2.0, 0.5),
            Layers::GROUND,
        );
        world.add_box(
            Vec3::new(0.0, 2.0, 30.0),
            Vec3::new(30.0, 2.0, 0.5),
            Layers::GROUND,
        );
        world.add_box(
            Vec3::new(-30.0, 2.0, 0.0),
            Vec3::new(0.5, 2.0, 30.0),
            Layers::GROUND,
        );
        world.add_box(
            Vec3::new(30.0, 2.0, 0.0),
            Vec3::new(0.5, 2.0, 30.0),
            Layers::GROUND,
        );

        // Central pillar.
        world.add_box(
            Vec3::new(0.0, 2.0, 0.0),
            Vec3::new(1.0, 2.0, 1.0),
            Layers::GROUND,
        );

        // Staircase of 0.3m risers climbing toward -Z.
        for i in 0..4 {
            let step = i as f32;
            world.add_box(
                Vec3::new(8.0, 0.15 + step * 0.3, -10.0 - step * 1.0),
                Vec3::new(2.0, 0.15 + step * 0.3, 0.5),
                Layers::GROUND,
            );
        }

        // 30 degree ramp up to a ledge on the -X side.
        world.add_oriented_box(
            Vec3::new(-12.0, 0.0, 8.0),
            Vec3::new(4.0, 0.5, 3.0),
            glam::Quat::from_rotation_z(30f32.to_radians()),
            Layers::GROUND,
        );
        world.add_box(
            Vec3::new(-18.0, 1.25, 8.0),
            Vec3::new(3.0, 1.25, 3.0),
            Layers::GROUND,
        );

        // Pit in the +Z quadrant, spanned by a moving platform.
        let platform = world.add_platform(Vec3::new(12.0, 0.25, 14.0), Vec3::new(1.5, 0.25, 1.5));
        level.platforms.push(PlatformMover {
            brush: platform,
            origin: Vec3::new(12.0, 0.25, 14.0),
            axis: Vec3::X,
            amplitude: 4.0,
            period: 8.0,
        });

        // Goal zone on top of the ledge.
        level.triggers.push(TriggerZone {
            id: "goal".into(),
            min: Vec3::new(-21.0, 2.5, 5.0),
            max: Vec3::new(-15.0, 5.5, 11.0),
        });

        level.spawn_points.push(SpawnPoint {
            position: Vec3::new(0.0, 1.0, 20.0),
            yaw: 0.0,
        });
        level.spawn_points.push(SpawnPoint {
            position: Vec3::new(-10.0, 1.0, -10.0),
            yaw: std::f32::consts::PI,
        });

        level
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arena_has_geometry() {
        let level = Level::test_arena();
        assert!(level.collision.brush_count() > 10);
        assert_eq!(level.spawn_points.len(), 2);
        assert_eq!(level.platforms.len(), 1);
    }

    #[test]
    fn test_platform_mover_cycle() {
        let mover = PlatformMover {
            brush: 0,
            origin: Vec3::ZERO,
            axis: Vec3::X,
            amplitude: 4.0,
            period: 8.0,
        };

        assert!(mover.position_at(0.0).length() < 1e-5);
        // Quarter period sits at full amplitude.
        assert!((mover.position_at(2.0).x - 4.0).abs() < 1e-4);
        // Full period returns to origin.
        assert!(mover.position_at(8.0).length() < 1e-3);
    }

    #[test]
    fn test_update_platforms_moves_brush() {
        let mut level = Level::test_arena();
        let mover = level.platforms[0].clone();

        level.update_platforms(2.0);
        let pos = level
            .collision
            .brush_position(mover.brush)
            .expect("platform brush exists");
        assert!((pos - mover.position_at(2.0)).length() < 1e-5);
    }

    #[test]
    fn test_trigger_zone_contains() {
        let level = Level::test_arena();
        assert_eq!(
            level.zones_containing(Vec3::new(-18.0, 3.0, 8.0)),
            vec!["goal"]
        );
        assert!(level.zones_containing(Vec3::new(0.0, 1.0, 20.0)).is_empty());
    }
}
