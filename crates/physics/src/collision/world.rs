//! Collision world containing the static and kinematic geometry the
//! character moves against.
//!
//! The world is a flat list of brushes queried with shape casts. Static
//! geometry never changes after construction; platform brushes may be
//! repositioned between ticks by the host, which is what makes them
//! "kinematic" from the solver's point of view.

use glam::{Quat, Vec3};
use parry3d::math::{Isometry, Point, Real, Vector};
use parry3d::na::{Quaternion, Translation3, Unit, UnitQuaternion};
use parry3d::query::{cast_shapes, intersection_test, Ray, ShapeCastOptions};
use parry3d::shape::{Capsule, SharedShape};

use super::layers::Layers;
use super::sweep::{RayHit, SweepResult, SweepShape};

fn to_point(v: Vec3) -> Point<Real> {
    Point::new(v.x, v.y, v.z)
}

fn to_vector(v: Vec3) -> Vector<Real> {
    Vector::new(v.x, v.y, v.z)
}

fn from_point(p: Point<Real>) -> Vec3 {
    Vec3::new(p.x, p.y, p.z)
}

fn to_isometry(translation: Vec3, rotation: Quat) -> Isometry<Real> {
    Isometry::from_parts(
        Translation3::new(translation.x, translation.y, translation.z),
        UnitQuaternion::from_quaternion(Quaternion::new(
            rotation.w, rotation.x, rotation.y, rotation.z,
        )),
    )
}

/// A piece of collision geometry.
#[derive(Clone)]
pub struct Brush {
    /// Unique identifier.
    pub id: u32,
    /// The collision shape.
    pub shape: SharedShape,
    /// Position and orientation in world space.
    pub transform: Isometry<Real>,
    /// Layer set for query filtering.
    pub layers: Layers,
}

impl std::fmt::Debug for Brush {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Brush")
            .field("id", &self.id)
            .field("layers", &self.layers)
            .finish()
    }
}

/// The collision world.
///
/// All queries are read-only; the only mutation after construction is
/// repositioning platform brushes between ticks.
#[derive(Debug, Default)]
pub struct CollisionWorld {
    brushes: Vec<Brush>,
    next_id: u32,
}

impl CollisionWorld {
    /// Create an empty world.
    pub fn new() -> Self {
        Self {
            brushes: Vec::new(),
            next_id: 0,
        }
    }

    /// Add an axis-aligned box brush.
    pub fn add_box(&mut self, center: Vec3, half_extents: Vec3, layers: Layers) -> u32 {
        self.add_oriented_box(center, half_extents, Quat::IDENTITY, layers)
    }

    /// Add an oriented box brush. Rotated boxes are how slopes and ramps
    /// are authored in test arenas.
    pub fn add_oriented_box(
        &mut self,
        center: Vec3,
        half_extents: Vec3,
        rotation: Quat,
        layers: Layers,
    ) -> u32 {
        let id = self.next_id;
        self.next_id += 1;

        self.brushes.push(Brush {
            id,
            shape: SharedShape::cuboid(half_extents.x, half_extents.y, half_extents.z),
            transform: to_isometry(center, rotation),
            layers,
        });

        id
    }

    /// Add a movable platform brush. Returns the id used to reposition it
    /// and to match `SweepResult::platform`.
    pub fn add_platform(&mut self, center: Vec3, half_extents: Vec3) -> u32 {
        self.add_box(center, half_extents, Layers::PLATFORM)
    }

    /// Add a pass-through trigger volume.
    pub fn add_trigger(&mut self, center: Vec3, half_extents: Vec3) -> u32 {
        self.add_box(center, half_extents, Layers::TRIGGER)
    }

    /// Reposition a brush (platform animation). Returns false if the id is
    /// unknown.
    pub fn set_brush_position(&mut self, id: u32, center: Vec3) -> bool {
        if let Some(brush) = self.brushes.iter_mut().find(|b| b.id == id) {
            brush.transform.translation = Translation3::new(center.x, center.y, center.z);
            true
        } else {
            false
        }
    }

    /// Current position of a brush, if it still exists. Platform contact
    /// state is re-resolved through this every tick; a platform that was
    /// removed simply stops contributing motion.
    pub fn brush_position(&self, id: u32) -> Option<Vec3> {
        self.brushes.iter().find(|b| b.id == id).map(|b| {
            let t = b.transform.translation;
            Vec3::new(t.x, t.y, t.z)
        })
    }

    /// Number of brushes in the world.
    pub fn brush_count(&self) -> usize {
        self.brushes.len()
    }

    /// Sweep a shape from `origin` along `dir` (unit length) for up to
    /// `max_dist`, returning the nearest hit among brushes matching `mask`.
    pub fn sweep(
        &self,
        shape: SweepShape,
        origin: Vec3,
        dir: Vec3,
        max_dist: f32,
        mask: Layers,
    ) -> Option<SweepResult> {
        if dir.length_squared() < 1e-12 || max_dist <= 0.0 {
            return None;
        }

        let (cast_shape, cast_pos) = self.parry_shape(shape, origin);
        let vel = to_vector(dir);
        let options = ShapeCastOptions {
            max_time_of_impact: max_dist,
            target_distance: 0.0,
            stop_at_penetration: true,
            compute_impact_geometry_on_penetration: true,
        };

        let mut nearest: Option<SweepResult> = None;

        for brush in &self.brushes {
            if !mask.intersects(brush.layers) {
                continue;
            }

            let hit = match cast_shapes(
                &cast_pos,
                &vel,
                cast_shape.as_ref(),
                &brush.transform,
                &Vector::zeros(),
                brush.shape.as_ref(),
                options,
            ) {
                Ok(Some(hit)) => hit,
                _ => continue,
            };

            let closer = nearest
                .as_ref()
                .map_or(true, |n| hit.time_of_impact < n.distance);
            if !closer {
                continue;
            }

            // Witness point and normal come back in the brush's local
            // frame; lift them to world space.
            let point = brush.transform.transform_point(&hit.witness2);
            let normal: Unit<Vector<Real>> = brush.transform * hit.normal2;

            nearest = Some(SweepResult {
                distance: hit.time_of_impact,
                point: from_point(point),
                normal: Vec3::new(normal.x, normal.y, normal.z),
                is_trigger: brush.layers.intersects(Layers::TRIGGER),
                platform: brush
                    .layers
                    .intersects(Layers::PLATFORM)
                    .then_some(brush.id),
            });
        }

        nearest
    }

    /// Cast a ray, returning the nearest hit among brushes matching `mask`.
    pub fn raycast(
        &self,
        origin: Vec3,
        dir: Vec3,
        max_dist: f32,
        mask: Layers,
    ) -> Option<RayHit> {
        let dir = dir.normalize_or_zero();
        if dir == Vec3::ZERO {
            return None;
        }

        let ray = Ray::new(to_point(origin), to_vector(dir));
        let mut nearest: Option<RayHit> = None;

        for brush in &self.brushes {
            if !mask.intersects(brush.layers) {
                continue;
            }

            if let Some(hit) =
                brush
                    .shape
                    .cast_ray_and_get_normal(&brush.transform, &ray, max_dist, true)
            {
                let closer = nearest
                    .as_ref()
                    .map_or(true, |n| hit.time_of_impact < n.distance);
                if closer {
                    nearest = Some(RayHit {
                        distance: hit.time_of_impact,
                        point: origin + dir * hit.time_of_impact,
                        normal: Vec3::new(hit.normal.x, hit.normal.y, hit.normal.z),
                        layers: brush.layers,
                    });
                }
            }
        }

        nearest
    }

    /// Check whether a shape placed at `origin` overlaps any brush
    /// matching `mask`.
    pub fn overlaps(&self, shape: SweepShape, origin: Vec3, mask: Layers) -> bool {
        let (test_shape, test_pos) = self.parry_shape(shape, origin);

        for brush in &self.brushes {
            if !mask.intersects(brush.layers) {
                continue;
            }

            if let Ok(true) = intersection_test(
                &test_pos,
                test_shape.as_ref(),
                &brush.transform,
                brush.shape.as_ref(),
            ) {
                return true;
            }
        }

        false
    }

    fn parry_shape(&self, shape: SweepShape, origin: Vec3) -> (SharedShape, Isometry<Real>) {
        let iso = Isometry::translation(origin.x, origin.y, origin.z);
        let shape = match shape {
            SweepShape::Capsule { a, b, radius } => {
                SharedShape::new(Capsule::new(to_point(a), to_point(b), radius))
            }
            SweepShape::Sphere { radius } => SharedShape::ball(radius),
        };
        (shape, iso)
    }
}
