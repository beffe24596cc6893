//! Collision queries for character movement.
//!
//! This module provides the read-only geometric environment the solver
//! sweeps the character capsule through.
//!
//! # Key Types
//!
//! - [`CollisionWorld`]: the environment containing all brushes
//! - [`SweepShape`]: shape used for sweeps (capsule or sphere)
//! - [`SweepResult`]: output of a shape sweep that hit something
//! - [`Layers`]: bit-set filtering which brushes a query can see
//!
//! Sweeps report the travel distance before impact, the contact point and
//! surface normal, and whether the hit brush is a trigger volume or a
//! movable platform.

mod layers;
mod sweep;
mod world;

pub use layers::Layers;
pub use sweep::{RayHit, SweepResult, SweepShape};
pub use world::CollisionWorld;
