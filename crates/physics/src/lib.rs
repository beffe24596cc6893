//! Strider Physics
//!
//! A deterministic kinematic character controller built around a
//! collide-and-slide capsule solver, designed for fixed-tick simulation.
//!
//! # Architecture
//!
//! The crate is split into two main systems:
//!
//! - **Collision**: sweeps capsules, spheres, and rays through the world,
//!   returning hit information
//! - **Movement**: uses collision sweeps to implement character movement
//!
//! # Design Principles
//!
//! 1. **Determinism**: same inputs always produce the same displacement
//! 2. **Simplicity**: clean APIs over micro-optimizations
//! 3. **Accuracy**: proper capsule collision for smooth movement
//! 4. **Performance**: efficient enough for 60Hz simulation

pub mod collision;
pub mod movement;

// Re-export commonly used types
pub use collision::{CollisionWorld, Layers, RayHit, SweepResult, SweepShape};
pub use movement::{
    CharacterConfig, CharacterController, CharacterState, ConfigError, ForceMode, GravityConfig,
    MoveInput,
};
