//! Kinematic character movement.
//!
//! A collide-and-slide capsule solver with two velocity channels:
//!
//! - the move channel, driven by input through object, tangent, and
//!   world space transforms
//! - the vertical channel, driven by jumping and gravity
//!
//! Each tick the [`CharacterController`] advances both channels, sweeps
//! them through the collision world as separate passes, and maintains
//! grounding, step handling, and external forces.
//!
//! All movement is deterministic - the same inputs against the same
//! world always produce the same displacement.

mod config;
mod controller;
mod external;
mod gravity;
mod jump;
mod pipeline;
mod slide;
mod state;
mod stateful;
mod step;

pub use config::{CharacterConfig, ConfigError, SpeedControl};
pub use controller::CharacterController;
pub use external::{ExternalForceState, ForceMode, PlatformContact};
pub use gravity::{GravityBand, GravityConfig};
pub use jump::JumpState;
pub use slide::{Pass, Solver};
pub use state::{CharacterState, MoveInput, MoveVelocity, VerticalVelocity};
pub use stateful::Stateful;
