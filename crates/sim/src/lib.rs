//! Strider Sim
//!
//! A fixed-tick simulation harness around the `strider-physics` character
//! solver: a test arena, raw input mapping, and a deterministic tick loop
//! hosting any number of characters.

pub mod character;
pub mod input;
pub mod level;
pub mod simulation;

pub use character::{Character, EntityId};
pub use input::{ActionInput, MovementInput, PlayerInput};
pub use level::{Level, PlatformMover, SpawnPoint, TriggerZone};
pub use simulation::{Simulation, SimulationConfig};
