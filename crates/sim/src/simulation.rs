//! Fixed-tick simulation.
//!
//! Owns the level, the characters, and the shared character controller,
//! and advances them all at a fixed rate. Given the same input sequence,
//! two simulations produce identical results.

use serde::{Deserialize, Serialize};
use strider_physics::{CharacterController, CharacterConfig, CharacterState, ConfigError};

use crate::character::{Character, EntityId};
use crate::input::PlayerInput;
use crate::level::Level;

/// Simulation tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Fixed ticks per second.
    pub tick_rate: u32,

    /// Character movement tuning shared by all characters.
    pub character: CharacterConfig,

    /// Mouse sensitivity multiplier.
    pub mouse_sensitivity: f32,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            tick_rate: 60,
            character: CharacterConfig::default(),
            mouse_sensitivity: 2.0,
        }
    }
}

impl SimulationConfig {
    /// Seconds per tick.
    pub fn delta_time(&self) -> f32 {
        1.0 / self.tick_rate as f32
    }
}

/// The simulation world.
pub struct Simulation {
    /// Current tick number.
    pub frame: u64,

    pub config: SimulationConfig,
    pub level: Level,
    pub characters: Vec<Character>,

    controller: CharacterController,
    next_entity_id: EntityId,
}

impl Simulation {
    pub fn new(level: Level, config: SimulationConfig) -> Result<Self, ConfigError> {
        let controller = CharacterController::new(config.character.clone())?;

        Ok(Self {
            frame: 0,
            config,
            level,
            characters: Vec::new(),
            controller,
            next_entity_id: 1,
        })
    }

    /// Spawn a character at the next spawn point (round-robin).
    pub fn add_character(&mut self, name: impl Into<String>) -> EntityId {
        let id = self.next_entity_id;
        self.next_entity_id += 1;

        let spawn = if self.level.spawn_points.is_empty() {
            crate::level::SpawnPoint {
                position: glam::Vec3::Y,
                yaw: 0.0,
            }
        } else {
            let index = self.characters.len() % self.level.spawn_points.len();
            self.level.spawn_points[index].clone()
        };

        let state = self.controller.spawn_at(&self.level.collision, spawn.position);
        let mut character = Character::new(id, name, state, spawn.yaw);
        character.apply_view(0.0, 0.0);

        log::info!(
            "spawned character {} ({}) at {:?}",
            character.name,
            id,
            character.position()
        );

        self.characters.push(character);
        id
    }

    pub fn character(&self, id: EntityId) -> Option<&Character> {
        self.characters.iter().find(|c| c.id == id)
    }

    pub fn character_mut(&mut self, id: EntityId) -> Option<&mut Character> {
        self.characters.iter_mut().find(|c| c.id == id)
    }

    /// Borrow a character's physics state, for host-driven forces and
    /// teleports through the controller.
    pub fn character_state_mut(&mut self, id: EntityId) -> Option<&mut CharacterState> {
        self.characters
            .iter_mut()
            .find(|c| c.id == id)
            .map(|c| &mut c.state)
    }

    pub fn controller(&mut self) -> &mut CharacterController {
        &mut self.controller
    }

    /// Current simulation time in seconds.
    pub fn time(&self) -> f32 {
        self.frame as f32 * self.config.delta_time()
    }

    /// Advance one tick. `inputs` pairs with `characters` by index;
    /// missing entries get neutral input.
    pub fn tick(&mut self, inputs: &[PlayerInput]) {
        let dt = self.config.delta_time();

        // Platforms move first so character contacts see this tick's
        // positions.
        self.level.update_platforms(self.time());

        for (index, character) in self.characters.iter_mut().enumerate() {
            let input = inputs.get(index).cloned().unwrap_or_default();

            let (pitch, yaw) = input.view_delta(self.config.mouse_sensitivity);
            character.apply_view(pitch, yaw);

            self.controller.update(
                &mut character.state,
                &self.level.collision,
                input.to_move_input(),
                dt,
            );

            for zone in self.level.zones_containing(character.position()) {
                log::debug!("character {} in zone {zone}", character.id);
            }
        }

        self.frame += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::Level;

    fn test_sim() -> Simulation {
        let mut sim =
            Simulation::new(Level::test_arena(), SimulationConfig::default()).unwrap();
        sim.add_character("p1");
        sim
    }

    fn forward_input() -> PlayerInput {
        let mut input = PlayerInput::default();
        input.movement.forward = true;
        input
    }

    #[test]
    fn test_spawn_settles_on_floor() {
        let sim = test_sim();
        let c = sim.character(1).expect("character exists");
        // Spawn raycast drops the feet just above the floor at y=0.
        assert!(c.position().y >= 0.0 && c.position().y < 0.1);
    }

    #[test]
    fn test_tick_advances_frame() {
        let mut sim = test_sim();
        sim.tick(&[PlayerInput::default()]);
        sim.tick(&[PlayerInput::default()]);
        assert_eq!(sim.frame, 2);
        assert!((sim.time() - 2.0 / 60.0).abs() < 1e-6);
    }

    #[test]
    fn test_idle_character_stays_put() {
        let mut sim = test_sim();
        let start = sim.character(1).unwrap().position();

        for _ in 0..120 {
            sim.tick(&[PlayerInput::default()]);
        }

        let end = sim.character(1).unwrap().position();
        assert!((end - start).length() < 0.05, "drifted to {end:?}");
    }

    #[test]
    fn test_forward_input_moves_character() {
        let mut sim = test_sim();
        let start = sim.character(1).unwrap().position();

        for _ in 0..60 {
            sim.tick(&[forward_input()]);
        }

        let end = sim.character(1).unwrap().position();
        // Spawn faces -Z; one second at move_speed 4 covers about 4m.
        assert!(start.z - end.z > 3.0, "moved {:?}", end - start);
    }

    #[test]
    fn test_missing_input_is_neutral() {
        let mut sim = test_sim();
        let start = sim.character(1).unwrap().position();

        for _ in 0..60 {
            sim.tick(&[]);
        }

        let end = sim.character(1).unwrap().position();
        assert!((end - start).length() < 0.05);
    }

    #[test]
    fn test_determinism() {
        let script: Vec<PlayerInput> = (0..240u32)
            .map(|frame| {
                let mut input = PlayerInput::default();
                input.frame = frame;
                input.movement.forward = frame % 3 != 0;
                input.movement.left = frame % 7 == 0;
                input.actions.jump = frame % 50 < 2;
                input.actions.sprint = frame > 120;
                input.mouse_delta = (((frame % 11) as f32) - 5.0, 0.0);
                input
            })
            .collect();

        let mut run = || {
            let mut sim = test_sim();
            for input in &script {
                sim.tick(std::slice::from_ref(input));
            }
            sim.character(1).unwrap().position()
        };

        let a = run();
        let b = run();
        assert_eq!(a, b, "same inputs must produce identical positions");
    }
}
