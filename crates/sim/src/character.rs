//! A simulated character: solver state plus view angles.

use glam::Vec3;
use strider_physics::CharacterState;

/// Entity identifier.
pub type EntityId = u64;

/// One character in the simulation.
pub struct Character {
    pub id: EntityId,
    pub name: String,

    /// Physics state owned by the character controller.
    pub state: CharacterState,

    /// View yaw in radians (0 = -Z, increasing turns right).
    pub yaw: f32,

    /// View pitch in radians, clamped to avoid gimbal flip.
    pub pitch: f32,
}

const MAX_PITCH: f32 = 1.55;

impl Character {
    pub fn new(id: EntityId, name: impl Into<String>, state: CharacterState, yaw: f32) -> Self {
        Self {
            id,
            name: name.into(),
            state,
            yaw,
            pitch: 0.0,
        }
    }

    /// Feet position.
    pub fn position(&self) -> Vec3 {
        self.state.position
    }

    /// Apply a view delta and refresh the movement basis. Pitch affects
    /// only the camera; movement stays planar.
    pub fn apply_view(&mut self, delta_pitch: f32, delta_yaw: f32) {
        self.yaw += delta_yaw;
        self.pitch = (self.pitch + delta_pitch).clamp(-MAX_PITCH, MAX_PITCH);
        self.state.set_view_direction(self.view_direction());
    }

    /// Camera look direction.
    pub fn view_direction(&self) -> Vec3 {
        let (sin_yaw, cos_yaw) = self.yaw.sin_cos();
        let (sin_pitch, cos_pitch) = self.pitch.sin_cos();
        Vec3::new(sin_yaw * cos_pitch, sin_pitch, -cos_yaw * cos_pitch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strider_physics::CharacterConfig;

    fn test_character() -> Character {
        let config = CharacterConfig::default();
        let state = CharacterState::new(Vec3::ZERO, &config);
        Character::new(1, "tester", state, 0.0)
    }

    #[test]
    fn test_default_view_faces_neg_z() {
        let c = test_character();
        assert!((c.view_direction() - Vec3::NEG_Z).length() < 1e-6);
    }

    #[test]
    fn test_yaw_quarter_turn_faces_pos_x() {
        let mut c = test_character();
        c.apply_view(0.0, std::f32::consts::FRAC_PI_2);
        assert!((c.view_direction() - Vec3::X).length() < 1e-5);
        assert!((c.state.forward - Vec3::X).length() < 1e-5);
    }

    #[test]
    fn test_pitch_clamped_and_planar_basis() {
        let mut c = test_character();
        c.apply_view(10.0, 0.0);
        assert!(c.pitch <= MAX_PITCH);
        // Movement basis ignores pitch.
        assert!(c.state.forward.y.abs() < 1e-6);
    }
}
