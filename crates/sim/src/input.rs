//! Player input handling.
//!
//! Converts raw per-frame input (keyboard, mouse, gamepad) into the
//! movement axes the physics solver consumes.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use strider_physics::MoveInput;

/// Raw player input for a single frame.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlayerInput {
    /// Movement keys pressed.
    pub movement: MovementInput,

    /// Mouse delta this frame (pixels).
    pub mouse_delta: (f32, f32),

    /// Action buttons pressed.
    pub actions: ActionInput,

    /// Frame number this input was generated.
    pub frame: u32,
}

/// Movement key states.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct MovementInput {
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
}

/// Action button states.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ActionInput {
    pub jump: bool,
    pub crouch: bool,
    pub sprint: bool,
}

impl PlayerInput {
    /// Convert to solver movement axes. Diagonal key combinations are
    /// normalized so they carry no speed advantage.
    pub fn to_move_input(&self) -> MoveInput {
        let mut dir = Vec2::ZERO;
        if self.movement.forward {
            dir.y += 1.0;
        }
        if self.movement.backward {
            dir.y -= 1.0;
        }
        if self.movement.right {
            dir.x += 1.0;
        }
        if self.movement.left {
            dir.x -= 1.0;
        }
        if dir.length_squared() > 1.0 {
            dir = dir.normalize();
        }

        MoveInput {
            move_dir: dir,
            jump: if self.actions.jump { 1.0 } else { 0.0 },
            crouch: if self.actions.crouch { 1.0 } else { 0.0 },
            sprint: if self.actions.sprint { 1.0 } else { 0.0 },
        }
    }

    /// View angle delta in radians: `(pitch, yaw)`.
    pub fn view_delta(&self, mouse_sensitivity: f32) -> (f32, f32) {
        let sensitivity_radians = mouse_sensitivity * 0.001;
        (
            -self.mouse_delta.1 * sensitivity_radians,
            self.mouse_delta.0 * sensitivity_radians,
        )
    }

    /// Check if any movement input is active.
    pub fn has_movement(&self) -> bool {
        self.movement.forward
            || self.movement.backward
            || self.movement.left
            || self.movement.right
    }
}
