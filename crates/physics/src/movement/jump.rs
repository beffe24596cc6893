//! Jump state machine.
//!
//! Covers the grounded jump, midair jump charges, and the two grace
//! windows: the jump buffer (pressed slightly too early, executes on
//! landing) and coyote time (pressed slightly too late after walking off
//! a ledge, still executes at full height).
//!
//! `jump_speed` and `jump_max_height` are two views of the same tuning
//! knob; whichever one the host edits is reconciled into the other at
//! tick end.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::config::CharacterConfig;
use super::stateful::Stateful;

/// Jump bookkeeping carried across ticks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JumpState {
    /// Midair jumps consumed since last grounded.
    pub air_jumps_used: u32,

    /// Remaining jump-buffer window (seconds). Positive means a jump
    /// press is waiting for a landing.
    pub buffer: f32,

    /// Remaining coyote window (seconds). Positive means a ledge was
    /// left recently enough for a full-height jump.
    pub coyote: f32,

    /// Mirror of `config.jump_speed` for edit detection.
    speed: Stateful<f32>,

    /// Mirror of `config.jump_max_height` for edit detection.
    max_height: Stateful<f32>,
}

impl JumpState {
    pub fn new(config: &CharacterConfig) -> Self {
        Self {
            air_jumps_used: 0,
            buffer: 0.0,
            coyote: 0.0,
            speed: Stateful::new(config.jump_speed),
            max_height: Stateful::new(config.jump_max_height),
        }
    }

    /// Count down the grace windows.
    pub fn tick_timers(&mut self, dt: f32) {
        self.buffer = (self.buffer - dt).max(0.0);
        self.coyote = (self.coyote - dt).max(0.0);
    }

    /// Launch velocity for an executing jump. Half a tick of gravity is
    /// pre-integrated so the first airborne tick does not overshoot the
    /// configured apex.
    pub fn launch_velocity(&self, config: &CharacterConfig, gravity: Vec3, up: Vec3, dt: f32) -> Vec3 {
        config.jump_speed * up + gravity * dt * 0.5
    }

    /// Handle a jump-press rising edge. Returns true when the jump
    /// executes this tick; false means it was buffered for a landing.
    pub fn press(&mut self, grounded: bool, config: &CharacterConfig) -> bool {
        if grounded {
            self.coyote = 0.0;
            return true;
        }

        if self.air_jumps_used < config.max_air_jump_count {
            self.air_jumps_used += 1;
            self.coyote = 0.0;
            return true;
        }

        if self.coyote > 0.0 {
            self.coyote = 0.0;
            return true;
        }

        self.buffer = config.jump_buffer_time;
        false
    }

    /// Ground contact regained: midair charges refill.
    pub fn on_grounded(&mut self) {
        self.air_jumps_used = 0;
        self.coyote = 0.0;
    }

    /// Ground contact lost without a jump: open the coyote window.
    pub fn start_coyote(&mut self, config: &CharacterConfig) {
        self.coyote = config.coyote_time;
    }

    /// Consume a pending buffered jump on landing, if any.
    pub fn take_buffered(&mut self) -> bool {
        if self.buffer > 0.0 {
            self.buffer = 0.0;
            true
        } else {
            false
        }
    }

    /// Tick-end reconciliation of the linked jump tunables. An edited
    /// `jump_speed` recomputes `jump_max_height` and vice versa; if both
    /// changed in the same tick, `jump_speed` wins.
    pub fn reconcile(&mut self, config: &mut CharacterConfig, gravity: Vec3, up: Vec3) {
        self.speed.commit(config.jump_speed);
        self.max_height.commit(config.jump_max_height);

        let g = gravity.dot(up).abs();
        if g <= f32::EPSILON {
            return;
        }

        if self.speed.changed() {
            config.jump_max_height = config.jump_speed * config.jump_speed * 0.5 / g;
            self.max_height.set(config.jump_max_height);
        } else if self.max_height.changed() {
            config.jump_speed = (2.0 * g * config.jump_max_height).sqrt();
            self.speed.set(config.jump_speed);
        }
    }
}
