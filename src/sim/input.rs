//! Per-frame control input for the human racer
//!
//! Raw key handling lives outside the simulation. The input collaborator
//! hands over which sprint keys are held and the discrete presses and jump
//! trigger that happened since the last frame.

use serde::{Deserialize, Serialize};

/// One of the two alternating sprint keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SprintKey {
    Left,
    Right,
}

/// Sprint keys currently held down
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeldKeys {
    pub left: bool,
    pub right: bool,
}

impl HeldKeys {
    /// Any sprint key held means the racer is driving forward
    #[inline]
    pub fn any(&self) -> bool {
        self.left || self.right
    }

    pub fn set(&mut self, key: SprintKey, held: bool) {
        match key {
            SprintKey::Left => self.left = held,
            SprintKey::Right => self.right = held,
        }
    }
}

/// Input commands for a single frame
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ControlInput {
    /// Held state of the sprint keys at frame time
    pub held: HeldKeys,
    /// Sprint key presses since the previous frame, oldest first
    pub sprint_presses: Vec<SprintKey>,
    /// Jump was triggered since the previous frame
    pub jump: bool,
}

impl ControlInput {
    /// A fresh press of `key`, which is also held for this frame
    pub fn press(key: SprintKey) -> Self {
        let mut held = HeldKeys::default();
        held.set(key, true);
        Self {
            held,
            sprint_presses: vec![key],
            jump: false,
        }
    }

    /// Only the jump trigger
    pub fn jump() -> Self {
        Self {
            jump: true,
            ..Default::default()
        }
    }

    /// Add a jump trigger to this input
    pub fn with_jump(mut self) -> Self {
        self.jump = true;
        self
    }
}
