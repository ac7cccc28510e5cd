//! Difficulty ramp: the reaction window shrinks by a fixed step per level
//! and never drops below a configured floor.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Difficulty {
    threshold_ms: u64,
    step_ms: u64,
    floor_ms: u64,
    level: u32,
}

/// Result of a single difficulty increase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DifficultyStep {
    pub level: u32,
    pub threshold_ms: u64,
    /// True when the step hit the floor and the threshold moved less than
    /// a full step (or not at all).
    pub clamped: bool,
}

impl Difficulty {
    /// `floor_ms` is raised to 1 so the threshold can never reach zero.
    pub fn new(initial_ms: u64, step_ms: u64, floor_ms: u64) -> Self {
        let floor_ms = floor_ms.max(1);
        Self {
            threshold_ms: initial_ms.max(floor_ms),
            step_ms,
            floor_ms,
            level: 0,
        }
    }

    pub fn threshold_ms(&self) -> u64 {
        self.threshold_ms
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn floor_ms(&self) -> u64 {
        self.floor_ms
    }

    pub fn increase(&mut self) -> DifficultyStep {
        let target = self.threshold_ms.saturating_sub(self.step_ms);
        let clamped = target < self.floor_ms;
        self.threshold_ms = target.max(self.floor_ms);
        self.level += 1;
        DifficultyStep {
            level: self.level,
            threshold_ms: self.threshold_ms,
            clamped,
        }
    }
}
