use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::session::{EndReason, GamePhase};

/// Every state change in a session produces an Event.
/// The CLI prints them; hosts may replay them for rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    SessionStarted {
        threshold_ms: u64,
        miss_limit: u32,
        slot_count: u8,
        at: DateTime<Utc>,
    },
    TargetSpawned {
        slot: u8,
        elapsed_ms: u64,
        at: DateTime<Utc>,
    },
    TargetHit {
        slot: u8,
        score: u32,
        at: DateTime<Utc>,
    },
    TargetMissed {
        slot: u8,
        misses: u32,
        at: DateTime<Utc>,
    },
    DifficultyIncreased {
        level: u32,
        threshold_ms: u64,
        /// The threshold was held at its floor instead of shrinking a full step.
        clamped: bool,
        at: DateTime<Utc>,
    },
    SessionEnded {
        reason: EndReason,
        final_score: u32,
        high_score: u32,
        at: DateTime<Utc>,
    },
    StateSnapshot {
        phase: GamePhase,
        score: u32,
        misses: u32,
        miss_limit: u32,
        threshold_ms: u64,
        elapsed_ms: u64,
        level: u32,
        target: Option<u8>,
        at: DateTime<Utc>,
    },
}

impl Event {
    /// Serialized tag, e.g. `"TargetHit"`.
    pub fn kind(&self) -> &'static str {
        match self {
            Event::SessionStarted { .. } => "SessionStarted",
            Event::TargetSpawned { .. } => "TargetSpawned",
            Event::TargetHit { .. } => "TargetHit",
            Event::TargetMissed { .. } => "TargetMissed",
            Event::DifficultyIncreased { .. } => "DifficultyIncreased",
            Event::SessionEnded { .. } => "SessionEnded",
            Event::StateSnapshot { .. } => "StateSnapshot",
        }
    }
}
