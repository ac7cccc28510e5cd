//! Score, miss and termination bookkeeping for one session.

use rand::prelude::*;
use rand_pcg::Mcg128Xsl64;
use serde::{Deserialize, Serialize};

/// Why a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EndReason {
    MissLimit,
    /// The time source moved backwards mid-session.
    ClockFault,
    PlayerQuit,
}

/// Signal emitted by the session for the clock to act on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionSignal {
    DifficultyUp,
}

#[derive(Debug, Clone)]
pub struct GameSession {
    score: u32,
    misses: u32,
    miss_limit: u32,
    hits_per_level: u32,
    slot_count: u8,
    ended: Option<EndReason>,
    rng: Mcg128Xsl64,
}

impl GameSession {
    /// The RNG is seeded here, once per session. `None` draws from OS entropy.
    pub fn new(miss_limit: u32, hits_per_level: u32, slot_count: u8, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => Mcg128Xsl64::seed_from_u64(seed),
            None => Mcg128Xsl64::from_entropy(),
        };
        Self {
            score: 0,
            misses: 0,
            miss_limit: miss_limit.max(1),
            hits_per_level: hits_per_level.max(1),
            slot_count: slot_count.max(1),
            ended: None,
            rng,
        }
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn final_score(&self) -> u32 {
        self.score
    }

    pub fn misses(&self) -> u32 {
        self.misses
    }

    pub fn miss_limit(&self) -> u32 {
        self.miss_limit
    }

    pub fn slot_count(&self) -> u8 {
        self.slot_count
    }

    pub fn end_reason(&self) -> Option<EndReason> {
        self.ended
    }

    pub fn is_terminal(&self) -> bool {
        self.ended.is_some()
    }

    /// Count a hit. Every `hits_per_level`-th point asks for a harder clock.
    /// No-op once the session is terminal.
    pub fn record_hit(&mut self) -> Option<SessionSignal> {
        if self.is_terminal() {
            return None;
        }
        self.score += 1;
        (self.score % self.hits_per_level == 0).then_some(SessionSignal::DifficultyUp)
    }

    /// Count a miss. Returns true when this miss made the session terminal.
    pub fn record_miss(&mut self) -> bool {
        if self.is_terminal() {
            return false;
        }
        self.misses += 1;
        if self.misses >= self.miss_limit {
            self.ended = Some(EndReason::MissLimit);
            return true;
        }
        false
    }

    /// Uniform slot in `1..=slot_count`.
    pub fn pick_spawn_slot(&mut self) -> u8 {
        self.rng.gen_range(1..=self.slot_count)
    }

    /// Mark the session terminal. The first reason wins.
    pub fn end(&mut self, reason: EndReason) {
        self.ended.get_or_insert(reason);
    }
}
