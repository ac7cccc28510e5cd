//! Simulated player for headless sessions.
//!
//! The player watches spawn events, decides up front whether it will land
//! the hit, and clicks the slot once its reaction time has passed.

use rand::prelude::*;
use rand_pcg::Mcg128Xsl64;
use whackamole_core::Event;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PlannedWhack {
    slot: u8,
    due_ms: u64,
}

pub struct AutoPlayer {
    accuracy: f64,
    reaction_ms: u64,
    planned: Option<PlannedWhack>,
    rng: Mcg128Xsl64,
}

impl AutoPlayer {
    pub fn new(accuracy: f64, reaction_ms: u64, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => Mcg128Xsl64::seed_from_u64(seed),
            None => Mcg128Xsl64::from_entropy(),
        };
        Self {
            // NaN compares false everywhere and would survive a clamp.
            accuracy: if accuracy.is_nan() {
                0.0
            } else {
                accuracy.clamp(0.0, 1.0)
            },
            reaction_ms,
            planned: None,
            rng,
        }
    }

    /// Update plans from events produced at `now_ms`.
    pub fn observe(&mut self, events: &[Event], now_ms: u64) {
        for event in events {
            match event {
                Event::TargetSpawned { slot, .. } => {
                    self.planned = self.rng.gen_bool(self.accuracy).then_some(PlannedWhack {
                        slot: *slot,
                        due_ms: now_ms.saturating_add(self.reaction_ms),
                    });
                }
                Event::TargetMissed { .. }
                | Event::TargetHit { .. }
                | Event::SessionEnded { .. } => {
                    self.planned = None;
                }
                _ => {}
            }
        }
    }

    /// Slot to click now, if the reaction time has elapsed.
    pub fn due_whack(&mut self, now_ms: u64) -> Option<u8> {
        match self.planned {
            Some(plan) if plan.due_ms <= now_ms => {
                self.planned = None;
                Some(plan.slot)
            }
            _ => None,
        }
    }
}
