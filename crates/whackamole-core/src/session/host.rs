use serde::{Deserialize, Serialize};

use super::state::EndReason;

/// Final figures handed to the navigation hook.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub reason: EndReason,
    pub final_score: u32,
    pub high_score: u32,
    pub misses: u32,
    pub difficulty_level: u32,
}

/// Render, audio and navigation collaborators.
///
/// Every method defaults to a no-op so headless hosts implement only what
/// they observe. `game_over` is invoked exactly once per session.
pub trait Host {
    fn show_target(&mut self, _slot: u8) {}

    fn hide_target(&mut self, _slot: u8) {}

    fn update_hud(&mut self, _score: u32, _misses: u32) {}

    fn play_hit_sound(&mut self) {}

    fn game_over(&mut self, _summary: &SessionSummary) {}
}

impl Host for () {}

impl<H: Host + ?Sized> Host for &mut H {
    fn show_target(&mut self, slot: u8) {
        (**self).show_target(slot)
    }

    fn hide_target(&mut self, slot: u8) {
        (**self).hide_target(slot)
    }

    fn update_hud(&mut self, score: u32, misses: u32) {
        (**self).update_hud(score, misses)
    }

    fn play_hit_sound(&mut self) {
        (**self).play_hit_sound()
    }

    fn game_over(&mut self, summary: &SessionSummary) {
        (**self).game_over(summary)
    }
}
