//! Game runtime: one session clock, one session state, one active target.
//!
//! The runtime is caller-driven. Hosts call [`Game::poll`] on a timer and
//! forward clicks through [`Game::whack`]. Each command returns the events
//! it produced. A poll that comes late fires a single tick covering the
//! whole delay, so polling more often than the tick interval is harmless.
//!
//! ## Usage
//!
//! ```ignore
//! let mut game = Game::new(GameConfig::default(), SystemTimeSource, (), Database::open()?)?;
//! game.start();
//! // Every few milliseconds:
//! for event in game.poll()? { /* render */ }
//! ```

use chrono::Utc;
use tokio::sync::watch;

use super::host::{Host, SessionSummary};
use super::policy::SpawnPolicy;
use super::state::{EndReason, GameSession, SessionSignal};
use super::GamePhase;
use crate::clock::{ClockStatus, Difficulty, SessionClock, Tick, TimeSource};
use crate::error::{Result, ValidationError};
use crate::events::Event;
use crate::storage::{GameConfig, HighScoreStore};

pub struct Game<T: TimeSource, H: Host, S: HighScoreStore> {
    clock: SessionClock<T>,
    session: GameSession,
    policy: SpawnPolicy,
    target: Option<u8>,
    host: H,
    store: S,
    summary: Option<SessionSummary>,
}

impl<T: TimeSource, H: Host, S: HighScoreStore> Game<T, H, S> {
    /// Build a fresh session. Each session owns a new clock, so observers
    /// subscribed to a previous session see their channel close.
    ///
    /// # Errors
    /// Returns an error if `config` does not validate.
    pub fn new(config: GameConfig, time: T, host: H, store: S) -> Result<Self> {
        config.validate()?;
        let difficulty = Difficulty::new(
            config.initial_threshold_ms,
            config.difficulty_step_ms,
            config.min_threshold_ms,
        );
        let clock = SessionClock::new(time, config.tick_interval_ms, difficulty);
        let session = GameSession::new(
            config.miss_limit,
            config.hits_per_level,
            config.slot_count as u8,
            config.seed,
        );
        Ok(Self {
            clock,
            session,
            policy: SpawnPolicy::new(config.reaction_grace_ms),
            target: None,
            host,
            store,
            summary: None,
        })
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn phase(&self) -> GamePhase {
        if self.session.is_terminal() {
            GamePhase::Over
        } else if self.clock.status() == ClockStatus::Running {
            GamePhase::Running
        } else {
            GamePhase::Ready
        }
    }

    pub fn is_over(&self) -> bool {
        self.session.is_terminal()
    }

    pub fn score(&self) -> u32 {
        self.session.score()
    }

    pub fn misses(&self) -> u32 {
        self.session.misses()
    }

    pub fn target(&self) -> Option<u8> {
        self.target
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.clock.elapsed_ms()
    }

    pub fn difficulty_threshold_ms(&self) -> u64 {
        self.clock.threshold_ms()
    }

    pub fn difficulty_level(&self) -> u32 {
        self.clock.difficulty().level()
    }

    pub fn clock(&self) -> &SessionClock<T> {
        &self.clock
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    /// Set once the session has ended.
    pub fn summary(&self) -> Option<&SessionSummary> {
        self.summary.as_ref()
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.clock.subscribe()
    }

    pub fn snapshot(&self) -> Event {
        Event::StateSnapshot {
            phase: self.phase(),
            score: self.session.score(),
            misses: self.session.misses(),
            miss_limit: self.session.miss_limit(),
            threshold_ms: self.clock.threshold_ms(),
            elapsed_ms: self.clock.elapsed_ms(),
            level: self.clock.difficulty().level(),
            target: self.target,
            at: Utc::now(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    pub fn start(&mut self) -> Vec<Event> {
        if self.session.is_terminal() {
            return Vec::new();
        }
        self.clock.start();
        tracing::info!(
            threshold_ms = self.clock.threshold_ms(),
            miss_limit = self.session.miss_limit(),
            "session started"
        );
        self.host.update_hud(self.session.score(), self.session.misses());
        vec![Event::SessionStarted {
            threshold_ms: self.clock.threshold_ms(),
            miss_limit: self.session.miss_limit(),
            slot_count: self.session.slot_count(),
            at: Utc::now(),
        }]
    }

    /// Run the clock's due tick, if any, and apply the spawn policy to the
    /// published elapsed value.
    ///
    /// # Errors
    /// Only fails when the session ends and the high score cannot be saved.
    pub fn poll(&mut self) -> Result<Vec<Event>> {
        let mut events = Vec::new();
        if self.session.is_terminal() {
            return Ok(events);
        }
        match self.clock.poll() {
            None => {}
            Some(Tick::Fault { .. }) => {
                self.finish(EndReason::ClockFault, &mut events)?;
            }
            Some(Tick::Elapsed { elapsed_ms, .. }) => {
                self.on_elapsed(elapsed_ms, &mut events)?;
            }
        }
        Ok(events)
    }

    /// Click on `slot`. Clicking the active target scores; clicking an empty
    /// slot does nothing.
    ///
    /// # Errors
    /// Returns [`ValidationError::OutOfBounds`] for a slot outside the board.
    pub fn whack(&mut self, slot: u8) -> Result<Vec<Event>> {
        let slot_count = self.session.slot_count();
        if slot == 0 || slot > slot_count {
            return Err(ValidationError::OutOfBounds {
                collection: "slots".to_string(),
                index: slot as usize,
                len: slot_count as usize,
            }
            .into());
        }

        let mut events = Vec::new();
        if self.session.is_terminal() || self.target != Some(slot) {
            return Ok(events);
        }

        self.target = None;
        self.host.hide_target(slot);
        self.host.play_hit_sound();
        let signal = self.session.record_hit();
        tracing::debug!(slot, score = self.session.score(), "target hit");
        events.push(Event::TargetHit {
            slot,
            score: self.session.score(),
            at: Utc::now(),
        });

        if signal == Some(SessionSignal::DifficultyUp) {
            let step = self.clock.increase_difficulty();
            if step.clamped {
                tracing::warn!(
                    level = step.level,
                    threshold_ms = step.threshold_ms,
                    "difficulty threshold held at floor"
                );
            } else {
                tracing::debug!(
                    level = step.level,
                    threshold_ms = step.threshold_ms,
                    "difficulty increased"
                );
            }
            events.push(Event::DifficultyIncreased {
                level: step.level,
                threshold_ms: step.threshold_ms,
                clamped: step.clamped,
                at: Utc::now(),
            });
            // The clock published a fresh zero; observers react to it at once.
            self.on_elapsed(0, &mut events)?;
        } else {
            self.host.update_hud(self.session.score(), self.session.misses());
        }
        Ok(events)
    }

    /// Player chose to stop playing.
    ///
    /// # Errors
    /// Fails when the high score cannot be saved.
    pub fn end(&mut self) -> Result<Vec<Event>> {
        let mut events = Vec::new();
        if !self.session.is_terminal() {
            self.finish(EndReason::PlayerQuit, &mut events)?;
        }
        Ok(events)
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn on_elapsed(&mut self, elapsed_ms: u64, events: &mut Vec<Event>) -> Result<()> {
        let threshold = self.clock.threshold_ms();

        if let Some(slot) = self.target {
            if self.policy.miss_due(elapsed_ms, threshold) {
                self.target = None;
                self.host.hide_target(slot);
                let terminal = self.session.record_miss();
                tracing::debug!(slot, misses = self.session.misses(), "target missed");
                events.push(Event::TargetMissed {
                    slot,
                    misses: self.session.misses(),
                    at: Utc::now(),
                });
                self.host.update_hud(self.session.score(), self.session.misses());
                if terminal {
                    return self.finish(EndReason::MissLimit, events);
                }
            }
        }

        if self.target.is_none() && self.policy.should_spawn(elapsed_ms, threshold) {
            let slot = self.session.pick_spawn_slot();
            self.target = Some(slot);
            self.host.show_target(slot);
            tracing::debug!(slot, elapsed_ms, "target spawned");
            events.push(Event::TargetSpawned {
                slot,
                elapsed_ms,
                at: Utc::now(),
            });
        }

        self.host.update_hud(self.session.score(), self.session.misses());
        Ok(())
    }

    /// Runs at most once per session: stops the clock, persists the high
    /// score and hands the summary to the host. The store error, if any, is
    /// returned only after the host has been told the session is over.
    fn finish(&mut self, reason: EndReason, events: &mut Vec<Event>) -> Result<()> {
        if self.summary.is_some() {
            return Ok(());
        }
        self.session.end(reason);
        self.clock.stop();
        if let Some(slot) = self.target.take() {
            self.host.hide_target(slot);
        }

        let final_score = self.session.final_score();
        let saved = self.store.save_high_score(final_score);
        let high_score = match &saved {
            Ok(best) => *best,
            Err(e) => {
                tracing::warn!(error = %e, "failed to save high score");
                self.store
                    .load_high_score()
                    .unwrap_or(0)
                    .max(final_score)
            }
        };

        let summary = SessionSummary {
            reason,
            final_score,
            high_score,
            misses: self.session.misses(),
            difficulty_level: self.clock.difficulty().level(),
        };
        self.summary = Some(summary);
        tracing::info!(?reason, final_score, high_score, "session ended");
        self.host.game_over(&summary);
        events.push(Event::SessionEnded {
            reason,
            final_score,
            high_score,
            at: Utc::now(),
        });

        saved.map(|_| ())
    }
}
