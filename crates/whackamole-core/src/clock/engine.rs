//! Session clock.
//!
//! Like the rest of the core, the clock has no internal thread: it holds at
//! most one armed tick and the caller is responsible for calling `poll()`
//! often enough. A tick accumulates the wall-clock delta since the previous
//! tick into `elapsed_ms` and publishes the result on a watch channel.
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Running -> Stopped
//!            \-> Faulted      (time source moved backwards)
//! ```
//!
//! `elapsed_ms` resets to 0 when it exceeds the difficulty threshold and
//! whenever the difficulty changes.

use serde::{Deserialize, Serialize};
use tokio::sync::watch;

use super::difficulty::{Difficulty, DifficultyStep};
use super::time_source::TimeSource;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClockStatus {
    Idle,
    Running,
    Stopped,
    /// The time source reported an instant before the baseline.
    Faulted,
}

/// Outcome of a fired tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// Elapsed time advanced. `elapsed_ms` is the published value, already
    /// reset to 0 when `wrapped` is set.
    Elapsed { elapsed_ms: u64, wrapped: bool },
    /// Time went backwards; the clock is now faulted and disarmed.
    Fault { now_ms: u64, baseline_ms: u64 },
}

pub struct SessionClock<T: TimeSource> {
    time: T,
    tick_interval_ms: u64,
    difficulty: Difficulty,
    status: ClockStatus,
    elapsed_ms: u64,
    baseline_ms: u64,
    /// Due instant of the single armed tick.
    pending: Option<u64>,
    signal: watch::Sender<u64>,
}

impl<T: TimeSource> SessionClock<T> {
    pub fn new(time: T, tick_interval_ms: u64, difficulty: Difficulty) -> Self {
        let (signal, _) = watch::channel(0);
        Self {
            time,
            tick_interval_ms: tick_interval_ms.max(1),
            difficulty,
            status: ClockStatus::Idle,
            elapsed_ms: 0,
            baseline_ms: 0,
            pending: None,
            signal,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn status(&self) -> ClockStatus {
        self.status
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed_ms
    }

    pub fn threshold_ms(&self) -> u64 {
        self.difficulty.threshold_ms()
    }

    pub fn difficulty(&self) -> &Difficulty {
        &self.difficulty
    }

    pub fn tick_interval_ms(&self) -> u64 {
        self.tick_interval_ms
    }

    /// Instant at which the armed tick becomes due.
    pub fn next_due_ms(&self) -> Option<u64> {
        self.pending
    }

    pub fn now_ms(&self) -> u64 {
        self.time.now_ms()
    }

    /// Observe published elapsed values. Only the most recent value is
    /// retained; a receiver that falls behind skips intermediate values.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.signal.subscribe()
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Start (or restart) ticking. Each call replaces the timing baseline.
    pub fn start(&mut self) {
        if self.status == ClockStatus::Faulted {
            return;
        }
        self.rebase();
        self.status = ClockStatus::Running;
    }

    /// Cancel the armed tick. Idempotent; after return `poll()` is inert.
    pub fn stop(&mut self) {
        self.pending = None;
        if self.status != ClockStatus::Faulted {
            self.status = ClockStatus::Stopped;
        }
    }

    /// Shrink the threshold by one step and restart the elapsed window.
    ///
    /// The in-flight tick is cancelled before the new one is armed, so a
    /// difficulty change never produces a double or lost tick.
    pub fn increase_difficulty(&mut self) -> DifficultyStep {
        self.pending = None;
        let step = self.difficulty.increase();
        self.elapsed_ms = 0;
        if self.status == ClockStatus::Running {
            self.rebase();
        }
        self.signal.send_replace(0);
        step
    }

    /// Fire the armed tick if it is due. At most one tick fires per call.
    pub fn poll(&mut self) -> Option<Tick> {
        let due = self.pending?;
        let now = self.time.now_ms();
        if now < due {
            // A source that moved back behind the baseline would otherwise
            // stall here forever.
            if now < self.baseline_ms {
                return Some(self.fault(now));
            }
            return None;
        }
        Some(self.tick(now))
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn tick(&mut self, now: u64) -> Tick {
        let Some(delta) = now.checked_sub(self.baseline_ms) else {
            return self.fault(now);
        };
        self.elapsed_ms = self.elapsed_ms.saturating_add(delta);
        self.baseline_ms = now;
        self.pending = Some(now + self.tick_interval_ms);

        let wrapped = self.elapsed_ms > self.difficulty.threshold_ms();
        if wrapped {
            self.elapsed_ms = 0;
        }
        self.signal.send_replace(self.elapsed_ms);
        Tick::Elapsed {
            elapsed_ms: self.elapsed_ms,
            wrapped,
        }
    }

    fn fault(&mut self, now: u64) -> Tick {
        tracing::warn!(
            now_ms = now,
            baseline_ms = self.baseline_ms,
            "time source moved backwards; faulting session clock"
        );
        self.pending = None;
        self.status = ClockStatus::Faulted;
        Tick::Fault {
            now_ms: now,
            baseline_ms: self.baseline_ms,
        }
    }

    fn rebase(&mut self) {
        let now = self.time.now_ms();
        self.baseline_ms = now;
        self.pending = Some(now + self.tick_interval_ms);
    }
}
