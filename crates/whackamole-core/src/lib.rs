//! # Whack-A-Mole Core Library
//!
//! Headless simulation core of a Whack-A-Mole arcade game. Rendering, input,
//! audio and navigation stay outside; the core reaches them through the
//! [`Host`] trait and persists the high score through [`HighScoreStore`].
//!
//! ## Architecture
//!
//! - **Session Clock**: a caller-polled periodic ticker whose elapsed-time
//!   window shrinks as difficulty rises
//! - **Game Session**: score, misses and termination, plus random spawn slots
//! - **Game**: wires the two together and applies the spawn/miss policy
//! - **Storage**: SQLite key-value store for the high score and TOML
//!   configuration
//!
//! ## Key Components
//!
//! - [`SessionClock`]: periodic scheduler with difficulty ramp
//! - [`GameSession`]: session state machine
//! - [`Game`]: session runtime driven by `poll()` and `whack()`
//! - [`Database`]: high score persistence
//! - [`GameConfig`]: game tunables

pub mod clock;
pub mod error;
pub mod events;
pub mod session;
pub mod storage;

pub use clock::{ManualTimeSource, SessionClock, SystemTimeSource, TimeSource};
pub use error::{ConfigError, CoreError, DatabaseError, ValidationError};
pub use events::Event;
pub use session::{EndReason, Game, GamePhase, GameSession, Host, SessionSummary, SpawnPolicy};
pub use storage::{Database, GameConfig, HighScoreStore, MemoryHighScores};
