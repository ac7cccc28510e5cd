mod difficulty;
mod engine;
mod time_source;

pub use difficulty::{Difficulty, DifficultyStep};
pub use engine::{ClockStatus, SessionClock, Tick};
pub use time_source::{ManualTimeSource, SystemTimeSource, TimeSource};
