mod game;
mod host;
mod policy;
mod state;

use serde::{Deserialize, Serialize};

pub use game::Game;
pub use host::{Host, SessionSummary};
pub use policy::SpawnPolicy;
pub use state::{EndReason, GameSession, SessionSignal};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GamePhase {
    /// Built but not started.
    Ready,
    Running,
    Over,
}
