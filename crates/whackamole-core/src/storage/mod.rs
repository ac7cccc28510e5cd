mod config;
pub mod database;
mod high_score;

pub use config::GameConfig;
pub use database::Database;
pub use high_score::{HighScoreStore, MemoryHighScores, HIGH_SCORE_KEY};

use std::path::PathBuf;

/// Returns the directory holding `config.toml` and `whackamole.db`.
///
/// `WHACKAMOLE_DATA_DIR` overrides the location outright. Otherwise this is
/// `~/.config/whackamole[-dev]/`, with WHACKAMOLE_ENV=dev selecting the
/// development directory.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, std::io::Error> {
    let dir = match std::env::var_os("WHACKAMOLE_DATA_DIR") {
        Some(dir) => PathBuf::from(dir),
        None => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env =
                std::env::var("WHACKAMOLE_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("whackamole-dev")
            } else {
                base_dir.join("whackamole")
            }
        }
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
