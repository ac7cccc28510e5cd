use clap::Subcommand;
use whackamole_core::storage::HIGH_SCORE_KEY;
use whackamole_core::{Database, HighScoreStore};

#[derive(Subcommand)]
pub enum HighscoreAction {
    /// Print the stored high score
    Show {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Forget the stored high score
    Reset,
}

pub fn run(action: HighscoreAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    match action {
        HighscoreAction::Show { json } => {
            let high_score = db.load_high_score()?;
            if json {
                println!("{}", serde_json::json!({ "high_score": high_score }));
            } else {
                println!("High Score: {high_score}");
            }
        }
        HighscoreAction::Reset => {
            db.kv_delete(HIGH_SCORE_KEY)?;
            println!("high score reset");
        }
    }
    Ok(())
}
