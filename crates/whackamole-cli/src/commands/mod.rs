pub mod config;
pub mod highscore;
pub mod play;
