use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod autoplay;
mod commands;

#[derive(Parser)]
#[command(name = "whackamole", version, about = "Whack-A-Mole CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play a session with the automated player
    Play(commands::play::PlayArgs),
    /// High score management
    Highscore {
        #[command(subcommand)]
        action: commands::highscore::HighscoreAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Play(args) => commands::play::run(args),
        Commands::Highscore { action } => commands::highscore::run(action),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
