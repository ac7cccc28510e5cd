use std::time::Duration;

use clap::Args;
use whackamole_core::{
    Database, Event, Game, GameConfig, Host, ManualTimeSource, SessionSummary, SystemTimeSource,
    TimeSource,
};

use crate::autoplay::AutoPlayer;

#[derive(Args)]
pub struct PlayArgs {
    /// Probability that the player hits a spawned target (0.0 - 1.0)
    #[arg(long, default_value_t = 0.8)]
    accuracy: f64,
    /// Player reaction time in milliseconds
    #[arg(long, default_value_t = 400)]
    reaction_ms: u64,
    /// Quit after this many clock ticks if the session is still running
    #[arg(long, default_value_t = 3000)]
    max_ticks: u64,
    /// Seed for both the board and the player (overrides config)
    #[arg(long)]
    seed: Option<u64>,
    /// Run against the wall clock instead of a virtual one
    #[arg(long)]
    realtime: bool,
    /// Print every event as a JSON line
    #[arg(long)]
    json: bool,
}

/// Terminal stand-in for the end-of-game screen.
#[derive(Default)]
struct CliHost {
    summary: Option<SessionSummary>,
}

impl Host for CliHost {
    fn game_over(&mut self, summary: &SessionSummary) {
        self.summary = Some(*summary);
    }
}

type CliGame<T> = Game<T, CliHost, Database>;

pub fn run(args: PlayArgs) -> Result<(), Box<dyn std::error::Error>> {
    if !(0.0..=1.0).contains(&args.accuracy) {
        let accuracy = args.accuracy;
        return Err(format!("accuracy must be between 0.0 and 1.0, got {accuracy}").into());
    }
    let mut config = GameConfig::load()?;
    if args.seed.is_some() {
        config.seed = args.seed;
    }
    let player_seed = config.seed.map(|s| s.wrapping_add(1));
    let mut player = AutoPlayer::new(args.accuracy, args.reaction_ms, player_seed);
    let db = Database::open()?;

    let summary = if args.realtime {
        let time = SystemTimeSource;
        let mut game = Game::new(config, time, CliHost::default(), db)?;
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_time()
            .build()?;
        runtime.block_on(run_realtime(&mut game, &mut player, &time, &args))?;
        game.host_mut().summary.take()
    } else {
        let time = ManualTimeSource::new(0);
        let mut game = Game::new(config, time.clone(), CliHost::default(), db)?;
        run_virtual(&mut game, &mut player, &time, &args)?;
        game.host_mut().summary.take()
    };

    if !args.json {
        if let Some(summary) = summary {
            println!("Final Score: {}", summary.final_score);
            println!("High Score: {}", summary.high_score);
        }
    }
    Ok(())
}

fn run_virtual(
    game: &mut CliGame<ManualTimeSource>,
    player: &mut AutoPlayer,
    time: &ManualTimeSource,
    args: &PlayArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    emit(&game.start(), args.json)?;
    let interval = game.clock().tick_interval_ms();
    for _ in 0..args.max_ticks {
        if game.is_over() {
            break;
        }
        time.advance(interval);
        step(game, player, time, args.json)?;
    }
    emit(&game.end()?, args.json)
}

async fn run_realtime(
    game: &mut CliGame<SystemTimeSource>,
    player: &mut AutoPlayer,
    time: &SystemTimeSource,
    args: &PlayArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    emit(&game.start(), args.json)?;
    let interval_ms = game.clock().tick_interval_ms();
    let deadline = time.now_ms().saturating_add(args.max_ticks.saturating_mul(interval_ms));
    // Poll well inside the tick interval so ticks fire close to on time.
    let mut poll = tokio::time::interval(Duration::from_millis((interval_ms / 10).max(1)));
    while !game.is_over() && time.now_ms() < deadline {
        poll.tick().await;
        step(game, player, time, args.json)?;
    }
    emit(&game.end()?, args.json)
}

/// One polling round: advance the game, let the player react, click.
fn step<T: TimeSource>(
    game: &mut CliGame<T>,
    player: &mut AutoPlayer,
    time: &T,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let now = time.now_ms();
    let events = game.poll()?;
    player.observe(&events, now);
    emit(&events, json)?;

    if let Some(slot) = player.due_whack(now) {
        let events = game.whack(slot)?;
        player.observe(&events, now);
        emit(&events, json)?;
    }
    Ok(())
}

fn emit(events: &[Event], json: bool) -> Result<(), Box<dyn std::error::Error>> {
    for event in events {
        if json {
            println!("{}", serde_json::to_string(event)?);
        } else if let Some(line) = describe(event) {
            println!("{line}");
        }
    }
    Ok(())
}

fn describe(event: &Event) -> Option<String> {
    match event {
        Event::SessionStarted {
            threshold_ms,
            miss_limit,
            slot_count,
            ..
        } => Some(format!(
            "Session started: {slot_count} holes, {threshold_ms}ms window, \
             {miss_limit} misses allowed"
        )),
        Event::TargetHit { slot, score, .. } => {
            Some(format!("Whacked hole {slot}! Player Score: {score}"))
        }
        Event::TargetMissed { slot, misses, .. } => {
            Some(format!("Mole at hole {slot} escaped. Misses: {misses}"))
        }
        Event::DifficultyIncreased {
            level,
            threshold_ms,
            ..
        } => Some(format!("Level {level}: window is now {threshold_ms}ms")),
        Event::SessionEnded { reason, .. } => Some(format!("Game over ({reason:?})")),
        Event::TargetSpawned { .. } | Event::StateSnapshot { .. } => None,
    }
}
