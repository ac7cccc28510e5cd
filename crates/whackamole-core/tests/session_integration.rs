//! End-to-end session scenarios driven by a virtual clock.

use whackamole_core::clock::ManualTimeSource;
use whackamole_core::error::{CoreError, Result};
use whackamole_core::{
    Database, EndReason, Event, Game, GameConfig, GamePhase, HighScoreStore, Host,
    MemoryHighScores, SessionSummary,
};

#[derive(Debug, Default)]
struct RecordingHost {
    shown: Vec<u8>,
    hidden: Vec<u8>,
    hud: Vec<(u32, u32)>,
    sounds: usize,
    game_overs: Vec<SessionSummary>,
}

impl Host for RecordingHost {
    fn show_target(&mut self, slot: u8) {
        self.shown.push(slot);
    }

    fn hide_target(&mut self, slot: u8) {
        self.hidden.push(slot);
    }

    fn update_hud(&mut self, score: u32, misses: u32) {
        self.hud.push((score, misses));
    }

    fn play_hit_sound(&mut self) {
        self.sounds += 1;
    }

    fn game_over(&mut self, summary: &SessionSummary) {
        self.game_overs.push(*summary);
    }
}

type TestGame<S> = Game<ManualTimeSource, RecordingHost, S>;

fn config() -> GameConfig {
    GameConfig {
        seed: Some(2024),
        ..GameConfig::default()
    }
}

fn new_game<S: HighScoreStore>(time: &ManualTimeSource, store: S) -> TestGame<S> {
    let mut game = Game::new(config(), time.clone(), RecordingHost::default(), store).unwrap();
    game.start();
    game
}

fn tick<S: HighScoreStore>(game: &mut TestGame<S>, time: &ManualTimeSource) -> Vec<Event> {
    time.advance(100);
    game.poll().unwrap()
}

/// Tick until a target is showing, then hit it.
fn hit_next<S: HighScoreStore>(game: &mut TestGame<S>, time: &ManualTimeSource) -> Vec<Event> {
    for _ in 0..100 {
        if let Some(slot) = game.target() {
            return game.whack(slot).unwrap();
        }
        tick(game, time);
    }
    panic!("no target spawned within 100 ticks");
}

fn count(events: &[Event], kind: &str) -> usize {
    events.iter().filter(|e| e.kind() == kind).count()
}

#[test]
fn spawn_at_threshold_and_miss_inside_grace() {
    let time = ManualTimeSource::new(1_000);
    let mut game = new_game(&time, MemoryHighScores::default());
    assert_eq!(game.difficulty_threshold_ms(), 1800);

    let mut spawned = Vec::new();
    for _ in 0..18 {
        spawned.extend(tick(&mut game, &time));
    }
    assert_eq!(game.elapsed_ms(), 1800);
    assert!(matches!(spawned[..], [Event::TargetSpawned { elapsed_ms: 1800, .. }]));
    let slot = game.target().unwrap();

    // Wraps to zero; the target is still up so nothing new spawns.
    assert!(tick(&mut game, &time).is_empty());
    assert_eq!(game.elapsed_ms(), 0);
    assert_eq!(game.target(), Some(slot));

    // One late tick lands at 1760, inside the last 50ms of the window.
    time.advance(1760);
    let events = game.poll().unwrap();
    assert_eq!(game.elapsed_ms(), 1760);
    assert!(matches!(
        events[..],
        [Event::TargetMissed { misses: 1, slot: s, .. }] if s == slot
    ));
    assert_eq!(game.target(), None);
    assert_eq!(game.host().hidden, vec![slot]);
}

#[test]
fn difficulty_rises_once_per_eight_points() {
    let time = ManualTimeSource::new(0);
    let mut game = new_game(&time, MemoryHighScores::default());

    let mut events = Vec::new();
    for _ in 0..8 {
        events.extend(hit_next(&mut game, &time));
    }
    assert_eq!(game.score(), 8);
    assert_eq!(count(&events, "DifficultyIncreased"), 1);
    assert_eq!(game.difficulty_threshold_ms(), 1700);
    assert_eq!(game.difficulty_level(), 1);
    assert_eq!(game.elapsed_ms(), 0);
    // The reset to zero spawns the next target straight away.
    assert!(matches!(events.last(), Some(Event::TargetSpawned { elapsed_ms: 0, .. })));

    for _ in 8..15 {
        events.extend(hit_next(&mut game, &time));
    }
    assert_eq!(game.score(), 15);
    assert_eq!(count(&events, "DifficultyIncreased"), 1);

    events.extend(hit_next(&mut game, &time));
    assert_eq!(count(&events, "DifficultyIncreased"), 2);
    assert_eq!(game.difficulty_threshold_ms(), 1600);
    assert_eq!(game.host().sounds, 16);
}

#[test]
fn difficulty_is_clamped_at_floor() {
    let time = ManualTimeSource::new(0);
    let mut config = config();
    config.hits_per_level = 1;
    let mut game = Game::new(
        config,
        time.clone(),
        RecordingHost::default(),
        MemoryHighScores::default(),
    )
    .unwrap();
    game.start();

    let mut events = Vec::new();
    for _ in 0..20 {
        events.extend(hit_next(&mut game, &time));
    }
    assert_eq!(game.difficulty_level(), 20);
    assert_eq!(game.difficulty_threshold_ms(), 100);
    let clamped = events
        .iter()
        .filter(|e| matches!(e, Event::DifficultyIncreased { clamped: true, .. }))
        .count();
    assert_eq!(clamped, 3);
}

#[test]
fn sixth_miss_ends_session_with_captured_score() {
    let time = ManualTimeSource::new(0);
    let mut game = new_game(&time, MemoryHighScores::with_value(1));

    for _ in 0..3 {
        hit_next(&mut game, &time);
    }

    let mut events = Vec::new();
    for _ in 0..500 {
        if game.is_over() {
            break;
        }
        events.extend(tick(&mut game, &time));
    }
    assert!(game.is_over());
    assert_eq!(game.misses(), 6);
    assert_eq!(count(&events, "TargetMissed"), 6);

    match events.last() {
        Some(Event::SessionEnded {
            reason,
            final_score,
            high_score,
            ..
        }) => {
            assert_eq!(*reason, EndReason::MissLimit);
            assert_eq!(*final_score, 3);
            assert_eq!(*high_score, 3);
        }
        other => panic!("expected SessionEnded, got {other:?}"),
    }
    assert_eq!(game.store().load_high_score().unwrap(), 3);
    assert_eq!(game.store().writes(), 1);
    assert_eq!(game.host().game_overs.len(), 1);
    assert_eq!(game.host().game_overs[0].final_score, 3);
    assert_eq!(game.phase(), GamePhase::Over);
}

#[test]
fn no_ticks_after_session_ends() {
    let time = ManualTimeSource::new(0);
    let mut game = new_game(&time, MemoryHighScores::default());
    for _ in 0..5 {
        tick(&mut game, &time);
    }
    game.end().unwrap();
    let elapsed = game.elapsed_ms();
    let hud_updates = game.host().hud.len();

    for _ in 0..50 {
        assert!(tick(&mut game, &time).is_empty());
    }
    assert_eq!(game.elapsed_ms(), elapsed);
    assert_eq!(game.host().hud.len(), hud_updates);
    assert_eq!(game.clock().next_due_ms(), None);
    assert_eq!(game.host().game_overs.len(), 1);
}

#[test]
fn hits_after_end_do_not_score() {
    let time = ManualTimeSource::new(0);
    let mut game = new_game(&time, MemoryHighScores::default());
    hit_next(&mut game, &time);
    // Get a fresh target up, then quit while it is showing.
    for _ in 0..40 {
        if game.target().is_some() {
            break;
        }
        tick(&mut game, &time);
    }
    let slot = game.target().unwrap();
    game.end().unwrap();
    assert_eq!(game.target(), None);
    assert!(game.whack(slot).unwrap().is_empty());
    assert_eq!(game.score(), 1);
    assert_eq!(game.summary().unwrap().reason, EndReason::PlayerQuit);
}

#[test]
fn backwards_clock_ends_session() {
    let time = ManualTimeSource::new(50_000);
    let mut game = new_game(&time, MemoryHighScores::with_value(40));
    for _ in 0..3 {
        tick(&mut game, &time);
    }
    time.set(10_000);
    let events = game.poll().unwrap();
    assert!(matches!(
        events[..],
        [Event::SessionEnded {
            reason: EndReason::ClockFault,
            final_score: 0,
            high_score: 40,
            ..
        }]
    ));
    assert!(game.is_over());
}

#[test]
fn previous_session_observer_is_detached() {
    let time = ManualTimeSource::new(0);
    let first = new_game(&time, MemoryHighScores::default());
    let stale = first.subscribe();
    drop(first);
    assert!(stale.has_changed().is_err());

    let mut second = new_game(&time, MemoryHighScores::default());
    let mut rx = second.subscribe();
    tick(&mut second, &time);
    tick(&mut second, &time);
    assert_eq!(*rx.borrow_and_update(), 200);
}

#[test]
fn high_score_persists_across_sessions() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("whackamole.db");
    let time = ManualTimeSource::new(0);

    let mut game = new_game(&time, Database::open_at(&path).unwrap());
    for _ in 0..5 {
        hit_next(&mut game, &time);
    }
    game.end().unwrap();

    let mut game = new_game(&time, Database::open_at(&path).unwrap());
    hit_next(&mut game, &time);
    let events = game.end().unwrap();
    assert!(matches!(
        events[..],
        [Event::SessionEnded {
            final_score: 1,
            high_score: 5,
            ..
        }]
    ));
    assert_eq!(Database::open_at(&path).unwrap().load_high_score().unwrap(), 5);
}

/// Reads fine, refuses every write.
struct FailingStore(u32);

impl HighScoreStore for FailingStore {
    fn load_high_score(&self) -> Result<u32> {
        Ok(self.0)
    }

    fn store_high_score(&mut self, _value: u32) -> Result<()> {
        Err(CoreError::Custom("disk full".into()))
    }
}

#[test]
fn store_failure_still_ends_session_once() {
    let time = ManualTimeSource::new(0);
    let mut game = new_game(&time, FailingStore(0));
    assert!(game.end().is_err());
    assert!(game.is_over());
    assert_eq!(game.host().game_overs.len(), 1);
    assert!(game.end().unwrap().is_empty());
    assert_eq!(game.host().game_overs.len(), 1);
}

#[test]
fn store_failure_keeps_stored_high_score_in_summary() {
    let time = ManualTimeSource::new(0);
    let mut game = new_game(&time, FailingStore(7));
    hit_next(&mut game, &time);
    assert!(game.end().is_err());

    let summary = game.summary().unwrap();
    assert_eq!(summary.final_score, 1);
    assert_eq!(summary.high_score, 7);
    assert_eq!(game.host().game_overs[0].high_score, 7);
}
