use proptest::prelude::*;

use whackamole_core::clock::{Difficulty, ManualTimeSource, SessionClock};
use whackamole_core::{EndReason, GameSession};

#[derive(Debug, Clone, Copy)]
enum Outcome {
    Hit,
    Miss,
}

fn outcome() -> impl Strategy<Value = Outcome> {
    prop_oneof![Just(Outcome::Hit), Just(Outcome::Miss)]
}

proptest! {
    #[test]
    fn misses_never_exceed_limit(
        outcomes in prop::collection::vec(outcome(), 0..200),
        limit in 1u32..10,
    ) {
        let mut session = GameSession::new(limit, 8, 12, Some(0));
        let mut frozen: Option<(u32, u32)> = None;
        for o in outcomes {
            match o {
                Outcome::Hit => { session.record_hit(); }
                Outcome::Miss => { session.record_miss(); }
            }
            prop_assert!(session.misses() <= limit);
            if let Some(counts) = frozen {
                prop_assert_eq!(counts, (session.score(), session.misses()));
            } else if session.is_terminal() {
                prop_assert_eq!(session.end_reason(), Some(EndReason::MissLimit));
                frozen = Some((session.score(), session.misses()));
            }
        }
    }

    #[test]
    fn threshold_follows_linear_ramp(n in 0u32..40) {
        let mut clock = SessionClock::new(
            ManualTimeSource::new(0),
            100,
            Difficulty::new(1800, 100, 100),
        );
        clock.start();
        for _ in 0..n {
            clock.increase_difficulty();
        }
        let expected = 1800u64.saturating_sub(100 * n as u64).max(100);
        prop_assert_eq!(clock.threshold_ms(), expected);
        prop_assert_eq!(clock.difficulty().level(), n);
        prop_assert_eq!(clock.elapsed_ms(), 0);
    }

    #[test]
    fn spawn_slots_stay_on_board(seed in any::<u64>(), slots in 1u8..=24) {
        let mut session = GameSession::new(6, 8, slots, Some(seed));
        for _ in 0..64 {
            let slot = session.pick_spawn_slot();
            prop_assert!((1..=slots).contains(&slot));
        }
    }
}
