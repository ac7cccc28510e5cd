//! High score persistence.

use super::database::Database;
use crate::error::{DatabaseError, Result};

/// Key of the high score in the preference store.
pub const HIGH_SCORE_KEY: &str = "highScore";

pub trait HighScoreStore {
    /// Stored high score, 0 when nothing has been saved yet.
    fn load_high_score(&self) -> Result<u32>;

    /// Overwrite the stored value unconditionally.
    fn store_high_score(&mut self, value: u32) -> Result<()>;

    /// Keep the better of the stored value and `score`; returns what is
    /// stored afterwards.
    fn save_high_score(&mut self, score: u32) -> Result<u32> {
        let best = self.load_high_score()?.max(score);
        self.store_high_score(best)?;
        Ok(best)
    }
}

/// Store that lives only as long as the process.
#[derive(Debug, Clone, Default)]
pub struct MemoryHighScores {
    value: Option<u32>,
    writes: usize,
}

impl MemoryHighScores {
    pub fn with_value(value: u32) -> Self {
        Self {
            value: Some(value),
            writes: 0,
        }
    }

    /// Number of writes performed so far.
    pub fn writes(&self) -> usize {
        self.writes
    }
}

impl HighScoreStore for MemoryHighScores {
    fn load_high_score(&self) -> Result<u32> {
        Ok(self.value.unwrap_or(0))
    }

    fn store_high_score(&mut self, value: u32) -> Result<()> {
        self.value = Some(value);
        self.writes += 1;
        Ok(())
    }
}

impl HighScoreStore for Database {
    fn load_high_score(&self) -> Result<u32> {
        match self.kv_get(HIGH_SCORE_KEY)? {
            None => Ok(0),
            Some(raw) => raw.trim().parse::<u32>().map_err(|_| {
                DatabaseError::CorruptValue {
                    key: HIGH_SCORE_KEY.to_string(),
                    value: raw.clone(),
                }
                .into()
            }),
        }
    }

    fn store_high_score(&mut self, value: u32) -> Result<()> {
        self.kv_set(HIGH_SCORE_KEY, &value.to_string())?;
        Ok(())
    }
}

impl<S: HighScoreStore + ?Sized> HighScoreStore for &mut S {
    fn load_high_score(&self) -> Result<u32> {
        (**self).load_high_score()
    }

    fn store_high_score(&mut self, value: u32) -> Result<()> {
        (**self).store_high_score(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;

    #[test]
    fn defaults_to_zero() {
        assert_eq!(MemoryHighScores::default().load_high_score().unwrap(), 0);
        let db = Database::open_memory().unwrap();
        assert_eq!(db.load_high_score().unwrap(), 0);
    }

    #[test]
    fn save_keeps_maximum() {
        let mut db = Database::open_memory().unwrap();
        assert_eq!(db.save_high_score(12).unwrap(), 12);
        assert_eq!(db.save_high_score(7).unwrap(), 12);
        assert_eq!(db.load_high_score().unwrap(), 12);
        assert_eq!(db.save_high_score(30).unwrap(), 30);
        assert_eq!(db.kv_get(HIGH_SCORE_KEY).unwrap().as_deref(), Some("30"));
    }

    #[test]
    fn saving_loaded_value_is_idempotent() {
        let mut store = MemoryHighScores::with_value(9);
        for _ in 0..3 {
            let loaded = store.load_high_score().unwrap();
            store.save_high_score(loaded).unwrap();
            assert_eq!(store.load_high_score().unwrap(), 9);
        }
        assert_eq!(store.writes(), 3);
    }

    #[test]
    fn corrupt_value_is_reported() {
        let db = Database::open_memory().unwrap();
        db.kv_set(HIGH_SCORE_KEY, "lots").unwrap();
        assert!(matches!(
            db.load_high_score(),
            Err(CoreError::Database(DatabaseError::CorruptValue { .. }))
        ));
    }
}
