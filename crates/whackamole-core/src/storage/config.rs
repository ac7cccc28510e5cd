//! TOML-based game configuration.
//!
//! Holds the tunables of a session:
//! - Tick interval of the session clock
//! - Difficulty ramp (initial threshold, step, floor)
//! - Reaction grace period, miss limit, hits per level
//! - Board size and an optional RNG seed
//!
//! Configuration is stored at `~/.config/whackamole/config.toml`.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::data_dir;
use crate::error::{ConfigError, Result};

/// Game configuration.
///
/// Serialized to/from TOML at `~/.config/whackamole/config.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,
    #[serde(default = "default_initial_threshold_ms")]
    pub initial_threshold_ms: u64,
    #[serde(default = "default_difficulty_step_ms")]
    pub difficulty_step_ms: u64,
    /// Lowest threshold the difficulty ramp may reach.
    #[serde(default = "default_min_threshold_ms")]
    pub min_threshold_ms: u64,
    #[serde(default = "default_reaction_grace_ms")]
    pub reaction_grace_ms: u64,
    #[serde(default = "default_miss_limit")]
    pub miss_limit: u32,
    #[serde(default = "default_hits_per_level")]
    pub hits_per_level: u32,
    #[serde(default = "default_slot_count")]
    pub slot_count: u32,
    /// Fixed RNG seed for reproducible sessions.
    #[serde(default)]
    pub seed: Option<u64>,
}

// Default functions
fn default_tick_interval_ms() -> u64 {
    100
}
fn default_initial_threshold_ms() -> u64 {
    1800
}
fn default_difficulty_step_ms() -> u64 {
    100
}
fn default_min_threshold_ms() -> u64 {
    100
}
fn default_reaction_grace_ms() -> u64 {
    50
}
fn default_miss_limit() -> u32 {
    6
}
fn default_hits_per_level() -> u32 {
    8
}
fn default_slot_count() -> u32 {
    12
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: default_tick_interval_ms(),
            initial_threshold_ms: default_initial_threshold_ms(),
            difficulty_step_ms: default_difficulty_step_ms(),
            min_threshold_ms: default_min_threshold_ms(),
            reaction_grace_ms: default_reaction_grace_ms(),
            miss_limit: default_miss_limit(),
            hits_per_level: default_hits_per_level(),
            slot_count: default_slot_count(),
            seed: None,
        }
    }
}

impl GameConfig {
    /// Check cross-field constraints.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] naming the first offending key.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |key: &str, message: &str| ConfigError::InvalidValue {
            key: key.to_string(),
            message: message.to_string(),
        };

        if self.tick_interval_ms == 0 {
            return Err(invalid("tick_interval_ms", "must be positive"));
        }
        if self.min_threshold_ms == 0 {
            return Err(invalid("min_threshold_ms", "must be positive"));
        }
        if self.initial_threshold_ms < self.min_threshold_ms {
            return Err(invalid(
                "initial_threshold_ms",
                "must not be below min_threshold_ms",
            ));
        }
        if self.miss_limit == 0 {
            return Err(invalid("miss_limit", "must be positive"));
        }
        if self.hits_per_level == 0 {
            return Err(invalid("hits_per_level", "must be positive"));
        }
        if self.slot_count == 0 || self.slot_count > u8::MAX as u32 {
            return Err(invalid("slot_count", "must be between 1 and 255"));
        }
        Ok(())
    }

    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), ConfigError> {
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let mut parts = key.split('.').peekable();
        let mut current = root;
        while let Some(part) = parts.next() {
            if parts.peek().is_some() {
                current = current.get_mut(part).ok_or_else(unknown)?;
                continue;
            }

            let obj = current.as_object_mut().ok_or_else(unknown)?;
            let existing = obj.get(part).ok_or_else(unknown)?;
            let new_value = match existing {
                serde_json::Value::Bool(_) => serde_json::Value::Bool(
                    value
                        .parse::<bool>()
                        .map_err(|e| invalid(e.to_string()))?,
                ),
                // Optional numbers (`seed`) serialize as null when unset.
                serde_json::Value::Null if value == "none" => serde_json::Value::Null,
                serde_json::Value::Number(_) | serde_json::Value::Null => {
                    let n = value
                        .parse::<u64>()
                        .map_err(|_| invalid(format!("cannot parse '{value}' as number")))?;
                    serde_json::Value::Number(n.into())
                }
                _ => serde_json::Value::String(value.into()),
            };
            obj.insert(part.to_string(), new_value);
            return Ok(());
        }

        Err(unknown())
    }

    fn path() -> Result<PathBuf> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from the data directory, writing defaults on first use.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(content) => {
                let cfg: GameConfig =
                    toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                        path: path.to_path_buf(),
                        message: e.to_string(),
                    })?;
                cfg.validate()?;
                Ok(cfg)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let cfg = Self::default();
                cfg.save_to(path)?;
                Ok(cfg)
            }
            Err(e) => Err(ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }
            .into()),
        }
    }

    /// Persist to the data directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))?;
        Ok(())
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            serde_json::Value::Null => Some("none".to_string()),
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by key. The result must still validate.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown, the value cannot be parsed,
    /// or the updated config is invalid. `self` is left unchanged on error.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let mut json = serde_json::to_value(&*self)?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: GameConfig = serde_json::from_value(json)
            .map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
        updated.validate()?;
        *self = updated;
        Ok(())
    }
}
