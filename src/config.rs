//! Search configuration.
//!
//! Loaded from TOML (every field optional), then individual fields can be overridden by
//! `SOISMCTS_<FIELD>` environment variables.

use std::path::Path;
use std::time::Duration;
use log::{debug, warn};
use serde::Deserialize;
use crate::error::ConfigError;
use crate::policy::FinalChoice;
use crate::rollout::{Horizon, RolloutPolicy};
use crate::utils::*;

/// Environment variable naming a config file for the demo binary
pub const CONFIG_ENV: &str = "SOISMCTS_CONFIG";

/// Configuration for one SO-ISMCTS searcher
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// K in the UCB tree policy
    pub exploration: f64,
    /// Wall clock budget for one move
    pub move_time_ms: u64,
    /// Total time the harness may spend within a single turn
    pub turn_timeout_ms: u64,
    /// Optional cap on iterations per move, on top of the time budget
    pub max_iterations: Option<u32>,
    pub rollout: RolloutPolicy,
    /// Turn boundaries a playout may cross
    pub max_simulation_turns: usize,
    pub max_rollout_moves: usize,
    pub final_choice: FinalChoice,
    /// Fixed seed for reproducible searches; drawn from the OS when absent
    pub seed: Option<Seed>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            exploration: EXPLORATION,
            move_time_ms: MOVE_TIME_MS,
            turn_timeout_ms: TURN_TIMEOUT_MS,
            max_iterations: None,
            rollout: RolloutPolicy::Random,
            max_simulation_turns: MAX_SIMULATION_TURNS,
            max_rollout_moves: MAX_ROLLOUT_MOVES,
            final_choice: FinalChoice::MaxReward,
            seed: None,
        }
    }
}

impl SearchConfig {
    /// Small, iteration bounded and seeded: deterministic enough for tests
    pub fn for_testing() -> Self {
        Self {
            move_time_ms: 10_000,
            max_iterations: Some(200),
            seed: Some(42),
            ..Self::default()
        }
    }

    pub fn with_exploration(mut self, k: f64) -> Self {
        self.exploration = k;
        self
    }

    pub fn with_move_time(mut self, ms: u64) -> Self {
        self.move_time_ms = ms;
        self
    }

    pub fn with_iterations(mut self, n: u32) -> Self {
        self.max_iterations = Some(n);
        self
    }

    pub fn with_rollout(mut self, rollout: RolloutPolicy) -> Self {
        self.rollout = rollout;
        self
    }

    pub fn with_simulation_turns(mut self, turns: usize) -> Self {
        self.max_simulation_turns = turns;
        self
    }

    pub fn with_final_choice(mut self, choice: FinalChoice) -> Self {
        self.final_choice = choice;
        self
    }

    pub fn with_seed(mut self, seed: Seed) -> Self {
        self.seed = Some(seed);
        self
    }

    #[inline] pub fn move_time(&self) -> Duration { Duration::from_millis(self.move_time_ms) }
    #[inline] pub fn turn_timeout(&self) -> Duration { Duration::from_millis(self.turn_timeout_ms) }

    pub fn horizon(&self) -> Horizon {
        Horizon { max_turns: self.max_simulation_turns, max_moves: self.max_rollout_moves }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.exploration.is_finite() || self.exploration < 0.0 {
            return Err(ConfigError::Invalid(format!("exploration must be finite and non-negative, got {}", self.exploration)));
        }
        if self.max_rollout_moves == 0 {
            return Err(ConfigError::Invalid("max_rollout_moves must be positive".into()));
        }
        Ok(())
    }

    // ---------- Loading ----------
    /// Parse, apply environment overrides, validate
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: SearchConfig = toml::from_str(content)?;
        let config = config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        debug!("Loading search config from {}", path.display());
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Load from the file named by `SOISMCTS_CONFIG`, or fall back to defaults (with overrides)
    pub fn from_env() -> Self {
        if let Ok(path) = std::env::var(CONFIG_ENV) {
            match Self::load(&path) {
                Ok(config) => return config,
                Err(e) => warn!("{CONFIG_ENV}={path}: {e}, using defaults"),
            }
        }
        let config = Self::default().apply_env_overrides();
        match config.validate() {
            Ok(()) => config,
            Err(e) => {
                warn!("{e}, using defaults");
                Self::default()
            }
        }
    }

    /// Environment variables follow the pattern SOISMCTS_<FIELD>
    pub fn apply_env_overrides(mut self) -> Self {
        override_field(&mut self.exploration, "SOISMCTS_EXPLORATION");
        override_field(&mut self.move_time_ms, "SOISMCTS_MOVE_TIME_MS");
        override_field(&mut self.turn_timeout_ms, "SOISMCTS_TURN_TIMEOUT_MS");
        override_optional(&mut self.max_iterations, "SOISMCTS_MAX_ITERATIONS");
        override_field(&mut self.rollout, "SOISMCTS_ROLLOUT");
        override_field(&mut self.max_simulation_turns, "SOISMCTS_MAX_SIMULATION_TURNS");
        override_field(&mut self.max_rollout_moves, "SOISMCTS_MAX_ROLLOUT_MOVES");
        override_field(&mut self.final_choice, "SOISMCTS_FINAL_CHOICE");
        override_optional(&mut self.seed, "SOISMCTS_SEED");
        self
    }
}

fn override_field<T: std::str::FromStr>(field: &mut T, key: &str) {
    if let Ok(raw) = std::env::var(key) {
        match raw.parse() {
            Ok(value) => *field = value,
            Err(_) => warn!("Ignoring {key}={raw}: not a valid value"),
        }
    }
}

fn override_optional<T: std::str::FromStr>(field: &mut Option<T>, key: &str) {
    if let Ok(raw) = std::env::var(key) {
        match raw.parse() {
            Ok(value) => *field = Some(value),
            Err(_) => warn!("Ignoring {key}={raw}: not a valid value"),
        }
    }
}
