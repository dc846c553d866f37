//! Configuration management with validation and defaults
//!
//! Every tunable of the game — tick cadence, slot count, AI population,
//! deposit bounds — lives here as a named value rather than a literal in
//! the engine.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Complete game configuration
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct GameConfig {
    pub round: RoundConfig,
    pub betting: BettingConfig,
    pub ai: AiPoolConfig,
    pub deposit: DepositConfig,
    pub storage: StorageConfig,
}

/// Tick loop parameters
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RoundConfig {
    /// Milliseconds between ticks
    pub tick_interval_ms: u64,
    /// Multiplier increase per tick
    pub multiplier_step: f64,
}

impl Default for RoundConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: 50,
            multiplier_step: 0.02,
        }
    }
}

/// Behavior of a cashout attempt on an ineligible slot (already cashed
/// out, no active bet, or round not running).
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CashoutPolicy {
    /// Reject with a visible error
    Strict,
    /// Silently ignore, as the original table did
    Lenient,
}

/// Human betting parameters
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BettingConfig {
    /// Number of independent bet slots
    pub slots: usize,
    /// Smallest accepted bet
    pub min_bet: f64,
    pub cashout_policy: CashoutPolicy,
}

impl Default for BettingConfig {
    fn default() -> Self {
        Self {
            slots: 2,
            min_bet: 10.0,
            cashout_policy: CashoutPolicy::Strict,
        }
    }
}

/// AI crowd parameters
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AiPoolConfig {
    /// Inclusive bounds on the number of players generated per round
    pub min_players: u32,
    pub max_players: u32,
    /// Inclusive bounds on each player's bet
    pub min_bet: u32,
    pub max_bet: u32,
    /// Probability that a player plans a cashout at all
    pub cashout_probability: f64,
    /// Planned cashout multipliers are drawn from [floor, ceiling)
    pub cashout_floor: f64,
    pub cashout_ceiling: f64,
}

impl Default for AiPoolConfig {
    fn default() -> Self {
        Self {
            min_players: 25,
            max_players: 50,
            min_bet: 10,
            max_bet: 99,
            cashout_probability: 0.4,
            cashout_floor: 1.2,
            cashout_ceiling: 9.2,
        }
    }
}

/// Deposit limits (both bounds inclusive)
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DepositConfig {
    pub min_amount: f64,
    pub max_amount: f64,
}

impl Default for DepositConfig {
    fn default() -> Self {
        Self {
            min_amount: 20.0,
            max_amount: 60_000.0,
        }
    }
}

/// Balance persistence settings
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StorageConfig {
    pub data_directory: String,
    /// Balance granted when no prior value is stored
    pub initial_balance: f64,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_directory: "./data/skyrush".to_string(),
            initial_balance: 50.0,
        }
    }
}

impl GameConfig {
    /// Single-seat table with a small crowd (the compact table mode).
    pub fn compact() -> Self {
        Self {
            betting: BettingConfig {
                slots: 1,
                ..Default::default()
            },
            ai: AiPoolConfig {
                min_players: 10,
                max_players: 24,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    /// Validate configuration for logical consistency
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.round.tick_interval_ms == 0 {
            return Err(ConfigValidationError::InvalidValue(
                "tick_interval_ms must be > 0".to_string(),
            ));
        }

        if self.round.multiplier_step <= 0.0 {
            return Err(ConfigValidationError::InvalidValue(
                "multiplier_step must be > 0".to_string(),
            ));
        }

        if self.betting.slots == 0 {
            return Err(ConfigValidationError::InvalidValue(
                "slots must be > 0".to_string(),
            ));
        }

        if self.betting.min_bet <= 0.0 {
            return Err(ConfigValidationError::InvalidValue(
                "min_bet must be > 0".to_string(),
            ));
        }

        if self.ai.min_players > self.ai.max_players {
            return Err(ConfigValidationError::LogicalInconsistency(
                "min_players exceeds max_players".to_string(),
            ));
        }

        if self.ai.min_bet > self.ai.max_bet {
            return Err(ConfigValidationError::LogicalInconsistency(
                "ai min_bet exceeds max_bet".to_string(),
            ));
        }

        if !(0.0..=1.0).contains(&self.ai.cashout_probability) {
            return Err(ConfigValidationError::InvalidValue(
                "cashout_probability must be within [0, 1]".to_string(),
            ));
        }

        if self.ai.cashout_floor <= 1.0 {
            return Err(ConfigValidationError::InvalidValue(
                "cashout_floor must be > 1.0".to_string(),
            ));
        }

        if self.ai.cashout_floor >= self.ai.cashout_ceiling {
            return Err(ConfigValidationError::LogicalInconsistency(
                "cashout_floor must be below cashout_ceiling".to_string(),
            ));
        }

        if self.deposit.min_amount > self.deposit.max_amount {
            return Err(ConfigValidationError::LogicalInconsistency(
                "deposit min_amount exceeds max_amount".to_string(),
            ));
        }

        if self.storage.initial_balance < 0.0 {
            return Err(ConfigValidationError::InvalidValue(
                "initial_balance must not be negative".to_string(),
            ));
        }

        Ok(())
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.round.tick_interval_ms)
    }
}

/// Configuration validation errors
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("invalid configuration value: {0}")]
    InvalidValue(String),

    #[error("configuration logical inconsistency: {0}")]
    LogicalInconsistency(String),
}
