//! Game error types
//!
//! Three families, matching how failures surface to players: validation
//! rejections, state conflicts, and persistence failures. None of them is
//! fatal; the round state machine stays well-defined after any rejection.

use crate::storage::StorageError;

#[derive(Debug, thiserror::Error)]
pub enum GameError {
    // Validation: the request itself is bad. Nothing is mutated.
    #[error("bet must be at least {min}, got {amount}")]
    BetBelowMinimum { amount: f64, min: f64 },

    #[error("amount is not a valid number")]
    InvalidAmount,

    #[error("insufficient balance: {amount} requested, {balance} available")]
    InsufficientBalance { amount: f64, balance: f64 },

    #[error("deposit must be between {min} and {max}, got {amount}")]
    DepositOutOfRange { amount: f64, min: f64, max: f64 },

    #[error("no such bet slot: {0}")]
    SlotOutOfRange(usize),

    #[error("slot {0} already has a pending bet")]
    BetAlreadyPlaced(usize),

    // State conflicts: the request is well-formed but the round is in the
    // wrong state for it.
    #[error("a round is already in progress")]
    RoundInProgress,

    #[error("no round is running")]
    RoundNotRunning,

    #[error("slot {0} has no active bet")]
    NoActiveBet(usize),

    #[error("slot {0} already cashed out this round")]
    AlreadyCashedOut(usize),

    // Persistence: the balance store failed. Recoverable; in-memory state
    // is left untouched so the operation can be retried.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl GameError {
    /// True for rejections caused by an invalid request.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            GameError::BetBelowMinimum { .. }
                | GameError::InvalidAmount
                | GameError::InsufficientBalance { .. }
                | GameError::DepositOutOfRange { .. }
                | GameError::SlotOutOfRange(_)
                | GameError::BetAlreadyPlaced(_)
        )
    }

    /// True for rejections caused by the round being in the wrong state.
    pub fn is_state_conflict(&self) -> bool {
        matches!(
            self,
            GameError::RoundInProgress
                | GameError::RoundNotRunning
                | GameError::NoActiveBet(_)
                | GameError::AlreadyCashedOut(_)
        )
    }
}
