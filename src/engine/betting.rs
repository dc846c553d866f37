//! Human bet slots
//!
//! Each seat at the table is an independent slot. Placement debits the
//! balance immediately; settlement happens exactly once per round, either
//! through a cashout mid-flight or a loss at crash. The `active` flag
//! scopes settlement to bets placed for the current round — `amount`
//! intentionally survives until the next placement.

use crate::errors::GameError;
use serde::{Deserialize, Serialize};

/// One independent betting position
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BetSlot {
    pub amount: f64,
    pub cashed_out: bool,
    pub cashout_multiplier: Option<f64>,
    /// Bet has been placed for the current/next round and is unsettled
    pub active: bool,
}

#[derive(Debug)]
pub struct BettingSession {
    slots: Vec<BetSlot>,
}

impl BettingSession {
    pub fn new(slot_count: usize) -> Self {
        Self {
            slots: vec![BetSlot::default(); slot_count],
        }
    }

    pub fn slot(&self, index: usize) -> Result<&BetSlot, GameError> {
        self.slots.get(index).ok_or(GameError::SlotOutOfRange(index))
    }

    pub fn slots(&self) -> &[BetSlot] {
        &self.slots
    }

    pub fn has_active_bet(&self, index: usize) -> bool {
        self.slots.get(index).map(|s| s.active).unwrap_or(false)
    }

    /// Check a placement without mutating anything.
    ///
    /// The running-round guard lives in the engine; everything about the
    /// slot and the amount is checked here.
    pub fn validate_placement(
        &self,
        index: usize,
        amount: f64,
        min_bet: f64,
        balance: f64,
    ) -> Result<(), GameError> {
        let slot = self.slot(index)?;
        if slot.active {
            return Err(GameError::BetAlreadyPlaced(index));
        }
        if !amount.is_finite() {
            return Err(GameError::InvalidAmount);
        }
        if amount < min_bet {
            return Err(GameError::BetBelowMinimum {
                amount,
                min: min_bet,
            });
        }
        if amount > balance {
            return Err(GameError::InsufficientBalance { amount, balance });
        }
        Ok(())
    }

    /// Record a validated, already-debited bet.
    pub fn record_bet(&mut self, index: usize, amount: f64) {
        let slot = &mut self.slots[index];
        slot.amount = amount;
        slot.cashed_out = false;
        slot.cashout_multiplier = None;
        slot.active = true;
    }

    /// Check cashout eligibility for a slot (round-state guard excluded).
    pub fn validate_cashout(&self, index: usize) -> Result<(), GameError> {
        let slot = self.slot(index)?;
        if !slot.active {
            return Err(GameError::NoActiveBet(index));
        }
        if slot.cashed_out {
            return Err(GameError::AlreadyCashedOut(index));
        }
        Ok(())
    }

    /// Mark a slot cashed out at `multiplier` and return its stake.
    pub fn mark_cashed_out(&mut self, index: usize, multiplier: f64) -> f64 {
        let slot = &mut self.slots[index];
        slot.cashed_out = true;
        slot.cashout_multiplier = Some(multiplier);
        slot.amount
    }

    /// Settle the round at crash: every active, un-cashed slot is a loss.
    ///
    /// Deactivates all slots so nothing is settled twice across rounds.
    pub fn settle_losses(&mut self) -> Vec<(usize, f64)> {
        let mut losses = Vec::new();
        for (index, slot) in self.slots.iter_mut().enumerate() {
            if slot.active && !slot.cashed_out {
                losses.push((index, slot.amount));
            }
            slot.active = false;
        }
        losses
    }
}

/// Stable display label for a human seat (`Player1`, `Player2`, ...).
pub(crate) fn slot_label(index: usize) -> String {
    format!("Player{}", index + 1)
}
