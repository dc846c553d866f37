//! Persisted player balance
//!
//! The balance is the only durable value in the game. It is owned
//! exclusively by [`BalanceStore`]; bets, cashouts, and deposits all go
//! through `debit`/`credit`, which persist the new value before committing
//! it in memory. A failed write therefore leaves the balance exactly where
//! it was, and the caller decides whether to retry.

use crate::round2;
use crate::storage::{KeyValueStore, StorageError};
use std::sync::Arc;

/// Fixed storage key for the balance entry
pub const BALANCE_KEY: &str = "balance";

pub struct BalanceStore {
    store: Arc<dyn KeyValueStore>,
    balance: f64,
}

impl BalanceStore {
    /// Read the persisted balance, falling back to `initial_balance` when
    /// no prior value exists.
    pub fn load(store: Arc<dyn KeyValueStore>, initial_balance: f64) -> Result<Self, StorageError> {
        let balance = match store.get(BALANCE_KEY)? {
            Some(raw) => raw
                .trim()
                .parse::<f64>()
                .map_err(|_| StorageError::Corrupt {
                    key: BALANCE_KEY.to_string(),
                    value: raw,
                })?,
            None => initial_balance,
        };

        Ok(Self { store, balance })
    }

    pub fn amount(&self) -> f64 {
        self.balance
    }

    pub fn debit(&mut self, amount: f64) -> Result<f64, StorageError> {
        self.write(round2(self.balance - amount))
    }

    pub fn credit(&mut self, amount: f64) -> Result<f64, StorageError> {
        self.write(round2(self.balance + amount))
    }

    // Persist first, commit second.
    fn write(&mut self, next: f64) -> Result<f64, StorageError> {
        self.store.put(BALANCE_KEY, &format!("{:.2}", next))?;
        self.balance = next;
        Ok(next)
    }
}
