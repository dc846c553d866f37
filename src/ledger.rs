//! Round transaction ledger
//!
//! An append-only, most-recent-first record of settlement events. The
//! ledger covers a single round plus any deposits made since: the engine
//! clears it when a new round starts, and nothing else mutates it.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// One settlement event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Transaction {
    /// A participant locked in winnings at multiplier `at`
    Cashout {
        player: String,
        bet: f64,
        at: f64,
        won: f64,
    },
    /// A participant rode to the crash
    Loss { player: String, bet: f64 },
    /// Funds added outside of round settlement
    Deposit {
        amount: f64,
        #[serde(skip_serializing_if = "Option::is_none")]
        player: Option<String>,
    },
}

/// Most-recent-first sequence of transactions
#[derive(Debug, Default)]
pub struct TransactionLedger {
    entries: VecDeque<Transaction>,
}

impl TransactionLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert at the head
    pub fn push(&mut self, tx: Transaction) {
        self.entries.push_front(tx);
    }

    /// Invoked exclusively by the round engine at round start.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate most-recent-first
    pub fn iter(&self) -> impl Iterator<Item = &Transaction> {
        self.entries.iter()
    }

    pub fn to_vec(&self) -> Vec<Transaction> {
        self.entries.iter().cloned().collect()
    }
}
