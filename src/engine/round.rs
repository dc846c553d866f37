//! Round state machine
//!
//! One `RoundEngine` owns everything a round touches: the sampler, the AI
//! crowd, the human bet slots, the ledger, and the balance store. Every
//! mutation goes through its methods, and each method runs to completion —
//! the caller (see [`crate::service::RoundService`]) serializes ticks and
//! user commands behind one lock.
//!
//! Lifecycle: `Idle → Running` on an accepted `start`, `Running → Crashed`
//! on the tick where the multiplier reaches the crash point. `Crashed` is
//! observable (the table shows the wreck until the next round) but behaves
//! exactly like `Idle`: only `Running` gates any operation.

use crate::balance::BalanceStore;
use crate::config::{CashoutPolicy, GameConfig};
use crate::engine::betting::{slot_label, BetSlot, BettingSession};
use crate::engine::crash_point::{BucketCrashGenerator, CrashSampler};
use crate::engine::players::{AiPlayer, PlayerPool};
use crate::errors::GameError;
use crate::events::GameEvent;
use crate::ledger::{Transaction, TransactionLedger};
use crate::round2;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::sync::broadcast;
use tracing::{debug, info, trace};

const EVENT_CHANNEL_CAPACITY: usize = 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoundState {
    Idle,
    Running,
    Crashed,
}

/// Result of one discrete tick step
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TickOutcome {
    /// No round is running; nothing happened
    Idle,
    /// The multiplier advanced and the round continues
    Advanced { multiplier: f64 },
    /// The round terminated this tick
    Crashed { crash_point: f64 },
}

/// What a successful `start` tells the caller about the new round
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoundStartedInfo {
    pub players: usize,
    pub total_ai_bets: u64,
}

/// Receipt for a successful human cashout
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CashoutReceipt {
    pub slot: usize,
    pub bet: f64,
    pub at: f64,
    pub won: f64,
    pub balance: f64,
}

/// Read-only view of the table. Never exposes the live crash point.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoundSnapshot {
    pub state: RoundState,
    pub multiplier: f64,
    pub balance: f64,
    /// Crash point of the most recently finished round
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_crash_point: Option<f64>,
    pub slots: Vec<BetSlot>,
}

pub struct RoundEngine {
    config: GameConfig,
    state: RoundState,
    multiplier: f64,
    crash_point: f64,
    last_crash_point: Option<f64>,
    sampler: Box<dyn CrashSampler>,
    rng: StdRng,
    pool: PlayerPool,
    session: BettingSession,
    ledger: TransactionLedger,
    balance: BalanceStore,
    events: broadcast::Sender<GameEvent>,
}

impl RoundEngine {
    pub fn new(config: GameConfig, balance: BalanceStore) -> Self {
        Self::with_parts(
            config,
            balance,
            Box::new(BucketCrashGenerator),
            StdRng::from_entropy(),
        )
    }

    /// Seam for tests and alternate economies: inject the sampler and RNG.
    pub fn with_parts(
        config: GameConfig,
        balance: BalanceStore,
        sampler: Box<dyn CrashSampler>,
        rng: StdRng,
    ) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        let slots = config.betting.slots;
        Self {
            config,
            state: RoundState::Idle,
            multiplier: 1.0,
            crash_point: 0.0,
            last_crash_point: None,
            sampler,
            rng,
            pool: PlayerPool::new(),
            session: BettingSession::new(slots),
            ledger: TransactionLedger::new(),
            balance,
            events,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<GameEvent> {
        self.events.subscribe()
    }

    pub fn state(&self) -> RoundState {
        self.state
    }

    pub fn multiplier(&self) -> f64 {
        self.multiplier
    }

    pub fn balance_amount(&self) -> f64 {
        self.balance.amount()
    }

    pub fn ledger(&self) -> &TransactionLedger {
        &self.ledger
    }

    pub fn ai_players(&self) -> &[AiPlayer] {
        self.pool.players()
    }

    pub fn ai_total_bets(&self) -> u64 {
        self.pool.total_bets()
    }

    pub fn tick_interval(&self) -> Duration {
        self.config.tick_interval()
    }

    pub fn snapshot(&self) -> RoundSnapshot {
        RoundSnapshot {
            state: self.state,
            multiplier: self.multiplier,
            balance: self.balance.amount(),
            last_crash_point: self.last_crash_point,
            slots: self.session.slots().to_vec(),
        }
    }

    /// Place a bet on a slot. Only allowed between rounds; debits the
    /// balance immediately. Rejections mutate nothing.
    pub fn place_bet(&mut self, slot: usize, amount: f64) -> Result<f64, GameError> {
        if self.state == RoundState::Running {
            return Err(GameError::RoundInProgress);
        }
        self.session.validate_placement(
            slot,
            amount,
            self.config.betting.min_bet,
            self.balance.amount(),
        )?;

        let balance = self.balance.debit(amount)?;
        self.session.record_bet(slot, amount);
        debug!(slot, amount, balance, "bet placed");
        Ok(balance)
    }

    /// Launch a round on behalf of `slot`, which must hold an active bet.
    ///
    /// On acceptance: ledger cleared, multiplier reset to 1.00, crash point
    /// sampled, crowd generated. The caller owns the tick cadence.
    pub fn start(&mut self, slot: usize) -> Result<RoundStartedInfo, GameError> {
        if self.state == RoundState::Running {
            return Err(GameError::RoundInProgress);
        }
        self.session.slot(slot)?;
        if !self.session.has_active_bet(slot) {
            return Err(GameError::NoActiveBet(slot));
        }

        self.ledger.clear();
        self.multiplier = 1.0;
        self.crash_point = self.sampler.sample(&mut self.rng);
        self.pool.populate(&self.config.ai, &mut self.rng);
        self.state = RoundState::Running;

        trace!(crash_point = self.crash_point, "crash point sampled");
        let info = RoundStartedInfo {
            players: self.pool.len(),
            total_ai_bets: self.pool.total_bets(),
        };
        info!(players = info.players, total_ai_bets = info.total_ai_bets, "round started");
        let _ = self.events.send(GameEvent::RoundStarted {
            players: info.players,
            total_ai_bets: info.total_ai_bets,
        });
        Ok(info)
    }

    /// Advance the round one discrete step.
    ///
    /// Order within a step: multiplier advances, AI cashouts settle, then
    /// the crash condition is checked. AI sweeps cannot pay out on the
    /// crash tick (see [`PlayerPool::tick`]).
    pub fn tick(&mut self) -> TickOutcome {
        if self.state != RoundState::Running {
            return TickOutcome::Idle;
        }

        self.multiplier = round2(self.multiplier + self.config.round.multiplier_step);
        trace!(multiplier = self.multiplier, "tick");
        let _ = self.events.send(GameEvent::Tick {
            multiplier: self.multiplier,
        });

        for event in self.pool.tick(self.multiplier, self.crash_point) {
            debug!(player = %event.player, at = event.at, won = event.won, "ai cashout");
            self.ledger.push(Transaction::Cashout {
                player: event.player.clone(),
                bet: event.bet as f64,
                at: event.at,
                won: event.won,
            });
            let _ = self.events.send(GameEvent::PlayerCashedOut {
                player: event.player,
                bet: event.bet as f64,
                at: event.at,
                won: event.won,
            });
        }

        if self.multiplier >= self.crash_point {
            let crash_point = self.crash_point;
            self.crash();
            TickOutcome::Crashed { crash_point }
        } else {
            TickOutcome::Advanced {
                multiplier: self.multiplier,
            }
        }
    }

    /// Cash out a human slot at the current multiplier.
    ///
    /// Ineligible attempts follow the configured policy: `Strict` surfaces
    /// the conflict, `Lenient` returns `Ok(None)` without touching anything.
    pub fn cashout(&mut self, slot: usize) -> Result<Option<CashoutReceipt>, GameError> {
        // Bad slot indexes are always reported, whatever the policy
        self.session.slot(slot)?;

        let eligibility = if self.state != RoundState::Running {
            Err(GameError::RoundNotRunning)
        } else {
            self.session.validate_cashout(slot)
        };

        if let Err(err) = eligibility {
            if self.config.betting.cashout_policy == CashoutPolicy::Lenient {
                return Ok(None);
            }
            return Err(err);
        }

        let at = self.multiplier;
        let bet = self.session.slot(slot)?.amount;
        let won = round2(bet * at);
        let balance = self.balance.credit(won)?;
        self.session.mark_cashed_out(slot, at);

        let player = slot_label(slot);
        info!(slot, at, won, balance, "cashout");
        self.ledger.push(Transaction::Cashout {
            player: player.clone(),
            bet,
            at,
            won,
        });
        let _ = self.events.send(GameEvent::PlayerCashedOut {
            player,
            bet,
            at,
            won,
        });

        Ok(Some(CashoutReceipt {
            slot,
            bet,
            at,
            won,
            balance,
        }))
    }

    /// Deposit funds. Bounds are inclusive on both ends.
    pub fn deposit(&mut self, amount: f64) -> Result<f64, GameError> {
        if !amount.is_finite() {
            return Err(GameError::InvalidAmount);
        }
        let limits = &self.config.deposit;
        if amount < limits.min_amount || amount > limits.max_amount {
            return Err(GameError::DepositOutOfRange {
                amount,
                min: limits.min_amount,
                max: limits.max_amount,
            });
        }

        let balance = self.balance.credit(amount)?;
        self.ledger.push(Transaction::Deposit {
            amount,
            player: None,
        });
        info!(amount, balance, "deposit");
        Ok(balance)
    }

    // Settle the round. Humans first, then the crowd — the reference
    // table's settlement order.
    fn crash(&mut self) {
        let crash_point = self.crash_point;

        for (slot, amount) in self.session.settle_losses() {
            debug!(slot, amount, "bet lost");
            self.ledger.push(Transaction::Loss {
                player: slot_label(slot),
                bet: amount,
            });
        }
        for event in self.pool.settle_losses() {
            self.ledger.push(Transaction::Loss {
                player: event.player,
                bet: event.bet as f64,
            });
        }

        self.last_crash_point = Some(crash_point);
        self.state = RoundState::Crashed;
        info!(crash_point, "round crashed");
        let _ = self.events.send(GameEvent::RoundCrashed { crash_point });
    }
}
