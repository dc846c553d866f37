//! Async round runner
//!
//! `RoundService` owns the engine behind a single mutex and drives the
//! fixed-interval tick loop as a spawned task. Ticks and user commands
//! both run as short, atomic critical sections on that mutex, which gives
//! the run-to-completion semantics the engine assumes: no command observes
//! a half-applied tick and no tick observes a half-applied command.

use crate::balance::BalanceStore;
use crate::config::GameConfig;
use crate::engine::round::{
    CashoutReceipt, RoundEngine, RoundSnapshot, RoundStartedInfo, TickOutcome,
};
use crate::engine::AiPlayer;
use crate::errors::GameError;
use crate::events::GameEvent;
use crate::ledger::Transaction;
use crate::storage::KeyValueStore;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, Mutex};
use tokio::time::interval;
use tracing::warn;

pub struct RoundService {
    engine: Arc<Mutex<RoundEngine>>,
    tick_interval: Duration,
}

impl RoundService {
    /// Build a service from config and a persistence backend.
    pub fn new(config: GameConfig, store: Arc<dyn KeyValueStore>) -> Result<Arc<Self>, GameError> {
        let balance = BalanceStore::load(store, config.storage.initial_balance)?;
        Ok(Self::from_engine(RoundEngine::new(config, balance)))
    }

    /// Wrap an already-built engine (tests inject samplers this way).
    pub fn from_engine(engine: RoundEngine) -> Arc<Self> {
        let tick_interval = engine.tick_interval();
        Arc::new(Self {
            engine: Arc::new(Mutex::new(engine)),
            tick_interval,
        })
    }

    pub async fn subscribe(&self) -> broadcast::Receiver<GameEvent> {
        self.engine.lock().await.subscribe()
    }

    pub async fn snapshot(&self) -> RoundSnapshot {
        self.engine.lock().await.snapshot()
    }

    pub async fn transactions(&self) -> Vec<Transaction> {
        self.engine.lock().await.ledger().to_vec()
    }

    pub async fn ai_players(&self) -> (Vec<AiPlayer>, u64) {
        let engine = self.engine.lock().await;
        (engine.ai_players().to_vec(), engine.ai_total_bets())
    }

    pub async fn place_bet(&self, slot: usize, amount: f64) -> Result<f64, GameError> {
        self.engine.lock().await.place_bet(slot, amount)
    }

    pub async fn cashout(&self, slot: usize) -> Result<Option<CashoutReceipt>, GameError> {
        self.engine.lock().await.cashout(slot)
    }

    pub async fn deposit(&self, amount: f64) -> Result<f64, GameError> {
        self.engine.lock().await.deposit(amount)
    }

    /// Start a round and spawn its tick task.
    ///
    /// The engine's own reentrancy guard runs under the lock, so two
    /// concurrent starts cannot both spawn a loop.
    pub async fn start(&self, slot: usize) -> Result<RoundStartedInfo, GameError> {
        let info = self.engine.lock().await.start(slot)?;

        let engine = Arc::clone(&self.engine);
        let tick_interval = self.tick_interval;
        tokio::spawn(async move {
            let mut ticker = interval(tick_interval);
            // A tokio interval fires immediately; consume that so the
            // multiplier holds at 1.00 for one full interval first.
            ticker.tick().await;
            loop {
                ticker.tick().await;
                match engine.lock().await.tick() {
                    TickOutcome::Advanced { .. } => {}
                    TickOutcome::Crashed { .. } => break,
                    TickOutcome::Idle => {
                        warn!("tick task found no running round; stopping");
                        break;
                    }
                }
            }
        });

        Ok(info)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::crash_point::FixedCrashSampler;
    use crate::storage::MemoryStore;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn service_with_crash_at(crash_point: f64) -> Arc<RoundService> {
        let store = Arc::new(MemoryStore::new());
        let balance = BalanceStore::load(store, 50.0).unwrap();
        let engine = RoundEngine::with_parts(
            GameConfig::default(),
            balance,
            Box::new(FixedCrashSampler(crash_point)),
            StdRng::seed_from_u64(3),
        );
        RoundService::from_engine(engine)
    }

    #[tokio::test]
    async fn test_round_runs_to_crash() {
        let service = service_with_crash_at(1.1);
        let mut events = service.subscribe().await;

        service.place_bet(0, 20.0).await.unwrap();
        let info = service.start(0).await.unwrap();
        assert!(info.players >= 25);

        // 1.00 -> 1.10 in 0.02 steps is five ticks at 50ms each
        let crashed = tokio::time::timeout(Duration::from_secs(2), async {
            loop {
                match events.recv().await {
                    Ok(GameEvent::RoundCrashed { crash_point }) => return crash_point,
                    Ok(_) => {}
                    Err(err) => panic!("event stream closed: {}", err),
                }
            }
        })
        .await
        .expect("round did not crash in time");

        assert_eq!(crashed, 1.1);
        let snapshot = service.snapshot().await;
        assert_eq!(snapshot.balance, 30.0);
        assert_eq!(snapshot.last_crash_point, Some(1.1));
    }

    #[tokio::test]
    async fn test_second_start_is_rejected_while_running() {
        let service = service_with_crash_at(5.0);
        service.place_bet(0, 20.0).await.unwrap();
        service.start(0).await.unwrap();

        let err = service.start(0).await.unwrap_err();
        assert!(matches!(err, GameError::RoundInProgress));
    }
}
