//! End-to-end round lifecycle scenarios driven through the crate's public
//! API, with a fixed crash sampler so every run settles identically.

use rand::rngs::StdRng;
use rand::SeedableRng;
use skyrush::{
    BalanceStore, FixedCrashSampler, GameConfig, GameError, GameEvent, KeyValueStore, MemoryStore,
    RoundEngine, RoundService, RoundState, TickOutcome, Transaction,
};
use std::sync::Arc;
use std::time::Duration;

fn engine_with(store: Arc<dyn KeyValueStore>, crash_point: f64) -> RoundEngine {
    let balance = BalanceStore::load(store, 50.0).expect("load balance");
    RoundEngine::with_parts(
        GameConfig::default(),
        balance,
        Box::new(FixedCrashSampler(crash_point)),
        StdRng::seed_from_u64(42),
    )
}

fn fresh_engine(crash_point: f64) -> RoundEngine {
    engine_with(Arc::new(MemoryStore::new()), crash_point)
}

fn human_entries<'a>(
    transactions: &'a [Transaction],
    label: &'a str,
) -> impl Iterator<Item = &'a Transaction> {
    transactions.iter().filter(move |tx| match tx {
        Transaction::Cashout { player, .. } | Transaction::Loss { player, .. } => player == label,
        Transaction::Deposit { .. } => false,
    })
}

#[test]
fn cashout_midflight_credits_the_balance_once() {
    let mut engine = fresh_engine(3.4);

    // balance 50.00, bet 20 -> 30.00
    assert_eq!(engine.place_bet(0, 20.0).unwrap(), 30.0);
    engine.start(0).unwrap();

    // 1.00 rises to exactly 2.00 in fifty 0.02 steps
    for _ in 0..50 {
        match engine.tick() {
            TickOutcome::Advanced { .. } => {}
            outcome => panic!("round ended early: {:?}", outcome),
        }
    }
    assert_eq!(engine.multiplier(), 2.0);

    let receipt = engine.cashout(0).unwrap().expect("receipt");
    assert_eq!(receipt.bet, 20.0);
    assert_eq!(receipt.at, 2.0);
    assert_eq!(receipt.won, 40.0);
    assert_eq!(receipt.balance, 70.0);
    assert_eq!(engine.balance_amount(), 70.0);

    let transactions = engine.ledger().to_vec();
    let entries: Vec<_> = human_entries(&transactions, "Player1").collect();
    assert_eq!(entries.len(), 1);
    assert_eq!(
        entries[0],
        &Transaction::Cashout {
            player: "Player1".to_string(),
            bet: 20.0,
            at: 2.0,
            won: 40.0,
        }
    );

    // A second cashout changes nothing
    assert!(matches!(
        engine.cashout(0),
        Err(GameError::AlreadyCashedOut(0))
    ));
    assert_eq!(engine.balance_amount(), 70.0);
    let transactions = engine.ledger().to_vec();
    assert_eq!(human_entries(&transactions, "Player1").count(), 1);
}

#[test]
fn riding_to_the_crash_settles_as_a_loss() {
    let mut engine = fresh_engine(3.4);

    engine.place_bet(0, 20.0).unwrap();
    engine.start(0).unwrap();

    let mut last = 1.0;
    let crash_point = loop {
        match engine.tick() {
            TickOutcome::Advanced { multiplier } => {
                assert!(multiplier > last, "multiplier must be strictly increasing");
                last = multiplier;
            }
            TickOutcome::Crashed { crash_point } => break crash_point,
            TickOutcome::Idle => panic!("round vanished"),
        }
    };

    assert_eq!(crash_point, 3.4);
    assert_eq!(engine.state(), RoundState::Crashed);
    assert_eq!(engine.balance_amount(), 30.0);

    let transactions = engine.ledger().to_vec();
    let entries: Vec<_> = human_entries(&transactions, "Player1").collect();
    assert_eq!(entries.len(), 1);
    assert_eq!(
        entries[0],
        &Transaction::Loss {
            player: "Player1".to_string(),
            bet: 20.0,
        }
    );
}

#[test]
fn every_ai_player_settles_exactly_once() {
    let mut engine = fresh_engine(3.4);
    engine.place_bet(0, 20.0).unwrap();
    engine.start(0).unwrap();

    while !matches!(engine.tick(), TickOutcome::Crashed { .. }) {}

    let crowd = engine.ai_players().len();
    let transactions = engine.ledger().to_vec();
    let ai_settlements = transactions
        .iter()
        .filter(|tx| match tx {
            Transaction::Cashout { player, .. } | Transaction::Loss { player, .. } => {
                player.starts_with("211***")
            }
            Transaction::Deposit { .. } => false,
        })
        .count();

    assert_eq!(ai_settlements, crowd);

    // Cashouts only ever happen strictly below the crash point
    for tx in &transactions {
        if let Transaction::Cashout { at, .. } = tx {
            assert!(*at < 3.4);
        }
    }
}

#[test]
fn starting_a_round_clears_previous_history() {
    let mut engine = fresh_engine(1.1);

    engine.deposit(100.0).unwrap();
    engine.place_bet(0, 20.0).unwrap();
    engine.start(0).unwrap();
    assert!(engine.ledger().is_empty());

    while !matches!(engine.tick(), TickOutcome::Crashed { .. }) {}
    assert!(!engine.ledger().is_empty());

    engine.place_bet(0, 20.0).unwrap();
    engine.start(0).unwrap();
    assert!(engine.ledger().is_empty());
}

#[test]
fn rejected_bets_leave_the_balance_alone() {
    let mut engine = fresh_engine(2.0);

    assert!(matches!(
        engine.place_bet(0, 5.0),
        Err(GameError::BetBelowMinimum { .. })
    ));
    assert!(matches!(
        engine.place_bet(0, 80.0),
        Err(GameError::InsufficientBalance { .. })
    ));
    assert!(matches!(
        engine.place_bet(0, f64::NAN),
        Err(GameError::InvalidAmount)
    ));
    assert_eq!(engine.balance_amount(), 50.0);

    // Boundary: betting the whole balance is allowed
    assert_eq!(engine.place_bet(0, 50.0).unwrap(), 0.0);
}

#[test]
fn deposit_bounds_are_inclusive() {
    let mut engine = fresh_engine(2.0);

    assert!(engine.deposit(19.0).is_err());
    assert!(engine.deposit(60_001.0).is_err());
    assert_eq!(engine.balance_amount(), 50.0);

    assert_eq!(engine.deposit(20.0).unwrap(), 70.0);
    assert_eq!(engine.deposit(60_000.0).unwrap(), 60_070.0);
}

#[test]
fn balance_survives_an_engine_restart() {
    let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());

    {
        let mut engine = engine_with(Arc::clone(&store), 2.0);
        engine.place_bet(0, 20.0).unwrap();
        assert_eq!(engine.balance_amount(), 30.0);
    }

    let engine = engine_with(store, 2.0);
    assert_eq!(engine.balance_amount(), 30.0);
}

#[tokio::test]
async fn service_runs_a_full_round_on_the_tick_clock() {
    let store = Arc::new(MemoryStore::new());
    let balance = BalanceStore::load(store, 50.0).unwrap();
    let engine = RoundEngine::with_parts(
        GameConfig::default(),
        balance,
        Box::new(FixedCrashSampler(1.2)),
        StdRng::seed_from_u64(7),
    );
    let service = RoundService::from_engine(engine);
    let mut events = service.subscribe().await;

    service.place_bet(0, 20.0).await.unwrap();
    service.start(0).await.unwrap();

    let collected = tokio::time::timeout(Duration::from_secs(2), async {
        let mut collected = Vec::new();
        loop {
            let event = events.recv().await.expect("event stream open");
            let done = matches!(event, GameEvent::RoundCrashed { .. });
            collected.push(event);
            if done {
                break;
            }
        }
        collected
    })
    .await
    .expect("round did not finish in time");

    assert!(matches!(collected[0], GameEvent::RoundStarted { .. }));
    assert!(matches!(
        collected.last(),
        Some(GameEvent::RoundCrashed { crash_point }) if *crash_point == 1.2
    ));

    // 1.00 -> 1.20 in 0.02 steps: exactly ten ticks
    let ticks = collected
        .iter()
        .filter(|e| matches!(e, GameEvent::Tick { .. }))
        .count();
    assert_eq!(ticks, 10);

    let snapshot = service.snapshot().await;
    assert_eq!(snapshot.state, RoundState::Crashed);
    assert_eq!(snapshot.balance, 30.0);
    assert_eq!(snapshot.last_crash_point, Some(1.2));
}
