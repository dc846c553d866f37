//! Simulated crowd
//!
//! A fresh batch of AI players is generated for every round and discarded
//! at round end. Roughly 40% of them plan a cashout somewhere in the low
//! multipliers; the rest ride to the crash. Their winnings are simulated
//! crowd activity only — nothing here touches the balance store.

use crate::config::AiPoolConfig;
use crate::round2;
use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};

/// One simulated participant, alive for a single round
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiPlayer {
    /// Masked display identifier. NOT unique — collisions are acceptable
    /// because players never outlive the round.
    pub id: String,
    pub bet: u32,
    /// Multiplier this player intends to cash out at; `None` rides to crash
    pub planned_cashout: Option<f64>,
    pub cashed_out: bool,
}

/// An AI player locking in winnings mid-round
#[derive(Debug, Clone, PartialEq)]
pub struct CashoutEvent {
    pub player: String,
    pub bet: u32,
    pub at: f64,
    pub won: f64,
}

/// An AI player settled as a loss at crash
#[derive(Debug, Clone, PartialEq)]
pub struct LossEvent {
    pub player: String,
    pub bet: u32,
}

#[derive(Debug, Default)]
pub struct PlayerPool {
    players: Vec<AiPlayer>,
}

impl PlayerPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Generate a fresh crowd for the round, replacing the previous one.
    pub fn populate(&mut self, config: &AiPoolConfig, rng: &mut dyn RngCore) {
        let count = rng.gen_range(config.min_players..=config.max_players);
        self.players = (0..count)
            .map(|_| {
                let planned_cashout = if rng.gen::<f64>() < config.cashout_probability {
                    let span = config.cashout_ceiling - config.cashout_floor;
                    Some(round2(config.cashout_floor + rng.gen::<f64>() * span))
                } else {
                    None
                };

                AiPlayer {
                    id: masked_id(rng),
                    bet: rng.gen_range(config.min_bet..=config.max_bet),
                    planned_cashout,
                    cashed_out: false,
                }
            })
            .collect();
    }

    /// Sweep the crowd at the current multiplier.
    ///
    /// A player cashes out when their planned multiplier has been reached
    /// and the round has not yet crashed (`multiplier < crash_point` keeps
    /// the sweep from paying out on the crash tick itself).
    pub fn tick(&mut self, multiplier: f64, crash_point: f64) -> Vec<CashoutEvent> {
        let mut events = Vec::new();
        for player in &mut self.players {
            let planned = match player.planned_cashout {
                Some(planned) if !player.cashed_out => planned,
                _ => continue,
            };
            if planned <= multiplier && multiplier < crash_point {
                player.cashed_out = true;
                events.push(CashoutEvent {
                    player: player.id.clone(),
                    bet: player.bet,
                    at: multiplier,
                    won: round2(player.bet as f64 * multiplier),
                });
            }
        }
        events
    }

    /// Settle everyone still in the air. Called once, at crash.
    pub fn settle_losses(&self) -> Vec<LossEvent> {
        self.players
            .iter()
            .filter(|p| !p.cashed_out)
            .map(|p| LossEvent {
                player: p.id.clone(),
                bet: p.bet,
            })
            .collect()
    }

    pub fn total_bets(&self) -> u64 {
        self.players.iter().map(|p| p.bet as u64).sum()
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub fn players(&self) -> &[AiPlayer] {
        &self.players
    }
}

/// Fixed-format pseudo-identifier, e.g. `211***482`.
fn masked_id(rng: &mut dyn RngCore) -> String {
    format!("211***{}", rng.gen_range(100..1000))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn pool_with_seed(seed: u64) -> PlayerPool {
        let mut pool = PlayerPool::new();
        let mut rng = StdRng::seed_from_u64(seed);
        pool.populate(&AiPoolConfig::default(), &mut rng);
        pool
    }

    #[test]
    fn test_populate_respects_config_bounds() {
        let config = AiPoolConfig::default();
        for seed in 0..20 {
            let pool = pool_with_seed(seed);
            let count = pool.len() as u32;
            assert!(count >= config.min_players && count <= config.max_players);

            for player in pool.players() {
                assert!(player.bet >= config.min_bet && player.bet <= config.max_bet);
                assert!(player.id.starts_with("211***"));
                assert!(!player.cashed_out);
                if let Some(planned) = player.planned_cashout {
                    assert!(planned >= config.cashout_floor);
                    assert!(planned < config.cashout_ceiling + 0.01);
                }
            }
        }
    }

    #[test]
    fn test_tick_cashes_out_reached_plans_only() {
        let mut pool = pool_with_seed(3);
        let events = pool.tick(2.0, 10.0);

        for event in &events {
            assert_eq!(event.at, 2.0);
            assert_eq!(event.won, round2(event.bet as f64 * 2.0));
        }

        let expected = pool
            .players()
            .iter()
            .filter(|p| p.cashed_out)
            .count();
        assert_eq!(events.len(), expected);

        // A second sweep at the same multiplier pays nobody twice
        assert!(pool.tick(2.0, 10.0).is_empty());
    }

    #[test]
    fn test_no_cashouts_on_the_crash_tick() {
        let mut pool = pool_with_seed(11);
        assert!(pool.tick(3.0, 3.0).is_empty());
    }

    #[test]
    fn test_every_player_settles_exactly_once() {
        let mut pool = pool_with_seed(5);
        let total = pool.len();

        let mut cashouts = 0;
        let mut multiplier = 1.0;
        let crash_point = 9.5;
        while multiplier < crash_point {
            cashouts += pool.tick(multiplier, crash_point).len();
            multiplier = round2(multiplier + 0.02);
        }
        let losses = pool.settle_losses().len();

        assert_eq!(cashouts + losses, total);
    }

    #[test]
    fn test_populate_replaces_previous_round() {
        let mut pool = pool_with_seed(8);
        let mut rng = StdRng::seed_from_u64(9);
        pool.tick(5.0, 9.0);

        pool.populate(&AiPoolConfig::default(), &mut rng);
        assert!(pool.players().iter().all(|p| !p.cashed_out));
    }
}
