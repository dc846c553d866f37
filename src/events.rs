//! Domain events emitted by the round engine
//!
//! The engine carries no rendering or audio dependency; everything a
//! presentation layer needs to animate a round arrives through these
//! events. Note the crash point only ever appears in `RoundCrashed` —
//! while a round is running it is nobody's business.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum GameEvent {
    /// A round was accepted and the crowd generated
    #[serde(rename = "round_started")]
    RoundStarted { players: usize, total_ai_bets: u64 },

    /// The multiplier advanced one step
    #[serde(rename = "tick")]
    Tick { multiplier: f64 },

    /// A participant (human or AI) locked in winnings
    #[serde(rename = "player_cashed_out")]
    PlayerCashedOut {
        player: String,
        bet: f64,
        at: f64,
        won: f64,
    },

    /// The round terminated at the realized crash point
    #[serde(rename = "round_crashed")]
    RoundCrashed { crash_point: f64 },
}
