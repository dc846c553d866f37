//! API Request/Response Models
//!
//! DTOs for the table endpoints. The AI roster view deliberately omits
//! each player's planned cashout — intentions, like the live crash point,
//! are never visible to participants.

use crate::engine::players::AiPlayer;
use crate::engine::round::{CashoutReceipt, RoundStartedInfo};
use crate::ledger::Transaction;
use serde::{Deserialize, Serialize};

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Place a bet on a slot
#[derive(Debug, Clone, Deserialize)]
pub struct PlaceBetRequest {
    pub slot: usize,
    pub amount: f64,
}

/// Start the round on behalf of a slot holding a bet
#[derive(Debug, Clone, Deserialize)]
pub struct StartRoundRequest {
    pub slot: usize,
}

/// Cash out a slot
#[derive(Debug, Clone, Deserialize)]
pub struct CashoutRequest {
    pub slot: usize,
}

/// Deposit funds
#[derive(Debug, Clone, Deserialize)]
pub struct DepositRequest {
    pub amount: f64,
}

/// Balance after a bet or deposit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BalanceResponse {
    pub balance: f64,
}

/// Round acceptance details
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StartRoundResponse {
    pub players: usize,
    pub total_ai_bets: u64,
}

impl From<RoundStartedInfo> for StartRoundResponse {
    fn from(info: RoundStartedInfo) -> Self {
        Self {
            players: info.players,
            total_ai_bets: info.total_ai_bets,
        }
    }
}

/// Outcome of a cashout attempt
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CashoutResponse {
    pub cashed_out: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub receipt: Option<CashoutReceipt>,
}

/// Ledger listing, most-recent-first
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionsResponse {
    pub transactions: Vec<Transaction>,
}

/// One AI participant as shown at the table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiPlayerView {
    pub id: String,
    pub bet: u32,
    pub cashed_out: bool,
}

impl From<&AiPlayer> for AiPlayerView {
    fn from(player: &AiPlayer) -> Self {
        Self {
            id: player.id.clone(),
            bet: player.bet,
            cashed_out: player.cashed_out,
        }
    }
}

/// AI roster for the current round
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayersResponse {
    pub players: Vec<AiPlayerView>,
    pub total_bets: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roster_view_hides_planned_cashout() {
        let player = AiPlayer {
            id: "211***305".to_string(),
            bet: 42,
            planned_cashout: Some(2.5),
            cashed_out: false,
        };
        let view = AiPlayerView::from(&player);
        let json = serde_json::to_value(&view).unwrap();

        assert_eq!(json["id"], "211***305");
        assert_eq!(json["bet"], 42);
        assert!(json.get("planned_cashout").is_none());
    }
}
