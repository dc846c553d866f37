//! Request Handlers
//!
//! Thin translation between HTTP and the round service; all game rules
//! live in the engine.

use super::{errors::ApiError, middleware::RequestId, models::*};
use crate::service::RoundService;
use axum::{extract::State, Extension, Json};
use std::sync::Arc;

/// Shared application state
pub struct AppState {
    pub service: Arc<RoundService>,
    pub version: String,
}

/// Health check handler
/// GET /health
pub async fn health_handler(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "Running".to_string(),
        version: state.version.clone(),
    })
}

/// Table snapshot: round state, multiplier, balance, previous crash point
/// GET /api/game
pub async fn snapshot_handler(
    State(state): State<Arc<AppState>>,
) -> Json<crate::engine::round::RoundSnapshot> {
    Json(state.service.snapshot().await)
}

/// AI roster for the current round
/// GET /api/game/players
pub async fn players_handler(State(state): State<Arc<AppState>>) -> Json<PlayersResponse> {
    let (players, total_bets) = state.service.ai_players().await;
    Json(PlayersResponse {
        players: players.iter().map(AiPlayerView::from).collect(),
        total_bets,
    })
}

/// Ledger, most-recent-first
/// GET /api/game/transactions
pub async fn transactions_handler(
    State(state): State<Arc<AppState>>,
) -> Json<TransactionsResponse> {
    Json(TransactionsResponse {
        transactions: state.service.transactions().await,
    })
}

/// Place a bet on a slot
/// POST /api/game/bets
pub async fn place_bet_handler(
    Extension(request_id): Extension<RequestId>,
    State(state): State<Arc<AppState>>,
    Json(request): Json<PlaceBetRequest>,
) -> Result<Json<BalanceResponse>, ApiError> {
    let balance = state
        .service
        .place_bet(request.slot, request.amount)
        .await
        .map_err(|e| ApiError::from_game_error(request_id.0.clone(), e))?;

    Ok(Json(BalanceResponse { balance }))
}

/// Start the round
/// POST /api/game/start
pub async fn start_round_handler(
    Extension(request_id): Extension<RequestId>,
    State(state): State<Arc<AppState>>,
    Json(request): Json<StartRoundRequest>,
) -> Result<Json<StartRoundResponse>, ApiError> {
    let info = state
        .service
        .start(request.slot)
        .await
        .map_err(|e| ApiError::from_game_error(request_id.0.clone(), e))?;

    Ok(Json(info.into()))
}

/// Cash out a slot
/// POST /api/game/cashout
pub async fn cashout_handler(
    Extension(request_id): Extension<RequestId>,
    State(state): State<Arc<AppState>>,
    Json(request): Json<CashoutRequest>,
) -> Result<Json<CashoutResponse>, ApiError> {
    let receipt = state
        .service
        .cashout(request.slot)
        .await
        .map_err(|e| ApiError::from_game_error(request_id.0.clone(), e))?;

    Ok(Json(CashoutResponse {
        cashed_out: receipt.is_some(),
        receipt,
    }))
}

/// Deposit funds
/// POST /api/game/deposit
pub async fn deposit_handler(
    Extension(request_id): Extension<RequestId>,
    State(state): State<Arc<AppState>>,
    Json(request): Json<DepositRequest>,
) -> Result<Json<BalanceResponse>, ApiError> {
    let balance = state
        .service
        .deposit(request.amount)
        .await
        .map_err(|e| ApiError::from_game_error(request_id.0.clone(), e))?;

    Ok(Json(BalanceResponse { balance }))
}
