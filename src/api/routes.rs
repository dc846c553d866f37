//! Route Definitions
//!
//! Maps URLs to handlers with type-safe routing.

use super::{handlers::*, websocket::websocket_handler};
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

/// Build the API router with all endpoints
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health_handler))
        // Table reads
        .route("/api/game", get(snapshot_handler))
        .route("/api/game/players", get(players_handler))
        .route("/api/game/transactions", get(transactions_handler))
        // Table commands
        .route("/api/game/bets", post(place_bet_handler))
        .route("/api/game/start", post(start_round_handler))
        .route("/api/game/cashout", post(cashout_handler))
        .route("/api/game/deposit", post(deposit_handler))
        // WebSocket event stream
        .route("/ws", get(websocket_handler))
        // Attach shared state
        .with_state(state)
}
