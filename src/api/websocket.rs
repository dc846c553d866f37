//! WebSocket Support for Real-time Table Events
//!
//! Streams the engine's domain events (`round_started`, `tick`,
//! `player_cashed_out`, `round_crashed`) to connected clients as JSON.
//! Clients that fall behind the broadcast buffer are told how many events
//! they missed and keep receiving from the live edge.

use super::handlers::AppState;
use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::Response,
};
use futures_util::{SinkExt, StreamExt};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, warn};

/// Out-of-band notice sent when a client lags the event buffer
#[derive(Debug, Serialize)]
struct LaggedNotice {
    r#type: &'static str,
    skipped: u64,
}

/// WebSocket upgrade handler
/// GET /ws
pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let mut events = state.service.subscribe().await;
    let (mut sender, mut receiver) = socket.split();

    debug!("websocket client connected");

    loop {
        tokio::select! {
            event = events.recv() => {
                let payload = match event {
                    Ok(event) => match serde_json::to_string(&event) {
                        Ok(json) => json,
                        Err(err) => {
                            warn!("failed to serialize event: {}", err);
                            continue;
                        }
                    },
                    Err(RecvError::Lagged(skipped)) => {
                        match serde_json::to_string(&LaggedNotice { r#type: "lagged", skipped }) {
                            Ok(json) => json,
                            Err(_) => continue,
                        }
                    }
                    Err(RecvError::Closed) => break,
                };

                if sender.send(Message::Text(payload)).await.is_err() {
                    break;
                }
            }

            message = receiver.next() => {
                match message {
                    Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                    Some(Ok(Message::Ping(data))) => {
                        if sender.send(Message::Pong(data)).await.is_err() {
                            break;
                        }
                    }
                    // This stream is one-way; ignore anything else
                    Some(Ok(_)) => {}
                }
            }
        }
    }

    debug!("websocket client disconnected");
}
