//! Table API Service
//!
//! HTTP + WebSocket surface for the crash table. The simulation core never
//! renders; everything a client needs arrives through these endpoints and
//! the `/ws` event stream.

pub mod errors;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod server;
pub mod websocket;

pub use server::{ApiConfig, ApiServer};
