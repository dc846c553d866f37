//! Skyrush table server binary
//!
//! Wires config, persistence, the round service, and the HTTP/WebSocket
//! API together.

use clap::Parser;
use skyrush::api::{ApiConfig, ApiServer};
use skyrush::config::GameConfig;
use skyrush::service::RoundService;
use skyrush::storage::{KeyValueStore, MemoryStore, RocksStore};
use std::sync::Arc;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "skyrush")]
#[command(about = "Crash-game table server", long_about = None)]
struct Args {
    /// API server host
    #[arg(long, default_value = "0.0.0.0")]
    host: String,

    /// API server port
    #[arg(long, default_value = "8080")]
    port: u16,

    /// Balance database directory
    #[arg(long, default_value = "./data/skyrush")]
    data_dir: String,

    /// Keep the balance in memory only (nothing survives a restart)
    #[arg(long)]
    ephemeral: bool,

    /// Run the compact single-seat table (1 slot, 10-24 AI players)
    #[arg(long)]
    compact: bool,

    /// Allowed CORS origins (comma-separated, use * for all)
    #[arg(long, default_value = "*")]
    cors_origins: String,

    /// Request timeout in seconds
    #[arg(long, default_value = "30")]
    timeout: u64,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "skyrush=info,tower_http=info".into()),
        )
        .init();

    let mut game_config = if args.compact {
        GameConfig::compact()
    } else {
        GameConfig::default()
    };
    game_config.storage.data_directory = args.data_dir.clone();
    game_config.validate()?;

    let store: Arc<dyn KeyValueStore> = if args.ephemeral {
        info!("ephemeral mode: balance will not be persisted");
        Arc::new(MemoryStore::new())
    } else {
        info!("opening balance store: {}", game_config.storage.data_directory);
        Arc::new(RocksStore::open(&game_config.storage.data_directory)?)
    };

    let service = RoundService::new(game_config, store)?;

    let allowed_origins: Vec<String> = args
        .cors_origins
        .split(',')
        .map(|s| s.trim().to_string())
        .collect();

    let api_config = ApiConfig {
        host: args.host,
        port: args.port,
        allowed_origins,
        request_timeout_secs: args.timeout,
        ..Default::default()
    };

    ApiServer::new(api_config, service).run().await
}
