//! Stakehouse service binary
//!
//! Loads configuration, opens the ledger, builds the payout engine,
//! and serves the HTTP API.

use clap::Parser;
use stakehouse::{
    api::{handlers::AppState, ApiServer},
    config::ServiceConfig,
    games::{BetResolver, ThreadRandom},
    ledger::LedgerStore,
};
use std::{path::PathBuf, sync::Arc};
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "stakehouse")]
#[command(about = "Stakehouse wagering service", long_about = None)]
struct Args {
    /// Path to a TOML configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the server host
    #[arg(long)]
    host: Option<String>,

    /// Override the server port
    #[arg(long)]
    port: Option<u16>,

    /// Override the ledger database directory
    #[arg(long)]
    db_path: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "stakehouse=info,tower_http=info".into()),
        )
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => ServiceConfig::load(path)?,
        None => ServiceConfig::default(),
    };
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(db_path) = args.db_path {
        config.storage.data_dir = db_path;
    }
    config.validate()?;

    info!(
        data_dir = %config.storage.data_dir,
        variant = ?config.game.variant,
        "starting stakehouse"
    );

    let store = Arc::new(LedgerStore::open(&config.storage.data_dir)?);
    let engine = Arc::new(config.game.build_engine()?);
    let resolver = Arc::new(BetResolver::new(store, engine, Arc::new(ThreadRandom)));

    let state = Arc::new(AppState {
        resolver,
        initial_balance: config.game.initial_balance,
    });

    ApiServer::new(config.server.clone(), state).run().await
}
