//! GardenSync Server Binary
//!
//! Starts the TCP server for GardenSync.

use std::sync::Arc;

use clap::Parser;
use gardensync::network::Server;
use gardensync::{Config, Engine};
use tracing_subscriber::{fmt, EnvFilter};

/// GardenSync Server
#[derive(Parser, Debug)]
#[command(name = "gardensync-server")]
#[command(about = "Garden plant store with spreadsheet snapshot sync")]
#[command(version)]
struct Args {
    /// SQLite database file
    #[arg(short, long, default_value = "./garden.db")]
    db: String,

    /// Listen address (host:port)
    #[arg(short, long, default_value = "127.0.0.1:7878")]
    listen: String,

    /// Maximum concurrent connections
    #[arg(short, long, default_value = "256")]
    max_connections: usize,

    /// Worker threads serving connections
    #[arg(short, long, default_value = "8")]
    workers: usize,

    /// SQLite busy timeout in milliseconds
    #[arg(long, default_value = "5000")]
    busy_timeout_ms: u64,
}

fn main() {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,gardensync=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .init();

    let args = Args::parse();

    tracing::info!("GardenSync Server v{}", gardensync::VERSION);
    tracing::info!("Database: {}", args.db);
    tracing::info!("Listen address: {}", args.listen);

    let config = Config::builder()
        .db_path(&args.db)
        .listen_addr(&args.listen)
        .max_connections(args.max_connections)
        .worker_threads(args.workers)
        .busy_timeout_ms(args.busy_timeout_ms)
        .build();

    let engine = match Engine::open(config.clone()) {
        Ok(e) => Arc::new(e),
        Err(e) => {
            tracing::error!("Failed to open engine: {}", e);
            std::process::exit(1);
        }
    };

    tracing::info!("Engine initialized successfully");

    let server = match Server::bind(config, engine) {
        Ok(s) => s,
        Err(e) => {
            tracing::error!("Failed to start server: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = server.run() {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }

    tracing::info!("Server stopped");
}
