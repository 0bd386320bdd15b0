//! scpstats Backend Binary
//!
//! Connects to the game server's event feed and persists player statistics.

use std::path::PathBuf;

use clap::Parser;
use scpstats::config::DEFAULT_CONFIG_FILE;
use scpstats::network::serve;
use scpstats::{Config, MemoryRepository, SqliteRepository, StorageBackend};
use tracing_subscriber::{fmt, EnvFilter};

/// scpstats Backend
#[derive(Parser, Debug)]
#[command(name = "scpstats")]
#[command(about = "Player statistics backend for the game server event feed")]
#[command(version)]
struct Args {
    /// key=value config file (must provide `port` unless --port is given)
    #[arg(short, long, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Feed host, overrides the config file
    #[arg(long)]
    host: Option<String>,

    /// Feed port, overrides the config file
    #[arg(short, long)]
    port: Option<u16>,

    /// SQLite database path, overrides the config file
    #[arg(short, long)]
    database: Option<PathBuf>,

    /// Keep statistics in memory only
    #[arg(long, conflicts_with = "database")]
    memory: bool,
}

fn main() {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,scpstats=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();

    let args = Args::parse();

    tracing::info!("scpstats v{}", scpstats::VERSION);

    let config = match load_config(&args) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    tracing::info!("Feed address: {}", config.feed_addr());

    let served = match &config.storage {
        StorageBackend::Sqlite(path) => {
            tracing::info!("Database: {}", path.display());
            let repository = match SqliteRepository::open(path) {
                Ok(r) => r,
                Err(e) => {
                    tracing::error!("Failed to open storage: {}", e);
                    std::process::exit(1);
                }
            };
            serve(&config, repository)
        }
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory storage; statistics are lost on exit");
            serve(&config, MemoryRepository::new())
        }
    };

    match served {
        Ok(summary) => tracing::info!(
            "Feed closed after {} frames ({} applied, {} failed)",
            summary.frames,
            summary.applied,
            summary.failed
        ),
        Err(e) => {
            tracing::error!("Failed to connect to feed: {}", e);
            std::process::exit(1);
        }
    }
}

/// Config file first, then command-line overrides
fn load_config(args: &Args) -> scpstats::Result<Config> {
    let mut config = match Config::from_file(&args.config) {
        Ok(config) => config,
        Err(e) if args.port.is_some() => {
            tracing::debug!("Ignoring config file: {}", e);
            Config::default()
        }
        Err(e) => return Err(e),
    };

    if let Some(host) = &args.host {
        config.host = host.clone();
    }
    if let Some(port) = args.port {
        config.port = port;
    }
    if let Some(database) = &args.database {
        config.storage = StorageBackend::Sqlite(database.clone());
    }
    if args.memory {
        config.storage = StorageBackend::Memory;
    }

    Ok(config)
}
