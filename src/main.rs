//! # Hadith API Server Driver
//!
//! ## Purpose
//! Main entry point for the Hadith API server: parses arguments, loads
//! configuration, initializes logging, loads every collection document
//! into memory, and serves the API until interrupted.
//!
//! ## Architecture Flow
//! 1. Parse command line arguments and load configuration
//! 2. Initialize logging and tracing
//! 3. Load all collection documents (fatal on any malformed file)
//! 4. Start the web API server
//! 5. Handle shutdown signals gracefully

use clap::{Arg, Command};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, Layer};

use hadith_api::{
    api::ApiServer,
    config::Config,
    errors::{ApiError, Result},
    loader::CollectionRegistry,
    AppState,
};

#[tokio::main]
async fn main() -> Result<()> {
    let matches = Command::new("hadith-api-server")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Read-only REST API over Hadith collection documents")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Configuration file path")
                .default_value("config.toml"),
        )
        .arg(
            Arg::new("port")
                .short('p')
                .long("port")
                .value_name("PORT")
                .help("Server port")
                .value_parser(clap::value_parser!(u16)),
        )
        .arg(
            Arg::new("data-dir")
                .short('d')
                .long("data-dir")
                .value_name("DIR")
                .help("Directory of collection JSON documents"),
        )
        .get_matches();

    let config_path = matches.get_one::<String>("config").unwrap();
    let mut config = Config::from_file(config_path)?;

    if let Some(port) = matches.get_one::<u16>("port") {
        config.server.port = *port;
    }
    if let Some(data_dir) = matches.get_one::<String>("data-dir") {
        config.data.data_dir = PathBuf::from(data_dir);
    }

    let config = Arc::new(config);

    init_logging(&config)?;

    info!("Starting Hadith API v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration loaded from: {}", config_path);

    // Load phase: sequential, once, before any traffic. A bad file aborts
    // startup; there is no partial-availability mode.
    let registry = CollectionRegistry::load(&config.data.data_dir, &config.data.translated_suffix)?;
    if registry.is_empty() {
        warn!("No collections found in {:?}", config.data.data_dir);
    } else {
        info!("Loaded {} collections", registry.len());
    }

    let app_state = AppState {
        config: config.clone(),
        registry: Arc::new(registry),
    };

    let server = ApiServer::new(app_state);
    let server_handle = tokio::spawn(async move {
        if let Err(e) = server.run().await {
            error!("Server error: {}", e);
        }
    });

    info!(
        "Hadith API started on {}:{}",
        config.server.host, config.server.port
    );

    tokio::select! {
        _ = signal::ctrl_c() => {
            info!("Received SIGINT, shutting down gracefully...");
        }
        _ = server_handle => {
            warn!("Server stopped unexpectedly");
        }
    }

    info!("Hadith API shut down");
    Ok(())
}

/// Initialize logging and tracing
fn init_logging(config: &Config) -> Result<()> {
    let log_level: tracing::Level =
        config.logging.level.parse().map_err(|_| ApiError::Config {
            message: format!("Invalid log level: {}", config.logging.level),
        })?;
    let filter = tracing_subscriber::filter::LevelFilter::from_level(log_level);

    if config.logging.json_format {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .json()
                    .with_filter(filter),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_filter(filter),
            )
            .init();
    }

    info!("Logging initialized with level: {}", config.logging.level);
    Ok(())
}
