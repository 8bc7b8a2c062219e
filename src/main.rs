//! Online shop product catalog service.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request
//!     ──────────────▶ axum Router ──▶ route table ──┐
//!                         │                         ├──▶ handlers ──▶ ProductStore
//!                         └──▶ keyword fallback ────┘                 (memory | sqlite)
//!     Client Response
//!     ◀────────────── JSON body / status ◀────────────────┘
//!
//!     Cross-cutting: config (TOML + CLI) · tracing · metrics · graceful shutdown
//! ```

use std::path::PathBuf;

use clap::Parser;

use online_shop::config::{self, ServiceConfig, StoreBackend};
use online_shop::lifecycle::{self, signals, Shutdown};
use online_shop::observability::logging;

#[derive(Parser, Debug)]
#[command(name = "online-shop")]
#[command(about = "HTTP CRUD service for shop products", long_about = None)]
struct Args {
    /// Port to listen on [default: 8000]
    #[arg(long)]
    port: Option<u16>,

    /// Optional TOML configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Product store backend
    #[arg(long, value_enum)]
    store: Option<StoreBackend>,

    /// Database URL for the sqlite backend
    #[arg(long)]
    database_url: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,
}

impl Args {
    /// Flags win over file values, file values over defaults.
    fn apply(self, config: &mut ServiceConfig) {
        if let Some(port) = self.port {
            config.listener.port = port;
        }
        if let Some(store) = self.store {
            config.store.backend = store;
        }
        if let Some(url) = self.database_url {
            config.store.database_url = url;
        }
        if let Some(level) = self.log_level {
            config.observability.log_level = level;
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => config::load_config(path)?,
        None => ServiceConfig::default(),
    };
    args.apply(&mut config);
    config::validate_config(&config).map_err(config::ConfigError::Validation)?;

    logging::init(&config.observability);

    tracing::info!(
        bind_address = %config.listener.bind_address(),
        store = ?config.store.backend,
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    let shutdown = Shutdown::new();
    signals::spawn_signal_handler(&shutdown);

    lifecycle::launch(config, &shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
