//! Startup orchestration.
//!
//! # Responsibilities
//! - Open the configured product store
//! - Start the optional metrics endpoint
//! - Bind the listener and serve until shutdown
//!
//! # Design Decisions
//! - Fail fast: store and bind errors abort startup
//! - Metrics exporter failure is logged, not fatal
//! - Listener binds last (traffic only when ready)

use std::net::SocketAddr;

use thiserror::Error;
use tokio::net::TcpListener;

use crate::config::ServiceConfig;
use crate::http::HttpServer;
use crate::lifecycle::Shutdown;
use crate::observability::metrics;
use crate::store::{self, StoreError};

/// Fatal error while bringing the service up.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("failed to open product store: {0}")]
    Store(#[from] StoreError),

    #[error("failed to bind {address}: {source}")]
    Bind {
        address: String,
        source: std::io::Error,
    },

    #[error("server error: {0}")]
    Serve(std::io::Error),
}

/// Bring the service up and serve until `shutdown` fires.
pub async fn launch(config: ServiceConfig, shutdown: &Shutdown) -> Result<(), StartupError> {
    let shutdown_rx = shutdown.subscribe();
    let store = store::open(&config.store).await?;

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse::<SocketAddr>() {
            Ok(addr) => {
                if let Err(e) = metrics::init_metrics(addr) {
                    tracing::error!(error = %e, "Failed to start metrics endpoint");
                }
            }
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let address = config.listener.bind_address();
    let listener = TcpListener::bind(&address)
        .await
        .map_err(|source| StartupError::Bind {
            address: address.clone(),
            source,
        })?;

    tracing::info!(address = %address, "Started on port: {}", config.listener.port);

    let server = HttpServer::new(config, store);
    server
        .run(listener, shutdown_rx)
        .await
        .map_err(StartupError::Serve)
}
