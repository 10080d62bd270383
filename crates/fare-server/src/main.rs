mod dto;
mod error;
mod handlers;
mod router;
mod services;
mod state;

use std::sync::Arc;

use anyhow::{Context, Result};
use fare_config::ServiceConfig;
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use state::ServerState;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .compact()
        .init();

    let config = ServiceConfig::from_env().context("invalid configuration")?;

    // Missing or invalid artifacts are fatal.
    let state = ServerState::load(&config).context("failed to load model artifacts")?;
    let cors = router::cors_layer(&config.allowed_origin)?;
    let app = router::build_router(Arc::new(state), cors);

    info!("Starting server on {}", config.bind_addr);
    info!("Allowing cross-origin requests from {}", config.allowed_origin);

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

/// Resolves on Ctrl-C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutting down gracefully");
}
