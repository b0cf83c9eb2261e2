//! Bucket Cache - An in-memory bucketed key/value cache server
//!
//! Serves the cache engine over HTTP with graceful shutdown.

use anyhow::Context;
use clap::Parser;
use tokio::signal;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use bucket_cache::api::create_router;
use bucket_cache::{AppState, Config};

/// Main entry point for the cache server.
///
/// # Startup Sequence
/// 1. Load configuration from flags and environment variables
/// 2. Initialize tracing subscriber for logging
/// 3. Create the cache engine (starts the TTL sweeper)
/// 4. Create Axum router with all endpoints
/// 5. Start HTTP server on the configured address
/// 6. On SIGINT/SIGTERM, drain connections and stop the sweeper
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Defaults to LOG_LEVEL for this crate, can be overridden with RUST_LOG
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("bucket_cache={},tower_http=info", config.log_level).into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Bucket Cache Server");

    let state = AppState::from_config(&config);
    let engine = state.engine.clone();

    let settings = engine.settings();
    info!(
        "Configuration loaded: max_entry_size={}, max_size={}, ttl={:?}, cleanup_interval={:?}, default_bucket={}",
        settings.max_entry_size(),
        settings.max_size(),
        settings.ttl(),
        settings.cleanup_interval(),
        config.default_bucket
    );

    let app = create_router(state);

    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    engine.stop().await;
    info!("Server shutdown complete");
    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", err);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                tracing::error!("Failed to install SIGTERM handler: {}", err);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown...");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
        }
    }
}
