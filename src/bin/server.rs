//! Cardiosense Server - biometric polling and heart-risk API
//!
//! Polls the sensor device in the background (falling back to synthetic
//! readings when it is unreachable) and serves `/data`, `/analyze` and
//! `/health` over HTTP.
//!
//! # Usage
//! ```sh
//! DEVICE_ADDRESS=http://192.168.137.12 LISTEN_PORT=5000 cargo run --bin server
//! ```
//!
//! # Environment Variables
//! - `DEVICE_ADDRESS` - Sensor device URL (default: http://192.168.137.12)
//! - `POLL_INTERVAL_SECONDS` - Delay between acquisition cycles (default: 1)
//! - `HOST` / `LISTEN_PORT` - Bind address (default: 0.0.0.0:5000)

use anyhow::{Context, Result};
use cardiosense::application::system::Application;
use cardiosense::config::Config;
use cardiosense::interfaces::http;
use tokio::net::TcpListener;
use tracing::{Level, info};
use tracing_subscriber::prelude::*;

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let stdout_layer = tracing_subscriber::fmt::layer().with_target(false);

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .with(stdout_layer)
        .init();

    info!("Cardiosense Server {} starting...", env!("CARGO_PKG_VERSION"));

    let config = Config::from_env()?;
    info!(
        "Configuration loaded: Device={}, PollInterval={:?}, Bind={}",
        config.device.address,
        config.device.poll_interval,
        config.server.bind_address()
    );

    let bind_address = config.server.bind_address();
    let app = Application::build(config).await?;

    info!("Starting acquisition loop...");
    let handle = app.start();

    let listener = TcpListener::bind(bind_address)
        .await
        .with_context(|| format!("Failed to bind {}", bind_address))?;
    info!("Listening on http://{}", bind_address);

    let served = axum::serve(listener, http::router(handle.context.clone()))
        .with_graceful_shutdown(shutdown_signal())
        .await;

    // Stop acquisition even when the server exits with an error.
    handle.shutdown().await;
    served.context("HTTP server error")?;

    info!("Shutdown complete.");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
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

    info!("Shutdown signal received. Draining connections...");
}
