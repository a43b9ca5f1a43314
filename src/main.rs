//! Numeric Service - HTTP Server Entry Point
//!
//! Starts the HTTP server that exposes the numeric operations.

use numeric_service::{api, config::Config};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "numeric_service=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env()?;
    info!(
        "Loaded configuration: host={} port={} max_body_bytes={}",
        config.host, config.port, config.max_body_bytes
    );

    // Start HTTP server
    info!("Starting server on {}", config.bind_addr());

    api::serve(config).await?;

    Ok(())
}
