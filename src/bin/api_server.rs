// Pest Guide API server
//
// Usage: cargo run --bin pest_guide_server
// Configuration comes from environment variables, see `pest_guide::config`.

use pest_guide::{create_router, AppConfig, AppState};
use std::net::SocketAddr;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing (structured logging)
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| {
                    // Default log level: info for our crate, warn for others
                    "pest_guide=info,tower_http=debug,axum=debug,warn".into()
                }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting API server...");

    let config = AppConfig::from_env()?;

    tracing::info!("Configuration:");
    match &config.data_dir {
        Some(dir) => tracing::info!("  DATA_DIR: {}", dir.display()),
        None => tracing::info!("  DATA_DIR: (embedded)"),
    }
    tracing::info!("  DETECTION_DELAY_MS: {}", config.detection_latency.as_millis());
    tracing::info!("  MAX_UPLOAD_BYTES: {}", config.max_upload_bytes);
    tracing::info!("  CACHE_TTL_SECS: {}", config.cache_ttl.as_secs());
    tracing::info!("  PORT: {}", config.port);

    // Initialize application state (loads catalogs, builds indexes)
    tracing::info!("Initializing application state...");
    let state = AppState::new(&config)?;
    tracing::info!("Application state initialized successfully");

    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
