//! HTTP server for the vacation engine.
//!
//! # Environment Variables
//!
//! - `VACATION_ENGINE_CONFIG`: configuration directory (default: `./config`,
//!   built-in configuration when it does not exist)
//! - `RUST_LOG`: log filter (default: info)

use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use vacation_engine::api::{AppState, create_router};
use vacation_engine::config::ConfigLoader;
use vacation_engine::reconciliation::ENGINE_VERSION;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(version = ENGINE_VERSION, "Starting vacation engine");

    let config = ConfigLoader::from_env()?;
    let addr = config.settings().server.address();

    let app = create_router(AppState::new(config));

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Listening on http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
