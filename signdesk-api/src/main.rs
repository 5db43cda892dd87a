//! # SignDesk API Server
//!
//! HTTP server for the SignDesk document-signing backend: users, signature
//! profiles, uploaded documents and signature placements, all kept in memory.
//!
//! ## Usage
//!
//! ```bash
//! cargo run -p signdesk-api
//! ```

use signdesk_api::{
    app::{build_router, AppState},
    config::Config,
};
use signdesk_shared::store::Storage;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "signdesk_api=debug,signdesk_shared=debug,tower_http=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        "SignDesk API Server v{} starting...",
        env!("CARGO_PKG_VERSION")
    );

    let config = Config::from_env()?;
    let address = config.bind_address();

    let app = build_router(AppState::new(Storage::new(), config));

    let listener = tokio::net::TcpListener::bind(&address).await?;
    tracing::info!("Server listening on http://{}", address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        tracing::error!(%error, "Failed to listen for shutdown signal");
        return;
    }
    tracing::info!("Shutdown signal received, exiting...");
}
