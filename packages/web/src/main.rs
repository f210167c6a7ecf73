//! Relay server: serves `/api/auth/{login,logout,refresh}` and forwards them
//! to the backend configured in [`api::Settings`].

use api::{BackendClient, RelayState, Settings};
use axum::Router;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,web=debug,api=debug")),
        )
        .init();

    let settings = Settings::new()?;
    let router = app(&settings);

    let addr = settings.server.address();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Relay listening on {} (backend {})", addr, settings.backend.url);

    axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

fn app(settings: &Settings) -> Router {
    let backend = BackendClient::new(settings.backend.url.clone());
    api::router(RelayState::new(backend)).layer(TraceLayer::new_for_http())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}
