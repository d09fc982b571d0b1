use std::net::SocketAddr;
use std::sync::Arc;

use axum::{Router, middleware, routing::get};
use tokio::net::TcpListener;
use tower_http::services::{ServeDir, ServeFile};
use tracing::info;

use super::{
    ratelimit,
    services::{api_not_found, download, get_info, health},
    state::AppState,
};
use crate::config::Config;
use crate::provider::InnerTubeProvider;

type AnyError = Box<dyn std::error::Error + Send + Sync + 'static>;

pub async fn run(address: Option<SocketAddr>) -> Result<(), AnyError> {
    info!("Loading configuration");
    let config = Config::load().map_err(|e| format!("Failed to load config: {e}"))?;
    let address = address.unwrap_or(config.server.bind_addr);

    let provider = InnerTubeProvider::new(&config.provider)
        .map_err(|e| format!("Failed to build provider client: {e}"))?;

    let state = AppState::new(config, Arc::new(provider));
    let app = router(state);

    let listener = TcpListener::bind(address).await?;
    info!(%address, "Tubegate API listening");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    Ok(())
}

/// Build the full router: rate-limited /api namespace, health probe, and
/// static assets with index.html fallback for everything else.
pub fn router(state: AppState) -> Router {
    let static_dir = state.config.server.static_dir.clone();
    let static_assets =
        ServeDir::new(&static_dir).fallback(ServeFile::new(static_dir.join("index.html")));

    let api = Router::new()
        .route("/info", get(get_info))
        .route("/download", get(download))
        .fallback(api_not_found)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            ratelimit::enforce,
        ));

    Router::new()
        .nest("/api", api)
        .route("/health", get(health))
        .fallback_service(static_assets)
        .with_state(state)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        let mut sigterm = signal(SignalKind::terminate())
            .expect("failed to install signal handler");
        sigterm.recv().await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
