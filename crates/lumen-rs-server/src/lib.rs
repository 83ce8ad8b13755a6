//! HTTP surface for Lumen.
//!
//! Exposes `POST /api/generate` as a stateless proxy to the configured image
//! generator, plus the style catalog and a health probe.

pub mod error;
pub mod routes;
pub mod state;

pub use error::{ApiError, ServerError};
pub use state::AppState;

use axum::Router;
use axum::routing::{get, post};
use log::{info, warn};
use lumen_rs_config::ServerConfig;
use tokio::net::TcpListener;

/// Build the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route(
            "/api/generate",
            post(routes::generate).fallback(routes::method_not_allowed),
        )
        .route("/api/styles", get(routes::list_styles))
        .route("/health", get(routes::health))
        .with_state(state)
}

/// Bind to the configured address and serve until Ctrl-C.
pub async fn serve(config: &ServerConfig, state: AppState) -> Result<(), ServerError> {
    let addr = format!("{}:{}", config.host, config.port);
    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|source| ServerError::Bind {
            addr: addr.clone(),
            source,
        })?;
    info!("server listening (addr={})", listener.local_addr()?);
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_err() {
        warn!("failed to install ctrl-c handler; serving until killed");
        std::future::pending::<()>().await;
    }
}
