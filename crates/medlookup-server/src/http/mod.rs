//! HTTP API.

mod handlers;
mod response;

pub use handlers::{ImageRequest, NameRequest, RegenerateRequest};
pub use response::{HealthResponse, LookupResponse};

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::service::LookupService;

/// Request body limit; prescription photos arrive base64-encoded.
pub const MAX_BODY_BYTES: usize = 20 * 1024 * 1024;

pub fn router(service: Arc<LookupService>) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/analyze-name", post(handlers::analyze_name))
        .route("/analyze-image", post(handlers::analyze_image))
        .route("/regenerate", post(handlers::regenerate))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(service)
}

/// Serve until Ctrl+C or SIGTERM.
pub async fn serve(addr: &str, service: Arc<LookupService>) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{}", listener.local_addr()?);

    axum::serve(listener, router(service))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "Failed to listen for Ctrl+C");
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
                tracing::warn!(error = %e, "Failed to listen for SIGTERM");
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
    tracing::info!("Shutdown signal received");
}
