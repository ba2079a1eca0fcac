//! The HTTP conversion service.

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::api;

/// Build the service router.
///
/// The service is stateless: every request carries the full image and all
/// conversion parameters, so there is nothing to cache or clean up.
pub fn router() -> Router {
    Router::new()
        .route("/api/convert", post(api::handle_convert))
        .route("/api/preview", post(api::handle_preview))
        .route("/health", get(|| async { "OK" }))
        .layer(TraceLayer::new_for_http())
}

/// Bind and serve until the process is stopped.
pub async fn run(bind_addr: &str) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    tracing::info!(addr = %bind_addr, "conversion service listening");
    axum::serve(listener, router()).await?;
    Ok(())
}
