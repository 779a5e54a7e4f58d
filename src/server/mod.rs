//! HTTP API
//!
//! Routes:
//! - `GET /sitemap?url=<base>[&format=plaintext|xml]` crawls and returns a sitemap
//! - `GET /readiness` and `GET /liveness` answer 204 No Content

mod handler;

use crate::service::SitemapService;
use crate::sitemap::SitemapFormat;
use axum::routing::get;
use axum::Router;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

#[derive(Clone)]
pub struct AppState {
    service: Arc<SitemapService>,
    default_format: SitemapFormat,
}

impl AppState {
    pub fn new(service: Arc<SitemapService>, default_format: SitemapFormat) -> Self {
        Self {
            service,
            default_format,
        }
    }
}

/// Builds the API router
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/sitemap", get(handler::sitemap))
        .route("/readiness", get(handler::health))
        .route("/liveness", get(handler::health))
        .with_state(state)
}

/// Serves the API on `listener` until `shutdown` is cancelled
///
/// In-flight requests are allowed to finish after shutdown begins.
pub async fn serve(
    listener: TcpListener,
    state: AppState,
    shutdown: CancellationToken,
) -> std::io::Result<()> {
    if let Ok(addr) = listener.local_addr() {
        tracing::info!("Sitemap server listening on http://{}", addr);
    }

    axum::serve(listener, router(state))
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await
}
