//! HTTP endpoint exposing the sync operations.
//!
//! - `POST /store`   array of records, empty response
//! - `POST /history` `{deviceId: watermark}` → array of records
//! - `POST /latest`  `[deviceId]` → `{deviceId: timestamp}`

pub mod handlers;

use crate::config::Config;
use crate::core::SyncService;
use crate::errors::AppResult;
use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::post;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

pub type SharedService = Arc<SyncService>;

/// Routes bound to `service`. Non-POST requests get 405 from axum.
///
/// Request bodies are not capped: a first sync pushes a device's whole
/// history in one `/store` call.
pub fn router(service: SyncService) -> Router {
    Router::new()
        .route("/store", post(handlers::store))
        .route("/history", post(handlers::history))
        .route("/latest", post(handlers::latest))
        .layer(DefaultBodyLimit::disable())
        .with_state(Arc::new(service))
}

/// Bind `cfg.address` and serve until Ctrl-C.
pub async fn serve(cfg: &Config, service: SyncService) -> AppResult<()> {
    let listener = TcpListener::bind(&cfg.address).await?;
    info!(address = %listener.local_addr()?, "listening");
    serve_on(listener, service, shutdown_signal()).await
}

/// Serve on an already bound listener until `shutdown` resolves.
pub async fn serve_on<F>(listener: TcpListener, service: SyncService, shutdown: F) -> AppResult<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, router(service))
        .with_graceful_shutdown(shutdown)
        .await?;
    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown requested");
}
