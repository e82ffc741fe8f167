//! HTTP surface.
//!
//! API endpoints:
//! - POST /predict        - classify one uploaded clip
//! - POST /predict-stream - same contract, one chunk per call
//! - GET  /health         - liveness and model state
//! - GET  /model-info     - parameter estimate and label table

mod error;
mod handlers;
mod state;
mod upload;

pub use error::ApiError;
pub use handlers::HealthResponse;
pub use state::AppState;

use crate::config::ServerConfig;
use crate::error::{Error, Result};
use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

/// Build the application router.
pub fn router(state: AppState, max_upload_bytes: usize) -> Router {
    Router::new()
        .route("/predict", post(handlers::predict))
        .route("/predict-stream", post(handlers::predict_stream))
        .route("/health", get(handlers::health))
        .route("/model-info", get(handlers::model_info))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind the configured address.
pub async fn bind(config: &ServerConfig) -> Result<TcpListener> {
    let addr = config.bind_addr();
    TcpListener::bind(&addr)
        .await
        .map_err(|e| Error::Bind { addr, source: e })
}

/// Serve requests on `listener` until Ctrl+C.
pub async fn serve(listener: TcpListener, app: Router) -> Result<()> {
    if let Ok(addr) = listener.local_addr() {
        info!("Starting {} on {}", crate::constants::SERVICE_NAME, addr);
    }
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for Ctrl+C: {e}");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
