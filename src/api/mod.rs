//! HTTP ingest API
//!
//! The platform shim that actually owns the camera and the hardware keys
//! talks to the daemon over this surface: it posts volume-change
//! notifications and camera frames, and reads or changes the announcement
//! language. Ingest handlers never block on the processing tasks — events
//! go through bounded channels and excess input is dropped as noise.

pub mod health;
mod ingest;
mod preferences;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use tokio::net::TcpListener;
use tokio::sync::{mpsc, watch};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::Result;
use crate::gesture::VolumeEvent;
use crate::language::LanguageStore;
use crate::pipeline::Frame;

/// Shared state for API handlers
#[derive(Clone)]
pub struct ApiState {
    /// Sender feeding the gesture listener
    pub volume_tx: mpsc::Sender<VolumeEvent>,
    /// Sender feeding the frame pipeline
    pub frame_tx: mpsc::Sender<Frame>,
    /// Language preference, shared with the dispatcher
    pub language: Arc<LanguageStore>,
}

/// Build the API router
#[must_use]
pub fn router(state: Arc<ApiState>) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route("/v1/volume", post(ingest::volume))
        .route("/v1/frames", post(ingest::frames))
        .route(
            "/v1/language",
            get(preferences::get_language).put(preferences::put_language),
        )
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

/// Serve the API until shutdown is signalled
///
/// # Errors
///
/// Returns error if the listener cannot bind or the server fails
pub async fn serve(
    state: Arc<ApiState>,
    port: u16,
    mut shutdown: watch::Receiver<bool>,
) -> Result<()> {
    let app = router(state);
    let listener = TcpListener::bind(("0.0.0.0", port)).await?;
    tracing::info!(port, "api listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            let _ = shutdown.changed().await;
        })
        .await?;

    Ok(())
}
