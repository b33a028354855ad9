//! Volume and frame ingest handlers
//!
//! Both handlers use `try_send`: the hardware boundary delivers at
//! unbounded rate, and anything the daemon cannot absorb right now is
//! transient input noise, not an error. Dropped input still gets a 202 —
//! the shim should never retry a stale notification or frame.

use std::sync::Arc;

use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use serde::Deserialize;
use tokio::sync::mpsc::error::TrySendError;

use super::ApiState;
use crate::gesture::VolumeEvent;
use crate::pipeline::Frame;

/// Body of a volume-change notification
#[derive(Deserialize)]
pub struct VolumeChange {
    /// Reported volume level after the change
    pub level: i32,
}

/// Accept a hardware volume-change notification
pub async fn volume(
    State(state): State<Arc<ApiState>>,
    Json(change): Json<VolumeChange>,
) -> StatusCode {
    match state.volume_tx.try_send(VolumeEvent {
        level: change.level,
    }) {
        Ok(()) => StatusCode::ACCEPTED,
        Err(TrySendError::Full(_)) => {
            tracing::trace!("volume event dropped, channel full");
            StatusCode::ACCEPTED
        }
        Err(TrySendError::Closed(_)) => StatusCode::SERVICE_UNAVAILABLE,
    }
}

/// Accept one encoded camera frame
pub async fn frames(State(state): State<Arc<ApiState>>, body: Bytes) -> StatusCode {
    if body.is_empty() {
        return StatusCode::BAD_REQUEST;
    }

    match state.frame_tx.try_send(Frame::new(body.to_vec())) {
        Ok(()) => StatusCode::ACCEPTED,
        Err(TrySendError::Full(_)) => {
            tracing::trace!("frame dropped, channel full");
            StatusCode::ACCEPTED
        }
        Err(TrySendError::Closed(_)) => StatusCode::SERVICE_UNAVAILABLE,
    }
}
