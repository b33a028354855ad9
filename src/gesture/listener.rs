//! Gesture event loop
//!
//! A single task owns the [`GestureDetector`] and consumes volume events in
//! arrival order, so detector state never sees concurrent writers. The
//! sequence-reset timer is an `Instant` deadline raced in the same
//! `select!`: re-arming replaces it, a trigger clears it, and a deadline
//! that already fired simply stops being armed.

use std::sync::Arc;

use tokio::sync::{mpsc, watch};
use tokio::time::{Instant, sleep_until};

use crate::gesture::GestureDetector;
use crate::launch::Launcher;

/// A hardware volume-change notification
#[derive(Debug, Clone, Copy)]
pub struct VolumeEvent {
    /// Reported volume level after the change
    pub level: i32,
}

/// Consumes volume events and fires the launch action on the panic gesture
pub struct GestureListener {
    detector: GestureDetector,
    events: mpsc::Receiver<VolumeEvent>,
    launcher: Option<Arc<dyn Launcher>>,
    shutdown: watch::Receiver<bool>,
}

impl GestureListener {
    /// Create a listener over the given event channel
    #[must_use]
    pub const fn new(
        detector: GestureDetector,
        events: mpsc::Receiver<VolumeEvent>,
        launcher: Option<Arc<dyn Launcher>>,
        shutdown: watch::Receiver<bool>,
    ) -> Self {
        Self {
            detector,
            events,
            launcher,
            shutdown,
        }
    }

    /// Run until the event channel closes or shutdown is signalled
    pub async fn run(mut self) {
        tracing::info!("gesture listener started");

        loop {
            let reset_at = self.detector.reset_deadline();

            tokio::select! {
                maybe_event = self.events.recv() => {
                    let Some(event) = maybe_event else {
                        tracing::debug!("volume event channel closed");
                        break;
                    };
                    if self.detector.on_volume_change(event.level, Instant::now()) {
                        self.launch();
                    }
                }
                () = sleep_until(reset_at.unwrap_or_else(Instant::now)), if reset_at.is_some() => {
                    self.detector.on_reset_timeout();
                }
                _ = self.shutdown.changed() => {
                    tracing::debug!("gesture listener shutting down");
                    break;
                }
            }
        }
    }

    /// Fire the foreground-launch request without blocking event intake
    fn launch(&self) {
        let Some(launcher) = &self.launcher else {
            tracing::info!("panic gesture fired, no launch command configured");
            return;
        };

        let launcher = Arc::clone(launcher);
        tokio::spawn(async move {
            if let Err(e) = launcher.bring_to_foreground().await {
                tracing::warn!(error = %e, "launch request failed");
            } else {
                tracing::info!("foreground launch requested");
            }
        });
    }
}
