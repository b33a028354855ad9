//! Frame sampling and inference dispatch
//!
//! Camera frames arrive as an unbounded push stream. A single pipeline task
//! owns the throttle and decides per frame: admit and dispatch, or drop on
//! the spot. Dropped frames release their buffers immediately — nothing is
//! ever queued behind the inference service.

mod dispatcher;
mod throttle;

pub use dispatcher::{FALLBACK_TEXT, InferenceDispatcher};
pub use throttle::{FrameThrottle, SAMPLE_INTERVAL};

use tokio::sync::{mpsc, watch};
use tokio::time::Instant;

/// A captured camera frame
///
/// The payload is opaque to the pipeline; it is handed to the vision
/// boundary as-is. Ownership transfers into the pipeline with the frame —
/// a frame that is not admitted is dropped here, not retained.
#[derive(Debug)]
pub struct Frame {
    /// Encoded image bytes (JPEG from the capture shim)
    pub bytes: Vec<u8>,
    /// When the frame was received
    pub captured_at: Instant,
}

impl Frame {
    /// Wrap encoded image bytes received now
    #[must_use]
    pub fn new(bytes: Vec<u8>) -> Self {
        Self {
            bytes,
            captured_at: Instant::now(),
        }
    }
}

/// Consumes the frame stream, throttles it, and dispatches admissions
pub struct FramePipeline {
    throttle: FrameThrottle,
    dispatcher: InferenceDispatcher,
    frames: mpsc::Receiver<Frame>,
    shutdown: watch::Receiver<bool>,
}

impl FramePipeline {
    /// Create a pipeline over the given frame channel
    #[must_use]
    pub const fn new(
        throttle: FrameThrottle,
        dispatcher: InferenceDispatcher,
        frames: mpsc::Receiver<Frame>,
        shutdown: watch::Receiver<bool>,
    ) -> Self {
        Self {
            throttle,
            dispatcher,
            frames,
            shutdown,
        }
    }

    /// Run until the frame channel closes or shutdown is signalled
    pub async fn run(mut self) {
        tracing::info!("frame pipeline started");

        loop {
            tokio::select! {
                maybe_frame = self.frames.recv() => {
                    let Some(frame) = maybe_frame else {
                        tracing::debug!("frame channel closed");
                        break;
                    };
                    if self.throttle.admit(Instant::now()) {
                        self.dispatcher.dispatch(frame).await;
                    }
                    // A non-admitted frame is dropped right here.
                }
                _ = self.shutdown.changed() => {
                    tracing::debug!("frame pipeline shutting down");
                    break;
                }
            }
        }
    }
}
