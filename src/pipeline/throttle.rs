//! Fixed-rate frame sampling
//!
//! The camera boundary pushes frames far faster than the inference service
//! can describe them. The throttle decimates the stream to at most one
//! frame per interval; everything else is dropped in the same callback so
//! the upstream buffer pool never backs up.

use std::time::Duration;

use tokio::time::Instant;

/// Default frame admission interval
pub const SAMPLE_INTERVAL: Duration = Duration::from_millis(2000);

/// Admits at most one frame per interval
///
/// This is a fixed-rate sampler, not a sliding window: a burst only ever
/// gets its first frame through, and the next admission is measured from
/// the last admitted frame. A frame arriving exactly on the boundary is
/// admitted.
#[derive(Debug)]
pub struct FrameThrottle {
    interval: Duration,
    last_admitted: Option<Instant>,
}

impl FrameThrottle {
    /// Create a throttle with the given admission interval
    #[must_use]
    pub const fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_admitted: None,
        }
    }

    /// Decide whether a frame arriving at `now` should be analyzed
    ///
    /// On admission the interval restarts from `now` before returning, so
    /// concurrent arrivals racing the same tick cannot both be admitted by
    /// a caller that serializes calls (the pipeline task does).
    pub fn admit(&mut self, now: Instant) -> bool {
        let due = self
            .last_admitted
            .is_none_or(|last| now.duration_since(last) >= self.interval);

        if due {
            self.last_admitted = Some(now);
        } else {
            tracing::trace!("frame dropped by throttle");
        }

        due
    }
}
