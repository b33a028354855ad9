//! Single-flight inference dispatch
//!
//! At most one vision request is outstanding at any time, no matter how
//! slow the service gets: a frame admitted while a request is in flight is
//! simply dropped. Results are announced in the language that was selected
//! when analysis *began*, so a mid-flight language change never relabels an
//! old result.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::time::Instant;

use crate::language::LanguageStore;
use crate::pipeline::Frame;
use crate::speech::{Announcement, SpeechSink};
use crate::vision::VisionAnalyzer;

/// Announcement made when inference fails
pub const FALLBACK_TEXT: &str = "error processing image";

/// Dispatches admitted frames to the vision boundary, one at a time
pub struct InferenceDispatcher {
    analyzer: Arc<dyn VisionAnalyzer>,
    sink: Arc<dyn SpeechSink>,
    language: Arc<LanguageStore>,
    in_flight: Arc<AtomicBool>,
}

impl InferenceDispatcher {
    /// Create a dispatcher over the given boundaries
    #[must_use]
    pub fn new(
        analyzer: Arc<dyn VisionAnalyzer>,
        sink: Arc<dyn SpeechSink>,
        language: Arc<LanguageStore>,
    ) -> Self {
        Self {
            analyzer,
            sink,
            language,
            in_flight: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Whether a vision request is currently outstanding
    #[must_use]
    pub fn is_in_flight(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Dispatch one admitted frame
    ///
    /// No-op while a request is outstanding. The vision call runs on its
    /// own task; this method returns as soon as it is spawned, so the
    /// frame-delivery path never waits on the network. The in-flight flag
    /// is cleared before the result is routed — a slow speech sink must not
    /// hold up the next dispatch.
    pub async fn dispatch(&self, frame: Frame) {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            tracing::trace!("inference in flight, dropping frame");
            return;
        }

        let language = self.language.get().await;
        let analyzer = Arc::clone(&self.analyzer);
        let sink = Arc::clone(&self.sink);
        let in_flight = Arc::clone(&self.in_flight);

        tracing::debug!(bytes = frame.bytes.len(), language = %language, "dispatching frame");

        tokio::spawn(async move {
            let started = Instant::now();
            let result = analyzer.analyze(&frame.bytes).await;
            in_flight.store(false, Ordering::Release);

            match result {
                Ok(text) => {
                    tracing::info!(elapsed = ?started.elapsed(), text = %text, "scene described");
                    sink.speak(text, language, true).await;
                }
                Err(e) => {
                    tracing::warn!(elapsed = ?started.elapsed(), error = %e, "inference failed");
                    sink.speak(FALLBACK_TEXT.to_string(), language, true).await;
                }
            }
        });
    }
}
