//! Speech queue worker
//!
//! A single worker owns synthesis and playback. Flushing never touches the
//! queue itself: it bumps a generation counter, and the worker discards any
//! utterance enqueued under an older generation — checked once when the
//! utterance is picked up and again after synthesis, so a flush arriving
//! mid-synthesis still wins.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use tokio::sync::{mpsc, watch};

use crate::speech::{Announcement, AudioPlayback, SpeechSink, SpeechSynthesizer};

/// Queue depth; an overflowing queue means the speaker is hopelessly behind
const QUEUE_CAPACITY: usize = 8;

struct Queued {
    announcement: Announcement,
    generation: u64,
}

/// Create a connected sink handle and worker pair
#[must_use]
pub fn speech_channel(
    synthesizer: SpeechSynthesizer,
    playback: AudioPlayback,
    shutdown: watch::Receiver<bool>,
) -> (SpeechQueue, SpeechWorker) {
    let (tx, rx) = mpsc::channel(QUEUE_CAPACITY);
    let generation = Arc::new(AtomicU64::new(0));

    let queue = SpeechQueue {
        tx,
        generation: Arc::clone(&generation),
    };
    let worker = SpeechWorker {
        rx,
        generation,
        synthesizer,
        playback,
        shutdown,
    };

    (queue, worker)
}

/// Sink handle feeding the speech worker
#[derive(Clone)]
pub struct SpeechQueue {
    tx: mpsc::Sender<Queued>,
    generation: Arc<AtomicU64>,
}

#[async_trait]
impl SpeechSink for SpeechQueue {
    fn flush(&self) {
        let superseded = self.generation.fetch_add(1, Ordering::AcqRel);
        tracing::trace!(generation = superseded + 1, "speech queue flushed");
    }

    async fn enqueue(&self, announcement: Announcement) {
        let generation = self.generation.load(Ordering::Acquire);

        if self
            .tx
            .send(Queued {
                announcement,
                generation,
            })
            .await
            .is_err()
        {
            tracing::debug!("speech worker gone, dropping announcement");
        }
    }
}

/// Synthesizes and plays queued announcements, one at a time
pub struct SpeechWorker {
    rx: mpsc::Receiver<Queued>,
    generation: Arc<AtomicU64>,
    synthesizer: SpeechSynthesizer,
    playback: AudioPlayback,
    shutdown: watch::Receiver<bool>,
}

impl SpeechWorker {
    /// Run until the queue closes or shutdown is signalled
    pub async fn run(mut self) {
        tracing::info!("speech worker started");

        loop {
            tokio::select! {
                maybe_queued = self.rx.recv() => {
                    let Some(queued) = maybe_queued else {
                        tracing::debug!("speech queue closed");
                        break;
                    };
                    self.play_one(queued).await;
                }
                _ = self.shutdown.changed() => {
                    tracing::debug!("speech worker shutting down");
                    break;
                }
            }
        }
    }

    async fn play_one(&self, queued: Queued) {
        if self.stale(queued.generation) {
            tracing::trace!("skipping superseded announcement");
            return;
        }

        let Announcement { text, language } = &queued.announcement;

        let audio = match self.synthesizer.synthesize(text, *language).await {
            Ok(audio) => audio,
            Err(e) => {
                tracing::warn!(error = %e, "synthesis failed, announcement dropped");
                return;
            }
        };

        if self.stale(queued.generation) {
            tracing::trace!("announcement superseded during synthesis");
            return;
        }

        if let Err(e) = self.playback.play_mp3(&audio).await {
            tracing::warn!(error = %e, "playback failed");
        }
    }

    fn stale(&self, generation: u64) -> bool {
        self.generation.load(Ordering::Acquire) > generation
    }
}
