//! Speech output
//!
//! Scene descriptions are announced, not displayed. The sink boundary has
//! two primitives — `flush` (supersede everything not yet played) and
//! `enqueue` — because "speak this now, interrupting whatever is stale" is
//! the pipeline's normal case: a new description makes the previous one
//! worthless.

mod playback;
mod synthesizer;
mod worker;

pub use playback::AudioPlayback;
pub use synthesizer::SpeechSynthesizer;
pub use worker::{SpeechQueue, SpeechWorker, speech_channel};

use async_trait::async_trait;

use crate::language::Language;

/// One utterance bound for the speaker
#[derive(Debug, Clone)]
pub struct Announcement {
    /// Text to speak
    pub text: String,
    /// Language the text should be spoken in
    pub language: Language,
}

/// Speech output boundary
#[async_trait]
pub trait SpeechSink: Send + Sync {
    /// Supersede every queued announcement that has not started playing
    fn flush(&self);

    /// Queue an announcement for synthesis and playback
    async fn enqueue(&self, announcement: Announcement);

    /// Speak, optionally flushing stale announcements first
    async fn speak(&self, text: String, language: Language, interrupt: bool) {
        if interrupt {
            self.flush();
        }
        self.enqueue(Announcement { text, language }).await;
    }
}

/// Sink that logs announcements instead of speaking them
///
/// Used when speech output is disabled (headless hosts, missing API key).
pub struct LoggingSink;

#[async_trait]
impl SpeechSink for LoggingSink {
    fn flush(&self) {}

    async fn enqueue(&self, announcement: Announcement) {
        tracing::info!(
            language = %announcement.language,
            text = %announcement.text,
            "announcement (speech disabled)"
        );
    }
}
