//! The Lumen daemon
//!
//! Orchestrates the gesture listener, frame pipeline, speech worker, and
//! ingest API. Each component runs on its own task and owns its own state;
//! the daemon only wires channels between them and fans out shutdown.

use std::sync::Arc;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

use crate::api::{self, ApiState};
use crate::config::{Config, VisionProvider};
use crate::gesture::{GestureDetector, GestureListener};
use crate::language::LanguageStore;
use crate::launch::{CommandLauncher, Launcher};
use crate::pipeline::{FramePipeline, FrameThrottle, InferenceDispatcher};
use crate::speech::{AudioPlayback, LoggingSink, SpeechSink, SpeechSynthesizer, speech_channel};
use crate::store::{FilePrefStore, PrefStore};
use crate::vision::{DeepSeekVision, GeminiVision, VisionAnalyzer};
use crate::{Error, Result};

/// Volume event channel depth
const VOLUME_QUEUE: usize = 64;

/// Frame channel depth — deliberately shallow: the throttle drops almost
/// everything anyway, and a queued frame is already going stale
const FRAME_QUEUE: usize = 4;

/// The Lumen daemon
pub struct Daemon {
    config: Config,
}

impl Daemon {
    /// Create a daemon from resolved configuration
    #[must_use]
    pub const fn new(config: Config) -> Self {
        Self { config }
    }

    /// Run until interrupted
    ///
    /// # Errors
    ///
    /// Returns error if a required boundary cannot be constructed or the
    /// API server fails to start
    pub async fn run(self) -> Result<()> {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let (volume_tx, volume_rx) = mpsc::channel(VOLUME_QUEUE);
        let (frame_tx, frame_rx) = mpsc::channel(FRAME_QUEUE);

        let store_path = FilePrefStore::default_path()
            .ok_or_else(|| Error::Config("cannot determine config directory".to_string()))?;
        let store: Arc<dyn PrefStore> = Arc::new(FilePrefStore::new(store_path));
        let language =
            Arc::new(LanguageStore::load(store, self.config.default_language).await);

        let launcher = self
            .config
            .gesture
            .launch_command
            .clone()
            .map(|command| Arc::new(CommandLauncher::new(command)) as Arc<dyn Launcher>);

        let listener = GestureListener::new(
            GestureDetector::new(self.config.gesture.settings),
            volume_rx,
            launcher,
            shutdown_rx.clone(),
        );
        let gesture_task = tokio::spawn(listener.run());

        let (sink, speech_task) = self.build_sink(shutdown_rx.clone())?;

        let dispatcher =
            InferenceDispatcher::new(self.build_analyzer()?, sink, Arc::clone(&language));
        let pipeline = FramePipeline::new(
            FrameThrottle::new(self.config.pipeline.sample_interval),
            dispatcher,
            frame_rx,
            shutdown_rx.clone(),
        );
        let pipeline_task = tokio::spawn(pipeline.run());

        let state = Arc::new(ApiState {
            volume_tx,
            frame_tx,
            language,
        });
        let api_task = tokio::spawn(api::serve(state, self.config.api.port, shutdown_rx));

        tracing::info!(port = self.config.api.port, "lumen daemon running");

        tokio::signal::ctrl_c().await?;
        tracing::info!("shutting down");
        let _ = shutdown_tx.send(true);

        let _ = futures::join!(gesture_task, pipeline_task);
        if let Some(task) = speech_task {
            let _ = task.await;
        }
        match api_task.await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => tracing::error!(error = %e, "api server error"),
            Err(e) => tracing::error!(error = %e, "api task panicked"),
        }

        tracing::info!("daemon stopped");
        Ok(())
    }

    /// Build the speech sink, falling back to logging when speech output
    /// is disabled, unconfigured, or the audio device is unavailable
    fn build_sink(
        &self,
        shutdown: watch::Receiver<bool>,
    ) -> Result<(Arc<dyn SpeechSink>, Option<JoinHandle<()>>)> {
        if !self.config.speech.enabled {
            tracing::info!("speech disabled - announcements will be logged");
            return Ok((Arc::new(LoggingSink), None));
        }

        let Some(api_key) = self.config.speech.api_key.clone() else {
            tracing::info!("no speech API key - announcements will be logged");
            return Ok((Arc::new(LoggingSink), None));
        };

        let synthesizer = SpeechSynthesizer::new(
            api_key,
            self.config.speech.model.clone(),
            self.config.speech.voice.clone(),
            self.config.speech.speed,
        )?;

        let playback = match AudioPlayback::new() {
            Ok(playback) => playback,
            Err(e) => {
                tracing::warn!(error = %e, "audio unavailable - announcements will be logged");
                return Ok((Arc::new(LoggingSink), None));
            }
        };

        let (queue, worker) = speech_channel(synthesizer, playback, shutdown);
        let task = tokio::spawn(worker.run());

        Ok((Arc::new(queue), Some(task)))
    }

    /// Build the configured vision provider
    fn build_analyzer(&self) -> Result<Arc<dyn VisionAnalyzer>> {
        let api_key = self.config.vision.api_key.clone().ok_or_else(|| {
            Error::Config(
                "vision API key required (set GEMINI_API_KEY or vision.api_key)".to_string(),
            )
        })?;

        Ok(match self.config.vision.provider {
            VisionProvider::Gemini => {
                Arc::new(GeminiVision::new(api_key, self.config.vision.model.clone())?)
            }
            VisionProvider::DeepSeek => Arc::new(DeepSeekVision::new(api_key)?),
        })
    }
}
