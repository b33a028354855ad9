//! Shared test doubles for the daemon's external boundaries

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;

use lumen_assist::language::{Language, LanguageStore};
use lumen_assist::launch::Launcher;
use lumen_assist::speech::{Announcement, SpeechSink};
use lumen_assist::store::PrefStore;
use lumen_assist::vision::VisionAnalyzer;
use lumen_assist::{Error, Result};

/// Vision analyzer with a fixed response delay and failure mode
pub struct MockVision {
    delay: Duration,
    fail: bool,
    calls: AtomicUsize,
}

impl MockVision {
    /// Analyzer that answers immediately
    #[must_use]
    pub const fn instant() -> Self {
        Self::slow(Duration::ZERO)
    }

    /// Analyzer that answers after `delay`
    #[must_use]
    pub const fn slow(delay: Duration) -> Self {
        Self {
            delay,
            fail: false,
            calls: AtomicUsize::new(0),
        }
    }

    /// Analyzer whose every call fails
    #[must_use]
    pub const fn failing() -> Self {
        Self {
            delay: Duration::ZERO,
            fail: true,
            calls: AtomicUsize::new(0),
        }
    }

    /// How many analyze calls were made
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl VisionAnalyzer for MockVision {
    async fn analyze(&self, image: &[u8]) -> Result<String> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        tokio::time::sleep(self.delay).await;

        if self.fail {
            Err(Error::Vision("mock inference failure".to_string()))
        } else {
            Ok(format!("scene {call}: {} bytes", image.len()))
        }
    }
}

/// Sink that records announcements and flush calls
#[derive(Default)]
pub struct RecordingSink {
    announcements: Mutex<Vec<Announcement>>,
    flushes: AtomicUsize,
}

impl RecordingSink {
    /// Announcements received so far
    pub async fn announcements(&self) -> Vec<Announcement> {
        self.announcements.lock().await.clone()
    }

    /// Flush calls received so far
    pub fn flushes(&self) -> usize {
        self.flushes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SpeechSink for RecordingSink {
    fn flush(&self) {
        self.flushes.fetch_add(1, Ordering::SeqCst);
    }

    async fn enqueue(&self, announcement: Announcement) {
        self.announcements.lock().await.push(announcement);
    }
}

/// Launcher that counts foreground requests
#[derive(Default)]
pub struct CountingLauncher {
    requests: AtomicUsize,
}

impl CountingLauncher {
    /// Foreground requests received so far
    pub fn requests(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Launcher for CountingLauncher {
    async fn bring_to_foreground(&self) -> Result<()> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// In-memory preference store
#[derive(Default)]
pub struct MemoryStore {
    map: Mutex<HashMap<String, String>>,
}

#[async_trait]
impl PrefStore for MemoryStore {
    async fn read(&self, key: &str) -> Result<Option<String>> {
        Ok(self.map.lock().await.get(key).cloned())
    }

    async fn write(&self, key: &str, value: &str) -> Result<()> {
        self.map
            .lock()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Language store preloaded with the given selection
pub async fn language_store(language: Language) -> Arc<LanguageStore> {
    let store = Arc::new(
        LanguageStore::load(Arc::new(MemoryStore::default()), Language::default()).await,
    );
    store.set(language).await;
    store
}
