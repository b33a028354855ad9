//! Gesture recognition integration tests
//!
//! Drives the listener task end-to-end over virtual time: volume events go
//! in through the channel, foreground-launch requests come out through a
//! counting launcher.

mod common;

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::time::sleep;

use common::CountingLauncher;
use lumen_assist::gesture::{GestureDetector, GestureListener, GestureSettings, VolumeEvent};

struct Harness {
    volume_tx: mpsc::Sender<VolumeEvent>,
    launcher: Arc<CountingLauncher>,
    _shutdown_tx: watch::Sender<bool>,
}

fn start_listener() -> Harness {
    let (volume_tx, volume_rx) = mpsc::channel(16);
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let launcher = Arc::new(CountingLauncher::default());

    let listener = GestureListener::new(
        GestureDetector::new(GestureSettings::default()),
        volume_rx,
        Some(launcher.clone()),
        shutdown_rx,
    );
    tokio::spawn(listener.run());

    Harness {
        volume_tx,
        launcher,
        _shutdown_tx: shutdown_tx,
    }
}

impl Harness {
    /// Send one volume event and give the listener a moment to process it
    async fn press(&self, level: i32) {
        self.volume_tx.send(VolumeEvent { level }).await.unwrap();
        sleep(Duration::from_millis(10)).await;
    }
}

#[tokio::test(start_paused = true)]
async fn five_rapid_presses_launch_once() {
    let h = start_listener();

    for level in [1, 2, 1, 2, 1] {
        h.press(level).await;
        sleep(Duration::from_millis(200)).await;
    }

    assert_eq!(h.launcher.requests(), 1);
}

#[tokio::test(start_paused = true)]
async fn repeated_levels_do_not_launch() {
    let h = start_listener();

    // Ten notifications but only one real level change
    for _ in 0..10 {
        h.press(3).await;
    }

    assert_eq!(h.launcher.requests(), 0);
}

#[tokio::test(start_paused = true)]
async fn silence_resets_a_partial_sequence() {
    let h = start_listener();

    for level in [1, 2, 1, 2] {
        h.press(level).await;
        sleep(Duration::from_millis(100)).await;
    }

    // More than the reset time of silence abandons the sequence
    sleep(Duration::from_secs(6)).await;

    // This press is #1 of a new sequence, not #5 of the old one
    h.press(1).await;
    assert_eq!(h.launcher.requests(), 0);
}

#[tokio::test(start_paused = true)]
async fn slow_presses_never_accumulate() {
    let h = start_listener();

    // Each press is past the press threshold from the previous one
    for level in [1, 2, 1, 2, 1, 2, 1] {
        h.press(level).await;
        sleep(Duration::from_millis(1600)).await;
    }

    assert_eq!(h.launcher.requests(), 0);
}

#[tokio::test(start_paused = true)]
async fn sequence_after_trigger_launches_again() {
    let h = start_listener();

    for level in [1, 2, 1, 2, 1] {
        h.press(level).await;
    }
    assert_eq!(h.launcher.requests(), 1);

    // A full fresh sequence fires a second time
    for level in [2, 1, 2, 1, 2] {
        h.press(level).await;
    }
    assert_eq!(h.launcher.requests(), 2);
}
