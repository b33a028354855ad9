//! Frame pipeline integration tests
//!
//! Exercises throttling, single-flight dispatch, locale capture, and the
//! failure fallback over virtual time, with mock vision and speech
//! boundaries.

mod common;

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::time::sleep;

use common::{MockVision, RecordingSink, language_store};
use lumen_assist::Language;
use lumen_assist::pipeline::{
    FALLBACK_TEXT, Frame, FramePipeline, FrameThrottle, InferenceDispatcher,
};

fn frame() -> Frame {
    Frame::new(vec![0xFF, 0xD8, 0xFF])
}

async fn dispatcher(
    vision: &Arc<MockVision>,
    sink: &Arc<RecordingSink>,
    language: Language,
) -> InferenceDispatcher {
    InferenceDispatcher::new(
        vision.clone(),
        sink.clone(),
        language_store(language).await,
    )
}

#[tokio::test(start_paused = true)]
async fn frames_during_flight_are_dropped() {
    let vision = Arc::new(MockVision::slow(Duration::from_secs(5)));
    let sink = Arc::new(RecordingSink::default());
    let d = dispatcher(&vision, &sink, Language::English).await;

    d.dispatch(frame()).await;
    sleep(Duration::from_millis(10)).await;
    assert!(d.is_in_flight());

    // Anything admitted while the request is outstanding is dropped
    d.dispatch(frame()).await;
    d.dispatch(frame()).await;
    sleep(Duration::from_millis(10)).await;
    assert_eq!(vision.calls(), 1);

    // Once the request completes the next frame goes out
    sleep(Duration::from_secs(5)).await;
    assert!(!d.is_in_flight());
    assert_eq!(sink.announcements().await.len(), 1);

    d.dispatch(frame()).await;
    sleep(Duration::from_millis(10)).await;
    assert_eq!(vision.calls(), 2);
}

#[tokio::test(start_paused = true)]
async fn result_uses_language_captured_at_dispatch() {
    let vision = Arc::new(MockVision::slow(Duration::from_secs(2)));
    let sink = Arc::new(RecordingSink::default());
    let language = language_store(Language::Malayalam).await;
    let d = InferenceDispatcher::new(
        vision.clone(),
        sink.clone(),
        Arc::clone(&language),
    );

    d.dispatch(frame()).await;
    sleep(Duration::from_millis(10)).await;

    // The user changes language while inference is pending
    language.set(Language::Kannada).await;
    sleep(Duration::from_secs(3)).await;

    let announced = sink.announcements().await;
    assert_eq!(announced.len(), 1);
    assert_eq!(announced[0].language, Language::Malayalam);
}

#[tokio::test(start_paused = true)]
async fn failure_announces_fallback_once_and_recovers() {
    let vision = Arc::new(MockVision::failing());
    let sink = Arc::new(RecordingSink::default());
    let d = dispatcher(&vision, &sink, Language::Hindi).await;

    d.dispatch(frame()).await;
    sleep(Duration::from_millis(10)).await;

    let announced = sink.announcements().await;
    assert_eq!(announced.len(), 1);
    assert_eq!(announced[0].text, FALLBACK_TEXT);
    assert_eq!(announced[0].language, Language::Hindi);
    assert!(!d.is_in_flight());

    // The pipeline is idle again, not wedged
    d.dispatch(frame()).await;
    sleep(Duration::from_millis(10)).await;
    assert_eq!(vision.calls(), 2);
    assert_eq!(sink.announcements().await.len(), 2);
}

#[tokio::test(start_paused = true)]
async fn results_interrupt_stale_speech() {
    let vision = Arc::new(MockVision::instant());
    let sink = Arc::new(RecordingSink::default());
    let d = dispatcher(&vision, &sink, Language::English).await;

    d.dispatch(frame()).await;
    sleep(Duration::from_millis(10)).await;

    // Every routed result flushes whatever is still queued
    assert_eq!(sink.flushes(), 1);
    assert_eq!(sink.announcements().await.len(), 1);
}

#[tokio::test(start_paused = true)]
async fn pipeline_decimates_the_frame_stream() {
    let vision = Arc::new(MockVision::instant());
    let sink = Arc::new(RecordingSink::default());
    let d = dispatcher(&vision, &sink, Language::English).await;

    let (frame_tx, frame_rx) = mpsc::channel(8);
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let pipeline = FramePipeline::new(
        FrameThrottle::new(Duration::from_millis(2000)),
        d,
        frame_rx,
        shutdown_rx,
    );
    let task = tokio::spawn(pipeline.run());

    // t = 0: admitted
    frame_tx.send(frame()).await.unwrap();
    sleep(Duration::from_millis(10)).await;
    assert_eq!(vision.calls(), 1);

    // t = 500: inside the interval, dropped
    sleep(Duration::from_millis(490)).await;
    frame_tx.send(frame()).await.unwrap();
    sleep(Duration::from_millis(10)).await;
    assert_eq!(vision.calls(), 1);

    // t = 2500: next window, admitted
    sleep(Duration::from_millis(1990)).await;
    frame_tx.send(frame()).await.unwrap();
    sleep(Duration::from_millis(10)).await;
    assert_eq!(vision.calls(), 2);

    shutdown_tx.send(true).unwrap();
    task.await.unwrap();
}
