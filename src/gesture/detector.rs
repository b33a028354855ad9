//! Panic-gesture detection
//!
//! Recognizes a rapid-repetition pattern of volume-key presses in the raw
//! volume-change notification stream. The platform reports a notification
//! per volume *change*, may repeat the same level, and delivers at arbitrary
//! rate, so the detector suppresses duplicates and counts only level
//! transitions spaced closely enough to be deliberate presses.

use std::time::Duration;

use tokio::time::Instant;

/// Maximum gap between consecutive presses to continue a sequence
pub const PRESS_THRESHOLD: Duration = Duration::from_millis(1500);

/// How long a partial sequence survives silence before the count resets
pub const RESET_TIME: Duration = Duration::from_millis(5000);

/// Presses required to fire the trigger
pub const REQUIRED_PRESSES: u32 = 5;

/// Tunable gesture thresholds
#[derive(Debug, Clone, Copy)]
pub struct GestureSettings {
    /// Max gap between presses that still counts as the same sequence
    pub press_threshold: Duration,
    /// Silence after which a partial sequence is abandoned
    pub reset_time: Duration,
    /// Presses needed to trigger
    pub required_presses: u32,
}

impl Default for GestureSettings {
    fn default() -> Self {
        Self {
            press_threshold: PRESS_THRESHOLD,
            reset_time: RESET_TIME,
            required_presses: REQUIRED_PRESSES,
        }
    }
}

/// Detects the panic gesture in volume-change notifications
///
/// Pure state machine: the caller supplies `now`, so behavior is fully
/// deterministic under test. All mutation happens through
/// [`on_volume_change`](Self::on_volume_change) and
/// [`on_reset_timeout`](Self::on_reset_timeout), driven by a single consumer
/// task in arrival order.
#[derive(Debug)]
pub struct GestureDetector {
    settings: GestureSettings,
    press_count: u32,
    last_press: Option<Instant>,
    last_level: Option<i32>,
    reset_deadline: Option<Instant>,
}

impl GestureDetector {
    /// Create a detector with the given thresholds
    #[must_use]
    pub const fn new(settings: GestureSettings) -> Self {
        Self {
            settings,
            press_count: 0,
            last_press: None,
            last_level: None,
            reset_deadline: None,
        }
    }

    /// Process one volume-change notification
    ///
    /// Returns `true` when this press completes the gesture. A repeated
    /// level is a duplicate notification, not a press, and changes nothing.
    /// A press arriving more than the press threshold after the previous
    /// one restarts counting at 1 (not 0 — it is itself the first press of
    /// a fresh sequence). Triggering clears the pending reset deadline so a
    /// stale timeout cannot zero a sequence started right after.
    pub fn on_volume_change(&mut self, level: i32, now: Instant) -> bool {
        if self.last_level == Some(level) {
            return false;
        }
        self.last_level = Some(level);

        let continues = self
            .last_press
            .is_some_and(|last| now.duration_since(last) <= self.settings.press_threshold);
        self.press_count = if continues { self.press_count + 1 } else { 1 };
        self.last_press = Some(now);

        tracing::debug!(level, count = self.press_count, "volume press");

        if self.press_count >= self.settings.required_presses {
            self.press_count = 0;
            self.reset_deadline = None;
            tracing::info!("panic gesture recognized");
            return true;
        }

        self.reset_deadline = Some(now + self.settings.reset_time);
        false
    }

    /// Abandon the partial sequence; called when the reset deadline elapses
    ///
    /// Unconditional: the count goes to zero regardless of recent presses.
    /// The last observed level is kept, since a timeout is not a volume
    /// change.
    pub fn on_reset_timeout(&mut self) {
        tracing::debug!("press sequence abandoned");
        self.press_count = 0;
        self.reset_deadline = None;
    }

    /// When the current partial sequence should be abandoned, if any
    #[must_use]
    pub const fn reset_deadline(&self) -> Option<Instant> {
        self.reset_deadline
    }

    /// Presses counted in the current sequence
    #[must_use]
    pub const fn press_count(&self) -> u32 {
        self.press_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detector() -> GestureDetector {
        GestureDetector::new(GestureSettings::default())
    }

    #[test]
    fn repeated_level_is_ignored() {
        let mut d = detector();
        let t0 = Instant::now();

        assert!(!d.on_volume_change(7, t0));
        assert_eq!(d.press_count(), 1);

        // Same level again: duplicate notification, not a press
        assert!(!d.on_volume_change(7, t0 + Duration::from_millis(100)));
        assert_eq!(d.press_count(), 1);
    }

    #[test]
    fn five_rapid_presses_trigger_once() {
        let mut d = detector();
        let t0 = Instant::now();

        for i in 0..4u64 {
            let level = i32::from(i % 2 == 0);
            assert!(!d.on_volume_change(level, t0 + Duration::from_millis(200 * i)));
        }
        assert!(d.on_volume_change(1, t0 + Duration::from_millis(800)));

        // Count is zeroed immediately after triggering
        assert_eq!(d.press_count(), 0);
        assert_eq!(d.reset_deadline(), None);
    }

    #[test]
    fn press_exactly_at_threshold_continues_sequence() {
        let mut d = detector();
        let t0 = Instant::now();

        d.on_volume_change(0, t0);
        d.on_volume_change(1, t0 + PRESS_THRESHOLD);

        assert_eq!(d.press_count(), 2);
    }

    #[test]
    fn press_past_threshold_restarts_at_one() {
        let mut d = detector();
        let t0 = Instant::now();

        d.on_volume_change(0, t0);
        d.on_volume_change(1, t0 + Duration::from_millis(500));
        assert_eq!(d.press_count(), 2);

        d.on_volume_change(0, t0 + Duration::from_millis(500) + PRESS_THRESHOLD + Duration::from_millis(1));
        assert_eq!(d.press_count(), 1);
    }

    #[test]
    fn reset_timeout_zeroes_count() {
        let mut d = detector();
        let t0 = Instant::now();

        d.on_volume_change(0, t0);
        d.on_volume_change(1, t0 + Duration::from_millis(300));
        assert_eq!(d.press_count(), 2);
        assert!(d.reset_deadline().is_some());

        d.on_reset_timeout();
        assert_eq!(d.press_count(), 0);
        assert_eq!(d.reset_deadline(), None);
    }

    #[test]
    fn alternating_levels_each_count() {
        // A, B, A is three real presses: only the immediate predecessor is
        // compared, an intervening change makes the level "new" again.
        let mut d = detector();
        let t0 = Instant::now();

        d.on_volume_change(5, t0);
        d.on_volume_change(6, t0 + Duration::from_millis(100));
        d.on_volume_change(5, t0 + Duration::from_millis(200));

        assert_eq!(d.press_count(), 3);
    }

    #[test]
    fn trigger_then_new_sequence_counts_fresh() {
        let mut d = detector();
        let t0 = Instant::now();

        for i in 0..5u64 {
            let level = i32::from(i % 2 == 0);
            d.on_volume_change(level, t0 + Duration::from_millis(100 * i));
        }
        assert_eq!(d.press_count(), 0);

        // A press right after the trigger starts a fresh sequence at 1
        d.on_volume_change(9, t0 + Duration::from_millis(600));
        assert_eq!(d.press_count(), 1);
    }

    #[test]
    fn reset_deadline_rearms_on_each_press() {
        let mut d = detector();
        let t0 = Instant::now();

        d.on_volume_change(0, t0);
        let first = d.reset_deadline().unwrap();

        d.on_volume_change(1, t0 + Duration::from_millis(400));
        let second = d.reset_deadline().unwrap();

        assert_eq!(first, t0 + RESET_TIME);
        assert_eq!(second, t0 + Duration::from_millis(400) + RESET_TIME);
    }
}
