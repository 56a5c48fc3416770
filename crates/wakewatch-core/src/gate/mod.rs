//! Poll gate: rate limiting and change detection between reports.
//!
//! The diagnostic command is expensive, and the trigger that drives polling
//! (a timer, a manual refresh) may fire faster than it should run. The gate
//! answers two questions per cycle:
//!
//! 1. [`PollGate::should_poll`]: has enough time passed since the last
//!    attempt to run the command again?
//! 2. [`PollGate::should_reparse`]: is the freshly fetched text different
//!    from the last one that was parsed?
//!
//! All state lives in [`PollState`], owned by the caller. Hosts that may run
//! cycles concurrently use [`SharedPollGate`], which makes each check and its
//! state update a single critical section.

mod fingerprint;
mod shared;

pub use fingerprint::{EdgeFingerprint, Fingerprint, Xxh3Fingerprint};
pub use shared::SharedPollGate;

use std::time::{Duration, Instant};

/// Minimum time between two poll attempts.
pub const DEFAULT_MIN_INTERVAL: Duration = Duration::from_secs(1);

/// Trimmed reports at or below this many characters are always reparsed,
/// so two different near-empty outputs are never taken as identical.
pub const MIN_MEANINGFUL_LEN: usize = 10;

/// State carried between poll cycles.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PollState {
    /// Start of the last poll attempt. `None` until the first poll.
    last_poll: Option<Instant>,
    /// Fingerprint of the last reparsed report.
    last_fingerprint: Option<u64>,
}

impl PollState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_poll(&self) -> Option<Instant> {
        self.last_poll
    }

    pub fn last_fingerprint(&self) -> Option<u64> {
        self.last_fingerprint
    }

    /// Forgets the last report so the next non-empty one is always reparsed.
    pub fn clear_fingerprint(&mut self) {
        self.last_fingerprint = None;
    }
}

/// Decides whether to poll and whether to reparse.
#[derive(Debug, Clone)]
pub struct PollGate<P: Fingerprint = Xxh3Fingerprint> {
    fingerprint: P,
    min_interval: Duration,
}

impl PollGate<Xxh3Fingerprint> {
    /// Creates a gate with the xxh3 fingerprint and a 1 second interval.
    pub fn new() -> Self {
        Self::with_fingerprint(Xxh3Fingerprint)
    }
}

impl Default for PollGate<Xxh3Fingerprint> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: Fingerprint> PollGate<P> {
    pub fn with_fingerprint(fingerprint: P) -> Self {
        Self {
            fingerprint,
            min_interval: DEFAULT_MIN_INTERVAL,
        }
    }

    /// Sets the minimum interval between polls. `Duration::ZERO` disables
    /// rate limiting.
    pub fn with_min_interval(mut self, min_interval: Duration) -> Self {
        self.min_interval = min_interval;
        self
    }

    /// Returns `false` while less than the minimum interval has passed since
    /// the last recorded poll. Does not modify state.
    pub fn should_poll(&self, now: Instant, state: &PollState) -> bool {
        if self.min_interval.is_zero() {
            return true;
        }
        match state.last_poll {
            Some(last) => now.saturating_duration_since(last) >= self.min_interval,
            None => true,
        }
    }

    /// Records a poll attempt, successful or not.
    ///
    /// An instant earlier than the recorded one is ignored, so the recorded
    /// time never moves backwards.
    pub fn record_poll(&self, now: Instant, state: &mut PollState) {
        state.last_poll = Some(match state.last_poll {
            Some(last) if last > now => last,
            _ => now,
        });
    }

    /// [`should_poll`](Self::should_poll) and, if it passes,
    /// [`record_poll`](Self::record_poll) in one step.
    pub fn try_begin_poll(&self, now: Instant, state: &mut PollState) -> bool {
        if !self.should_poll(now, state) {
            return false;
        }
        self.record_poll(now, state);
        true
    }

    /// Decides whether `text` needs parsing.
    ///
    /// Empty or whitespace-only text returns `false` and leaves the state
    /// alone: it means "no data", not "unchanged". Otherwise returns `false`
    /// only when the fingerprint matches the last reparsed report and the
    /// trimmed text is longer than [`MIN_MEANINGFUL_LEN`]. On `true` the new
    /// fingerprint is stored.
    pub fn should_reparse(&self, text: &str, state: &mut PollState) -> bool {
        let meaningful = text.trim();
        if meaningful.is_empty() {
            return false;
        }

        let fingerprint = self.fingerprint.fingerprint(text);
        if state.last_fingerprint == Some(fingerprint)
            && meaningful.chars().count() > MIN_MEANINGFUL_LEN
        {
            return false;
        }

        state.last_fingerprint = Some(fingerprint);
        true
    }
}
