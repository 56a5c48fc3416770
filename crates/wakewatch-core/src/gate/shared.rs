//! Thread-safe wrapper around a gate and its state.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Instant;

use super::{Fingerprint, PollGate, PollState, Xxh3Fingerprint};

struct Inner<P: Fingerprint> {
    gate: PollGate<P>,
    state: PollState,
}

/// A [`PollGate`] and its [`PollState`] behind one lock.
///
/// Each check runs together with its state update while holding the lock,
/// so two overlapping triggers can never both be told to poll (or to
/// reparse the same report).
pub struct SharedPollGate<P: Fingerprint = Xxh3Fingerprint> {
    inner: Arc<Mutex<Inner<P>>>,
}

impl<P: Fingerprint> Clone for SharedPollGate<P> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<P: Fingerprint> SharedPollGate<P> {
    pub fn new(gate: PollGate<P>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                gate,
                state: PollState::new(),
            })),
        }
    }

    // The state stays consistent even if a holder panicked: every update is
    // a single field store.
    fn lock(&self) -> MutexGuard<'_, Inner<P>> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Checks the rate limit and records the attempt atomically.
    pub fn try_begin_poll(&self, now: Instant) -> bool {
        let mut inner = self.lock();
        let Inner { gate, state } = &mut *inner;
        gate.try_begin_poll(now, state)
    }

    /// Change detection with the fingerprint update applied atomically.
    pub fn should_reparse(&self, text: &str) -> bool {
        let mut inner = self.lock();
        let Inner { gate, state } = &mut *inner;
        gate.should_reparse(text, state)
    }

    /// Copy of the current state.
    pub fn state(&self) -> PollState {
        self.lock().state.clone()
    }
}
