//! Live data provider for real-time power request monitoring.

use std::time::Instant;

use chrono::Utc;
use tracing::warn;

use crate::collector::{Collector, CollectorTiming, CommandRunner, PollOutcome};
use crate::gate::{Fingerprint, Xxh3Fingerprint};
use crate::storage::model::Snapshot;

use super::{ProviderError, SnapshotProvider};

/// Provider that polls the system through a `Collector`.
///
/// Keeps the last presented snapshot. A report that changed outside the
/// `DISPLAY:` section produces the same entity list; that is absorbed here
/// so the host does not redraw.
pub struct LiveProvider<R: CommandRunner, P: Fingerprint = Xxh3Fingerprint> {
    collector: Collector<R, P>,
    current: Option<Snapshot>,
    last_error: Option<ProviderError>,
}

impl<R: CommandRunner, P: Fingerprint> LiveProvider<R, P> {
    /// Creates a new live provider.
    ///
    /// # Arguments
    /// * `collector` - The collector used for each poll cycle
    pub fn new(collector: Collector<R, P>) -> Self {
        Self {
            collector,
            current: None,
            last_error: None,
        }
    }

    pub fn collector(&self) -> &Collector<R, P> {
        &self.collector
    }

    /// Runs one poll cycle at the given instant.
    ///
    /// Same contract as [`SnapshotProvider::advance`].
    pub fn advance_at(&mut self, now: Instant) -> Option<&Snapshot> {
        self.last_error = None;

        let next = match self.collector.poll(now) {
            Ok(PollOutcome::Updated(snapshot)) => snapshot,
            Ok(PollOutcome::NoData) => Snapshot::new(Utc::now().timestamp(), Vec::new()),
            Ok(PollOutcome::Throttled | PollOutcome::Unchanged) => return None,
            Err(e) => {
                warn!("Poll failed: {}", e);
                self.last_error = Some(e.into());
                return None;
            }
        };

        let changed = self
            .current
            .as_ref()
            .is_none_or(|current| !current.same_entities(&next));
        self.current = Some(next);
        if changed { self.current.as_ref() } else { None }
    }
}

impl<R: CommandRunner, P: Fingerprint> SnapshotProvider for LiveProvider<R, P> {
    fn current(&self) -> Option<&Snapshot> {
        self.current.as_ref()
    }

    fn advance(&mut self) -> Option<&Snapshot> {
        self.advance_at(Instant::now())
    }

    fn is_live(&self) -> bool {
        true
    }

    fn last_error(&self) -> Option<&ProviderError> {
        self.last_error.as_ref()
    }

    fn collector_timing(&self) -> Option<&CollectorTiming> {
        self.collector.last_timing()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collector::mock::{IDLE_REPORT, MockRunner, TYPICAL_REPORT};
    use std::time::Duration;

    #[test]
    fn test_live_provider_advance() {
        let collector = Collector::new(MockRunner::typical());
        let mut provider = LiveProvider::new(collector);

        // Initially no snapshot
        assert!(provider.current().is_none());

        // Advance should collect a snapshot
        let snapshot = provider.advance();
        assert_eq!(snapshot.map(Snapshot::count), Some(2));

        // Current should now return the snapshot
        assert!(provider.current().is_some());
        assert!(provider.collector_timing().is_some());
    }

    #[test]
    fn test_live_provider_unchanged_returns_none() {
        let mut provider = LiveProvider::new(Collector::new(MockRunner::typical()));
        let now = Instant::now();

        assert!(provider.advance_at(now).is_some());
        assert!(provider.advance_at(now + Duration::from_millis(100)).is_none());
        assert!(provider.advance_at(now + Duration::from_secs(1)).is_none());
        assert_eq!(provider.current().map(Snapshot::count), Some(2));
        assert!(provider.last_error().is_none());
    }

    #[test]
    fn test_live_provider_ignores_changes_outside_display() {
        let mut runner = MockRunner::typical();
        runner.push_report(TYPICAL_REPORT);
        runner.set_report(TYPICAL_REPORT.replace("Windows Update", "Defender scan"));
        let mut provider = LiveProvider::new(Collector::new(runner));
        let now = Instant::now();

        assert!(provider.advance_at(now).is_some());
        assert!(provider.advance_at(now + Duration::from_secs(1)).is_none());
        assert_eq!(provider.collector().runner().calls(), 2);
    }

    #[test]
    fn test_live_provider_no_data_clears_snapshot() {
        let mut runner = MockRunner::new();
        runner.push_report(TYPICAL_REPORT);
        let mut provider = LiveProvider::new(Collector::new(runner));
        let now = Instant::now();

        assert!(provider.advance_at(now).is_some());
        let cleared = provider.advance_at(now + Duration::from_secs(1));
        assert_eq!(cleared.map(Snapshot::is_empty), Some(true));
        // Still nothing: no change to present.
        assert!(provider.advance_at(now + Duration::from_secs(2)).is_none());
    }

    #[test]
    fn test_live_provider_error_keeps_current() {
        let mut runner = MockRunner::with_report(IDLE_REPORT);
        runner.push_report(TYPICAL_REPORT);
        runner.push_permission_denied("needs elevation");
        let mut provider = LiveProvider::new(Collector::new(runner));
        let now = Instant::now();

        assert!(provider.advance_at(now).is_some());
        assert!(provider.advance_at(now + Duration::from_secs(1)).is_none());
        assert_eq!(
            provider.last_error(),
            Some(&ProviderError::PermissionDenied("needs elevation".to_string()))
        );
        assert_eq!(provider.current().map(Snapshot::count), Some(2));

        let recovered = provider.advance_at(now + Duration::from_secs(2));
        assert_eq!(recovered.map(Snapshot::count), Some(0));
        assert!(provider.last_error().is_none());
    }

    #[test]
    fn test_live_provider_is_live() {
        let provider = LiveProvider::new(Collector::new(MockRunner::new()));
        assert!(provider.is_live());
    }
}
