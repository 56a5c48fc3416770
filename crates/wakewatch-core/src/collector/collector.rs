//! Main collector that combines the runner, the poll gate and the parser.
//!
//! The `Collector` struct runs one poll cycle at a time: rate-limit check,
//! fetch, change detection, parse. It owns the only `PollState`, so taking
//! `&mut self` per cycle is what keeps the check-and-update steps atomic.

use std::time::{Duration, Instant};

use chrono::Utc;
use tracing::{debug, trace};

use crate::collector::requests::parse_report;
use crate::collector::traits::{CollectError, CommandRunner};
use crate::gate::{Fingerprint, PollGate, PollState, Xxh3Fingerprint};
use crate::storage::model::Snapshot;

/// Timing information for the phases of the last poll that ran.
#[derive(Debug, Clone, Default)]
pub struct CollectorTiming {
    /// Total poll cycle time.
    pub total: Duration,
    /// Time spent in the runner (command execution or file read).
    pub fetch: Duration,
    /// Time spent parsing. Zero when the report was unchanged.
    pub parse: Duration,
}

/// Result of one poll cycle that did not fail.
#[derive(Debug, Clone, PartialEq)]
pub enum PollOutcome {
    /// Skipped: the previous poll was less than the minimum interval ago.
    Throttled,
    /// The runner returned no text. Nothing to show; the caller should
    /// present an empty snapshot.
    NoData,
    /// The report is the same as the last parsed one.
    Unchanged,
    /// The report changed and was parsed.
    Updated(Snapshot),
}

/// Polls a [`CommandRunner`] through a [`PollGate`].
pub struct Collector<R: CommandRunner, P: Fingerprint = Xxh3Fingerprint> {
    runner: R,
    gate: PollGate<P>,
    state: PollState,
    /// Unknown section labels seen in the last parsed report.
    unknown_sections: Vec<String>,
    /// Timing information from the last poll that reached the runner.
    last_timing: Option<CollectorTiming>,
}

impl<R: CommandRunner> Collector<R> {
    /// Creates a collector with the default gate (xxh3, 1 second).
    pub fn new(runner: R) -> Self {
        Self::with_gate(runner, PollGate::new())
    }
}

impl<R: CommandRunner, P: Fingerprint> Collector<R, P> {
    pub fn with_gate(runner: R, gate: PollGate<P>) -> Self {
        Self {
            runner,
            gate,
            state: PollState::new(),
            unknown_sections: Vec::new(),
            last_timing: None,
        }
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    pub fn gate(&self) -> &PollGate<P> {
        &self.gate
    }

    pub fn state(&self) -> &PollState {
        &self.state
    }

    /// Unknown section labels from the last parsed report.
    pub fn unknown_sections(&self) -> &[String] {
        &self.unknown_sections
    }

    /// Returns timing information from the last poll that ran.
    pub fn last_timing(&self) -> Option<&CollectorTiming> {
        self.last_timing.as_ref()
    }

    /// Runs one gated poll cycle.
    ///
    /// The attempt is recorded before fetching, so a failing command is not
    /// retried sooner than the minimum interval either. Fetch errors are
    /// returned unchanged.
    pub fn poll(&mut self, now: Instant) -> Result<PollOutcome, CollectError> {
        if !self.gate.try_begin_poll(now, &mut self.state) {
            trace!("Poll throttled");
            return Ok(PollOutcome::Throttled);
        }

        let total_start = Instant::now();
        let mut timing = CollectorTiming::default();

        let start = Instant::now();
        let fetched = self.runner.fetch();
        timing.fetch = start.elapsed();
        let text = match fetched {
            Ok(text) => text,
            Err(e) => {
                timing.total = total_start.elapsed();
                self.last_timing = Some(timing);
                return Err(e);
            }
        };

        let outcome = if self.gate.should_reparse(&text, &mut self.state) {
            let start = Instant::now();
            let snapshot = self.parse(&text);
            timing.parse = start.elapsed();
            debug!("Report changed: {} display request(s)", snapshot.count());
            PollOutcome::Updated(snapshot)
        } else if text.trim().is_empty() {
            // The next report must be parsed even if it matches the one
            // before the gap, since the caller now shows nothing.
            self.state.clear_fingerprint();
            self.unknown_sections.clear();
            debug!("{} returned no data", self.runner.describe());
            PollOutcome::NoData
        } else {
            trace!("Report unchanged");
            PollOutcome::Unchanged
        };

        timing.total = total_start.elapsed();
        self.last_timing = Some(timing);
        Ok(outcome)
    }

    /// Fetches and parses once, bypassing the gate.
    ///
    /// Empty output yields an empty snapshot. The gate state is left alone.
    pub fn collect_snapshot(&mut self) -> Result<Snapshot, CollectError> {
        let text = self.runner.fetch()?;
        Ok(self.parse(&text))
    }

    fn parse(&mut self, text: &str) -> Snapshot {
        let report = parse_report(text);
        self.unknown_sections = report.unknown_sections;
        Snapshot::new(Utc::now().timestamp(), report.entities)
    }
}
