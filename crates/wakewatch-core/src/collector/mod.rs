//! Power request collector.
//!
//! This module obtains the raw `powercfg /requests` report and turns it into
//! snapshots of the entities keeping the display on, with support for
//! mocking for testing off Windows.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                         Collector                           │
//! │  ┌─────────────────────┐   ┌─────────────────────────────┐  │
//! │  │      PollGate       │   │      requests::parse        │  │
//! │  │  - rate limit       │   │  - DISPLAY: section only    │  │
//! │  │  - fingerprint      │   │  - [KIND] header + details  │  │
//! │  └──────────┬──────────┘   └──────────────┬──────────────┘  │
//! │             └──────────────┬──────────────┘                 │
//! │                            │                                │
//! │                    ┌───────▼───────┐                        │
//! │                    │ CommandRunner │ (trait)                │
//! │                    └───────┬───────┘                        │
//! └────────────────────────────┼────────────────────────────────┘
//!                              │
//!              ┌───────────────┼───────────────┐
//!              │               │               │
//!     ┌────────▼───────┐ ┌─────▼──────┐ ┌──────▼──────┐
//!     │ PowercfgRunner │ │ FileRunner │ │ MockRunner  │
//!     │ (Windows)      │ │ (saved)    │ │ (Testing)   │
//!     └────────────────┘ └────────────┘ └─────────────┘
//! ```
//!
//! # Usage
//!
//! ## Production (Windows)
//!
//! ```ignore
//! use wakewatch_core::collector::{Collector, PowercfgRunner};
//!
//! let mut collector = Collector::new(PowercfgRunner::new());
//! let snapshot = collector.collect_snapshot().unwrap();
//! ```
//!
//! ## Testing (with MockRunner)
//!
//! ```
//! use wakewatch_core::collector::{Collector, MockRunner};
//!
//! let mut collector = Collector::new(MockRunner::typical());
//! let snapshot = collector.collect_snapshot().unwrap();
//! assert_eq!(snapshot.count(), 2);
//! ```

#[allow(clippy::module_inception)]
mod collector;
pub mod mock;
pub mod requests;
pub mod traits;

pub use collector::{Collector, CollectorTiming, PollOutcome};
pub use mock::MockRunner;
pub use requests::{ParseReport, extract_name, parse, parse_report};
pub use traits::{CollectError, CommandRunner, FileRunner, PowercfgRunner};
