//! wakewatch-core, the shared library for the wakewatch display-request monitor.
//!
//! Provides:
//! - `collector`: diagnostic command runners and the power-request report parser
//! - `gate`: poll rate limiting and change detection between reports
//! - `storage`: blocking-entity and snapshot models
//! - `provider`: snapshot source abstraction (live polling)
//! - `fmt`: plain-text rendering of snapshots

pub mod collector;
pub mod fmt;
pub mod gate;
pub mod provider;
pub mod storage;

/// Short git SHA this library was built from.
pub const GIT_SHA: &str = env!("WAKEWATCH_GIT_SHA");
