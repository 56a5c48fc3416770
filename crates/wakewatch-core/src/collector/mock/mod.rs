//! Mock command runner for testing.
//!
//! This module provides `MockRunner` and pre-built report scenarios for
//! testing the collector without a Windows host or elevated privileges.

mod runner;
mod scenarios;

pub use runner::MockRunner;
pub use scenarios::{
    IDLE_REPORT, PERMISSION_DENIED_OUTPUT, TYPICAL_REPORT, UNKNOWN_SECTION_REPORT,
};
