//! Parsing of power request reports.
//!
//! These are pure functions over report text, testable with string inputs.

pub mod name;
pub mod parser;

pub use name::extract_name;
pub use parser::{ParseReport, parse, parse_report};
