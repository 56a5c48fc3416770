//! Data models produced by the collector.
//!
//! - [`entity`]: one holder of a display-blocking power request
//! - [`snapshot`]: the ordered entity list from a single parse pass
//!
//! Nothing here is persisted. A snapshot is rebuilt from scratch every time
//! the report changes; entities carry no identity across polls.

mod entity;
mod snapshot;

pub use entity::{BlockingEntity, DEFAULT_REASON, UNKNOWN_PROCESS};
pub use snapshot::Snapshot;
