//! Snapshot of display-blocking requests.

use serde::{Deserialize, Serialize};

use super::entity::BlockingEntity;

/// Entities holding a display request at a given moment.
///
/// Produced by one parse pass over a diagnostic report. Entities are kept in
/// the order their header lines appeared; duplicates by name are distinct
/// records.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Default)]
pub struct Snapshot {
    /// Unix timestamp (seconds since epoch) when the report was parsed.
    pub timestamp: i64,

    /// Blocking entities in report order.
    pub entities: Vec<BlockingEntity>,
}

impl Snapshot {
    pub fn new(timestamp: i64, entities: Vec<BlockingEntity>) -> Self {
        Self {
            timestamp,
            entities,
        }
    }

    /// Number of blocking entities. Always equals `entities.len()`.
    pub fn count(&self) -> usize {
        self.entities.len()
    }

    /// Returns `true` if nothing is keeping the display on.
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Compares entity lists, ignoring the timestamp.
    pub fn same_entities(&self, other: &Snapshot) -> bool {
        self.entities == other.entities
    }
}
