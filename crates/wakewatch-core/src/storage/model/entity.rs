//! Blocking entity model.

use serde::{Deserialize, Serialize};

/// Name used when nothing usable could be extracted from a header line.
pub const UNKNOWN_PROCESS: &str = "Unknown Process";

/// Reason shown until a detail line is seen for the entity.
pub const DEFAULT_REASON: &str = "Active request (no details)";

/// A process, service or driver holding a request that keeps the display on.
///
/// Source: one `[KIND] path-or-name` block of the `DISPLAY:` section.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct BlockingEntity {
    /// Bare executable or service name, path and `.exe` stripped.
    /// Never empty: falls back to [`UNKNOWN_PROCESS`].
    pub name: String,

    /// Free-text justification reported for the request.
    /// [`DEFAULT_REASON`] until a detail line is observed.
    pub reason: String,
}

impl BlockingEntity {
    /// Creates an entity with the default reason.
    ///
    /// An empty `name` is replaced with [`UNKNOWN_PROCESS`].
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            name: if name.is_empty() {
                UNKNOWN_PROCESS.to_string()
            } else {
                name
            },
            reason: DEFAULT_REASON.to_string(),
        }
    }
}
