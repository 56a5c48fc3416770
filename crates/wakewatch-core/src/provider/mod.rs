//! Provider abstraction for snapshot sources.
//!
//! This module defines the `SnapshotProvider` trait that lets the host work
//! with a snapshot source through one interface, independent of how reports
//! are obtained.

mod live;

pub use live::LiveProvider;

use crate::collector::{CollectError, CollectorTiming};
use crate::storage::model::Snapshot;

/// Error types that can occur while advancing a provider.
#[derive(Debug, Clone, PartialEq)]
pub enum ProviderError {
    /// The report could not be obtained. Holds the fetch error message.
    Fetch(String),
    /// The diagnostic command needs elevated privileges.
    /// Holds the command's own message.
    PermissionDenied(String),
}

impl std::fmt::Display for ProviderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProviderError::Fetch(msg) => write!(f, "Fetch error: {}", msg),
            ProviderError::PermissionDenied(msg) => write!(f, "Permission denied: {}", msg),
        }
    }
}

impl std::error::Error for ProviderError {}

impl From<CollectError> for ProviderError {
    fn from(e: CollectError) -> Self {
        match e {
            CollectError::PermissionDenied(msg) => ProviderError::PermissionDenied(msg),
            other => ProviderError::Fetch(other.to_string()),
        }
    }
}

/// Abstraction for snapshot sources.
///
/// The trait is object-safe and designed to be used with
/// `Box<dyn SnapshotProvider>`.
pub trait SnapshotProvider {
    /// Returns the snapshot currently presented, if any.
    ///
    /// Returns `None` until the first successful poll.
    fn current(&self) -> Option<&Snapshot>;

    /// Runs one poll cycle.
    ///
    /// Returns the new snapshot when what should be presented changed, and
    /// `None` when nothing changed (throttled, unchanged report) or the
    /// poll failed (check `last_error()` for details).
    fn advance(&mut self) -> Option<&Snapshot>;

    /// Returns `true` if this provider polls the live system.
    fn is_live(&self) -> bool;

    /// Returns the error from the last `advance()`, if it failed.
    fn last_error(&self) -> Option<&ProviderError>;

    /// Returns timing information from the last poll that ran.
    fn collector_timing(&self) -> Option<&CollectorTiming> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_error_from_collect_error() {
        let err: ProviderError = CollectError::PermissionDenied("elevate".to_string()).into();
        assert_eq!(err, ProviderError::PermissionDenied("elevate".to_string()));

        let err: ProviderError = CollectError::CommandFailed {
            status: Some(1),
            stderr: String::new(),
        }
        .into();
        assert_eq!(
            err,
            ProviderError::Fetch("command exited with status 1".to_string())
        );
    }
}
