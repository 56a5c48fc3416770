//! In-memory command runner for testing collectors without `powercfg`.

use std::collections::VecDeque;
use std::io;

use crate::collector::traits::{CollectError, CommandRunner};

/// One scripted fetch result.
#[derive(Debug, Clone)]
enum Response {
    Report(String),
    PermissionDenied(String),
    Failed { status: Option<i32>, stderr: String },
    NotFound,
}

impl Default for Response {
    fn default() -> Self {
        Response::Report(String::new())
    }
}

impl Response {
    fn into_result(self) -> Result<String, CollectError> {
        match self {
            Response::Report(text) => Ok(text),
            Response::PermissionDenied(msg) => Err(CollectError::PermissionDenied(msg)),
            Response::Failed { status, stderr } => {
                Err(CollectError::CommandFailed { status, stderr })
            }
            Response::NotFound => Err(CollectError::Io(io::Error::new(
                io::ErrorKind::NotFound,
                "mock command not found",
            ))),
        }
    }
}

/// Scripted report source.
///
/// Queued responses are returned once each, in order. When the queue is
/// empty every fetch returns the steady response (an empty report by
/// default), like a host whose requests stopped changing.
#[derive(Debug, Clone, Default)]
pub struct MockRunner {
    queue: VecDeque<Response>,
    steady: Response,
    calls: usize,
}

impl MockRunner {
    /// Creates a runner that reports nothing.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a runner that always returns `report`.
    pub fn with_report(report: impl Into<String>) -> Self {
        Self {
            steady: Response::Report(report.into()),
            ..Self::default()
        }
    }

    /// Replaces the report returned once the queue is drained.
    pub fn set_report(&mut self, report: impl Into<String>) {
        self.steady = Response::Report(report.into());
    }

    /// Makes every fetch after the queue fail with a privilege error.
    pub fn set_permission_denied(&mut self, message: impl Into<String>) {
        self.steady = Response::PermissionDenied(message.into());
    }

    /// Queues a one-shot report.
    pub fn push_report(&mut self, report: impl Into<String>) {
        self.queue.push_back(Response::Report(report.into()));
    }

    /// Queues a one-shot privilege failure.
    pub fn push_permission_denied(&mut self, message: impl Into<String>) {
        self.queue.push_back(Response::PermissionDenied(message.into()));
    }

    /// Queues a one-shot non-zero exit.
    pub fn push_failure(&mut self, status: Option<i32>, stderr: impl Into<String>) {
        self.queue.push_back(Response::Failed {
            status,
            stderr: stderr.into(),
        });
    }

    /// Queues a one-shot "command not found".
    pub fn push_not_found(&mut self) {
        self.queue.push_back(Response::NotFound);
    }

    /// Number of fetches performed so far.
    pub fn calls(&self) -> usize {
        self.calls
    }
}

impl CommandRunner for MockRunner {
    fn fetch(&mut self) -> Result<String, CollectError> {
        self.calls += 1;
        match self.queue.pop_front() {
            Some(response) => response.into_result(),
            None => self.steady.clone().into_result(),
        }
    }

    fn describe(&self) -> String {
        "mock runner".to_string()
    }
}
