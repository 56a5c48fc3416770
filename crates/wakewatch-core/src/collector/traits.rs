//! Abstractions for obtaining the raw power request report.
//!
//! The `CommandRunner` trait lets the collector work with the real
//! `powercfg /requests` command on Windows, a saved report on disk, or an
//! in-memory mock for testing on other platforms and in CI.

use std::io;
use std::path::PathBuf;
use std::process::Command;

use tracing::debug;

use crate::collector::requests::parser::has_section_marker;

/// Error type for fetch failures.
///
/// Parsing never fails; every error here comes from obtaining the report.
#[derive(Debug)]
pub enum CollectError {
    /// The command could not be started, or the report file could not be read.
    Io(io::Error),
    /// The command ran but exited unsuccessfully.
    CommandFailed {
        status: Option<i32>,
        stderr: String,
    },
    /// The command refused to run without elevated privileges.
    /// Holds the command's own message.
    PermissionDenied(String),
}

impl std::fmt::Display for CollectError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CollectError::Io(e) => write!(f, "I/O error: {}", e),
            CollectError::CommandFailed { status, stderr } => {
                match status {
                    Some(code) => write!(f, "command exited with status {}", code)?,
                    None => write!(f, "command terminated by signal")?,
                }
                if !stderr.is_empty() {
                    write!(f, ": {}", stderr)?;
                }
                Ok(())
            }
            CollectError::PermissionDenied(msg) => write!(f, "permission denied: {}", msg),
        }
    }
}

impl std::error::Error for CollectError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CollectError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for CollectError {
    fn from(e: io::Error) -> Self {
        CollectError::Io(e)
    }
}

/// Source of raw report text.
pub trait CommandRunner: Send {
    /// Obtains the current report.
    ///
    /// An empty string is a valid result meaning "nothing reported".
    fn fetch(&mut self) -> Result<String, CollectError>;

    /// Short description of the source for log messages.
    fn describe(&self) -> String;
}

impl<R: CommandRunner + ?Sized> CommandRunner for Box<R> {
    fn fetch(&mut self) -> Result<String, CollectError> {
        (**self).fetch()
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}

/// Runs the diagnostic command (`powercfg /requests` by default).
#[derive(Debug, Clone)]
pub struct PowercfgRunner {
    program: String,
    args: Vec<String>,
}

impl PowercfgRunner {
    pub const DEFAULT_PROGRAM: &'static str = "powercfg";
    pub const DEFAULT_ARGS: &'static [&'static str] = &["/requests"];

    pub fn new() -> Self {
        Self::with_command(
            Self::DEFAULT_PROGRAM,
            Self::DEFAULT_ARGS.iter().map(|a| a.to_string()),
        )
    }

    /// Runs `program` with `args` instead of the default command.
    pub fn with_command(
        program: impl Into<String>,
        args: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }
}

impl Default for PowercfgRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandRunner for PowercfgRunner {
    fn fetch(&mut self) -> Result<String, CollectError> {
        let output = Command::new(&self.program).args(&self.args).output()?;

        // powercfg writes in the console code page; keep what decodes.
        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

        // Reason lines are free text: a successful run that printed a report
        // is data even if a reason mentions elevation.
        if (!output.status.success() || !has_section_marker(&stdout))
            && let Some(msg) = privilege_error(&stdout).or_else(|| privilege_error(&stderr))
        {
            return Err(CollectError::PermissionDenied(msg));
        }

        if !output.status.success() {
            return Err(CollectError::CommandFailed {
                status: output.status.code(),
                stderr: stderr.trim().to_string(),
            });
        }

        debug!("{} returned {} bytes", self.describe(), stdout.len());
        Ok(stdout)
    }

    fn describe(&self) -> String {
        if self.args.is_empty() {
            self.program.clone()
        } else {
            format!("{} {}", self.program, self.args.join(" "))
        }
    }
}

/// Reads a saved report from disk on every fetch.
#[derive(Debug, Clone)]
pub struct FileRunner {
    path: PathBuf,
}

impl FileRunner {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl CommandRunner for FileRunner {
    fn fetch(&mut self) -> Result<String, CollectError> {
        Ok(std::fs::read_to_string(&self.path)?)
    }

    fn describe(&self) -> String {
        format!("file {}", self.path.display())
    }
}

/// Detects the "run as administrator" refusal in command output.
///
/// Returns the first line mentioning it, trimmed.
pub(crate) fn privilege_error(output: &str) -> Option<String> {
    output
        .lines()
        .map(str::trim)
        .find(|line| {
            let lower = line.to_ascii_lowercase();
            lower.contains("administrator privileges") || lower.contains("elevated command prompt")
        })
        .map(str::to_string)
}
