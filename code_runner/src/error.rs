use std::error::Error;
use std::fmt;

/// Appended to the build log when a run is cut off by the container timeout.
pub const CONTAINER_TIMEOUT_MESSAGE: &str =
    "Container timeout. Please check for infinite loops or other slowness.";

/// Errors from building and executing a container run.
///
/// A timeout is not a dead end: whatever output was captured before the
/// deadline travels with the error so the caller can still extract score
/// lines from it. A container that exits non-zero is not an error at all,
/// failing student tests are expected to do exactly that.
#[derive(Debug)]
pub enum RunnerError {
    /// The run script template could not be parsed.
    Script(String),
    /// The container could not be started.
    Start(String),
    /// Waiting on the container process failed.
    Wait(String),
    /// I/O failure while capturing container output.
    Io(String),
    /// The run exceeded its timeout; `output` holds everything captured
    /// before the deadline.
    Timeout { output: String },
}

impl fmt::Display for RunnerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunnerError::Script(msg) => write!(f, "invalid run script: {}", msg),
            RunnerError::Start(msg) => write!(f, "failed to start container: {}", msg),
            RunnerError::Wait(msg) => write!(f, "failed waiting for container: {}", msg),
            RunnerError::Io(msg) => write!(f, "container output error: {}", msg),
            RunnerError::Timeout { .. } => write!(f, "container run timed out"),
        }
    }
}

impl Error for RunnerError {}

impl From<std::io::Error> for RunnerError {
    fn from(err: std::io::Error) -> Self {
        RunnerError::Io(err.to_string())
    }
}
