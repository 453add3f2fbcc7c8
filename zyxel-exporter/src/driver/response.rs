//! Raw capture type for command execution results.

use std::time::Duration;

/// Unparsed shell output for one command, bounded by prompt detection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawCapture {
    /// The command that was executed.
    pub command: String,

    /// Output between the command echo and the trailing prompt.
    pub text: String,

    /// Whether every read phase found its terminator. An incomplete capture
    /// may be empty or truncated.
    pub complete: bool,

    /// Time taken to execute the command.
    pub elapsed: Duration,
}

impl RawCapture {
    /// Create a new capture.
    pub fn new(
        command: impl Into<String>,
        text: impl Into<String>,
        complete: bool,
        elapsed: Duration,
    ) -> Self {
        Self {
            command: command.into(),
            text: text.into(),
            complete,
            elapsed,
        }
    }

    /// Consume the capture, keeping only the text.
    pub fn into_text(self) -> String {
        self.text
    }
}

impl std::fmt::Display for RawCapture {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.text)
    }
}
