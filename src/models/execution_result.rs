//! Execution Result Model
//!
//! Captured output of exactly one engine invocation.

use chrono::{DateTime, Utc};
use std::time::Duration;

use super::OutputLine;
use crate::terminal::output::{classify_stderr, classify_stdout};

/// Captured stdout/stderr text of one engine invocation
#[derive(Debug, Clone)]
pub struct ExecutionResult {
    /// The command as the user submitted it
    pub command: String,

    /// The command as it was handed to the engine (after rewriting)
    pub dispatched: String,

    /// Sanitized standard output text
    pub stdout: String,

    /// Sanitized standard error text
    pub stderr: String,

    /// Fault message when the engine call raised
    pub fault: Option<String>,

    /// When the call started
    pub started_at: DateTime<Utc>,

    /// Wall time spent inside the engine
    pub duration: Duration,
}

impl ExecutionResult {
    /// Result of a call that returned normally
    pub fn completed(command: &str, dispatched: &str, stdout: String, stderr: String) -> Self {
        Self {
            command: command.to_string(),
            dispatched: dispatched.to_string(),
            stdout,
            stderr,
            fault: None,
            started_at: Utc::now(),
            duration: Duration::ZERO,
        }
    }

    /// Result of a call that faulted
    pub fn faulted(command: &str, dispatched: &str, message: impl Into<String>) -> Self {
        Self {
            command: command.to_string(),
            dispatched: dispatched.to_string(),
            stdout: String::new(),
            stderr: String::new(),
            fault: Some(message.into()),
            started_at: Utc::now(),
            duration: Duration::ZERO,
        }
    }

    /// Record timing information
    pub fn timed(mut self, started_at: DateTime<Utc>, duration: Duration) -> Self {
        self.started_at = started_at;
        self.duration = duration;
        self
    }

    /// Whether the engine call faulted
    pub fn is_fault(&self) -> bool {
        self.fault.is_some()
    }

    /// Display lines in screen order: error-channel lines first, then stdout.
    /// A fault yields exactly one error line.
    pub fn lines(&self) -> Vec<OutputLine> {
        if let Some(message) = &self.fault {
            return vec![OutputLine::fault(message)];
        }

        let mut lines = classify_stderr(&self.stderr);
        lines.extend(classify_stdout(&self.stdout));
        lines
    }
}
