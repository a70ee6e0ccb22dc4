//! Output Line Model
//!
//! A single sanitized line of engine output, tagged with the class that
//! decides how it is styled on screen. The class is display-only: nothing in
//! rzterm branches on it for control flow.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Display class of an output line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LineClass {
    /// `ERROR:` diagnostics and engine faults
    Error,
    /// Command usage / help tables
    Help,
    /// Any other diagnostic from the error channel
    Warning,
    /// Regular command output
    Plain,
}

/// Which engine channel a line came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StreamType {
    /// Standard output
    Stdout,
    /// Standard error
    Stderr,
}

/// Represents a single line of sanitized, classified engine output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputLine {
    /// The sanitized text content
    pub text: String,

    /// Display class
    pub class: LineClass,

    /// Channel the line was captured from
    pub stream: StreamType,

    /// Position within its channel (0-based)
    pub line_number: usize,

    /// When this line was produced
    pub timestamp: DateTime<Utc>,
}

impl OutputLine {
    /// Create a new output line
    pub fn new(text: impl Into<String>, class: LineClass, stream: StreamType) -> Self {
        Self {
            text: text.into(),
            class,
            stream,
            line_number: 0,
            timestamp: Utc::now(),
        }
    }

    /// Create a plain stdout line
    pub fn plain(text: impl Into<String>) -> Self {
        Self::new(text, LineClass::Plain, StreamType::Stdout)
    }

    /// Set the line number
    pub fn at_line(mut self, line_number: usize) -> Self {
        self.line_number = line_number;
        self
    }

    /// The synthetic line reported when the engine call faulted
    pub fn fault(message: &str) -> Self {
        Self::new(format!("Error: {}", message), LineClass::Error, StreamType::Stderr)
    }

    /// Check whether this line is an error line
    pub fn is_error(&self) -> bool {
        self.class == LineClass::Error
    }
}
