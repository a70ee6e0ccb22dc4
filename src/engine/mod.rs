//! Analysis engine contract
//!
//! The engine is an opaque, synchronous, stateful command executor. rzterm
//! never calls it directly from the input path: a [`crate::execution::Session`]
//! owns the one engine value and is the only thing that may invoke it.

pub mod process;

pub use process::ProcessEngine;

use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Files at or above this size skip the automatic analysis pass on open
pub const AUTO_ANALYZE_THRESHOLD: u64 = 1024 * 1024;

/// A binary opened for analysis
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetFile {
    /// Display name (file name component)
    pub name: String,
    /// Path handed to the engine
    pub path: PathBuf,
    /// Size in bytes
    pub size: u64,
}

impl TargetFile {
    /// Describe the file at `path`, failing if it cannot be read
    pub fn from_path(path: &Path) -> Result<Self> {
        let metadata = std::fs::metadata(path).map_err(|e| Error::TargetUnreadable {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        if !metadata.is_file() {
            return Err(Error::TargetUnreadable {
                path: path.to_path_buf(),
                reason: "not a regular file".to_string(),
            });
        }

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        Ok(Self {
            name,
            path: path.to_path_buf(),
            size: metadata.len(),
        })
    }
}

/// Settings applied when a file is opened
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenOptions {
    /// `io.cache` setting; `None` leaves the engine default
    pub cache_enabled: Option<bool>,
    /// 1 = `aa`, 2 = `aaa`, 3 = `aaaa`
    pub analysis_depth: u8,
    /// Files of this size or larger skip automatic analysis
    pub auto_analyze_threshold: u64,
}

impl Default for OpenOptions {
    fn default() -> Self {
        Self {
            cache_enabled: None,
            analysis_depth: 1,
            auto_analyze_threshold: AUTO_ANALYZE_THRESHOLD,
        }
    }
}

impl OpenOptions {
    /// The analysis command matching the configured depth
    pub fn analysis_command(&self) -> &'static str {
        match self.analysis_depth {
            0 | 1 => "aa",
            2 => "aaa",
            _ => "aaaa",
        }
    }
}

/// Synchronous engine contract.
///
/// Implementations are driven from a single worker thread and never see two
/// overlapping calls.
pub trait Engine: Send + 'static {
    /// Open `file`; an already-open file is closed first
    fn open(&mut self, file: &TargetFile, options: &OpenOptions) -> Result<()>;

    /// Run one command and return its standard output. `Err` is a fault.
    fn execute_command(&mut self, command: &str) -> Result<String>;

    /// Error-channel text of the most recent `execute_command`
    fn last_stderr(&self) -> String;

    /// Current address as `0x`-prefixed hex, `0x00000000` when unknown
    fn current_address(&mut self) -> String;

    /// Release all session state; safe to call when already closed
    fn close(&mut self);

    /// Whether a file is open
    fn is_open(&self) -> bool;
}
