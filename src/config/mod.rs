//! Configuration management for rzterm
//!
//! Settings are read from a single TOML file (see [`loader::ConfigLoader`]).
//! Every section and field has a default, so a partial file only overrides
//! what it names.

pub mod loader;

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::engine::process::DEFAULT_PROGRAM;
use crate::engine::{OpenOptions, AUTO_ANALYZE_THRESHOLD};
use crate::history::{MAX_HISTORY_ENTRIES, PERSISTED_HISTORY_ENTRIES};

pub use loader::ConfigLoader;

/// Application directory name under the platform config/data dirs
pub const APP_DIR: &str = "rzterm";

/// Main configuration structure for rzterm
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Engine configuration
    pub engine: EngineConfig,

    /// Command history configuration
    pub history: HistoryConfig,

    /// Log output configuration
    pub logging: LoggingConfig,

    /// Display configuration
    pub display: DisplayConfig,
}

/// Engine-related configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Engine executable
    pub program: String,

    /// Extra arguments passed on every engine invocation
    pub extra_args: Vec<String>,

    /// `io.cache` setting; unset leaves the engine default
    pub cache_enabled: Option<bool>,

    /// Analysis depth on open (1 = `aa`, 2 = `aaa`, 3 = `aaaa`)
    pub analysis_depth: u8,

    /// Files of this many bytes or more skip automatic analysis
    pub auto_analyze_threshold: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            program: DEFAULT_PROGRAM.to_string(),
            extra_args: Vec::new(),
            cache_enabled: None,
            analysis_depth: 1,
            auto_analyze_threshold: AUTO_ANALYZE_THRESHOLD,
        }
    }
}

impl EngineConfig {
    /// Options for opening a file with this configuration
    pub fn open_options(&self) -> OpenOptions {
        OpenOptions {
            cache_enabled: self.cache_enabled,
            analysis_depth: self.analysis_depth,
            auto_analyze_threshold: self.auto_analyze_threshold,
        }
    }
}

/// Command history configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    /// Entries kept in memory
    pub max_entries: usize,

    /// Newest entries written to the history file
    pub persisted_entries: usize,

    /// History file; defaults to `<data dir>/rzterm/history`
    pub file: Option<PathBuf>,

    /// Whether history is written to disk at all
    pub persist: bool,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            max_entries: MAX_HISTORY_ENTRIES,
            persisted_entries: PERSISTED_HISTORY_ENTRIES,
            file: None,
            persist: true,
        }
    }
}

impl HistoryConfig {
    /// Effective history file, if persistence is on
    pub fn resolved_file(&self) -> Option<PathBuf> {
        if !self.persist {
            return None;
        }
        self.file
            .clone()
            .or_else(|| data_dir().map(|dir| dir.join("history")))
    }
}

/// Log output configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter directive, overridden by `RZTERM_LOG`
    pub level: String,

    /// Log file; defaults to `<data dir>/rzterm/rzterm.log`
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
        }
    }
}

impl LoggingConfig {
    /// Effective log file
    pub fn resolved_file(&self) -> PathBuf {
        self.file.clone().unwrap_or_else(|| {
            data_dir()
                .unwrap_or_else(std::env::temp_dir)
                .join("rzterm.log")
        })
    }
}

/// Display configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Show the connect banner after opening a file
    pub banner: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self { banner: true }
    }
}

/// Per-user data directory for rzterm
pub fn data_dir() -> Option<PathBuf> {
    dirs::data_dir().map(|dir| dir.join(APP_DIR))
}
