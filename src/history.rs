//! Command history
//!
//! [`HistoryLog`] keeps past commands most-recent-first, bounded and free of
//! duplicates, optionally mirrored to a file. [`HistoryNavigator`] walks it
//! for up/down recall in the line editor.

use std::collections::VecDeque;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Maximum number of history entries kept in memory
pub const MAX_HISTORY_ENTRIES: usize = 1000;

/// Maximum number of entries written to the history file
pub const PERSISTED_HISTORY_ENTRIES: usize = 100;

/// Ordered command log, most recent first
#[derive(Debug, Clone)]
pub struct HistoryLog {
    /// Entries, index 0 is the newest
    entries: VecDeque<String>,
    /// Maximum history size
    max_size: usize,
    /// How many of the newest entries go to disk
    persisted: usize,
    /// Backing file, if any
    file: Option<PathBuf>,
}

impl Default for HistoryLog {
    fn default() -> Self {
        Self::new(MAX_HISTORY_ENTRIES)
    }
}

impl HistoryLog {
    /// Create an in-memory log
    pub fn new(max_size: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            max_size: max_size.max(1),
            persisted: PERSISTED_HISTORY_ENTRIES.min(max_size),
            file: None,
        }
    }

    /// Create a log backed by `path`, loading whatever it already holds
    pub fn with_file(path: PathBuf, max_size: usize, persisted: usize) -> Result<Self> {
        let mut log = Self::new(max_size);
        log.persisted = persisted.min(log.max_size);
        log.load(&path)?;
        log.file = Some(path);
        Ok(log)
    }

    fn load(&mut self, path: &Path) -> Result<()> {
        if !path.exists() {
            return Ok(());
        }

        let content = fs::read_to_string(path).map_err(|e| Error::HistoryLoadFailed {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        self.entries.clear();
        for line in content.lines() {
            if line.trim().is_empty() || self.entries.contains(&line.to_string()) {
                continue;
            }
            self.entries.push_back(line.to_string());
            if self.entries.len() == self.max_size {
                break;
            }
        }

        debug!("Loaded {} history entries from {}", self.entries.len(), path.display());
        Ok(())
    }

    /// Record a command. Blank input is ignored; an existing duplicate is
    /// moved to the front instead of being stored twice.
    pub fn record(&mut self, command: &str) {
        if command.trim().is_empty() {
            return;
        }

        self.entries.retain(|c| c != command);
        self.entries.push_front(command.to_string());
        self.entries.truncate(self.max_size);

        if let Err(e) = self.save() {
            warn!("History not persisted: {}", e);
        }
    }

    /// Write the newest entries to the backing file (no-op when unbacked)
    pub fn save(&self) -> Result<()> {
        let Some(path) = &self.file else {
            return Ok(());
        };

        let save_err = |e: std::io::Error| Error::HistorySaveFailed {
            path: path.clone(),
            reason: e.to_string(),
        };

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(save_err)?;
        }

        let mut content = String::new();
        for entry in self
            .entries
            .iter()
            .filter(|e| !e.contains('\n'))
            .take(self.persisted)
        {
            content.push_str(entry);
            content.push('\n');
        }

        fs::write(path, content).map_err(save_err)
    }

    /// All entries, most recent first
    pub fn entries(&self) -> &VecDeque<String> {
        &self.entries
    }

    /// Entry at `index` (0 = newest)
    pub fn get(&self, index: usize) -> Option<&str> {
        self.entries.get(index).map(String::as_str)
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the log is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Maximum number of entries kept
    pub fn max_size(&self) -> usize {
        self.max_size
    }

    /// Clear all history, including the backing file
    pub fn clear(&mut self) -> Result<()> {
        self.entries.clear();
        self.save()
    }

    /// Backing file path, if any
    pub fn file(&self) -> Option<&Path> {
        self.file.as_deref()
    }
}

/// Up/down recall over a [`HistoryLog`].
///
/// `index == None` is the sentinel: the editor holds the user's own text.
#[derive(Debug, Default, Clone)]
pub struct HistoryNavigator {
    index: Option<usize>,
    /// The user's own line, stashed when recall starts
    live_edit: String,
}

impl HistoryNavigator {
    /// Create a navigator at the sentinel
    pub fn new() -> Self {
        Self::default()
    }

    /// Current index, `None` when not navigating
    pub fn index(&self) -> Option<usize> {
        self.index
    }

    /// Whether a history entry is currently recalled
    pub fn is_navigating(&self) -> bool {
        self.index.is_some()
    }

    /// Step to an older entry. `None` means there is nothing older (no-op).
    pub fn prev(&mut self, log: &HistoryLog, current_text: &str) -> Option<String> {
        let next_index = match self.index {
            None if !log.is_empty() => 0,
            Some(i) if i + 1 < log.len() => i + 1,
            _ => return None,
        };

        if self.index.is_none() {
            self.live_edit = current_text.to_string();
        }
        self.index = Some(next_index);
        Some(log.get(next_index).unwrap_or_default().to_string())
    }

    /// Step to a newer entry, or leave recall and restore the live line.
    /// `None` means recall was not active (no-op).
    pub fn next(&mut self, log: &HistoryLog) -> Option<String> {
        match self.index? {
            0 => {
                self.index = None;
                Some(std::mem::take(&mut self.live_edit))
            }
            i => {
                let newer = (i - 1).min(log.len().saturating_sub(1));
                self.index = Some(newer);
                Some(log.get(newer).unwrap_or_default().to_string())
            }
        }
    }

    /// Return to the sentinel without restoring anything
    pub fn reset(&mut self) {
        self.index = None;
        self.live_edit.clear();
    }
}
