//! Process-backed engine
//!
//! Runs the engine binary once per command in batch mode, the same way the
//! engine's own `-c` mode works: each call opens the target afresh, runs the
//! command, and exits. Settings that must survive between calls (such as
//! `io.cache`) are passed as `-e` arguments on every invocation.

use std::process::{Command, Stdio};

use once_cell::sync::Lazy;
use regex::Regex;

use super::{Engine, OpenOptions, TargetFile};
use crate::error::{Error, Result};
use crate::terminal::prompt::DEFAULT_ADDRESS;

/// Default engine program
pub const DEFAULT_PROGRAM: &str = "rizin";

/// Standard output reported for commands issued before any file is open
pub const NO_FILE_LOADED: &str = "Error: No file loaded";

/// Output settings that keep engine text free of color, prompts and UTF-8 art
const BATCH_SETTINGS: &[&str] = &[
    "scr.color=0",
    "scr.interactive=false",
    "scr.prompt=false",
    "scr.utf8=false",
    "scr.utf8.curvy=false",
];

static SEEK_OUTPUT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(0x[0-9a-fA-F]+)").expect("seek pattern is valid"));

/// Engine that shells out to the engine binary per command
#[derive(Debug)]
pub struct ProcessEngine {
    /// Engine executable
    program: String,
    /// Extra arguments placed before the command
    extra_args: Vec<String>,
    /// Settings re-applied on every call
    session_settings: Vec<String>,
    /// Currently opened file
    target: Option<TargetFile>,
    /// Error-channel text of the last call
    last_stderr: String,
}

impl Default for ProcessEngine {
    fn default() -> Self {
        Self::new(DEFAULT_PROGRAM)
    }
}

impl ProcessEngine {
    /// Create an engine running `program`
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            extra_args: Vec::new(),
            session_settings: Vec::new(),
            target: None,
            last_stderr: String::new(),
        }
    }

    /// Add arguments passed on every invocation
    pub fn with_args(mut self, args: Vec<String>) -> Self {
        self.extra_args = args;
        self
    }

    /// Program this engine runs
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Check that the engine program can be started
    pub fn check_available(&self) -> Result<String> {
        let output = Command::new(&self.program)
            .arg("-v")
            .stdin(Stdio::null())
            .output()
            .map_err(|e| Error::EngineSpawnFailed {
                program: self.program.clone(),
                reason: e.to_string(),
            })?;

        let version = String::from_utf8_lossy(&output.stdout);
        Ok(version.lines().next().unwrap_or_default().trim().to_string())
    }

    /// Full argument list for one command
    pub fn command_args(&self, command: &str) -> Vec<String> {
        let mut args = Vec::new();
        for setting in BATCH_SETTINGS
            .iter()
            .map(|s| s.to_string())
            .chain(self.session_settings.iter().cloned())
        {
            args.push("-e".to_string());
            args.push(setting);
        }
        args.extend(self.extra_args.iter().cloned());
        args.push("-q".to_string());
        args.push("-c".to_string());
        args.push(command.to_string());
        if let Some(target) = &self.target {
            args.push(target.path.display().to_string());
        }
        args
    }

    fn run(&mut self, command: &str) -> Result<String> {
        self.last_stderr.clear();

        let output = Command::new(&self.program)
            .args(self.command_args(command))
            .stdin(Stdio::null())
            .output()
            .map_err(|e| Error::EngineSpawnFailed {
                program: self.program.clone(),
                reason: e.to_string(),
            })?;

        self.last_stderr = String::from_utf8_lossy(&output.stderr).into_owned();

        // A non-zero exit is reported through stderr; only a kill is a fault.
        if output.status.code().is_none() {
            return Err(Error::EngineFault(format!(
                "engine terminated abnormally ({})",
                output.status
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl Engine for ProcessEngine {
    fn open(&mut self, file: &TargetFile, options: &OpenOptions) -> Result<()> {
        self.close();

        if let Some(cache) = options.cache_enabled {
            self.session_settings.push(format!("io.cache={}", cache));
        }
        self.target = Some(file.clone());

        info!("Opened {} ({} bytes) with {}", file.name, file.size, self.program);
        Ok(())
    }

    fn execute_command(&mut self, command: &str) -> Result<String> {
        if self.target.is_none() {
            return Ok(NO_FILE_LOADED.to_string());
        }
        self.run(command)
    }

    fn last_stderr(&self) -> String {
        self.last_stderr.clone()
    }

    fn current_address(&mut self) -> String {
        if self.target.is_none() {
            return DEFAULT_ADDRESS.to_string();
        }

        match self.run("s") {
            Ok(output) => SEEK_OUTPUT
                .captures(output.trim())
                .map(|caps| caps[1].to_string())
                .unwrap_or_else(|| DEFAULT_ADDRESS.to_string()),
            Err(e) => {
                debug!("Address query failed: {}", e);
                DEFAULT_ADDRESS.to_string()
            }
        }
    }

    fn close(&mut self) {
        if let Some(target) = self.target.take() {
            debug!("Closed {}", target.name);
        }
        self.session_settings.clear();
        self.last_stderr.clear();
    }

    fn is_open(&self) -> bool {
        self.target.is_some()
    }
}
