//! rzterm - an interactive console for the rizin binary analysis engine
//!
//! This library provides the line-oriented console that sits between a raw
//! terminal and a synchronous, stateful analysis engine.
//!
//! ## Module Organization
//!
//! ### Core Functionality
//!
//! - [`terminal`] - Key decoding, line editing, output sanitizing, prompt, console
//! - [`execution`] - Single-flight engine session, command rewriting, payload decode
//! - [`engine`] - Engine contract and the process-backed engine
//! - [`history`] - Bounded, de-duplicated command history with file persistence
//! - [`models`] - Data structures (ExecutionResult, OutputLine)
//! - [`mod@error`] - Error types and Result aliases
//!
//! ### Utilities
//!
//! - [`ansi`] - Display styles and cursor movement sequences
//! - [`config`] - TOML configuration loading and validation
//!
//! ## Quick Start
//!
//! ```no_run
//! use rzterm::{engine::ProcessEngine, execution::Session};
//!
//! # async fn run() -> rzterm::Result<()> {
//! let session = Session::new(ProcessEngine::default())?;
//! session.open("/bin/ls".as_ref(), Default::default()).await?;
//!
//! let result = session.submit("afl").await;
//! for line in result.lines() {
//!     println!("{}", line.text);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! - **Input task:** Raw terminal bytes are decoded and edited synchronously;
//!   the line editor never waits on the engine.
//! - **Engine worker thread:** Owns the engine and runs one request at a time
//!   from a FIFO channel, which makes the session single-flight.
//!
//! Results travel back over `tokio::sync::oneshot` channels, so they arrive
//! in submission order.
//!
//! ## Limitations
//!
//! - A command already handed to the engine cannot be cancelled.
//! - No timeout is enforced on an engine call.

#[macro_use]
extern crate tracing;

pub mod ansi;
pub mod config;
pub mod engine;
pub mod error;
pub mod execution;
pub mod history;
pub mod models;
pub mod terminal;

// Re-exports for core functionality
pub use config::{Config, ConfigLoader};
pub use engine::{Engine, OpenOptions, ProcessEngine, TargetFile};
pub use error::{Error, Result};
pub use execution::{AnalysisSummary, Session};
pub use history::{HistoryLog, HistoryNavigator};
pub use models::{ExecutionResult, LineClass, OutputLine};
pub use terminal::Console;

// Version information
/// The current version of rzterm from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// The application name from Cargo.toml
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// The application description from Cargo.toml
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");
