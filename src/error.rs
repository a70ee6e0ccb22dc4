//! Error types and Result aliases for rzterm

use std::path::PathBuf;

/// Result type alias for rzterm operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for rzterm
#[derive(Debug, thiserror::Error)]
pub enum Error {
    // === Engine errors ===
    /// The engine program could not be started
    #[error("Failed to start engine '{program}': {reason}")]
    EngineSpawnFailed { program: String, reason: String },

    /// The engine call itself raised a fault
    #[error("{0}")]
    EngineFault(String),

    /// The target file does not exist or cannot be read
    #[error("Cannot open '{}': {reason}", path.display())]
    TargetUnreadable { path: PathBuf, reason: String },

    // === Session errors ===
    /// The session worker has shut down
    #[error("Session is closed")]
    SessionClosed,

    /// The worker dropped a reply without answering
    #[error("Session worker stopped before replying")]
    WorkerGone,

    // === History errors ===
    /// Failed to load history file
    #[error("Failed to load history from '{}': {reason}", path.display())]
    HistoryLoadFailed { path: PathBuf, reason: String },

    /// Failed to write history file
    #[error("Failed to save history to '{}': {reason}", path.display())]
    HistorySaveFailed { path: PathBuf, reason: String },

    // === Configuration errors ===
    /// Failed to load configuration file
    #[error("Failed to load config from '{}': {reason}", path.display())]
    ConfigLoadFailed { path: PathBuf, reason: String },

    /// Failed to parse configuration
    #[error("Failed to parse {format} config: {reason}")]
    ConfigParseFailed { format: String, reason: String },

    /// Failed to serialize configuration
    #[error("Failed to serialize {format} config: {reason}")]
    ConfigSerializationFailed { format: String, reason: String },

    /// Configuration validation failed
    #[error("Configuration validation failed for '{field}': {reason}")]
    ConfigValidationFailed { field: String, reason: String },

    // === I/O and serialization errors ===
    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// TOML parsing errors
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Regex compilation errors
    #[error("Regex compilation error: {0}")]
    Regex(#[from] regex::Error),

    // === Generic fallback (use sparingly) ===
    /// Generic errors
    #[error("Error: {0}")]
    Other(String),
}

impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Error::Other(err.to_string())
    }
}

impl From<String> for Error {
    fn from(err: String) -> Self {
        Error::Other(err)
    }
}

impl From<&str> for Error {
    fn from(err: &str) -> Self {
        Error::Other(err.to_string())
    }
}
