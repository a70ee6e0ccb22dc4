//! Configuration File Loading
//!
//! Finds the configuration file, parses it over the defaults and validates
//! the result. A missing file is not an error; a broken one is.

use super::{Config, APP_DIR};
use crate::error::{Error, Result};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable naming an explicit config file
pub const CONFIG_ENV: &str = "RZTERM_CONFIG";

/// Configuration file loader
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    /// Candidate files, highest priority first
    search_paths: Vec<PathBuf>,
    /// File the configuration was loaded from, if any
    current_path: Option<PathBuf>,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader {
    /// Create a loader using the standard search order
    pub fn new() -> Self {
        Self {
            search_paths: Self::get_search_paths(),
            current_path: None,
        }
    }

    /// Create a loader that only looks at `path`
    pub fn with_path(path: PathBuf) -> Self {
        Self {
            search_paths: vec![path],
            current_path: None,
        }
    }

    /// Load from `explicit` if given, otherwise from the standard locations
    pub fn load(explicit: Option<&Path>) -> Result<Config> {
        let mut loader = match explicit {
            Some(path) => {
                if !path.exists() {
                    return Err(Error::ConfigLoadFailed {
                        path: path.to_path_buf(),
                        reason: "file does not exist".to_string(),
                    });
                }
                Self::with_path(path.to_path_buf())
            }
            None => Self::new(),
        };
        loader.load_config()
    }

    /// Load the first existing file on the search path, or the defaults
    pub fn load_config(&mut self) -> Result<Config> {
        let Some(path) = self.search_paths.iter().find(|p| p.is_file()).cloned() else {
            debug!("No configuration file found, using defaults");
            return Ok(Config::default());
        };

        let config = Self::load_config_file(&path)?;
        Self::validate_config(&config)?;

        info!("Loaded configuration from {}", path.display());
        self.current_path = Some(path);
        Ok(config)
    }

    /// Parse one TOML file; absent fields take their defaults
    pub fn load_config_file(path: &Path) -> Result<Config> {
        let content = fs::read_to_string(path).map_err(|e| Error::ConfigLoadFailed {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        toml::from_str(&content).map_err(|e| Error::ConfigParseFailed {
            format: "TOML".to_string(),
            reason: e.to_string(),
        })
    }

    /// Write `config` as TOML to `path`
    pub fn save_to_path(config: &Config, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content =
            toml::to_string_pretty(config).map_err(|e| Error::ConfigSerializationFailed {
                format: "TOML".to_string(),
                reason: e.to_string(),
            })?;

        fs::write(path, content)?;
        Ok(())
    }

    /// Get default search paths for configuration files
    fn get_search_paths() -> Vec<PathBuf> {
        let mut paths = Vec::new();

        if let Ok(explicit) = env::var(CONFIG_ENV) {
            if !explicit.trim().is_empty() {
                paths.push(PathBuf::from(explicit));
            }
        }

        paths.push(Self::get_default_config_path());
        paths
    }

    /// Get the default configuration path
    pub fn get_default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_DIR)
            .join("config.toml")
    }

    /// Validate configuration
    pub fn validate_config(config: &Config) -> Result<()> {
        if config.engine.program.trim().is_empty() {
            return Err(Error::ConfigValidationFailed {
                field: "engine.program".to_string(),
                reason: "Engine program cannot be empty".to_string(),
            });
        }

        if !(1..=3).contains(&config.engine.analysis_depth) {
            return Err(Error::ConfigValidationFailed {
                field: "engine.analysis_depth".to_string(),
                reason: "Analysis depth must be between 1 and 3".to_string(),
            });
        }

        if config.history.max_entries == 0 {
            return Err(Error::ConfigValidationFailed {
                field: "history.max_entries".to_string(),
                reason: "History size must be greater than 0".to_string(),
            });
        }

        if config.history.persisted_entries > config.history.max_entries {
            return Err(Error::ConfigValidationFailed {
                field: "history.persisted_entries".to_string(),
                reason: "Cannot persist more entries than are kept".to_string(),
            });
        }

        Ok(())
    }

    /// Get the current configuration file path
    pub fn current_path(&self) -> Option<&Path> {
        self.current_path.as_deref()
    }

    /// List all search paths
    pub fn search_paths(&self) -> &[PathBuf] {
        &self.search_paths
    }
}
