//! Store configuration.

use crate::fen::{decode, Position, STARTING_FEN};
use derive_getters::Getters;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info, instrument};

/// Configuration for a [`PositionStore`](crate::PositionStore).
///
/// Every field has a default, so an empty TOML document is a valid config.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Notation `reset` returns to.
    #[serde(default = "default_start_position")]
    start_position: String,

    /// Verify move postconditions after every move.
    #[serde(default = "default_check_invariants")]
    check_invariants: bool,
}

#[instrument]
fn default_start_position() -> String {
    STARTING_FEN.to_string()
}

fn default_check_invariants() -> bool {
    cfg!(debug_assertions)
}

impl StoreConfig {
    /// Creates a configuration for the standard starting position.
    #[instrument]
    pub fn new() -> Self {
        Self {
            start_position: default_start_position(),
            check_invariants: default_check_invariants(),
        }
    }

    /// Sets the start position.
    pub fn with_start_position(mut self, notation: impl Into<String>) -> Self {
        self.start_position = notation.into();
        self
    }

    /// Enables or disables postcondition checks.
    pub fn with_check_invariants(mut self, enabled: bool) -> Self {
        self.check_invariants = enabled;
        self
    }

    /// Loads configuration from TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;

        Self::from_toml_str(&content)
    }

    /// Parses configuration from TOML text.
    #[instrument(skip(content))]
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;

        info!(start_position = %config.start_position, "Config loaded successfully");
        Ok(config)
    }

    /// Decodes the configured start position.
    #[instrument(skip(self), fields(start_position = %self.start_position))]
    pub fn start(&self) -> Result<Position, ConfigError> {
        decode(&self.start_position)
            .map_err(|e| ConfigError::new(format!("Invalid start position: {}", e)))
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}
