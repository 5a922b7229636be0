//! Registry configuration.

use derive_getters::Getters;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use std::path::Path;
use strictly_ntoe::{MIN_SIZE, Player};
use tracing::{debug, info, instrument};

/// Limits and defaults applied when games are created and listed.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// Largest board side a new game may request.
    #[serde(default = "default_max_size")]
    max_size: usize,

    /// Board side used when a request names none.
    #[serde(default = "default_size")]
    default_size: usize,

    /// First player used when a request names none.
    #[serde(default = "default_first_player")]
    default_first_player: Player,

    /// Maximum number of games returned by recent-game listings.
    #[serde(default = "default_recent_limit")]
    recent_limit: usize,
}

#[instrument]
fn default_max_size() -> usize {
    50
}

#[instrument]
fn default_size() -> usize {
    MIN_SIZE
}

#[instrument]
fn default_first_player() -> Player {
    Player::X
}

#[instrument]
fn default_recent_limit() -> usize {
    50
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            max_size: default_max_size(),
            default_size: default_size(),
            default_first_player: default_first_player(),
            recent_limit: default_recent_limit(),
        }
    }
}

impl RegistryConfig {
    /// Parses and validates configuration from TOML text.
    ///
    /// Missing keys take their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryConfigError`] on malformed TOML or inconsistent limits.
    #[instrument(skip(content))]
    pub fn from_toml_str(content: &str) -> Result<Self, RegistryConfigError> {
        let config: Self = toml::from_str(content)
            .map_err(|e| RegistryConfigError::new(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        debug!(?config, "Registry config parsed");
        Ok(config)
    }

    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryConfigError`] if the file cannot be read or parsed.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, RegistryConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            RegistryConfigError::new(format!("Failed to read config file: {}", e))
        })?;
        let config = Self::from_toml_str(&content)?;
        info!(max_size = config.max_size, "Config loaded successfully");
        Ok(config)
    }

    /// Checks that the limits are consistent.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryConfigError`] if `max_size` is below the rules'
    /// minimum or `default_size` falls outside `[MIN_SIZE, max_size]`.
    #[instrument(skip(self))]
    pub fn validate(&self) -> Result<(), RegistryConfigError> {
        if self.max_size < MIN_SIZE {
            return Err(RegistryConfigError::new(format!(
                "max_size {} is below the minimum board size {}",
                self.max_size, MIN_SIZE
            )));
        }
        if !(MIN_SIZE..=self.max_size).contains(&self.default_size) {
            return Err(RegistryConfigError::new(format!(
                "default_size {} must lie in [{}, {}]",
                self.default_size, MIN_SIZE, self.max_size
            )));
        }
        Ok(())
    }

    /// Clamps a requested board side into `[MIN_SIZE, max_size]`.
    pub fn clamp_size(&self, requested: Option<usize>) -> usize {
        requested
            .unwrap_or(self.default_size)
            .clamp(MIN_SIZE, self.max_size)
    }
}

/// Registry configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct RegistryConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl RegistryConfigError {
    /// Creates a new configuration error with caller location tracking.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}
