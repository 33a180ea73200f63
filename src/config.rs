//! Application settings.

use std::path::Path;
use std::time::Duration;

use derive_getters::Getters;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

/// Settings loaded from an optional TOML file.
///
/// Every field has a default, so an absent file or a partial file both work.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct Settings {
    /// SQLite database holding the score table.
    #[serde(default = "default_db_path")]
    db_path: String,

    /// File receiving log output while the terminal UI runs.
    #[serde(default = "default_log_file")]
    log_file: String,

    /// Rows shown on the best-scores table.
    #[serde(default = "default_top_scores_limit")]
    top_scores_limit: usize,

    /// How long the whole board is shown at session start.
    #[serde(default = "default_delay_ms")]
    preview_ms: u64,

    /// How long a mismatched pair stays face up.
    #[serde(default = "default_delay_ms")]
    mismatch_delay_ms: u64,

    /// Clock resolution; each tick adds one second to the session time.
    #[serde(default = "default_delay_ms")]
    tick_ms: u64,
}

#[instrument]
fn default_db_path() -> String {
    "memory_game.db".to_string()
}

#[instrument]
fn default_log_file() -> String {
    "memory_match.log".to_string()
}

#[instrument]
fn default_top_scores_limit() -> usize {
    crate::TOP_SCORES_LIMIT
}

#[instrument]
fn default_delay_ms() -> u64 {
    1_000
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            log_file: default_log_file(),
            top_scores_limit: default_top_scores_limit(),
            preview_ms: default_delay_ms(),
            mismatch_delay_ms: default_delay_ms(),
            tick_ms: default_delay_ms(),
        }
    }
}

impl Settings {
    /// Loads settings from a TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading settings from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read settings file: {}", e)))?;

        let settings = Self::from_toml(&content)?;
        info!(db_path = %settings.db_path, "Settings loaded successfully");
        Ok(settings)
    }

    /// Parses settings from TOML text.
    #[instrument(skip(content))]
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let settings: Self = toml::from_str(content)
            .map_err(|e| ConfigError::new(format!("Failed to parse settings: {}", e)))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Loads settings from `path` if it exists, otherwise uses defaults.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        if path.as_ref().exists() {
            Self::from_file(path)
        } else {
            info!("Settings file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Replaces the database path.
    #[instrument(skip(self))]
    pub fn with_db_path(mut self, db_path: String) -> Self {
        self.db_path = db_path;
        self
    }

    /// Timer durations for game sessions.
    #[instrument(skip(self))]
    pub fn timings(&self) -> SessionTimings {
        SessionTimings::new(
            Duration::from_millis(self.preview_ms),
            Duration::from_millis(self.mismatch_delay_ms),
            Duration::from_millis(self.tick_ms),
        )
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.db_path.trim().is_empty() {
            return Err(ConfigError::new("db_path cannot be empty".to_string()));
        }
        if self.tick_ms == 0 {
            return Err(ConfigError::new("tick_ms must be positive".to_string()));
        }
        if self.top_scores_limit == 0 {
            return Err(ConfigError::new(
                "top_scores_limit must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// Timer durations used by a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Getters)]
pub struct SessionTimings {
    preview: Duration,
    mismatch_delay: Duration,
    tick: Duration,
}

impl SessionTimings {
    /// Creates timings from explicit durations.
    #[instrument]
    pub fn new(preview: Duration, mismatch_delay: Duration, tick: Duration) -> Self {
        Self {
            preview,
            mismatch_delay,
            tick,
        }
    }
}

impl Default for SessionTimings {
    fn default() -> Self {
        let second = Duration::from_secs(1);
        Self::new(second, second, second)
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
    #[instrument(skip(message))]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}
