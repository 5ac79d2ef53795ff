//! Error types for clip loading and engine scheduling.

use chirpline_spec::GameError;
use thiserror::Error;

/// A clip could not be fetched or decoded.
///
/// Scoped to a single clip: the scheduler reports it for the affected event
/// and keeps going with the rest of the round.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The fetch capability could not produce the clip.
    #[error("failed to fetch clip '{path}': {message}")]
    Fetch {
        /// Clip path.
        path: String,
        /// Error message.
        message: String,
    },

    /// The clip was fetched but is not decodable audio.
    #[error("failed to decode clip '{path}': {message}")]
    Decode {
        /// Clip path.
        path: String,
        /// Error message.
        message: String,
    },

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl LoadError {
    /// Creates a fetch error.
    pub fn fetch(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Fetch {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Creates a decode error.
    pub fn decode(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Decode {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl GameError for LoadError {
    fn code(&self) -> &'static str {
        match self {
            LoadError::Fetch { .. } => "LOAD_001",
            LoadError::Decode { .. } => "LOAD_002",
            LoadError::Io(_) => "LOAD_003",
        }
    }

    fn category(&self) -> &'static str {
        "load"
    }
}

/// Engine lifecycle errors.
///
/// Apart from [`ScheduleError::Load`], these indicate a broken orchestration
/// sequence and are meant to be propagated, not swallowed.
#[derive(Debug, Error)]
pub enum ScheduleError {
    /// `initialize()` has not completed.
    #[error("playback engine is not initialized")]
    NotInitialized,

    /// The engine is initialized but not running.
    #[error("playback engine is not running")]
    NotRunning,

    /// The engine has been disposed.
    #[error("playback engine has been disposed")]
    Disposed,

    /// The event's clip failed to load.
    #[error(transparent)]
    Load(#[from] LoadError),
}

impl ScheduleError {
    /// Returns true for per-clip failures that should not halt the round.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, ScheduleError::Load(_))
    }
}

impl GameError for ScheduleError {
    fn code(&self) -> &'static str {
        match self {
            ScheduleError::NotInitialized => "PLAYBACK_001",
            ScheduleError::NotRunning => "PLAYBACK_002",
            ScheduleError::Disposed => "PLAYBACK_003",
            ScheduleError::Load(_) => "PLAYBACK_004",
        }
    }

    fn category(&self) -> &'static str {
        match self {
            ScheduleError::Load(_) => "load",
            _ => "engine",
        }
    }
}
