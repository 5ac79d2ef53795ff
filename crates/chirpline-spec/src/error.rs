//! Error types for configuration validation.

use thiserror::Error;

/// Common trait for Chirpline errors.
///
/// Every error enum in the workspace implements this trait so the CLI and any
/// embedding orchestrator can report failures uniformly:
/// - a stable code such as `CONFIG_001` or `PLAYBACK_003`
/// - a category such as `config`, `load`, `engine`
///
/// # Example
///
/// ```ignore
/// use chirpline_spec::GameError;
///
/// fn report<E: GameError>(err: &E) {
///     eprintln!("[{}] {}", err.code(), err.message());
/// }
/// ```
pub trait GameError: std::error::Error {
    /// Get the stable error code for reporting.
    fn code(&self) -> &'static str;

    /// Get a human-readable message describing the error.
    fn message(&self) -> String {
        self.to_string()
    }

    /// Get the error category for grouping related errors.
    fn category(&self) -> &'static str;
}

/// Degenerate level, pack, or pool inputs detected before generation begins.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// The species pool has no species at all.
    #[error("species pool is empty")]
    EmptySpeciesPool,

    /// A species in the pool has no playable clips.
    #[error("species '{species}' has no playable clips")]
    SpeciesWithoutClips {
        /// Species code.
        species: String,
    },

    /// The round duration is zero, negative, or not finite.
    #[error("round duration must be positive, got {seconds} seconds")]
    NonPositiveRoundDuration {
        /// Configured duration.
        seconds: f64,
    },

    /// The round is too short to hold a single event between lead-in and tail.
    #[error("round of {round_ms} ms leaves no room for events")]
    RoundTooShort {
        /// Round duration in milliseconds.
        round_ms: i64,
    },

    /// The scoring window cannot contain its scheduled time strictly.
    #[error("invalid scoring window: {ms} ms (must be at least 2 ms)")]
    InvalidScoringWindow {
        /// Configured width.
        ms: u32,
    },

    /// A probability is outside `[0, 1]`.
    #[error("probability '{name}' out of range [0, 1]: {value}")]
    ProbabilityOutOfRange {
        /// Field name.
        name: &'static str,
        /// Offending value.
        value: f64,
    },

    /// A pack multiplier is outside `[0.5, 2.0]`.
    #[error("multiplier '{name}' out of range [0.5, 2.0]: {value}")]
    MultiplierOutOfRange {
        /// Field name.
        name: &'static str,
        /// Offending value.
        value: f64,
    },

    /// A gap range is empty or non-positive.
    #[error("invalid gap range: min {min} ms, max {max} ms")]
    InvalidGapRange {
        /// Lower bound.
        min: i64,
        /// Upper bound.
        max: i64,
    },

    /// A difficulty ramp is malformed.
    #[error("invalid difficulty ramp: {message}")]
    InvalidRamp {
        /// Description of the problem.
        message: String,
    },
}

impl ConfigError {
    /// Creates an invalid ramp error.
    pub fn invalid_ramp(message: impl Into<String>) -> Self {
        Self::InvalidRamp {
            message: message.into(),
        }
    }
}

impl GameError for ConfigError {
    fn code(&self) -> &'static str {
        match self {
            ConfigError::EmptySpeciesPool => "CONFIG_001",
            ConfigError::SpeciesWithoutClips { .. } => "CONFIG_002",
            ConfigError::NonPositiveRoundDuration { .. } => "CONFIG_003",
            ConfigError::RoundTooShort { .. } => "CONFIG_004",
            ConfigError::InvalidScoringWindow { .. } => "CONFIG_005",
            ConfigError::ProbabilityOutOfRange { .. } => "CONFIG_006",
            ConfigError::MultiplierOutOfRange { .. } => "CONFIG_007",
            ConfigError::InvalidGapRange { .. } => "CONFIG_008",
            ConfigError::InvalidRamp { .. } => "CONFIG_009",
        }
    }

    fn category(&self) -> &'static str {
        "config"
    }
}
