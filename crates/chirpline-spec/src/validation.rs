//! Pre-generation validation.
//!
//! Degenerate inputs are rejected here, before the generator draws a single
//! random number, so a bad level never produces a partial event list.

use crate::clip::SpeciesPool;
use crate::error::ConfigError;
use crate::level::LevelConfig;
use crate::pack::{PackModifiers, MAX_MULTIPLIER, MIN_MULTIPLIER};

/// Validates a level configuration.
///
/// # Example
/// ```
/// use chirpline_spec::LevelConfig;
/// use chirpline_spec::validation::validate_level;
///
/// let level = LevelConfig::builder(1).round_duration_sec(0.0).build();
/// assert!(validate_level(&level).is_err());
/// ```
pub fn validate_level(level: &LevelConfig) -> Result<(), ConfigError> {
    if !level.round_duration_sec.is_finite() || level.round_duration_sec <= 0.0 {
        return Err(ConfigError::NonPositiveRoundDuration {
            seconds: level.round_duration_sec,
        });
    }
    if !level.has_event_room() {
        return Err(ConfigError::RoundTooShort {
            round_ms: level.round_duration_ms(),
        });
    }
    if level.scoring_window_ms < 2 {
        return Err(ConfigError::InvalidScoringWindow {
            ms: level.scoring_window_ms,
        });
    }
    validate_probability("overlap_probability", level.overlap_probability)?;
    Ok(())
}

/// Validates pack multipliers and weights.
pub fn validate_pack(pack: &PackModifiers) -> Result<(), ConfigError> {
    validate_multiplier("overlap_multiplier", pack.overlap_multiplier)?;
    validate_multiplier("tempo_multiplier", pack.tempo_multiplier)?;
    if let Some(weights) = pack.vocalization_weights {
        for (name, value) in [("song_weight", weights.song), ("call_weight", weights.call)] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::ProbabilityOutOfRange { name, value });
            }
        }
    }
    Ok(())
}

/// Validates that a pool has species and every species has a clip.
pub fn validate_pool(pool: &SpeciesPool) -> Result<(), ConfigError> {
    if pool.is_empty() {
        return Err(ConfigError::EmptySpeciesPool);
    }
    if let Some(empty) = pool.species().iter().find(|s| s.clips.is_empty()) {
        return Err(ConfigError::SpeciesWithoutClips {
            species: empty.code.clone(),
        });
    }
    Ok(())
}

/// Validates a probability value.
pub fn validate_probability(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if !value.is_finite() || !(0.0..=1.0).contains(&value) {
        return Err(ConfigError::ProbabilityOutOfRange { name, value });
    }
    Ok(())
}

fn validate_multiplier(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if !value.is_finite() || !(MIN_MULTIPLIER..=MAX_MULTIPLIER).contains(&value) {
        return Err(ConfigError::MultiplierOutOfRange { name, value });
    }
    Ok(())
}
