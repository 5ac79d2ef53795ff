//! Difficulty calculator.
//!
//! Pure functions from level configuration and optional pack modifiers to
//! concrete [`DifficultyParams`]. Same inputs always give the same outputs.

use chirpline_spec::{
    DifficultyParams, EventDensity, LevelConfig, PackModifiers, VocalizationType,
    VocalizationWeights,
};

/// Gap range for the low density tier, in milliseconds.
pub const LOW_DENSITY_GAP_MS: (i64, i64) = (2000, 4000);

/// Gap range for the medium density tier, in milliseconds.
pub const MEDIUM_DENSITY_GAP_MS: (i64, i64) = (1200, 2500);

/// Gap range for the high density tier, in milliseconds.
pub const HIGH_DENSITY_GAP_MS: (i64, i64) = (700, 1500);

/// Looks up the gap range for a density tier.
pub fn gap_range(density: EventDensity) -> (i64, i64) {
    match density {
        EventDensity::Low => LOW_DENSITY_GAP_MS,
        EventDensity::Medium => MEDIUM_DENSITY_GAP_MS,
        EventDensity::High => HIGH_DENSITY_GAP_MS,
    }
}

/// Computes difficulty parameters for a level and optional pack.
///
/// # Example
/// ```
/// use chirpline_generate::difficulty::calculate;
/// use chirpline_spec::{EventDensity, LevelConfig, PackModifiers};
///
/// let level = LevelConfig::builder(1)
///     .event_density(EventDensity::Medium)
///     .overlap_probability(0.4)
///     .build();
/// let pack = PackModifiers::new("fast").with_tempo_multiplier(2.0);
///
/// let params = calculate(&level, Some(&pack));
/// assert_eq!(params.min_gap_ms, 600);
/// assert_eq!(params.max_gap_ms, 1250);
/// ```
pub fn calculate(level: &LevelConfig, pack: Option<&PackModifiers>) -> DifficultyParams {
    let (min_gap_ms, max_gap_ms) = gap_range(level.event_density);
    let base = DifficultyParams {
        scoring_window_ms: level.scoring_window_ms,
        min_gap_ms,
        max_gap_ms,
        overlap_probability: level.overlap_probability.clamp(0.0, 1.0),
        vocalization_weights: VocalizationWeights::default(),
    };
    apply_pack(base, pack)
}

/// Applies pack modifiers on top of base parameters.
///
/// Overlap probability is scaled and clamped to `[0, 1]`; gap bounds are
/// divided by the tempo multiplier; weights default to an even mix.
pub fn apply_pack(base: DifficultyParams, pack: Option<&PackModifiers>) -> DifficultyParams {
    let Some(pack) = pack else {
        return base;
    };

    let tempo = pack.clamped_tempo();
    let min_gap_ms = ((base.min_gap_ms as f64) / tempo).round().max(1.0) as i64;
    let max_gap_ms = (((base.max_gap_ms as f64) / tempo).round() as i64).max(min_gap_ms);

    DifficultyParams {
        scoring_window_ms: base.scoring_window_ms,
        min_gap_ms,
        max_gap_ms,
        overlap_probability: (base.overlap_probability * pack.clamped_overlap()).clamp(0.0, 1.0),
        vocalization_weights: pack.weights(),
    }
}

/// Picks a vocalization type from weights and a uniform draw in `[0, 1)`.
///
/// Returns `None` when both weights are zero ("no preference"); callers then
/// fall back to the unfiltered clip pool.
pub fn select_vocalization_type(
    weights: &VocalizationWeights,
    random_draw: f64,
) -> Option<VocalizationType> {
    let song_fraction = weights.song_fraction()?;
    if random_draw < song_fraction {
        Some(VocalizationType::Song)
    } else {
        Some(VocalizationType::Call)
    }
}
