//! Scoring configuration.

use serde::{Deserialize, Serialize};

/// How input timing inside the window turns into timing points.
///
/// A game mode uses exactly one law; the two are never mixed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimingLaw {
    /// Full points within tolerance of the scheduled time, partial points
    /// elsewhere in the window.
    #[default]
    ClosestToPerfect,
    /// Full points within tolerance of the window opening; points then fall
    /// linearly to the partial value at the window's close.
    EarlierIsBetter,
}

impl std::fmt::Display for TimingLaw {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TimingLaw::ClosestToPerfect => f.write_str("closest_to_perfect"),
            TimingLaw::EarlierIsBetter => f.write_str("earlier_is_better"),
        }
    }
}

/// Point values and timing tolerance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScoringConfig {
    /// Timing law for this mode.
    pub timing_law: TimingLaw,
    /// Distance from the reference time that still counts as perfect.
    pub perfect_tolerance_ms: u32,
    /// Points for the right species.
    pub species_points: u32,
    /// Points for the right channel.
    pub channel_points: u32,
    /// Timing points for a perfect hit.
    pub timing_perfect_points: u32,
    /// Timing points for an in-window, non-perfect hit.
    pub timing_partial_points: u32,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            timing_law: TimingLaw::ClosestToPerfect,
            perfect_tolerance_ms: 150,
            species_points: 50,
            channel_points: 25,
            timing_perfect_points: 25,
            timing_partial_points: 10,
        }
    }
}

impl ScoringConfig {
    /// Uses a different timing law.
    pub fn with_timing_law(mut self, law: TimingLaw) -> Self {
        self.timing_law = law;
        self
    }

    /// Most points one event can earn.
    pub fn max_points(&self) -> u32 {
        self.species_points
            .saturating_add(self.channel_points)
            .saturating_add(self.timing_perfect_points)
    }
}
