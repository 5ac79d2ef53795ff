//! Concrete generation parameters.

use serde::{Deserialize, Serialize};

/// Relative weights of song and call clips.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VocalizationWeights {
    /// Weight of song clips.
    pub song: f64,
    /// Weight of call clips.
    pub call: f64,
}

impl VocalizationWeights {
    /// Creates a weight pair.
    pub fn new(song: f64, call: f64) -> Self {
        Self { song, call }
    }

    /// Returns true when neither type is preferred (both weights zero).
    pub fn is_unweighted(&self) -> bool {
        self.song <= 0.0 && self.call <= 0.0
    }

    /// Fraction of draws that should pick song, in `[0, 1]`.
    ///
    /// Returns `None` when both weights are zero.
    pub fn song_fraction(&self) -> Option<f64> {
        let song = self.song.max(0.0);
        let call = self.call.max(0.0);
        let total = song + call;
        if total <= 0.0 {
            None
        } else {
            Some(song / total)
        }
    }
}

impl Default for VocalizationWeights {
    fn default() -> Self {
        Self {
            song: 1.0,
            call: 1.0,
        }
    }
}

/// Timing and probability parameters for event generation.
///
/// Output of the difficulty calculator; immutable once computed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DifficultyParams {
    /// Full width of each event's scoring window.
    pub scoring_window_ms: u32,
    /// Smallest gap between consecutive primary events.
    pub min_gap_ms: i64,
    /// Largest gap between consecutive primary events.
    pub max_gap_ms: i64,
    /// Chance of a secondary event on the opposite channel.
    pub overlap_probability: f64,
    /// Song/call mix.
    pub vocalization_weights: VocalizationWeights,
}

impl DifficultyParams {
    /// Half the scoring window, the distance from scheduled time to either edge.
    pub fn half_window_ms(&self) -> i64 {
        i64::from(self.scoring_window_ms / 2)
    }
}
