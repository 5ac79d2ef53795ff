//! Pack modifiers applied on top of level defaults.

use serde::{Deserialize, Serialize};

use crate::difficulty::VocalizationWeights;

/// Smallest allowed pack multiplier.
pub const MIN_MULTIPLIER: f64 = 0.5;

/// Largest allowed pack multiplier.
pub const MAX_MULTIPLIER: f64 = 2.0;

/// Modifier set contributed by a species pack.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PackModifiers {
    /// Pack identifier.
    pub pack_id: String,
    /// Scales the level's overlap probability.
    #[serde(default = "unit_multiplier")]
    pub overlap_multiplier: f64,
    /// Speeds up (>1) or slows down (<1) event pacing.
    #[serde(default = "unit_multiplier")]
    pub tempo_multiplier: f64,
    /// Song/call mix; even when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vocalization_weights: Option<VocalizationWeights>,
}

fn unit_multiplier() -> f64 {
    1.0
}

impl PackModifiers {
    /// Creates a neutral pack.
    pub fn new(pack_id: impl Into<String>) -> Self {
        Self {
            pack_id: pack_id.into(),
            overlap_multiplier: 1.0,
            tempo_multiplier: 1.0,
            vocalization_weights: None,
        }
    }

    /// Parses a pack from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Sets the overlap multiplier.
    pub fn with_overlap_multiplier(mut self, m: f64) -> Self {
        self.overlap_multiplier = m;
        self
    }

    /// Sets the tempo multiplier.
    pub fn with_tempo_multiplier(mut self, m: f64) -> Self {
        self.tempo_multiplier = m;
        self
    }

    /// Sets the vocalization weights.
    pub fn with_vocalization_weights(mut self, weights: VocalizationWeights) -> Self {
        self.vocalization_weights = Some(weights);
        self
    }

    /// Tempo multiplier clamped to the supported range.
    pub fn clamped_tempo(&self) -> f64 {
        clamp_multiplier(self.tempo_multiplier)
    }

    /// Overlap multiplier clamped to the supported range.
    pub fn clamped_overlap(&self) -> f64 {
        clamp_multiplier(self.overlap_multiplier)
    }

    /// Vocalization weights, defaulting to an even mix.
    pub fn weights(&self) -> VocalizationWeights {
        self.vocalization_weights.unwrap_or_default()
    }
}

fn clamp_multiplier(m: f64) -> f64 {
    if m.is_finite() {
        m.clamp(MIN_MULTIPLIER, MAX_MULTIPLIER)
    } else {
        1.0
    }
}
