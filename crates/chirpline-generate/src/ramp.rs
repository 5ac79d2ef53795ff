//! Elapsed-time difficulty ramp for endless play.
//!
//! A ramp is a list of density tiers pinned to session times. Parameters
//! between two tiers are interpolated with a smoothstep curve, so gap bounds,
//! overlap probability and window width change continuously rather than in
//! jumps at tier boundaries. Before the first tier the first tier applies;
//! after the last tier the last tier holds.

use chirpline_spec::{ConfigError, DifficultyParams, PackModifiers, TimeMs, VocalizationWeights};
use serde::{Deserialize, Serialize};

use crate::difficulty::apply_pack;

/// One density tier of a ramp.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RampTier {
    /// Session time at which this tier is fully in effect.
    pub at_ms: TimeMs,
    /// Smallest primary gap.
    pub min_gap_ms: i64,
    /// Largest primary gap.
    pub max_gap_ms: i64,
    /// Overlap probability.
    pub overlap_probability: f64,
    /// Scoring window width.
    pub scoring_window_ms: u32,
}

/// Continuous difficulty curve over session time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RampDef")]
pub struct DifficultyRamp {
    tiers: Vec<RampTier>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RampDef {
    tiers: Vec<RampTier>,
}

impl TryFrom<RampDef> for DifficultyRamp {
    type Error = ConfigError;

    fn try_from(def: RampDef) -> Result<Self, Self::Error> {
        DifficultyRamp::new(def.tiers)
    }
}

impl DifficultyRamp {
    /// Creates a ramp, validating the tiers.
    pub fn new(tiers: Vec<RampTier>) -> Result<Self, ConfigError> {
        validate_ramp(&tiers)?;
        Ok(Self { tiers })
    }

    /// The built-in ramp used by endless mode.
    pub fn endless() -> Self {
        Self {
            tiers: vec![
                RampTier {
                    at_ms: 0,
                    min_gap_ms: 2500,
                    max_gap_ms: 4000,
                    overlap_probability: 0.0,
                    scoring_window_ms: 2400,
                },
                RampTier {
                    at_ms: 60_000,
                    min_gap_ms: 1600,
                    max_gap_ms: 3000,
                    overlap_probability: 0.15,
                    scoring_window_ms: 2000,
                },
                RampTier {
                    at_ms: 180_000,
                    min_gap_ms: 1000,
                    max_gap_ms: 2200,
                    overlap_probability: 0.3,
                    scoring_window_ms: 1700,
                },
                RampTier {
                    at_ms: 360_000,
                    min_gap_ms: 700,
                    max_gap_ms: 1500,
                    overlap_probability: 0.45,
                    scoring_window_ms: 1400,
                },
            ],
        }
    }

    /// Returns the tiers.
    pub fn tiers(&self) -> &[RampTier] {
        &self.tiers
    }

    /// Parameters at a session time, before pack modifiers.
    pub fn base_params_at(&self, elapsed_ms: TimeMs) -> DifficultyParams {
        let tier = self.tier_at(elapsed_ms);
        DifficultyParams {
            scoring_window_ms: tier.scoring_window_ms,
            min_gap_ms: tier.min_gap_ms,
            max_gap_ms: tier.max_gap_ms.max(tier.min_gap_ms),
            overlap_probability: tier.overlap_probability.clamp(0.0, 1.0),
            vocalization_weights: VocalizationWeights::default(),
        }
    }

    /// Parameters at a session time with pack modifiers applied.
    pub fn params_at(&self, elapsed_ms: TimeMs, pack: Option<&PackModifiers>) -> DifficultyParams {
        apply_pack(self.base_params_at(elapsed_ms), pack)
    }

    fn tier_at(&self, elapsed_ms: TimeMs) -> RampTier {
        // Construction guarantees at least one tier.
        let first = self.tiers[0];
        if elapsed_ms <= first.at_ms {
            return first;
        }
        for pair in self.tiers.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            if elapsed_ms < b.at_ms {
                let t = (elapsed_ms - a.at_ms) as f64 / (b.at_ms - a.at_ms) as f64;
                return interpolate(&a, &b, smoothstep(t), elapsed_ms);
            }
        }
        self.tiers[self.tiers.len() - 1]
    }
}

impl Default for DifficultyRamp {
    fn default() -> Self {
        Self::endless()
    }
}

/// Validates ramp tiers: non-empty, strictly increasing times, sane values.
pub fn validate_ramp(tiers: &[RampTier]) -> Result<(), ConfigError> {
    if tiers.is_empty() {
        return Err(ConfigError::invalid_ramp("ramp has no tiers"));
    }
    for pair in tiers.windows(2) {
        if pair[1].at_ms <= pair[0].at_ms {
            return Err(ConfigError::invalid_ramp(format!(
                "tier times must strictly increase ({} then {})",
                pair[0].at_ms, pair[1].at_ms
            )));
        }
    }
    for tier in tiers {
        if tier.min_gap_ms <= 0 || tier.max_gap_ms < tier.min_gap_ms {
            return Err(ConfigError::InvalidGapRange {
                min: tier.min_gap_ms,
                max: tier.max_gap_ms,
            });
        }
        if tier.scoring_window_ms < 2 {
            return Err(ConfigError::InvalidScoringWindow {
                ms: tier.scoring_window_ms,
            });
        }
        chirpline_spec::validation::validate_probability(
            "overlap_probability",
            tier.overlap_probability,
        )?;
    }
    Ok(())
}

fn smoothstep(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

fn interpolate(a: &RampTier, b: &RampTier, t: f64, at_ms: TimeMs) -> RampTier {
    RampTier {
        at_ms,
        min_gap_ms: lerp(a.min_gap_ms as f64, b.min_gap_ms as f64, t).round() as i64,
        max_gap_ms: lerp(a.max_gap_ms as f64, b.max_gap_ms as f64, t).round() as i64,
        overlap_probability: lerp(a.overlap_probability, b.overlap_probability, t),
        scoring_window_ms: lerp(a.scoring_window_ms as f64, b.scoring_window_ms as f64, t).round()
            as u32,
    }
}
