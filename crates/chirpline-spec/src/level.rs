//! Level configuration.

use serde::{Deserialize, Serialize};

use crate::event::{TimeMs, ROUND_LEAD_IN_MS, ROUND_TAIL_MS};

/// Event density tier; selects the gap range between primary events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum EventDensity {
    /// Sparse events, long gaps.
    Low,
    /// Default pacing.
    #[default]
    Medium,
    /// Dense events, short gaps.
    High,
}

/// Configuration for one level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LevelConfig {
    /// Level number.
    pub level_id: u32,
    /// Round duration in seconds.
    pub round_duration_sec: f64,
    /// Density tier.
    #[serde(default)]
    pub event_density: EventDensity,
    /// Base chance of a secondary overlapping event.
    #[serde(default)]
    pub overlap_probability: f64,
    /// Full width of each scoring window.
    pub scoring_window_ms: u32,
    /// Number of species drawn into the round.
    #[serde(default = "default_species_count")]
    pub species_count: u32,
    /// When set, gaps are widened so that no two scoring windows intersect.
    #[serde(default)]
    pub no_overlap: bool,
}

fn default_species_count() -> u32 {
    4
}

impl LevelConfig {
    /// Starts building a level with defaults.
    pub fn builder(level_id: u32) -> LevelConfigBuilder {
        LevelConfigBuilder::new(level_id)
    }

    /// Parses a level from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Round duration in milliseconds.
    pub fn round_duration_ms(&self) -> TimeMs {
        (self.round_duration_sec * 1000.0).round() as TimeMs
    }

    /// Last instant at which an event may be scheduled.
    pub fn last_event_ms(&self) -> TimeMs {
        self.round_duration_ms() - ROUND_TAIL_MS
    }

    /// Returns true if the round has room for at least one event.
    pub fn has_event_room(&self) -> bool {
        self.last_event_ms() > ROUND_LEAD_IN_MS
    }
}

/// Builder for [`LevelConfig`].
#[derive(Debug, Clone)]
pub struct LevelConfigBuilder {
    level: LevelConfig,
}

impl LevelConfigBuilder {
    /// Creates a builder with a 60 second medium-density round.
    pub fn new(level_id: u32) -> Self {
        Self {
            level: LevelConfig {
                level_id,
                round_duration_sec: 60.0,
                event_density: EventDensity::Medium,
                overlap_probability: 0.0,
                scoring_window_ms: 2000,
                species_count: default_species_count(),
                no_overlap: false,
            },
        }
    }

    /// Sets the round duration.
    pub fn round_duration_sec(mut self, seconds: f64) -> Self {
        self.level.round_duration_sec = seconds;
        self
    }

    /// Sets the density tier.
    pub fn event_density(mut self, density: EventDensity) -> Self {
        self.level.event_density = density;
        self
    }

    /// Sets the base overlap probability.
    pub fn overlap_probability(mut self, p: f64) -> Self {
        self.level.overlap_probability = p;
        self
    }

    /// Sets the scoring window width.
    pub fn scoring_window_ms(mut self, ms: u32) -> Self {
        self.level.scoring_window_ms = ms;
        self
    }

    /// Sets the species count.
    pub fn species_count(mut self, count: u32) -> Self {
        self.level.species_count = count;
        self
    }

    /// Enables no-overlap mode.
    pub fn no_overlap(mut self, enabled: bool) -> Self {
        self.level.no_overlap = enabled;
        self
    }

    /// Finishes the level.
    pub fn build(self) -> LevelConfig {
        self.level
    }
}
