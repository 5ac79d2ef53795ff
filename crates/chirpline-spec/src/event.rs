//! Generated game events and round time bounds.

use serde::{Deserialize, Serialize};

use crate::channel::{Channel, VocalizationType};

/// Milliseconds on the round timeline.
pub type TimeMs = i64;

/// No event is scheduled before this point in a round.
pub const ROUND_LEAD_IN_MS: TimeMs = 1000;

/// No event is scheduled within this distance of the round's end.
pub const ROUND_TAIL_MS: TimeMs = 3000;

/// One scheduled identification opportunity.
///
/// Invariant: `scoring_window_start_ms <= scheduled_time_ms <= scoring_window_end_ms`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GameEvent {
    /// Unique id within the round.
    pub event_id: String,
    /// Clip to play.
    pub clip_id: String,
    /// Path of the clip's audio, as given in the catalog.
    pub file_path: String,
    /// Species the player must identify.
    pub species_code: String,
    /// Channel the clip sounds on.
    pub channel: Channel,
    /// When the event reaches the hit line; perfect timing.
    pub scheduled_time_ms: TimeMs,
    /// Inclusive start of the scoring window.
    pub scoring_window_start_ms: TimeMs,
    /// Inclusive end of the scoring window.
    pub scoring_window_end_ms: TimeMs,
    /// Clip duration.
    pub duration_ms: u32,
    /// Vocalization type of the clip, when tagged.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vocalization_type: Option<VocalizationType>,
}

impl GameEvent {
    /// Returns true if `time_ms` falls inside the inclusive scoring window.
    pub fn window_contains(&self, time_ms: TimeMs) -> bool {
        time_ms >= self.scoring_window_start_ms && time_ms <= self.scoring_window_end_ms
    }

    /// Width of the scoring window.
    pub fn window_width_ms(&self) -> TimeMs {
        self.scoring_window_end_ms - self.scoring_window_start_ms
    }

    /// Time at which the clip finishes sounding.
    pub fn end_time_ms(&self) -> TimeMs {
        self.scheduled_time_ms + TimeMs::from(self.duration_ms)
    }
}
