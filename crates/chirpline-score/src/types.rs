//! Score inputs and results.

use chirpline_spec::{Channel, TimeMs};
use serde::{Deserialize, Serialize};

/// A player's identification attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerInput {
    /// Species the player chose.
    pub species_code: String,
    /// Channel the player chose.
    pub channel: Channel,
    /// Round time of the input.
    pub timestamp_ms: TimeMs,
}

impl PlayerInput {
    /// Creates an input.
    pub fn new(species_code: impl Into<String>, channel: Channel, timestamp_ms: TimeMs) -> Self {
        Self {
            species_code: species_code.into(),
            channel,
            timestamp_ms,
        }
    }
}

/// Timing grade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimingAccuracy {
    /// Within the perfect tolerance.
    Perfect,
    /// In the window but outside the perfect tolerance.
    Partial,
    /// No input inside the window.
    Miss,
}

/// Feedback shown to the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackType {
    /// Species and channel right, perfect timing.
    Perfect,
    /// Species and channel right, imperfect timing.
    Good,
    /// Some points, but not both answers right.
    Partial,
    /// No points.
    Miss,
}

impl std::fmt::Display for FeedbackType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            FeedbackType::Perfect => "perfect",
            FeedbackType::Good => "good",
            FeedbackType::Partial => "partial",
            FeedbackType::Miss => "miss",
        };
        f.write_str(s)
    }
}

/// Result of judging one event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    /// The judged event.
    pub event_id: String,
    /// Points for species identification.
    pub species_points: u32,
    /// Points for channel identification.
    pub channel_points: u32,
    /// Points for timing.
    pub timing_points: u32,
    /// Sum of the three categories, saturating at `u32::MAX`.
    pub total_points: u32,
    /// Whether the input named the event's species.
    pub species_correct: bool,
    /// Whether the input named the event's channel.
    pub channel_correct: bool,
    /// Timing grade.
    pub timing_accuracy: TimingAccuracy,
    /// Feedback shown to the player.
    pub feedback: FeedbackType,
    /// True when there was no input inside the window.
    pub missed: bool,
}

impl ScoreBreakdown {
    /// The all-zero result for an event with no usable input.
    pub fn miss(event_id: impl Into<String>) -> Self {
        Self {
            event_id: event_id.into(),
            species_points: 0,
            channel_points: 0,
            timing_points: 0,
            total_points: 0,
            species_correct: false,
            channel_correct: false,
            timing_accuracy: TimingAccuracy::Miss,
            feedback: FeedbackType::Miss,
            missed: true,
        }
    }
}

/// Running totals over scored events.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreAggregate {
    /// Points earned so far.
    pub total_points: u64,
    /// Events judged, misses included.
    pub events_scored: u32,
    /// Events with the right species.
    pub species_correct: u32,
    /// Events with the right channel.
    pub channel_correct: u32,
    /// Events with perfect feedback.
    pub perfect_count: u32,
    /// Events with no input inside the window.
    pub miss_count: u32,
    /// Points available over the scored events.
    pub max_possible_points: u64,
}

impl ScoreAggregate {
    /// Share of available points earned, in percent. Zero before any event.
    pub fn accuracy_percent(&self) -> f64 {
        if self.max_possible_points == 0 {
            return 0.0;
        }
        self.total_points as f64 / self.max_possible_points as f64 * 100.0
    }
}
