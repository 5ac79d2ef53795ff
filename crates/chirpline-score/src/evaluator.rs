//! Score evaluator.
//!
//! Judging is a pure function of the event, the input and the
//! [`ScoringConfig`]. [`ScoreEvaluator`] wraps it and, as a side effect of
//! every call to [`score_event`](ScoreEvaluator::score_event) or
//! [`score_miss`](ScoreEvaluator::score_miss), folds the result into its
//! running [`ScoreAggregate`]. Scoring has no error channel: every pair
//! produces a well-formed breakdown.

use chirpline_spec::{GameEvent, TimeMs};
use tracing::debug;

use crate::config::{ScoringConfig, TimingLaw};
use crate::types::{FeedbackType, PlayerInput, ScoreAggregate, ScoreBreakdown, TimingAccuracy};

/// Judges one input against one event without touching any aggregate.
pub fn evaluate(config: &ScoringConfig, event: &GameEvent, input: &PlayerInput) -> ScoreBreakdown {
    if !event.window_contains(input.timestamp_ms) {
        return ScoreBreakdown::miss(&event.event_id);
    }

    let species_correct = input.species_code == event.species_code;
    let channel_correct = input.channel == event.channel;
    let species_points = if species_correct {
        config.species_points
    } else {
        0
    };
    let channel_points = if channel_correct {
        config.channel_points
    } else {
        0
    };
    let (timing_accuracy, timing_points) = judge_timing(config, event, input.timestamp_ms);
    let total_points = species_points
        .saturating_add(channel_points)
        .saturating_add(timing_points);

    ScoreBreakdown {
        event_id: event.event_id.clone(),
        species_points,
        channel_points,
        timing_points,
        total_points,
        species_correct,
        channel_correct,
        timing_accuracy,
        feedback: classify(species_correct, channel_correct, timing_accuracy, total_points),
        missed: false,
    }
}

/// Timing grade and points for an in-window input.
fn judge_timing(config: &ScoringConfig, event: &GameEvent, t: TimeMs) -> (TimingAccuracy, u32) {
    let tolerance = TimeMs::from(config.perfect_tolerance_ms);
    match config.timing_law {
        TimingLaw::ClosestToPerfect => {
            if (t - event.scheduled_time_ms).abs() <= tolerance {
                (TimingAccuracy::Perfect, config.timing_perfect_points)
            } else {
                (TimingAccuracy::Partial, config.timing_partial_points)
            }
        }
        TimingLaw::EarlierIsBetter => {
            let since_open = t - event.scoring_window_start_ms;
            if since_open <= tolerance {
                return (TimingAccuracy::Perfect, config.timing_perfect_points);
            }
            let span = (event.scoring_window_end_ms - event.scoring_window_start_ms - tolerance).max(1);
            let remaining = (span - (since_open - tolerance)).clamp(0, span) as f64 / span as f64;
            let full = f64::from(config.timing_perfect_points);
            let floor = f64::from(config.timing_partial_points.min(config.timing_perfect_points));
            let points = (floor + (full - floor) * remaining).round() as u32;
            (TimingAccuracy::Partial, points.min(config.timing_perfect_points))
        }
    }
}

/// Fixed feedback decision table.
fn classify(
    species_correct: bool,
    channel_correct: bool,
    timing: TimingAccuracy,
    total_points: u32,
) -> FeedbackType {
    match (species_correct && channel_correct, timing, total_points) {
        (true, TimingAccuracy::Perfect, _) => FeedbackType::Perfect,
        (true, _, _) => FeedbackType::Good,
        (false, _, 0) => FeedbackType::Miss,
        (false, _, _) => FeedbackType::Partial,
    }
}

/// Judges inputs and keeps running totals.
#[derive(Debug, Clone, Default)]
pub struct ScoreEvaluator {
    config: ScoringConfig,
    aggregate: ScoreAggregate,
}

impl ScoreEvaluator {
    /// Creates an evaluator with zeroed aggregates.
    pub fn new(config: ScoringConfig) -> Self {
        Self {
            config,
            aggregate: ScoreAggregate::default(),
        }
    }

    /// The configuration.
    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    /// Scores an input against an event and records the result.
    pub fn score_event(&mut self, event: &GameEvent, input: &PlayerInput) -> ScoreBreakdown {
        let breakdown = evaluate(&self.config, event, input);
        self.record(&breakdown);
        breakdown
    }

    /// Records an event that closed without input.
    pub fn score_miss(&mut self, event: &GameEvent) -> ScoreBreakdown {
        let breakdown = ScoreBreakdown::miss(&event.event_id);
        self.record(&breakdown);
        breakdown
    }

    fn record(&mut self, breakdown: &ScoreBreakdown) {
        let agg = &mut self.aggregate;
        agg.total_points += u64::from(breakdown.total_points);
        agg.events_scored += 1;
        agg.max_possible_points += u64::from(self.config.max_points());
        agg.species_correct += u32::from(breakdown.species_correct);
        agg.channel_correct += u32::from(breakdown.channel_correct);
        agg.perfect_count += u32::from(breakdown.feedback == FeedbackType::Perfect);
        agg.miss_count += u32::from(breakdown.missed);
        debug!(
            event_id = %breakdown.event_id,
            points = breakdown.total_points,
            feedback = %breakdown.feedback,
            "event scored"
        );
    }

    /// Running totals.
    pub fn aggregate(&self) -> &ScoreAggregate {
        &self.aggregate
    }

    /// Total points earned so far.
    pub fn total_points(&self) -> u64 {
        self.aggregate.total_points
    }

    /// Share of available points earned, in percent.
    pub fn accuracy_percent(&self) -> f64 {
        self.aggregate.accuracy_percent()
    }

    /// Zeroes all aggregates.
    pub fn reset(&mut self) {
        self.aggregate = ScoreAggregate::default();
    }
}
