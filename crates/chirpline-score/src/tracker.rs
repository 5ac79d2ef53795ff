//! Open-window tracking.
//!
//! During a round several scoring windows can be open at once. The tracker
//! holds the events still waiting for input, routes each player input to the
//! best open event, and turns windows that close without input into misses
//! when the host clock passes their end.

use chirpline_spec::{GameEvent, TimeMs};
use tracing::debug;

use crate::evaluator::ScoreEvaluator;
use crate::types::{PlayerInput, ScoreBreakdown};

/// Events awaiting judgement.
#[derive(Debug, Clone, Default)]
pub struct WindowTracker {
    open: Vec<GameEvent>,
    stray_inputs: u32,
}

impl WindowTracker {
    /// Creates an empty tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an event to be judged.
    pub fn register(&mut self, event: GameEvent) {
        self.open.push(event);
    }

    /// Adds several events.
    pub fn register_all<I: IntoIterator<Item = GameEvent>>(&mut self, events: I) {
        self.open.extend(events);
    }

    /// Number of events still waiting.
    pub fn pending(&self) -> usize {
        self.open.len()
    }

    /// Inputs that matched no open window.
    pub fn stray_inputs(&self) -> u32 {
        self.stray_inputs
    }

    /// Events whose window contains `time_ms`.
    pub fn open_at(&self, time_ms: TimeMs) -> impl Iterator<Item = &GameEvent> {
        self.open.iter().filter(move |e| e.window_contains(time_ms))
    }

    /// Judges an input against the best open event and removes that event.
    ///
    /// Among events whose window contains the input, one on the chosen
    /// channel wins; ties go to the earliest scheduled event. An input that
    /// matches no window returns `None` and costs nothing.
    pub fn submit(
        &mut self,
        input: &PlayerInput,
        evaluator: &mut ScoreEvaluator,
    ) -> Option<ScoreBreakdown> {
        let best = self
            .open
            .iter()
            .enumerate()
            .filter(|(_, e)| e.window_contains(input.timestamp_ms))
            .min_by_key(|(_, e)| (e.channel != input.channel, e.scheduled_time_ms))
            .map(|(i, _)| i);

        let Some(index) = best else {
            self.stray_inputs += 1;
            debug!(timestamp_ms = input.timestamp_ms, "input matched no open window");
            return None;
        };
        let event = self.open.remove(index);
        Some(evaluator.score_event(&event, input))
    }

    /// Scores every event whose window ended before `now_ms` as a miss.
    pub fn close_expired(
        &mut self,
        now_ms: TimeMs,
        evaluator: &mut ScoreEvaluator,
    ) -> Vec<ScoreBreakdown> {
        let mut missed = Vec::new();
        self.open.retain(|event| {
            if event.scoring_window_end_ms < now_ms {
                missed.push(evaluator.score_miss(event));
                false
            } else {
                true
            }
        });
        missed
    }

    /// Scores everything still open as a miss, for the end of a round.
    pub fn close_all(&mut self, evaluator: &mut ScoreEvaluator) -> Vec<ScoreBreakdown> {
        self.open
            .drain(..)
            .map(|event| evaluator.score_miss(&event))
            .collect()
    }

    /// Earliest window end among open events.
    pub fn next_close_ms(&self) -> Option<TimeMs> {
        self.open.iter().map(|e| e.scoring_window_end_ms).min()
    }
}
