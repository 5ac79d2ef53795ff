//! Chirpline Scoring
//!
//! Judges player identifications against generated events. Each judgement
//! awards species, channel and timing points, grades the timing, and maps the
//! result to a feedback class; the evaluator keeps running totals across a
//! round and the [`WindowTracker`] turns closed windows into misses.
//!
//! # Example
//!
//! ```
//! use chirpline_score::{PlayerInput, ScoreEvaluator, TimingAccuracy};
//! use chirpline_spec::{Channel, GameEvent};
//!
//! let event = GameEvent {
//!     event_id: "evt_0001".into(),
//!     clip_id: "NOCA_1".into(),
//!     file_path: "clips/noca_1.wav".into(),
//!     species_code: "NOCA".into(),
//!     channel: Channel::Left,
//!     scheduled_time_ms: 2000,
//!     scoring_window_start_ms: 1000,
//!     scoring_window_end_ms: 3000,
//!     duration_ms: 1500,
//!     vocalization_type: None,
//! };
//!
//! let mut evaluator = ScoreEvaluator::default();
//! let result = evaluator.score_event(&event, &PlayerInput::new("NOCA", Channel::Left, 2000));
//! assert_eq!(result.total_points, 100);
//! assert_eq!(result.timing_accuracy, TimingAccuracy::Perfect);
//! ```

pub mod config;
pub mod evaluator;
pub mod tracker;
pub mod types;

pub use config::{ScoringConfig, TimingLaw};
pub use evaluator::{evaluate, ScoreEvaluator};
pub use tracker::WindowTracker;
pub use types::{FeedbackType, PlayerInput, ScoreAggregate, ScoreBreakdown, TimingAccuracy};
