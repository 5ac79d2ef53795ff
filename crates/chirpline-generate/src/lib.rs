//! Chirpline Event Generation
//!
//! This crate turns a level configuration, a species pool and an optional pack
//! into the ordered list of [`GameEvent`](chirpline_spec::GameEvent)s that
//! make up one round.
//!
//! # Determinism
//!
//! All randomness flows through [`GameRng`], a PCG32 stream whose seeds are
//! derived with BLAKE3. Every draw consumes exactly one step of the stream, so
//! a captured [`RngState`] restores the generator to the same point and the
//! next round replays identically.
//!
//! # Example
//!
//! ```
//! use chirpline_generate::{EventGenerator, GameRng};
//! use chirpline_spec::{ClipMeta, LevelConfig, SpeciesPool};
//!
//! let pool = SpeciesPool::from_clips(vec![
//!     ClipMeta::new("NOCA_1", "NOCA", 1500, "clips/noca_1.wav"),
//!     ClipMeta::new("BLJA_1", "BLJA", 900, "clips/blja_1.wav"),
//! ]);
//! let level = LevelConfig::builder(1).round_duration_sec(20.0).build();
//!
//! let events = EventGenerator::new()
//!     .generate(&mut GameRng::new(42), &level, &pool, None)
//!     .unwrap();
//! assert_eq!(events[0].scheduled_time_ms, 1000);
//! ```
//!
//! # Crate Structure
//!
//! - [`difficulty`] - Level and pack to concrete parameters
//! - [`generator`] - Base and ramped event generators
//! - [`overlap`] - Scoring-window overlap analysis
//! - [`ramp`] - Elapsed-time difficulty curve for endless play
//! - [`rng`] - Deterministic RNG with seed derivation
//! - [`selection`] - Per-round species selection

pub mod difficulty;
pub mod generator;
pub mod overlap;
pub mod ramp;
pub mod rng;
pub mod selection;

// Re-export main types at crate root
pub use difficulty::{calculate, select_vocalization_type};
pub use generator::{
    generate_with, EventGenerator, ParamSchedule, RampedGenerator, OVERLAP_OFFSET_MS,
};
pub use overlap::{count_overlaps, has_overlaps, overlap_pairs, sort_chronological};
pub use ramp::{DifficultyRamp, RampTier};
pub use rng::{derive_component_seed, derive_round_seed, GameRng, RngState};
pub use selection::select_species;
