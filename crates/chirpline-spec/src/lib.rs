//! Chirpline Core Data Model
//!
//! This crate provides the value types shared by every part of the Chirpline
//! timing game: the clip catalog, level and pack configuration, the generated
//! [`GameEvent`] stream, and the [`DifficultyParams`] that drive generation.
//!
//! # Overview
//!
//! A round is described by a [`LevelConfig`] (duration, density tier, overlap
//! probability, scoring window) plus an optional [`PackModifiers`] set. The
//! generator turns those and a [`SpeciesPool`] into an ordered list of
//! [`GameEvent`]s; the playback scheduler sounds them and the score evaluator
//! judges player input against their scoring windows.
//!
//! All configuration types are plain `serde` structs, loaded from JSON by the
//! orchestrator and validated with the functions in [`validation`] before
//! generation begins.
//!
//! # Example
//!
//! ```
//! use chirpline_spec::{LevelConfig, EventDensity};
//! use chirpline_spec::validation::validate_level;
//!
//! let level = LevelConfig::builder(1)
//!     .round_duration_sec(30.0)
//!     .event_density(EventDensity::Medium)
//!     .scoring_window_ms(2000)
//!     .build();
//!
//! assert!(validate_level(&level).is_ok());
//! assert_eq!(level.round_duration_ms(), 30_000);
//! ```
//!
//! # Modules
//!
//! - [`channel`]: Logical stereo channel and vocalization tags
//! - [`clip`]: Clip catalog entries and species pools
//! - [`difficulty`]: Concrete generation parameters
//! - [`error`]: Configuration errors and the shared [`GameError`] trait
//! - [`event`]: Generated game events and round time bounds
//! - [`level`]: Level configuration
//! - [`pack`]: Pack modifiers
//! - [`validation`]: Pre-generation validation

pub mod channel;
pub mod clip;
pub mod difficulty;
pub mod error;
pub mod event;
pub mod level;
pub mod pack;
pub mod validation;

// Re-export commonly used types at the crate root
pub use channel::{Channel, VocalizationType};
pub use clip::{ClipMeta, SpeciesEntry, SpeciesPool};
pub use difficulty::{DifficultyParams, VocalizationWeights};
pub use error::{ConfigError, GameError};
pub use event::{GameEvent, TimeMs, ROUND_LEAD_IN_MS, ROUND_TAIL_MS};
pub use level::{EventDensity, LevelConfig, LevelConfigBuilder};
pub use pack::PackModifiers;
