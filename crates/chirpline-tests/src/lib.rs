//! Chirpline End-to-End Test Infrastructure
//!
//! This crate provides integration tests for flows that cross crate
//! boundaries:
//!
//! - Generation: level + catalog -> event list
//! - Playback: event list -> scheduled voices -> rendered stereo
//! - Scoring: event list + player inputs -> aggregate
//! - **Determinism**: identical seeds give identical rounds and renders
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p chirpline-tests
//! ```

pub mod determinism;
pub mod fixtures;
