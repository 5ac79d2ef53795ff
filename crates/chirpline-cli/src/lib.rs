//! Chirpline CLI library.
//!
//! Input loading, round setup and the command implementations behind the
//! `chirpline` binary.

pub mod commands;
pub mod input;
pub mod round;
