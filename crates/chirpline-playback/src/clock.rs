//! Engine clock abstraction.
//!
//! The scheduler never reads wall time directly. It asks an [`EngineClock`]
//! for the current time in seconds, so tests and offline rendering can drive
//! time by hand with [`ManualClock`].

use std::fmt::Debug;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

/// Monotonic clock in the engine's time domain.
pub trait EngineClock: Debug + Send + Sync {
    /// Seconds since an arbitrary fixed epoch.
    fn now_secs(&self) -> f64;
}

/// Wall clock measured from construction.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    epoch: Instant,
}

impl SystemClock {
    /// Creates a clock starting at zero now.
    pub fn new() -> Self {
        Self {
            epoch: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl EngineClock for SystemClock {
    fn now_secs(&self) -> f64 {
        self.epoch.elapsed().as_secs_f64()
    }
}

/// Hand-driven clock with microsecond resolution.
#[derive(Debug, Default)]
pub struct ManualClock {
    micros: AtomicU64,
}

impl ManualClock {
    /// Creates a clock at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Moves the clock forward.
    pub fn advance_ms(&self, ms: u64) {
        self.micros.fetch_add(ms * 1000, Ordering::SeqCst);
    }

    /// Moves the clock forward by a number of frames at a sample rate.
    pub fn advance_frames(&self, frames: u64, sample_rate: u32) {
        let micros = frames * 1_000_000 / u64::from(sample_rate.max(1));
        self.micros.fetch_add(micros, Ordering::SeqCst);
    }

    /// Current time in milliseconds.
    pub fn now_ms(&self) -> u64 {
        self.micros.load(Ordering::SeqCst) / 1000
    }
}

impl EngineClock for ManualClock {
    fn now_secs(&self) -> f64 {
        self.micros.load(Ordering::SeqCst) as f64 / 1_000_000.0
    }
}
