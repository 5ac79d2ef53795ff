//! Deterministic RNG using PCG32 with BLAKE3 seed derivation.
//!
//! All randomness in event generation flows through [`GameRng`]. The generator
//! state is an explicit value (seed plus draw counter) that is passed into every
//! generation call, so a stream can be snapshotted with [`GameRng::state`] and
//! resumed bit-for-bit with [`GameRng::restore`].
//!
//! Every draw consumes exactly one 32-bit PCG output. That keeps the draw
//! counter equal to the number of PCG steps, which is what makes `restore`
//! a single `advance` call.

use rand::{RngCore, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

/// Scale factor mapping a `u32` draw onto `[0, 1)`.
const U32_SCALE: f64 = 1.0 / 4_294_967_296.0;

/// Creates a PCG32 RNG from a 32-bit seed.
///
/// The 32-bit seed is expanded to 64 bits by duplicating the value in both
/// halves, as required by PCG32's state initialization.
pub fn create_rng(seed: u32) -> Pcg32 {
    let seed64 = (seed as u64) | ((seed as u64) << 32);
    Pcg32::seed_from_u64(seed64)
}

/// Derives a seed for a named sub-stream from a base seed.
///
/// Uses BLAKE3 to hash the base seed concatenated with the key, producing an
/// independent seed for each key.
pub fn derive_component_seed(base_seed: u32, key: &str) -> u32 {
    let mut input = Vec::with_capacity(4 + key.len());
    input.extend_from_slice(&base_seed.to_le_bytes());
    input.extend_from_slice(key.as_bytes());

    let hash = blake3::hash(&input);
    let bytes = hash.as_bytes();
    u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])
}

/// Derives the seed for the `round_index`-th round of a session.
pub fn derive_round_seed(session_seed: u32, round_index: u32) -> u32 {
    derive_component_seed(session_seed, &format!("round/{round_index}"))
}

/// Snapshot of a [`GameRng`] stream position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RngState {
    /// Seed the stream was created from.
    pub seed: u32,
    /// Number of draws taken so far.
    pub draws: u64,
}

/// Seeded, reproducible random stream for event generation.
#[derive(Debug, Clone)]
pub struct GameRng {
    seed: u32,
    draws: u64,
    inner: Pcg32,
}

impl GameRng {
    /// Creates a stream at position zero.
    pub fn new(seed: u32) -> Self {
        Self {
            seed,
            draws: 0,
            inner: create_rng(seed),
        }
    }

    /// Recreates a stream at a previously captured position.
    pub fn restore(state: RngState) -> Self {
        let mut rng = Self::new(state.seed);
        rng.inner.advance(state.draws);
        rng.draws = state.draws;
        rng
    }

    /// Captures the current stream position.
    pub fn state(&self) -> RngState {
        RngState {
            seed: self.seed,
            draws: self.draws,
        }
    }

    /// Seed this stream was created from.
    pub fn seed(&self) -> u32 {
        self.seed
    }

    /// Number of draws taken so far.
    pub fn draws(&self) -> u64 {
        self.draws
    }

    /// Creates an independent child stream keyed by name.
    ///
    /// The child depends only on this stream's seed and the key, not on how
    /// many draws have been taken.
    pub fn fork(&self, key: &str) -> GameRng {
        GameRng::new(derive_component_seed(self.seed, key))
    }

    /// Draws a raw 32-bit value.
    pub fn next_u32(&mut self) -> u32 {
        self.draws += 1;
        self.inner.next_u32()
    }

    /// Draws a value uniformly from `[0, 1)`.
    pub fn next_unit(&mut self) -> f64 {
        self.next_u32() as f64 * U32_SCALE
    }

    /// Returns true with probability `p`. Always consumes one draw.
    pub fn chance(&mut self, p: f64) -> bool {
        self.next_unit() < p
    }

    /// Draws an integer uniformly from the inclusive range `[lo, hi]`.
    ///
    /// A degenerate range (`hi <= lo`) yields `lo`. Always consumes one draw.
    pub fn range_inclusive(&mut self, lo: i64, hi: i64) -> i64 {
        let unit = self.next_unit();
        if hi <= lo {
            return lo;
        }
        let span = (hi - lo + 1) as f64;
        (lo + (unit * span).floor() as i64).min(hi)
    }

    /// Draws an index uniformly from `0..len`. Always consumes one draw.
    pub fn index(&mut self, len: usize) -> usize {
        let unit = self.next_unit();
        if len == 0 {
            return 0;
        }
        ((unit * len as f64).floor() as usize).min(len - 1)
    }

    /// Picks an element uniformly, or `None` for an empty slice.
    pub fn pick<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        let idx = self.index(items.len());
        items.get(idx)
    }
}
