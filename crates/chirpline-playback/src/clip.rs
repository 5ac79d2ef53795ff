//! Decoded audio buffers.

use std::sync::Arc;

/// A decoded, mono clip ready for playback.
///
/// Samples are shared, so cloning a clip is cheap and every voice playing
/// the same path reads the same buffer.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedClip {
    sample_rate: u32,
    samples: Arc<[f32]>,
}

impl DecodedClip {
    /// Creates a clip from mono samples in `[-1.0, 1.0]`.
    pub fn new(sample_rate: u32, samples: Vec<f32>) -> Self {
        Self {
            sample_rate: sample_rate.max(1),
            samples: samples.into(),
        }
    }

    /// Creates a silent clip of the given length.
    pub fn silence(sample_rate: u32, duration_ms: u32) -> Self {
        let frames = (u64::from(sample_rate) * u64::from(duration_ms) / 1000) as usize;
        Self::new(sample_rate, vec![0.0; frames])
    }

    /// Sample rate in Hz.
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// The samples.
    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    /// Number of frames.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Returns true if the clip has no frames.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Duration in seconds.
    pub fn duration_secs(&self) -> f64 {
        self.samples.len() as f64 / f64::from(self.sample_rate)
    }

    /// Duration in whole milliseconds, rounded.
    pub fn duration_ms(&self) -> u32 {
        (self.duration_secs() * 1000.0).round() as u32
    }

    /// Reads the clip at a fractional frame position with linear interpolation.
    ///
    /// Returns `None` past the last frame.
    pub fn sample_at(&self, position: f64) -> Option<f64> {
        if position < 0.0 {
            return None;
        }
        let index = position.floor() as usize;
        let current = f64::from(*self.samples.get(index)?);
        let next = self
            .samples
            .get(index + 1)
            .map(|&s| f64::from(s))
            .unwrap_or(current);
        let frac = position - index as f64;
        Some(current + (next - current) * frac)
    }
}
