//! Stereo mix buffers.

/// Stereo audio output.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StereoOutput {
    /// Left channel samples.
    pub left: Vec<f64>,
    /// Right channel samples.
    pub right: Vec<f64>,
}

impl StereoOutput {
    /// Creates a silent output with the given number of frames.
    pub fn new(num_samples: usize) -> Self {
        Self {
            left: vec![0.0; num_samples],
            right: vec![0.0; num_samples],
        }
    }

    /// Appends another block.
    pub fn extend(&mut self, other: &StereoOutput) {
        self.left.extend_from_slice(&other.left);
        self.right.extend_from_slice(&other.right);
    }

    /// Adds a panned sample at a frame index; out-of-range frames are ignored.
    pub fn add_frame(&mut self, index: usize, left: f64, right: f64) {
        if let (Some(l), Some(r)) = (self.left.get_mut(index), self.right.get_mut(index)) {
            *l += left;
            *r += right;
        }
    }

    /// Scales both channels.
    pub fn apply_gain(&mut self, gain: f64) {
        for s in self.left.iter_mut().chain(self.right.iter_mut()) {
            *s *= gain;
        }
    }

    /// Creates interleaved stereo samples.
    pub fn interleave(&self) -> Vec<f64> {
        let mut output = Vec::with_capacity(self.left.len() * 2);
        for (l, r) in self.left.iter().zip(self.right.iter()) {
            output.push(*l);
            output.push(*r);
        }
        output
    }

    /// Peak absolute amplitude of each channel.
    pub fn peaks(&self) -> (f64, f64) {
        let peak = |ch: &[f64]| ch.iter().fold(0.0_f64, |acc, s| acc.max(s.abs()));
        (peak(&self.left), peak(&self.right))
    }

    /// Returns true if every sample is zero.
    pub fn is_silent(&self) -> bool {
        self.peaks() == (0.0, 0.0)
    }

    /// Gets the number of frames.
    pub fn len(&self) -> usize {
        self.left.len()
    }

    /// Returns true if empty.
    pub fn is_empty(&self) -> bool {
        self.left.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_frame_and_gain() {
        let mut out = StereoOutput::new(2);
        out.add_frame(1, 0.5, 0.25);
        out.add_frame(5, 1.0, 1.0);
        out.apply_gain(2.0);
        assert_eq!(out.left, vec![0.0, 1.0]);
        assert_eq!(out.right, vec![0.0, 0.5]);
        assert_eq!(out.interleave(), vec![0.0, 0.0, 1.0, 0.5]);
        assert_eq!(out.peaks(), (1.0, 0.5));
    }

    #[test]
    fn test_extend() {
        let mut out = StereoOutput::new(1);
        out.extend(&StereoOutput::new(3));
        assert_eq!(out.len(), 4);
        assert!(out.is_silent());
    }
}
