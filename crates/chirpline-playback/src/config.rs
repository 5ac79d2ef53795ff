//! Scheduler configuration.

use serde::{Deserialize, Serialize};

/// Default engine sample rate.
pub const DEFAULT_SAMPLE_RATE: u32 = 48_000;

/// Default cap on simultaneously active voices.
pub const DEFAULT_MAX_POLYPHONY: usize = 8;

/// Playback engine settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SchedulerConfig {
    /// Engine sample rate in Hz.
    pub sample_rate: u32,
    /// Largest number of active voices; the oldest is evicted beyond it.
    pub max_polyphony: usize,
    /// Per-voice gain.
    pub voice_gain: f64,
    /// Master bus gain.
    pub master_gain: f64,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            sample_rate: DEFAULT_SAMPLE_RATE,
            max_polyphony: DEFAULT_MAX_POLYPHONY,
            voice_gain: 1.0,
            master_gain: 0.8,
        }
    }
}

impl SchedulerConfig {
    /// Sets the polyphony cap.
    pub fn with_max_polyphony(mut self, max_polyphony: usize) -> Self {
        self.max_polyphony = max_polyphony;
        self
    }

    /// Sets the sample rate.
    pub fn with_sample_rate(mut self, sample_rate: u32) -> Self {
        self.sample_rate = sample_rate;
        self
    }

    /// Sets the master gain.
    pub fn with_master_gain(mut self, gain: f64) -> Self {
        self.master_gain = gain;
        self
    }

    /// Polyphony cap, at least one.
    pub fn polyphony_cap(&self) -> usize {
        self.max_polyphony.max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_fill_missing_fields() {
        let config: SchedulerConfig = serde_json::from_str(r#"{"max_polyphony": 4}"#).unwrap();
        assert_eq!(config.max_polyphony, 4);
        assert_eq!(config.sample_rate, 48_000);
        assert_eq!(config.master_gain, 0.8);
    }

    #[test]
    fn test_polyphony_cap_is_at_least_one() {
        assert_eq!(SchedulerConfig::default().with_max_polyphony(0).polyphony_cap(), 1);
    }
}
