//! Shared fixtures for scheduler tests.

use std::sync::Arc;

use chirpline_spec::{Channel, GameEvent, TimeMs};

use super::PlaybackScheduler;
use crate::clip::DecodedClip;
use crate::clock::ManualClock;
use crate::config::SchedulerConfig;
use crate::fetch::MemoryFetcher;
use crate::router::StaticProbe;

pub const RATE: u32 = 1_000;

/// One-second clip at `RATE`, every sample at `level`.
pub fn tone(level: f32) -> DecodedClip {
    DecodedClip::new(RATE, vec![level; RATE as usize])
}

pub fn fetcher() -> Arc<MemoryFetcher> {
    Arc::new(
        MemoryFetcher::new()
            .with_clip("clips/one.wav", tone(1.0))
            .with_clip("clips/half.wav", tone(0.5))
            .with_clip("clips/short.wav", DecodedClip::new(RATE, vec![1.0; 100])),
    )
}

pub fn event(id: &str, time_ms: TimeMs, channel: Channel, path: &str) -> GameEvent {
    GameEvent {
        event_id: id.to_string(),
        clip_id: id.to_string(),
        file_path: path.to_string(),
        species_code: "NOCA".to_string(),
        channel,
        scheduled_time_ms: time_ms,
        scoring_window_start_ms: time_ms - 1000,
        scoring_window_end_ms: time_ms + 1000,
        duration_ms: 1000,
        vocalization_type: None,
    }
}

pub type Fixture = (PlaybackScheduler, Arc<ManualClock>, Arc<MemoryFetcher>);

/// A scheduler on a manual clock with unity master gain, not yet initialized.
pub fn scheduler(config: SchedulerConfig) -> Fixture {
    let clock = Arc::new(ManualClock::new());
    let fetcher = fetcher();
    let config = config.with_sample_rate(RATE).with_master_gain(1.0);
    let scheduler = PlaybackScheduler::new(config, fetcher.clone())
        .with_clock(clock.clone())
        .with_probe(StaticProbe::fallback());
    (scheduler, clock, fetcher)
}

/// A running scheduler with default config.
pub fn running() -> Fixture {
    let (mut scheduler, clock, fetcher) = scheduler(SchedulerConfig::default());
    scheduler.initialize().unwrap();
    scheduler.start().unwrap();
    (scheduler, clock, fetcher)
}
