//! Chirpline Playback
//!
//! This crate sounds generated game events on a stereo bus:
//!
//! - **Clip loading** through an injected [`ClipFetcher`] capability, with a
//!   per-path [`ClipCache`] that fetches each path at most once
//! - **Channel routing** of logical left/right channels to hard pans, with an
//!   equal-power fallback when native panning cannot be trusted
//! - **Scheduling** of voices against an engine clock, with a polyphony cap
//!   that evicts the oldest voice
//! - **Offline rendering** of the active voices into stereo blocks, written
//!   to WAV with `hound`
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use chirpline_playback::{
//!     DecodedClip, ManualClock, MemoryFetcher, PlaybackScheduler, PlaybackStatus,
//!     SchedulerConfig,
//! };
//! use chirpline_spec::{Channel, GameEvent};
//!
//! # tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap().block_on(async {
//! let fetcher = MemoryFetcher::new().with_clip("noca.wav", DecodedClip::silence(48_000, 500));
//! let clock = Arc::new(ManualClock::new());
//! let mut scheduler = PlaybackScheduler::new(SchedulerConfig::default(), Arc::new(fetcher))
//!     .with_clock(clock.clone());
//!
//! scheduler.initialize()?;
//! scheduler.start()?;
//!
//! let event = GameEvent {
//!     event_id: "evt_0001".into(),
//!     clip_id: "noca_1".into(),
//!     file_path: "noca.wav".into(),
//!     species_code: "NOCA".into(),
//!     channel: Channel::Left,
//!     scheduled_time_ms: 1000,
//!     scoring_window_start_ms: 0,
//!     scoring_window_end_ms: 2000,
//!     duration_ms: 500,
//!     vocalization_type: None,
//! };
//! let voice = scheduler.schedule_event(&event).await?;
//!
//! clock.advance_ms(1500);
//! scheduler.poll();
//! assert_eq!(voice.finished().await, PlaybackStatus::Completed);
//! # Ok::<(), chirpline_playback::ScheduleError>(())
//! # }).unwrap();
//! ```
//!
//! # Crate Structure
//!
//! - [`cache`] - Decoded-clip cache with request coalescing
//! - [`clip`] - Decoded mono buffers
//! - [`clock`] - Engine clock abstraction
//! - [`config`] - Scheduler settings
//! - [`error`] - Load and engine errors
//! - [`fetch`] - The clip fetch capability
//! - [`mixer`] - Stereo mix buffers
//! - [`router`] - Channel routing and pan laws
//! - [`scheduler`] - Engine lifecycle and voice scheduling
//! - [`voice`] - Voice handles and completion tokens
//! - [`wav`] - WAV decoding and encoding

pub mod cache;
pub mod clip;
pub mod clock;
pub mod config;
pub mod error;
pub mod fetch;
pub mod mixer;
pub mod router;
pub mod scheduler;
pub mod voice;
pub mod wav;

// Re-export main types at crate root
pub use cache::ClipCache;
pub use clip::DecodedClip;
pub use clock::{EngineClock, ManualClock, SystemClock};
pub use config::SchedulerConfig;
pub use error::{LoadError, ScheduleError};
pub use fetch::{ClipFetcher, MemoryFetcher};
pub use mixer::StereoOutput;
pub use router::{
    balance_gains, channel_pan, equal_power_gains, CapabilityProbe, ChannelRouter, PanMode,
    PanNode, StaticProbe,
};
pub use scheduler::{EngineState, PlaybackScheduler, PollReport};
pub use voice::{CompletionToken, PlaybackStatus, VoiceHandle};
pub use wav::{decode_wav_bytes, decode_wav_file, write_mono_wav, write_stereo_wav, WavFileFetcher};
