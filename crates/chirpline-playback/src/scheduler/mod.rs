//! Playback scheduler.
//!
//! The scheduler owns the engine lifecycle, the decoded-clip cache and the set
//! of active voices:
//!
//! ```text
//! uninitialized -> initialized -> running <-> stopped -> disposed
//! ```
//!
//! Voices are started against an absolute time in the engine clock domain,
//! `origin + scheduled_time_ms / 1000`, where the origin is fixed by
//! [`PlaybackScheduler::start`]. The host drives time with
//! [`PlaybackScheduler::poll`] (or [`PlaybackScheduler::run_until_idle`]) and
//! pulls audio with [`PlaybackScheduler::render_block`]. Each voice's chain is
//! source, voice gain, routed pan, master bus.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::time::Duration;

use chirpline_spec::{GameEvent, TimeMs};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::cache::ClipCache;
use crate::clip::DecodedClip;
use crate::clock::{EngineClock, SystemClock};
use crate::config::SchedulerConfig;
use crate::error::ScheduleError;
use crate::fetch::ClipFetcher;
use crate::mixer::StereoOutput;
use crate::router::{CapabilityProbe, ChannelRouter, StaticProbe};
use crate::voice::{ActiveVoice, CompletionToken, PlaybackStatus, VoiceHandle};

/// Settled statuses kept readable while running, oldest dropped first.
pub const MAX_RETAINED_STATUSES: usize = 256;

/// Engine lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EngineState {
    /// Constructed; `initialize()` not yet called.
    Uninitialized,
    /// Ready to load clips; no clock origin yet.
    Initialized,
    /// Clock origin set; events can be scheduled.
    Running,
    /// Voices cancelled; caches kept.
    Stopped,
    /// Everything released.
    Disposed,
}

/// Voices that changed state during one [`PlaybackScheduler::poll`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PollReport {
    /// Event ids that began sounding.
    pub started: Vec<String>,
    /// Event ids that ran to completion.
    pub completed: Vec<String>,
}

impl PollReport {
    /// Returns true if nothing changed.
    pub fn is_empty(&self) -> bool {
        self.started.is_empty() && self.completed.is_empty()
    }
}

/// Schedules game events as voices on a stereo bus.
pub struct PlaybackScheduler {
    config: SchedulerConfig,
    state: EngineState,
    fetcher: Arc<dyn ClipFetcher>,
    cache: ClipCache,
    clock: Arc<dyn EngineClock>,
    probe: Box<dyn CapabilityProbe + Send + Sync>,
    router: Option<ChannelRouter>,
    origin_secs: f64,
    render_cursor: u64,
    voices: Vec<ActiveVoice>,
    tokens: HashMap<String, Arc<CompletionToken>>,
    settled: VecDeque<String>,
}

impl std::fmt::Debug for PlaybackScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlaybackScheduler")
            .field("config", &self.config)
            .field("state", &self.state)
            .field("router", &self.router)
            .field("active_voices", &self.voices.len())
            .field("cached_clips", &self.cache.len())
            .finish()
    }
}

impl PlaybackScheduler {
    /// Creates a scheduler on the system clock, assuming native panning.
    pub fn new(config: SchedulerConfig, fetcher: Arc<dyn ClipFetcher>) -> Self {
        Self {
            config,
            state: EngineState::Uninitialized,
            fetcher,
            cache: ClipCache::new(),
            clock: Arc::new(SystemClock::new()),
            probe: Box::new(StaticProbe::native()),
            router: None,
            origin_secs: 0.0,
            render_cursor: 0,
            voices: Vec::new(),
            tokens: HashMap::new(),
            settled: VecDeque::new(),
        }
    }

    /// Replaces the engine clock.
    pub fn with_clock(mut self, clock: Arc<dyn EngineClock>) -> Self {
        self.clock = clock;
        self
    }

    /// Replaces the capability probe consulted by `initialize()`.
    pub fn with_probe(mut self, probe: impl CapabilityProbe + Send + Sync + 'static) -> Self {
        self.probe = Box::new(probe);
        self
    }

    /// The configuration.
    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    /// Current lifecycle state.
    pub fn state(&self) -> EngineState {
        self.state
    }

    /// The router chosen at initialization.
    pub fn router(&self) -> Option<ChannelRouter> {
        self.router
    }

    /// The decoded-clip cache.
    pub fn cache(&self) -> &ClipCache {
        &self.cache
    }

    /// Probes output capabilities and readies the engine.
    ///
    /// Calling it again on an initialized engine is a no-op.
    pub fn initialize(&mut self) -> Result<(), ScheduleError> {
        match self.state {
            EngineState::Uninitialized => {
                self.router = Some(ChannelRouter::detect(self.probe.as_ref()));
                self.state = EngineState::Initialized;
                info!(
                    sample_rate = self.config.sample_rate,
                    max_polyphony = self.config.polyphony_cap(),
                    "playback engine initialized"
                );
                Ok(())
            }
            EngineState::Disposed => Err(ScheduleError::Disposed),
            _ => Ok(()),
        }
    }

    /// Fixes the clock origin and starts accepting events.
    pub fn start(&mut self) -> Result<(), ScheduleError> {
        match self.state {
            EngineState::Uninitialized => Err(ScheduleError::NotInitialized),
            EngineState::Disposed => Err(ScheduleError::Disposed),
            EngineState::Running => Ok(()),
            EngineState::Initialized | EngineState::Stopped => {
                self.origin_secs = self.clock.now_secs();
                self.render_cursor = 0;
                self.tokens.clear();
                self.settled.clear();
                self.state = EngineState::Running;
                info!(origin_secs = self.origin_secs, "playback engine started");
                Ok(())
            }
        }
    }

    /// Cancels every active voice. Caches are kept, and the cancelled
    /// statuses stay readable until the next `start()`.
    pub fn stop(&mut self) {
        if self.state != EngineState::Running {
            return;
        }
        let cancelled = self.cancel_all();
        self.state = EngineState::Stopped;
        info!(cancelled, "playback engine stopped");
    }

    /// Stops playback and releases every cached buffer. Safe to call twice.
    pub fn dispose(&mut self) {
        if self.state == EngineState::Disposed {
            return;
        }
        let cancelled = self.cancel_all();
        self.tokens.clear();
        self.settled.clear();
        self.cache.clear();
        self.router = None;
        self.state = EngineState::Disposed;
        info!(cancelled, "playback engine disposed");
    }

    fn cancel_all(&mut self) -> usize {
        let mut cancelled = 0;
        for voice in self.voices.drain(..) {
            if voice.token.settle(PlaybackStatus::Cancelled) {
                self.settled.push_back(voice.event_id);
                cancelled += 1;
            }
        }
        cancelled
    }

    fn ensure_loadable(&self) -> Result<(), ScheduleError> {
        match self.state {
            EngineState::Uninitialized => Err(ScheduleError::NotInitialized),
            EngineState::Disposed => Err(ScheduleError::Disposed),
            _ => Ok(()),
        }
    }

    fn ensure_running(&self) -> Result<(), ScheduleError> {
        match self.state {
            EngineState::Running => Ok(()),
            EngineState::Uninitialized => Err(ScheduleError::NotInitialized),
            EngineState::Disposed => Err(ScheduleError::Disposed),
            EngineState::Initialized | EngineState::Stopped => Err(ScheduleError::NotRunning),
        }
    }

    /// Returns the decoded clip for a path, fetching it on a cache miss.
    pub async fn load_clip(&self, path: &str) -> Result<Arc<DecodedClip>, ScheduleError> {
        self.ensure_loadable()?;
        Ok(self.cache.get_or_load(path, self.fetcher.as_ref()).await?)
    }

    /// Warms the cache. Failed paths are logged and skipped.
    ///
    /// Returns the number of paths now cached.
    pub async fn preload<'a, I>(&self, paths: I) -> Result<usize, ScheduleError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        self.ensure_loadable()?;
        let mut loaded = 0;
        for path in paths {
            match self.cache.get_or_load(path, self.fetcher.as_ref()).await {
                Ok(_) => loaded += 1,
                Err(e) => warn!(path, error = %e, "clip preload failed"),
            }
        }
        Ok(loaded)
    }

    /// Schedules one event.
    ///
    /// Loads the event's clip, evicts the oldest voice if the polyphony cap
    /// is reached, and starts the new voice at its absolute time, or
    /// immediately if that time has passed. Scheduling an id that is still
    /// active replaces the earlier voice.
    pub async fn schedule_event(&mut self, event: &GameEvent) -> Result<VoiceHandle, ScheduleError> {
        self.ensure_running()?;
        let router = self.router.ok_or(ScheduleError::NotInitialized)?;
        let clip = self
            .cache
            .get_or_load(&event.file_path, self.fetcher.as_ref())
            .await?;

        self.cancel_event(&event.event_id);
        self.evict_to_fit();

        let now = self.clock.now_secs();
        let target = self.origin_secs + event.scheduled_time_ms as f64 / 1000.0;
        let start_at_secs = target.max(now);

        let voice = ActiveVoice {
            event_id: event.event_id.clone(),
            clip,
            start_at_secs,
            gain: self.config.voice_gain,
            pan: router.route(event.channel),
            token: CompletionToken::new(),
        };
        let handle = voice.handle();
        debug!(
            event_id = %event.event_id,
            channel = %event.channel,
            start_at_secs,
            late = target < now,
            "voice scheduled"
        );
        self.tokens
            .insert(event.event_id.clone(), Arc::clone(&voice.token));
        self.voices.push(voice);
        self.prune_statuses();
        Ok(handle)
    }

    /// Schedules a batch of events.
    ///
    /// Per-clip load failures are logged and the event is skipped; engine
    /// state errors abort the batch.
    pub async fn schedule_all(
        &mut self,
        events: &[GameEvent],
    ) -> Result<Vec<VoiceHandle>, ScheduleError> {
        let mut handles = Vec::with_capacity(events.len());
        for event in events {
            match self.schedule_event(event).await {
                Ok(handle) => handles.push(handle),
                Err(ScheduleError::Load(e)) => {
                    warn!(event_id = %event.event_id, error = %e, "skipping event, clip failed to load");
                }
                Err(e) => return Err(e),
            }
        }
        Ok(handles)
    }

    fn evict_to_fit(&mut self) {
        let cap = self.config.polyphony_cap();
        while self.voices.len() >= cap {
            let Some(oldest) = self
                .voices
                .iter()
                .enumerate()
                .min_by(|a, b| a.1.start_at_secs.total_cmp(&b.1.start_at_secs))
                .map(|(i, _)| i)
            else {
                break;
            };
            let voice = self.voices.remove(oldest);
            if voice.token.settle(PlaybackStatus::Cancelled) {
                self.settled.push_back(voice.event_id.clone());
            }
            warn!(event_id = %voice.event_id, cap, "polyphony cap reached, evicting oldest voice");
        }
    }

    /// Cancels an event's voice. Unknown or already finished ids are a no-op.
    pub fn cancel_event(&mut self, event_id: &str) {
        let Some(token) = self.tokens.get(event_id) else {
            return;
        };
        if token.settle(PlaybackStatus::Cancelled) {
            self.voices.retain(|voice| voice.event_id != event_id);
            self.settled.push_back(event_id.to_string());
            debug!(event_id, "voice cancelled");
        }
    }

    /// Drops the oldest settled statuses beyond [`MAX_RETAINED_STATUSES`].
    ///
    /// An id queued here may since have been scheduled again; its live token
    /// is left alone.
    fn prune_statuses(&mut self) {
        while self.settled.len() > MAX_RETAINED_STATUSES {
            let Some(event_id) = self.settled.pop_front() else {
                break;
            };
            let is_settled = self
                .tokens
                .get(&event_id)
                .is_some_and(|token| token.status().is_terminal());
            if is_settled {
                self.tokens.remove(&event_id);
            }
        }
    }

    /// Status of an event scheduled since the last start.
    ///
    /// Settled statuses are kept for the most recent
    /// [`MAX_RETAINED_STATUSES`] events, and across `stop()` until the next
    /// `start()`.
    pub fn status(&self, event_id: &str) -> Option<PlaybackStatus> {
        self.tokens.get(event_id).map(|token| token.status())
    }

    /// Number of events whose status is still tracked.
    pub fn tracked_statuses(&self) -> usize {
        self.tokens.len()
    }

    /// Number of voices scheduled or sounding.
    pub fn active_count(&self) -> usize {
        self.voices.len()
    }

    /// Milliseconds since `start()`, or zero when not running.
    pub fn current_time_ms(&self) -> TimeMs {
        if self.state != EngineState::Running {
            return 0;
        }
        ((self.clock.now_secs() - self.origin_secs) * 1000.0).round() as TimeMs
    }

    /// Advances voice states to the current clock time.
    ///
    /// Voices whose start time has passed begin playing; voices whose clip
    /// has run out complete and leave the active set.
    pub fn poll(&mut self) -> PollReport {
        let mut report = PollReport::default();
        if self.state != EngineState::Running {
            return report;
        }
        let now = self.clock.now_secs();

        for voice in &self.voices {
            if now >= voice.start_at_secs && voice.token.begin_playing() {
                report.started.push(voice.event_id.clone());
            }
        }
        self.voices.retain(|voice| {
            if now < voice.end_at_secs() {
                return true;
            }
            if voice.token.settle(PlaybackStatus::Completed) {
                report.completed.push(voice.event_id.clone());
            }
            false
        });
        self.settled.extend(report.completed.iter().cloned());
        self.prune_statuses();
        report
    }

    /// Earliest clock time at which [`poll`](Self::poll) has work to do.
    pub fn next_transition_secs(&self) -> Option<f64> {
        self.voices
            .iter()
            .map(|voice| match voice.token.status() {
                PlaybackStatus::Scheduled => voice.start_at_secs,
                _ => voice.end_at_secs(),
            })
            .min_by(f64::total_cmp)
    }

    /// Sleeps and polls until no voice is left.
    pub async fn run_until_idle(&mut self) {
        while let Some(next) = self.next_transition_secs() {
            if self.state != EngineState::Running {
                break;
            }
            let wait = (next - self.clock.now_secs()).max(0.0);
            if wait > 0.0 {
                tokio::time::sleep(Duration::from_secs_f64(wait)).await;
            }
            self.poll();
        }
    }

    /// Milliseconds of audio rendered since `start()`.
    pub fn rendered_ms(&self) -> TimeMs {
        (self.render_cursor * 1000 / u64::from(self.sample_rate())) as TimeMs
    }

    fn sample_rate(&self) -> u32 {
        self.config.sample_rate.max(1)
    }

    /// Mixes the next `frames` frames of all active voices.
    ///
    /// Rendering keeps its own cursor from the clock origin, so offline hosts
    /// render a block, advance their clock by the same span, then poll.
    /// Clips at other sample rates are resampled linearly.
    pub fn render_block(&mut self, frames: usize) -> StereoOutput {
        let mut output = StereoOutput::new(frames);
        if self.state != EngineState::Running {
            return output;
        }

        let engine_rate = f64::from(self.sample_rate());
        let block_start = self.render_cursor as i64;

        for voice in &self.voices {
            let start_frame = ((voice.start_at_secs - self.origin_secs) * engine_rate).round() as i64;
            let step = f64::from(voice.clip.sample_rate()) / engine_rate;
            let (left_gain, right_gain) = voice.pan.gains();
            let first = (start_frame - block_start).max(0) as usize;

            for i in first..frames {
                let local = block_start + i as i64 - start_frame;
                let Some(sample) = voice.clip.sample_at(local as f64 * step) else {
                    break;
                };
                let sample = sample * voice.gain;
                output.add_frame(i, sample * left_gain, sample * right_gain);
            }
        }

        output.apply_gain(self.config.master_gain);
        self.render_cursor += frames as u64;
        output
    }
}

#[cfg(test)]
mod tests_support;

#[cfg(test)]
mod tests_lifecycle;

#[cfg(test)]
mod tests_polyphony;

#[cfg(test)]
mod tests_render;
