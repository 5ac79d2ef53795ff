//! Voices and completion tokens.
//!
//! Every scheduled event gets a [`CompletionToken`]. The token's status moves
//! `scheduled → playing → completed` or, from either live state, to
//! `cancelled`. Each move is a single compare-and-swap, so a natural
//! completion racing an explicit cancel settles exactly once and only the
//! winner performs cleanup.

use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::watch;

use crate::clip::DecodedClip;
use crate::router::PanNode;

/// Lifecycle state of one scheduled event's playback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaybackStatus {
    /// Accepted, waiting for its start time.
    Scheduled,
    /// Sounding.
    Playing,
    /// Ran to its natural end.
    Completed,
    /// Stopped early by cancel, stop, dispose or eviction.
    Cancelled,
}

impl PlaybackStatus {
    /// Returns true for `Completed` and `Cancelled`.
    pub fn is_terminal(self) -> bool {
        matches!(self, PlaybackStatus::Completed | PlaybackStatus::Cancelled)
    }

    fn to_u8(self) -> u8 {
        match self {
            PlaybackStatus::Scheduled => 0,
            PlaybackStatus::Playing => 1,
            PlaybackStatus::Completed => 2,
            PlaybackStatus::Cancelled => 3,
        }
    }

    fn from_u8(value: u8) -> Self {
        match value {
            0 => PlaybackStatus::Scheduled,
            1 => PlaybackStatus::Playing,
            2 => PlaybackStatus::Completed,
            _ => PlaybackStatus::Cancelled,
        }
    }
}

impl std::fmt::Display for PlaybackStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            PlaybackStatus::Scheduled => "scheduled",
            PlaybackStatus::Playing => "playing",
            PlaybackStatus::Completed => "completed",
            PlaybackStatus::Cancelled => "cancelled",
        };
        f.write_str(s)
    }
}

/// Single-transition completion state shared by a voice and its handles.
#[derive(Debug)]
pub struct CompletionToken {
    status: AtomicU8,
    notify: watch::Sender<PlaybackStatus>,
}

impl CompletionToken {
    /// Creates a token in the `Scheduled` state.
    pub fn new() -> Arc<Self> {
        let (notify, _) = watch::channel(PlaybackStatus::Scheduled);
        Arc::new(Self {
            status: AtomicU8::new(PlaybackStatus::Scheduled.to_u8()),
            notify,
        })
    }

    /// Current status.
    pub fn status(&self) -> PlaybackStatus {
        PlaybackStatus::from_u8(self.status.load(Ordering::SeqCst))
    }

    /// Moves `Scheduled` to `Playing`. Returns false if the voice was not
    /// waiting to start.
    pub fn begin_playing(&self) -> bool {
        self.transition(PlaybackStatus::Scheduled, PlaybackStatus::Playing)
    }

    /// Moves a live voice to a terminal status.
    ///
    /// Returns true only for the call that actually settled the token; later
    /// calls are no-ops and return false.
    pub fn settle(&self, terminal: PlaybackStatus) -> bool {
        debug_assert!(terminal.is_terminal());
        self.transition(PlaybackStatus::Scheduled, terminal)
            || self.transition(PlaybackStatus::Playing, terminal)
    }

    fn transition(&self, from: PlaybackStatus, to: PlaybackStatus) -> bool {
        let moved = self
            .status
            .compare_exchange(from.to_u8(), to.to_u8(), Ordering::SeqCst, Ordering::SeqCst)
            .is_ok();
        if moved {
            self.notify.send_replace(to);
        }
        moved
    }

    fn subscribe(&self) -> watch::Receiver<PlaybackStatus> {
        self.notify.subscribe()
    }
}

/// Caller-side view of a scheduled voice.
#[derive(Debug, Clone)]
pub struct VoiceHandle {
    event_id: String,
    start_at_secs: f64,
    token: Arc<CompletionToken>,
}

impl VoiceHandle {
    pub(crate) fn new(event_id: String, start_at_secs: f64, token: Arc<CompletionToken>) -> Self {
        Self {
            event_id,
            start_at_secs,
            token,
        }
    }

    /// The event this voice plays.
    pub fn event_id(&self) -> &str {
        &self.event_id
    }

    /// Absolute start time in the engine clock domain.
    pub fn start_at_secs(&self) -> f64 {
        self.start_at_secs
    }

    /// Current status.
    pub fn status(&self) -> PlaybackStatus {
        self.token.status()
    }

    /// Returns true once the voice has completed or been cancelled.
    pub fn is_finished(&self) -> bool {
        self.status().is_terminal()
    }

    /// Waits until the voice completes or is cancelled.
    pub async fn finished(&self) -> PlaybackStatus {
        let mut rx = self.token.subscribe();
        let status = match rx.wait_for(|status| status.is_terminal()).await {
            Ok(status) => *status,
            Err(_) => self.token.status(),
        };
        status
    }
}

/// A voice held by the scheduler: source, gain and pan stage.
#[derive(Debug, Clone)]
pub(crate) struct ActiveVoice {
    pub event_id: String,
    pub clip: Arc<DecodedClip>,
    pub start_at_secs: f64,
    pub gain: f64,
    pub pan: PanNode,
    pub token: Arc<CompletionToken>,
}

impl ActiveVoice {
    pub fn end_at_secs(&self) -> f64 {
        self.start_at_secs + self.clip.duration_secs()
    }

    pub fn handle(&self) -> VoiceHandle {
        VoiceHandle::new(
            self.event_id.clone(),
            self.start_at_secs,
            Arc::clone(&self.token),
        )
    }
}
