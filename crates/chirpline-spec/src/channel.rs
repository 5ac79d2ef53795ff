//! Logical stereo channel and vocalization tags.

use serde::{Deserialize, Serialize};

/// Logical channel an event sounds on.
///
/// Center is reserved for the master bus and is never assigned to gameplay
/// events, so it has no variant here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Channel {
    /// Left speaker.
    Left,
    /// Right speaker.
    Right,
}

impl Channel {
    /// Both channels in draw order.
    pub const ALL: [Channel; 2] = [Channel::Left, Channel::Right];

    /// Returns the other channel.
    pub fn opposite(self) -> Self {
        match self {
            Channel::Left => Channel::Right,
            Channel::Right => Channel::Left,
        }
    }

    /// Returns the channel name as used in JSON.
    pub fn as_str(self) -> &'static str {
        match self {
            Channel::Left => "left",
            Channel::Right => "right",
        }
    }
}

impl std::fmt::Display for Channel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Clip vocalization type, used to bias event generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VocalizationType {
    /// Territorial or courtship song.
    Song,
    /// Short call note.
    Call,
}

impl VocalizationType {
    /// Returns the type name as used in JSON.
    pub fn as_str(self) -> &'static str {
        match self {
            VocalizationType::Song => "song",
            VocalizationType::Call => "call",
        }
    }
}

impl std::fmt::Display for VocalizationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
