//! Channel routing.
//!
//! Gameplay channels map to hard pans: left is `-1`, right is `+1`. Centre is
//! left to the master bus. How a pan turns into per-side gains depends on the
//! [`PanMode`] picked once at startup by probing the output device:
//!
//! - [`PanMode::Native`]: the device's own stereo panner, modelled as a
//!   balance control that attenuates the far side linearly.
//! - [`PanMode::EqualPower`]: two independent gain paths merged into a stereo
//!   pair using the equal-power law `angle = (pan + 1) * π/4`,
//!   `left = cos(angle)`, `right = sin(angle)`.

use std::f64::consts::FRAC_PI_4;

use chirpline_spec::Channel;
use serde::{Deserialize, Serialize};
use tracing::info;

/// Reports whether native stereo panning can be trusted on this output.
pub trait CapabilityProbe {
    /// True if native panning exists and is unrestricted.
    fn native_panning_available(&self) -> bool;
}

/// Probe with a fixed answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StaticProbe {
    native: bool,
}

impl StaticProbe {
    /// A probe reporting native panning as available.
    pub fn native() -> Self {
        Self { native: true }
    }

    /// A probe forcing the equal-power fallback.
    pub fn fallback() -> Self {
        Self { native: false }
    }
}

impl Default for StaticProbe {
    fn default() -> Self {
        Self::native()
    }
}

impl CapabilityProbe for StaticProbe {
    fn native_panning_available(&self) -> bool {
        self.native
    }
}

/// How pan values become channel gains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PanMode {
    /// Device panner.
    Native,
    /// Two-gain equal-power fallback.
    EqualPower,
}

/// Pan position for a gameplay channel.
pub fn channel_pan(channel: Channel) -> f64 {
    match channel {
        Channel::Left => -1.0,
        Channel::Right => 1.0,
    }
}

/// Equal-power gains `(left, right)` for a pan in `[-1, 1]`.
pub fn equal_power_gains(pan: f64) -> (f64, f64) {
    let pan_angle = (pan + 1.0) * FRAC_PI_4;
    (pan_angle.cos(), pan_angle.sin())
}

/// Balance gains `(left, right)` for a pan in `[-1, 1]`.
pub fn balance_gains(pan: f64) -> (f64, f64) {
    let mut left = 1.0;
    let mut right = 1.0;
    if pan > 0.0 {
        left *= 1.0 - pan;
    } else if pan < 0.0 {
        right *= 1.0 + pan;
    }
    (left, right)
}

/// Maps logical channels to pan nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelRouter {
    mode: PanMode,
}

impl ChannelRouter {
    /// Probes the output once and picks the pan mode.
    pub fn detect(probe: &dyn CapabilityProbe) -> Self {
        let mode = if probe.native_panning_available() {
            PanMode::Native
        } else {
            PanMode::EqualPower
        };
        info!(?mode, "channel router ready");
        Self { mode }
    }

    /// Creates a router with a fixed mode.
    pub fn with_mode(mode: PanMode) -> Self {
        Self { mode }
    }

    /// The selected mode.
    pub fn mode(&self) -> PanMode {
        self.mode
    }

    /// Builds the pan node for a channel.
    pub fn route(&self, channel: Channel) -> PanNode {
        PanNode {
            mode: self.mode,
            pan: channel_pan(channel),
        }
    }
}

/// A routed pan stage.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanNode {
    mode: PanMode,
    pan: f64,
}

impl PanNode {
    /// Current pan in `[-1, 1]`.
    pub fn pan(&self) -> f64 {
        self.pan
    }

    /// The mode this node was built for.
    pub fn mode(&self) -> PanMode {
        self.mode
    }

    /// Sets the pan, clamped to `[-1, 1]`. Non-finite values centre it.
    pub fn apply_pan(&mut self, value: f64) {
        self.pan = if value.is_finite() {
            value.clamp(-1.0, 1.0)
        } else {
            0.0
        };
    }

    /// Gains `(left, right)` for the current pan.
    pub fn gains(&self) -> (f64, f64) {
        match self.mode {
            PanMode::Native => balance_gains(self.pan),
            PanMode::EqualPower => equal_power_gains(self.pan),
        }
    }

    /// Pans one mono sample.
    pub fn process(&self, sample: f64) -> (f64, f64) {
        let (l, r) = self.gains();
        (sample * l, sample * r)
    }
}
