//! Configuration schema for the scope core
//!
//! This module contains the in-memory configuration the engine is built
//! from: display geometry, per-channel defaults, and the initial timebase
//! selection. There is no file I/O here; persistence, if any, belongs to
//! the embedding application. All types are serde-serializable so an
//! embedder can store them however it likes.
//!
//! # Main Types
//!
//! - [`DisplayGeometry`] - Pixel grid the traces are mapped onto
//! - [`ChannelConfig`] - Initial per-channel settings (range, offset, pins)
//! - [`ScopeConfig`] - Complete engine configuration
//!
//! # Validation
//!
//! Geometry is validated when the engine (and its tables) are constructed:
//! an unsupported `pix_div` is a configuration error, not a runtime
//! condition. See the invariants on the timebase and voltage tables.

use crate::types::{TraceColor, DEFAULT_CHANNEL_COUNT};
use serde::{Deserialize, Serialize};

/// Default pixels per grid division
pub const DEFAULT_PIX_DIV: u32 = 80;

/// Pixels-per-division values the timebase table divides evenly for
pub const SUPPORTED_PIX_DIV: [u32; 2] = [60, 80];

/// Default horizontal grid divisions (time axis)
pub const DEFAULT_HORIZONTAL_DIVS: u32 = 10;

/// Default vertical grid divisions (voltage axis)
pub const DEFAULT_VERTICAL_DIVS: u32 = 6;

/// Pixel grid the traces are mapped onto
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayGeometry {
    /// Pixels per division, both axes (60 or 80)
    pub pix_div: u32,
    /// Number of horizontal (time) divisions
    pub horizontal_divs: u32,
    /// Number of vertical (voltage) divisions
    pub vertical_divs: u32,
}

impl Default for DisplayGeometry {
    fn default() -> Self {
        Self {
            pix_div: DEFAULT_PIX_DIV,
            horizontal_divs: DEFAULT_HORIZONTAL_DIVS,
            vertical_divs: DEFAULT_VERTICAL_DIVS,
        }
    }
}

impl DisplayGeometry {
    /// Trace area width in pixels
    pub fn width_px(&self) -> u32 {
        self.pix_div * self.horizontal_divs
    }

    /// Trace area height in pixels
    pub fn height_px(&self) -> u32 {
        self.pix_div * self.vertical_divs
    }

    /// Whether this geometry uses a supported pixels-per-division value
    pub fn is_supported(&self) -> bool {
        SUPPORTED_PIX_DIV.contains(&self.pix_div)
            && self.horizontal_divs > 0
            && self.vertical_divs > 0
    }
}

/// Initial settings for one input channel
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChannelConfig {
    /// Index into the voltage table
    pub voltage_index: usize,
    /// Pixel row of the zero-volt line
    pub y_offset: i32,
    /// Whether the trace is drawn
    pub shown: bool,
    /// Trace color handed to the renderer
    pub color: TraceColor,
    /// The two front-end selector lines wired to this channel's AFE mux
    pub afe_select_pins: (u8, u8),
}

impl ChannelConfig {
    /// Reference-design defaults for the given channel number
    pub fn for_channel(channel: usize) -> Self {
        Self {
            voltage_index: 3,
            // Channel zero-volt lines are staggered so overlapping traces
            // stay readable on the default ranges.
            y_offset: match channel {
                0 => 400,
                1 => 200,
                n => 100 + 50 * n as i32,
            },
            shown: channel == 0,
            color: TraceColor::for_channel(channel),
            afe_select_pins: (6 + 2 * channel as u8, 7 + 2 * channel as u8),
        }
    }
}

/// Complete configuration the engine is constructed from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScopeConfig {
    /// Display geometry
    pub geometry: DisplayGeometry,
    /// Initial index into the timebase table
    pub timebase_index: usize,
    /// Per-channel settings, one entry per physical channel
    pub channels: Vec<ChannelConfig>,
}

impl Default for ScopeConfig {
    fn default() -> Self {
        Self {
            geometry: DisplayGeometry::default(),
            timebase_index: 6,
            channels: (0..DEFAULT_CHANNEL_COUNT)
                .map(ChannelConfig::for_channel)
                .collect(),
        }
    }
}

impl ScopeConfig {
    /// Number of configured channels
    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }
}
