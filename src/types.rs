//! Core data types for the scope engine
//!
//! This module contains the fundamental constants and small types shared by
//! the tables, the channel state, and the trigger detector.
//!
//! # ADC Model
//!
//! The acquisition facility delivers unsigned counts from a 10-bit converter
//! ([`ADC_BITS`]). A count of [`ADC_RANGE`]` - 1` corresponds to the top of
//! the active AFE sub-range, a count of 0 to the bottom. The zero-volt count
//! for each sub-range is tabulated in the range table, not fixed at
//! mid-scale: switched front-end ranges carry different sign offsets.
//!
//! # Display Model
//!
//! The screen is divided into a grid of divisions, each
//! `pix_div` pixels on a side (60 or 80 depending on panel). Horizontal
//! mapping (time) is handled by the timebase table, vertical mapping
//! (voltage) by the voltage table and per-channel state.

use serde::{Deserialize, Serialize};

/// Bit resolution of the ADCs
pub const ADC_BITS: u32 = 10;

/// Number of distinct ADC counts (counts run 0..ADC_RANGE)
pub const ADC_RANGE: u32 = 1 << ADC_BITS;

/// A single raw ADC sample
pub type AdcCount = u16;

/// Number of physical input channels in the reference design
pub const DEFAULT_CHANNEL_COUNT: usize = 2;

/// RGB color assigned to a trace
///
/// The core never draws; it only hands the renderer a color so traces stay
/// visually identifiable across configuration changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl TraceColor {
    /// Channel 0 default (yellow)
    pub const YELLOW: TraceColor = TraceColor::new(255, 255, 0);

    /// Channel 1 default (cyan)
    pub const CYAN: TraceColor = TraceColor::new(0, 255, 255);

    /// Create a color from RGB components
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Default color for the given channel number
    pub const fn for_channel(channel: usize) -> Self {
        match channel {
            0 => Self::YELLOW,
            1 => Self::CYAN,
            // Additional channels cycle through distinguishable hues
            2 => Self::new(255, 0, 255),
            _ => Self::new(0, 255, 0),
        }
    }
}

impl std::fmt::Display for TraceColor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}
