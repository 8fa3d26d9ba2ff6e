//! Per-channel acquisition state
//!
//! One [`ChannelState`] exists per physical input channel for the lifetime
//! of the process. It holds the user-facing vertical settings (volts/div
//! selection, zero-line pixel offset, visibility), the mapping factors
//! cached from the voltage/range tables, and the per-pass readouts the
//! renderer consumes (pixel extents, trigger point, frequency).
//!
//! Channel state deliberately owns no UI handles; the association between a
//! channel and its buttons/menus lives with the embedding application.

use crate::config::ChannelConfig;
use crate::error::Result;
use crate::tables::{RangeTable, VoltageTable};
use crate::types::{AdcCount, TraceColor, ADC_RANGE};

/// Mutable state of one input channel
#[derive(Debug, Clone)]
pub struct ChannelState {
    voltage_index: usize,
    y_offset: i32,
    shown: bool,

    // Mapping factors cached from the tables for the active voltage index
    pixel_per_count: f64,
    zero_offset: u16,

    // Displayable voltage bounds of the active AFE sub-range
    v_min: f64,
    v_max: f64,

    // Pixel extents of the trace: y_min is the top (highest voltage seen)
    y_min: i32,
    y_max: i32,

    trigger_sample_index: Option<usize>,
    frequency_hz: Option<f64>,

    color: TraceColor,
    afe_select_pins: (u8, u8),
}

impl ChannelState {
    /// Build channel state from its configuration
    pub fn new(config: &ChannelConfig, voltages: &VoltageTable) -> Result<Self> {
        let mut state = Self {
            voltage_index: 0,
            y_offset: config.y_offset,
            shown: config.shown,
            pixel_per_count: 0.0,
            zero_offset: 0,
            v_min: 0.0,
            v_max: 0.0,
            y_min: 0,
            y_max: 0,
            trigger_sample_index: None,
            frequency_hz: None,
            color: config.color,
            afe_select_pins: config.afe_select_pins,
        };
        state.apply_voltage(config.voltage_index, voltages)?;
        Ok(state)
    }

    /// Re-derive the cached mapping from a (validated) voltage index
    ///
    /// Returns the AFE sub-range index now in effect. The caller compares it
    /// with the previous one to decide whether the front end must switch.
    pub fn apply_voltage(&mut self, index: usize, voltages: &VoltageTable) -> Result<usize> {
        let entry = voltages.get(index)?;
        let range = RangeTable::get(entry.afe_range_index)?;
        self.voltage_index = index;
        self.pixel_per_count = entry.pixel_per_count;
        self.zero_offset = range.zero_offset;
        self.v_min = range.v_min;
        self.v_max = range.v_max;
        self.reset_extents();
        Ok(entry.afe_range_index)
    }

    /// Map an ADC count to a screen row
    ///
    /// Higher counts map to smaller rows (the trace rises on screen).
    /// Pure function of the cached mapping: identical inputs always produce
    /// identical pixels.
    pub fn to_pixel_y(&self, count: AdcCount) -> i32 {
        let delta = (count as f64 - self.zero_offset as f64) * self.pixel_per_count;
        self.y_offset - delta.round() as i32
    }

    pub fn set_shown(&mut self, shown: bool) {
        self.shown = shown;
    }

    pub fn set_y_offset(&mut self, y_offset: i32) {
        self.y_offset = y_offset;
        self.reset_extents();
    }

    /// Record the trace extents observed in one acquisition pass
    ///
    /// `to_pixel_y` is monotonic in the count, so only the extreme counts
    /// need mapping.
    pub fn update_extents(&mut self, samples: &[AdcCount]) {
        let (min_count, max_count) = match samples.iter().fold(None, |acc, &s| match acc {
            None => Some((s, s)),
            Some((lo, hi)) => Some((lo.min(s), hi.max(s))),
        }) {
            Some(bounds) => bounds,
            None => return,
        };
        self.y_min = self.to_pixel_y(max_count);
        self.y_max = self.to_pixel_y(min_count);
    }

    /// Record the trigger search and frequency results of one pass
    pub fn record_pass(&mut self, trigger: Option<usize>, frequency_hz: Option<f64>) {
        self.trigger_sample_index = trigger;
        self.frequency_hz = frequency_hz;
    }

    // After a settings change the extents fall back to the full displayable
    // span until the next pass observes a trace.
    fn reset_extents(&mut self) {
        self.y_min = self.to_pixel_y((ADC_RANGE - 1) as AdcCount);
        self.y_max = self.to_pixel_y(0);
    }

    pub fn voltage_index(&self) -> usize {
        self.voltage_index
    }

    pub fn y_offset(&self) -> i32 {
        self.y_offset
    }

    pub fn shown(&self) -> bool {
        self.shown
    }

    /// Bottom voltage of the active AFE sub-range
    pub fn v_min(&self) -> f64 {
        self.v_min
    }

    /// Top voltage of the active AFE sub-range
    pub fn v_max(&self) -> f64 {
        self.v_max
    }

    /// Topmost (smallest) pixel row of the trace
    pub fn y_min(&self) -> i32 {
        self.y_min
    }

    /// Bottommost (largest) pixel row of the trace
    pub fn y_max(&self) -> i32 {
        self.y_max
    }

    /// Trigger point of the last pass, if one was found
    pub fn trigger_sample_index(&self) -> Option<usize> {
        self.trigger_sample_index
    }

    /// Frequency readout of the last pass, if one could be estimated
    pub fn frequency_hz(&self) -> Option<f64> {
        self.frequency_hz
    }

    pub fn color(&self) -> TraceColor {
        self.color
    }

    /// The two selector lines wired to this channel's AFE mux
    pub fn afe_select_pins(&self) -> (u8, u8) {
        self.afe_select_pins
    }
}
