//! Acquisition/render controller
//!
//! [`ScopeEngine`] owns the scope's whole configuration state: the
//! validated tables, one [`ChannelState`] per input channel, the active
//! timebase selection, and the process-wide trigger configuration. The UI
//! layer drives the mutators; the renderer reads the query surface; the
//! engine itself never draws and never blocks.
//!
//! # Acquisition passes
//!
//! [`ScopeEngine::process_pass`] consumes one complete set of sample
//! buffers and runs to completion: trigger search on the trigger channel,
//! frequency estimation when a trigger was found, and pixel-extent updates
//! for every shown channel. Configuration changes are expected to land
//! between passes (see [`worker`]); nothing here suspends mid-scan.
//!
//! # Front-end switching
//!
//! Selecting a volts/div entry that lives on a different AFE sub-range has
//! a side effect outside the core: the [`AfeSelector`] collaborator is told
//! to switch the channel's front end. The collaborator is synchronous and
//! always succeeds from the core's point of view; hardware implementations
//! drive the channel's selector lines (see
//! [`ChannelState::afe_select_pins`]).

pub mod worker;

pub use worker::{PassMessage, ScopeBridge, ScopeCommand, ScopeWorker};

use crate::analysis::FrequencyEstimator;
use crate::channel::ChannelState;
use crate::config::ScopeConfig;
use crate::error::{Result, ScopeError};
use crate::tables::{RangeTable, TimebaseEntry, TimebaseTable, VoltageTable};
use crate::trigger::{TriggerConfig, TriggerDetector, TriggerSlope};
use crate::types::AdcCount;

/// Collaborator that physically switches an AFE sub-range
///
/// Invoked whenever a voltage selection moves a channel to a different
/// front-end sub-range, and once per channel at engine construction so the
/// hardware starts out matching the configuration.
#[cfg_attr(test, mockall::automock)]
pub trait AfeSelector {
    /// Switch `channel`'s front end to `range_index`
    fn select_afe_range(&mut self, channel: usize, range_index: usize);
}

/// No-op selector for embedders without switchable hardware
#[derive(Debug, Clone, Copy, Default)]
pub struct NullAfeSelector;

impl AfeSelector for NullAfeSelector {
    fn select_afe_range(&mut self, _channel: usize, _range_index: usize) {}
}

/// Result of one acquisition pass
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PassSummary {
    /// Sample index of the trigger point, if one was found
    pub trigger_sample_index: Option<usize>,
    /// Estimated signal frequency, if one could be derived
    pub frequency_hz: Option<f64>,
}

/// The signal-acquisition-to-display mapping core
pub struct ScopeEngine<S: AfeSelector> {
    config: ScopeConfig,
    timebases: TimebaseTable,
    voltages: VoltageTable,
    timebase_index: usize,
    channels: Vec<ChannelState>,
    trigger: TriggerConfig,
    estimator: FrequencyEstimator,
    selector: S,
}

impl<S: AfeSelector> ScopeEngine<S> {
    /// Build the engine, validating tables and configuration
    ///
    /// Fails on unsupported geometry, a bad initial timebase index, or any
    /// invalid channel configuration. On success the selector has been told
    /// the initial sub-range of every channel.
    pub fn new(config: ScopeConfig, mut selector: S) -> Result<Self> {
        if config.channels.is_empty() {
            return Err(ScopeError::Config("no channels configured".to_string()));
        }
        let timebases = TimebaseTable::for_geometry(&config.geometry)?;
        let voltages = VoltageTable::new(&config.geometry)?;
        timebases.get(config.timebase_index)?;

        let mut channels = Vec::with_capacity(config.channels.len());
        for (i, channel_config) in config.channels.iter().enumerate() {
            let state = ChannelState::new(channel_config, &voltages)?;
            let range_index = voltages.get(state.voltage_index())?.afe_range_index;
            selector.select_afe_range(i, range_index);
            channels.push(state);
        }

        let trigger_range =
            RangeTable::get(voltages.get(channels[0].voltage_index())?.afe_range_index)?;
        let trigger = TriggerConfig::new(trigger_range, config.geometry.width_px());

        tracing::info!(
            channels = channels.len(),
            timebase_index = config.timebase_index,
            "Scope engine ready"
        );

        Ok(Self {
            timebase_index: config.timebase_index,
            config,
            timebases,
            voltages,
            channels,
            trigger,
            estimator: FrequencyEstimator::new(),
            selector,
        })
    }

    // ==================== Configuration mutators ====================

    /// Select a timebase entry for subsequent passes
    pub fn select_timebase(&mut self, index: usize) -> Result<()> {
        self.timebases.get(index)?;
        self.timebase_index = index;
        tracing::debug!(index, label = %self.timebase_entry().label(), "Timebase selected");
        Ok(())
    }

    /// Select a volts/div entry for a channel
    ///
    /// Validates both indices before mutating anything. When the new entry
    /// lives on a different AFE sub-range, the selector collaborator is
    /// notified, and if the channel is the trigger source the trigger level
    /// is carried across proportionally.
    pub fn select_voltage(&mut self, channel: usize, index: usize) -> Result<()> {
        self.voltages.get(index)?;
        let old_range_index = {
            let state = self.channel(channel)?;
            self.voltages.get(state.voltage_index())?.afe_range_index
        };

        let count = self.channels.len();
        let state = self
            .channels
            .get_mut(channel)
            .ok_or(ScopeError::Channel { index: channel, count })?;
        let new_range_index = state.apply_voltage(index, &self.voltages)?;

        if new_range_index != old_range_index {
            tracing::debug!(channel, old_range_index, new_range_index, "AFE range switch");
            self.selector.select_afe_range(channel, new_range_index);
            if channel == self.trigger.channel {
                let old = RangeTable::get(old_range_index)?;
                let new = RangeTable::get(new_range_index)?;
                self.trigger.rescale_level(old, new);
                tracing::debug!(level = self.trigger.level, "Trigger level rescaled");
            }
        }
        Ok(())
    }

    /// Show or hide a channel's trace
    pub fn set_channel_shown(&mut self, channel: usize, shown: bool) -> Result<()> {
        self.channel_mut(channel)?.set_shown(shown);
        Ok(())
    }

    /// Move a channel's zero-volt line to the given pixel row
    pub fn set_y_offset(&mut self, channel: usize, y_offset: i32) -> Result<()> {
        self.channel_mut(channel)?.set_y_offset(y_offset);
        Ok(())
    }

    /// Reconfigure the trigger source, edge, and level
    ///
    /// The level is clamped into the usable band of the channel's active
    /// sub-range so the detector can always arm.
    pub fn set_trigger(&mut self, channel: usize, slope: TriggerSlope, level: f64) -> Result<()> {
        let state = self.channel(channel)?;
        let range = RangeTable::get(self.voltages.get(state.voltage_index())?.afe_range_index)?;
        self.trigger.channel = channel;
        self.trigger.slope = slope;
        self.trigger.level = range.clamp_level(level);
        tracing::debug!(channel, %slope, level = self.trigger.level, "Trigger configured");
        Ok(())
    }

    // ==================== Query surface ====================

    /// State of one channel
    pub fn channel(&self, index: usize) -> Result<&ChannelState> {
        let count = self.channels.len();
        self.channels
            .get(index)
            .ok_or(ScopeError::Channel { index, count })
    }

    /// All channel states, in channel order
    pub fn channels(&self) -> &[ChannelState] {
        &self.channels
    }

    /// The active timebase entry
    pub fn timebase_entry(&self) -> &TimebaseEntry {
        // The index was validated when it was selected
        self.timebases
            .get(self.timebase_index)
            .expect("validated timebase index")
    }

    /// Index of the active timebase entry
    pub fn timebase_index(&self) -> usize {
        self.timebase_index
    }

    /// The timebase table (for menu display)
    pub fn timebases(&self) -> &TimebaseTable {
        &self.timebases
    }

    /// The voltage table (for menu display)
    pub fn voltages(&self) -> &VoltageTable {
        &self.voltages
    }

    /// The active trigger configuration
    pub fn trigger(&self) -> &TriggerConfig {
        &self.trigger
    }

    /// The configuration the engine was built from
    pub fn config(&self) -> &ScopeConfig {
        &self.config
    }

    /// Samples one pass captures per channel at the active timebase
    pub fn samples_per_pass(&self) -> usize {
        let entry = self.timebase_entry();
        (self.config.geometry.width_px() / entry.pixels_per_sample) as usize
    }

    // ==================== Acquisition ====================

    /// Run one acquisition pass over a complete set of channel buffers
    ///
    /// `buffers` holds one stable buffer per configured channel. The whole
    /// pass runs with the parameters in effect when it starts; nothing in
    /// it suspends or re-reads configuration.
    pub fn process_pass(&mut self, buffers: &[Vec<AdcCount>]) -> Result<PassSummary> {
        if buffers.len() != self.channels.len() {
            return Err(ScopeError::Acquisition(format!(
                "expected {} channel buffers, got {}",
                self.channels.len(),
                buffers.len()
            )));
        }

        let summary = match self.trigger.slope {
            TriggerSlope::Off => PassSummary {
                trigger_sample_index: None,
                frequency_hz: None,
            },
            _ => {
                let state = self.channel(self.trigger.channel)?;
                let range = RangeTable::get(
                    self.voltages.get(state.voltage_index())?.afe_range_index,
                )?;
                let detector = TriggerDetector::new(&self.trigger, range);
                let buffer = &buffers[self.trigger.channel];
                let timebase = *self.timebase_entry();

                match detector.scan(buffer) {
                    Some(index) => PassSummary {
                        trigger_sample_index: Some(index),
                        frequency_hz: self
                            .estimator
                            .estimate(&detector, buffer, index, &timebase),
                    },
                    None => {
                        tracing::trace!("No qualifying trigger crossing this pass");
                        PassSummary {
                            trigger_sample_index: None,
                            frequency_hz: None,
                        }
                    }
                }
            }
        };

        let trigger_channel = self.trigger.channel;
        for (i, state) in self.channels.iter_mut().enumerate() {
            if state.shown() {
                state.update_extents(&buffers[i]);
            }
            if i == trigger_channel {
                state.record_pass(summary.trigger_sample_index, summary.frequency_hz);
            }
        }

        Ok(summary)
    }

    fn channel_mut(&mut self, index: usize) -> Result<&mut ChannelState> {
        let count = self.channels.len();
        self.channels
            .get_mut(index)
            .ok_or(ScopeError::Channel { index, count })
    }
}
