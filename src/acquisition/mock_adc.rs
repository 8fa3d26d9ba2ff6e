//! Mock ADC for testing without acquisition hardware
//!
//! Generates deterministic synthetic waveforms in volts and converts them
//! through a chosen AFE sub-range to counts, exactly as the real front end
//! would. Each `fill` restarts the waveform at its configured phase, so
//! repeated passes over an unchanged configuration capture identical
//! buffers, which is what trigger-stability tests need.
//!
//! # Waveforms
//!
//! - [`WaveformPattern::Constant`] - Fixed voltage (flat trace)
//! - [`WaveformPattern::Sine`] - Sinusoid with frequency/amplitude/offset
//! - [`WaveformPattern::Square`] - Square wave with configurable duty cycle
//! - [`WaveformPattern::Sawtooth`] - Linear ramp, instant flyback
//! - [`WaveformPattern::Triangle`] - Symmetric up/down ramp
//!
//! Optional noise comes from a small deterministic PRNG, no external
//! dependency.

use crate::error::{Result, ScopeError};
use crate::tables::{AfeRange, RangeTable};
use crate::types::AdcCount;
use std::f64::consts::PI;

/// Pattern for generating mock waveforms, all values in volts
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WaveformPattern {
    /// Constant voltage
    Constant(f64),
    /// Sine wave
    Sine {
        frequency: f64,
        amplitude: f64,
        offset: f64,
    },
    /// Square wave; `duty` is the high fraction of each period
    Square {
        frequency: f64,
        amplitude: f64,
        offset: f64,
        duty: f64,
    },
    /// Rising ramp with instant flyback
    Sawtooth {
        frequency: f64,
        amplitude: f64,
        offset: f64,
    },
    /// Symmetric triangle
    Triangle {
        frequency: f64,
        amplitude: f64,
        offset: f64,
    },
}

impl Default for WaveformPattern {
    fn default() -> Self {
        WaveformPattern::Sine {
            frequency: 1000.0,
            amplitude: 1.0,
            offset: 0.0,
        }
    }
}

impl WaveformPattern {
    /// Waveform voltage at time `t` seconds from the capture start
    pub fn voltage_at(&self, t: f64) -> f64 {
        match *self {
            WaveformPattern::Constant(v) => v,
            WaveformPattern::Sine {
                frequency,
                amplitude,
                offset,
            } => offset + amplitude * (2.0 * PI * frequency * t).sin(),
            WaveformPattern::Square {
                frequency,
                amplitude,
                offset,
                duty,
            } => {
                let phase = (t * frequency).fract();
                if phase < duty {
                    offset + amplitude
                } else {
                    offset - amplitude
                }
            }
            WaveformPattern::Sawtooth {
                frequency,
                amplitude,
                offset,
            } => offset + amplitude * (2.0 * (t * frequency).fract() - 1.0),
            WaveformPattern::Triangle {
                frequency,
                amplitude,
                offset,
            } => {
                let phase = (t * frequency).fract();
                let ramp = if phase < 0.5 {
                    4.0 * phase - 1.0
                } else {
                    3.0 - 4.0 * phase
                };
                offset + amplitude * ramp
            }
        }
    }
}

/// Configuration of one mock channel
#[derive(Debug, Clone, Copy)]
pub struct MockChannelConfig {
    /// Waveform generated on this channel
    pub pattern: WaveformPattern,
    /// AFE sub-range the voltages are converted through
    pub afe_range_index: usize,
    /// Phase offset in seconds applied to every capture
    pub start_phase: f64,
    /// Peak noise voltage added to every sample (0.0 = clean)
    pub noise_amplitude: f64,
}

impl MockChannelConfig {
    /// Clean waveform on the given sub-range
    pub fn new(pattern: WaveformPattern, afe_range_index: usize) -> Self {
        Self {
            pattern,
            afe_range_index,
            start_phase: 0.0,
            noise_amplitude: 0.0,
        }
    }

    /// Add deterministic noise to the generated samples
    pub fn with_noise(mut self, amplitude: f64) -> Self {
        self.noise_amplitude = amplitude;
        self
    }

    /// Start every capture at the given phase offset, in seconds
    pub fn with_start_phase(mut self, seconds: f64) -> Self {
        self.start_phase = seconds;
        self
    }
}

/// Synthetic-waveform acquisition source
#[derive(Debug, Clone, Default)]
pub struct MockAdc {
    channels: Vec<Option<MockChannelConfig>>,
    noise_state: u64,
}

impl MockAdc {
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure the waveform generated on a channel
    pub fn with_channel(mut self, channel: usize, config: MockChannelConfig) -> Self {
        if self.channels.len() <= channel {
            self.channels.resize(channel + 1, None);
        }
        self.channels[channel] = Some(config);
        self
    }

    fn channel(&self, channel: usize) -> Result<(MockChannelConfig, &'static AfeRange)> {
        let config = self
            .channels
            .get(channel)
            .copied()
            .flatten()
            .ok_or_else(|| {
                ScopeError::Acquisition(format!("mock channel {} not configured", channel))
            })?;
        let range = RangeTable::get(config.afe_range_index)?;
        Ok((config, range))
    }

    // xorshift step; deterministic and good enough for test noise
    fn noise(&mut self) -> f64 {
        self.noise_state = self
            .noise_state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        let bits = (self.noise_state >> 33) as u32;
        bits as f64 / u32::MAX as f64 - 0.5
    }
}

impl super::SampleSource for MockAdc {
    fn fill(&mut self, channel: usize, sample_rate: u32, buf: &mut [AdcCount]) -> Result<()> {
        if sample_rate == 0 {
            return Err(ScopeError::Acquisition("sample rate is zero".to_string()));
        }
        let (config, range) = self.channel(channel)?;
        let dt = 1.0 / sample_rate as f64;
        for (i, slot) in buf.iter_mut().enumerate() {
            let t = config.start_phase + i as f64 * dt;
            let mut volts = config.pattern.voltage_at(t);
            if config.noise_amplitude > 0.0 {
                volts += self.noise() * 2.0 * config.noise_amplitude;
            }
            *slot = range.volts_to_count(volts);
        }
        Ok(())
    }
}
