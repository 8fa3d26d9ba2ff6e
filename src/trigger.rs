//! Hysteretic trigger detection
//!
//! The detector scans one acquisition buffer for a qualifying edge crossing
//! of the configured level. A single comparison level would re-fire on every
//! noise excursion around the threshold, so the detector uses two: it must
//! first *arm* by observing the signal a full hysteresis band beyond the
//! level on the far side, and only then does a crossing of the level itself
//! qualify. The first qualifying crossing wins; the scan never wraps.
//!
//! # State machine
//!
//! Each scan runs `Idle → Armed → Found`:
//!
//! - `Idle`: waiting for a sample at or below `level − hysteresis`
//!   (rising config; the falling config mirrors both comparisons)
//! - `Armed`: waiting for a sample at or above `level`
//! - `Found`: crossing index recorded, scan stops
//!
//! No crossing is an expected outcome, reported as `None`, and the renderer
//! is expected to freeze the previous frame rather than draw unaligned.

use crate::tables::AfeRange;
use crate::types::AdcCount;
use serde::{Deserialize, Serialize};

/// Edge direction the trigger fires on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TriggerSlope {
    /// Free-run: no trigger search, traces draw unaligned
    Off,
    /// Fire when the signal crosses the level going up
    #[default]
    Rising,
    /// Fire when the signal crosses the level going down
    Falling,
}

impl std::fmt::Display for TriggerSlope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TriggerSlope::Off => write!(f, "Off"),
            TriggerSlope::Rising => write!(f, "Rising"),
            TriggerSlope::Falling => write!(f, "Falling"),
        }
    }
}

/// Process-wide trigger configuration (single active trigger source)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TriggerConfig {
    /// Channel whose buffer is scanned
    pub channel: usize,
    /// Edge direction
    pub slope: TriggerSlope,
    /// Trigger level in volts, always inside the active range's usable band
    pub level: f64,
    /// Screen column the trigger sample is anchored to when rendering
    pub x_anchor: i32,
}

impl TriggerConfig {
    /// Default configuration for the given range and screen width
    pub fn new(range: &AfeRange, width_px: u32) -> Self {
        Self {
            channel: 0,
            slope: TriggerSlope::default(),
            level: range.rising_level,
            x_anchor: width_px as i32 / 2,
        }
    }

    /// Carry the level across an AFE sub-range switch
    ///
    /// The level is remembered as a relative position inside the active
    /// range, not an absolute voltage: switching ranges must never leave it
    /// outside the new displayable span. The rescaled level is clamped into
    /// the new range's usable band.
    pub fn rescale_level(&mut self, old: &AfeRange, new: &AfeRange) {
        let relative = (self.level - old.v_min) / old.span();
        self.level = new.clamp_level(new.v_min + relative * new.span());
    }
}

/// Scan state, advanced once per sample
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetectorState {
    /// Waiting for the signal to reach the arming threshold
    Idle,
    /// Armed; waiting for the level crossing
    Armed,
    /// Crossing found, scan complete
    Found,
}

/// Scans sample buffers for qualifying hysteretic edge crossings
///
/// The detector is built per pass from the trigger configuration and the
/// active sub-range; the volt-valued level and hysteresis are converted to
/// ADC counts once so the scan itself is integer comparisons.
#[derive(Debug, Clone, Copy)]
pub struct TriggerDetector {
    slope: TriggerSlope,
    level: i32,
    hysteresis: i32,
}

impl TriggerDetector {
    /// Build a detector for one scan
    pub fn new(config: &TriggerConfig, range: &AfeRange) -> Self {
        Self {
            slope: config.slope,
            level: range.volts_to_count(config.level) as i32,
            hysteresis: range.volts_to_count(range.v_min + range.hysteresis) as i32,
        }
    }

    /// The comparison level in ADC counts
    pub fn level_count(&self) -> i32 {
        self.level
    }

    /// The hysteresis band half-width in ADC counts
    pub fn hysteresis_counts(&self) -> i32 {
        self.hysteresis
    }

    /// Find the first qualifying crossing in the buffer
    ///
    /// Returns the sample index of the crossing, or `None` when the buffer
    /// holds no qualifying edge (expected condition, not a fault).
    pub fn scan(&self, samples: &[AdcCount]) -> Option<usize> {
        self.next_edge(samples, 0)
    }

    /// Find the first qualifying crossing at or after `start`
    ///
    /// The scan begins un-armed, so a signal already beyond the level at
    /// `start` must first return through the arming threshold. This is the
    /// rule the frequency estimator relies on to locate the *next* edge
    /// after a trigger point.
    pub fn next_edge(&self, samples: &[AdcCount], start: usize) -> Option<usize> {
        if self.slope == TriggerSlope::Off {
            return None;
        }

        let mut state = DetectorState::Idle;
        for (i, &sample) in samples.iter().enumerate().skip(start) {
            state = self.step(state, sample as i32);
            if state == DetectorState::Found {
                return Some(i);
            }
        }
        None
    }

    // One state-machine transition for one sample.
    fn step(&self, state: DetectorState, sample: i32) -> DetectorState {
        match (state, self.slope) {
            (DetectorState::Idle, TriggerSlope::Rising)
                if sample <= self.level - self.hysteresis =>
            {
                DetectorState::Armed
            }
            (DetectorState::Armed, TriggerSlope::Rising) if sample >= self.level => {
                DetectorState::Found
            }
            (DetectorState::Idle, TriggerSlope::Falling)
                if sample >= self.level + self.hysteresis =>
            {
                DetectorState::Armed
            }
            (DetectorState::Armed, TriggerSlope::Falling) if sample <= self.level => {
                DetectorState::Found
            }
            (state, _) => state,
        }
    }
}
