//! Analog-front-end range table and voltage table
//!
//! The AFE conditions the input signal before the ADC and exposes four
//! selectable sub-ranges. Each sub-range maps its `[v_min, v_max]` span onto
//! the full ADC count range, so the count corresponding to 0 V (the zero
//! offset) differs between sub-ranges: the wider ranges sit asymmetrically
//! around ground and carry a different sign offset than the narrow ones.
//!
//! The voltage table maps each volts/div setting to the sub-range whose span
//! covers the visible screen at that scale, together with the derived
//! pixel-per-count factor used by [`crate::channel::ChannelState::to_pixel_y`].
//!
//! Trigger levels and the hysteresis dead-band are tabulated per sub-range:
//! the hysteresis is a fixed fraction of full scale, so the usable band is
//! range-relative, not a fixed voltage.

use crate::config::DisplayGeometry;
use crate::error::{Result, ScopeError};
use crate::types::{AdcCount, ADC_RANGE};
use serde::{Deserialize, Serialize};

/// Number of selectable AFE sub-ranges
pub const AFE_RANGE_COUNT: usize = 4;

/// Hysteresis dead-band as a fraction of a sub-range's full scale
pub const HYSTERESIS_FRACTION: f64 = 0.025;

/// One selectable AFE sub-range
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AfeRange {
    /// Input voltage mapped to ADC count 0
    pub v_min: f64,
    /// Input voltage mapped to the top ADC count
    pub v_max: f64,
    /// ADC count corresponding to 0 V input
    pub zero_offset: u16,
    /// Default rising-edge trigger level (volts)
    pub rising_level: f64,
    /// Default falling-edge trigger level (volts)
    pub falling_level: f64,
    /// Hysteresis dead-band half-width (volts)
    pub hysteresis: f64,
}

/// The four AFE sub-ranges of the reference front end
///
/// The two wide ranges sit asymmetrically around ground (more positive
/// headroom), so their zero offsets differ from the symmetric narrow ones.
const RANGES: [AfeRange; AFE_RANGE_COUNT] = [
    AfeRange {
        v_min: -0.8,
        v_max: 0.8,
        zero_offset: 512,
        rising_level: 0.16,
        falling_level: -0.16,
        hysteresis: 0.04,
    },
    AfeRange {
        v_min: -1.6,
        v_max: 1.6,
        zero_offset: 512,
        rising_level: 0.32,
        falling_level: -0.32,
        hysteresis: 0.08,
    },
    AfeRange {
        v_min: -3.3,
        v_max: 4.95,
        zero_offset: 410,
        rising_level: 1.65,
        falling_level: 0.0,
        hysteresis: 0.20625,
    },
    AfeRange {
        v_min: -6.6,
        v_max: 9.9,
        zero_offset: 410,
        rising_level: 3.3,
        falling_level: 0.0,
        hysteresis: 0.4125,
    },
];

impl AfeRange {
    /// Full-scale span in volts
    pub fn span(&self) -> f64 {
        self.v_max - self.v_min
    }

    /// Midpoint of the range in volts
    pub fn midpoint(&self) -> f64 {
        (self.v_min + self.v_max) / 2.0
    }

    /// Convert a voltage to the nearest ADC count, clamped to the range
    pub fn volts_to_count(&self, volts: f64) -> AdcCount {
        let count = ((volts - self.v_min) / self.span() * ADC_RANGE as f64).round();
        count.clamp(0.0, (ADC_RANGE - 1) as f64) as AdcCount
    }

    /// Convert an ADC count to the voltage at its center
    pub fn count_to_volts(&self, count: AdcCount) -> f64 {
        self.v_min + count as f64 / ADC_RANGE as f64 * self.span()
    }

    /// Clamp a trigger level into this range's usable band
    ///
    /// The usable band keeps a full hysteresis width clear of both ends so
    /// the detector can still arm and fire.
    pub fn clamp_level(&self, level: f64) -> f64 {
        level.clamp(self.v_min + self.hysteresis, self.v_max - self.hysteresis)
    }

    /// Check this range against the table invariants
    pub fn validate(&self) -> Result<()> {
        if self.v_min >= self.v_max {
            return Err(ScopeError::Config(format!(
                "AFE range [{}, {}] is empty",
                self.v_min, self.v_max
            )));
        }
        let expected = (-self.v_min / self.span() * ADC_RANGE as f64).round();
        if self.zero_offset as f64 != expected {
            return Err(ScopeError::Config(format!(
                "AFE range [{}, {}]: zero offset {} should be {}",
                self.v_min, self.v_max, self.zero_offset, expected
            )));
        }
        if !(self.falling_level < self.rising_level && self.rising_level < self.v_max) {
            return Err(ScopeError::Config(format!(
                "AFE range [{}, {}]: trigger levels out of order",
                self.v_min, self.v_max
            )));
        }
        if self.falling_level <= self.v_min {
            return Err(ScopeError::Config(format!(
                "AFE range [{}, {}]: falling level below range",
                self.v_min, self.v_max
            )));
        }
        if self.rising_level - self.hysteresis <= self.falling_level + self.hysteresis {
            return Err(ScopeError::Config(format!(
                "AFE range [{}, {}]: hysteresis bands overlap",
                self.v_min, self.v_max
            )));
        }
        Ok(())
    }
}

/// Lookup access to the static AFE sub-range table
pub struct RangeTable;

impl RangeTable {
    /// Look up a sub-range, failing with `OutOfRange` on a bad index
    pub fn get(index: usize) -> Result<&'static AfeRange> {
        RANGES.get(index).ok_or(ScopeError::OutOfRange {
            table: "afe-range",
            index,
            len: RANGES.len(),
        })
    }

    /// Number of sub-ranges
    pub fn len() -> usize {
        RANGES.len()
    }

    /// Check every sub-range against the table invariants
    pub fn validate() -> Result<()> {
        for range in &RANGES {
            range.validate()?;
        }
        Ok(())
    }
}

/// One volts/div setting
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VoltageEntry {
    /// Volts per vertical division
    pub volts_per_div: f64,
    /// Vertical pixels per ADC count at this scale
    pub pixel_per_count: f64,
    /// Index of the AFE sub-range this scale runs on
    pub afe_range_index: usize,
}

impl VoltageEntry {
    /// Human-readable setting, e.g. "200 mV/div" or "1 V/div"
    pub fn label(&self) -> String {
        if self.volts_per_div < 1.0 {
            format!("{} mV/div", (self.volts_per_div * 1000.0).round())
        } else {
            format!("{} V/div", self.volts_per_div)
        }
    }
}

/// Volts/div to sub-range assignments, coarsest sub-range last
const VOLTS_PER_DIV: [(f64, usize); 5] =
    [(0.1, 0), (0.2, 0), (0.5, 1), (1.0, 2), (2.0, 3)];

/// Immutable table of volts/div settings for one display geometry
#[derive(Debug, Clone)]
pub struct VoltageTable {
    entries: Vec<VoltageEntry>,
    vertical_divs: u32,
}

impl VoltageTable {
    /// Build and validate the table for the given geometry
    pub fn new(geometry: &DisplayGeometry) -> Result<Self> {
        let entries = VOLTS_PER_DIV
            .iter()
            .map(|&(volts_per_div, afe_range_index)| {
                let range = &RANGES[afe_range_index];
                VoltageEntry {
                    volts_per_div,
                    pixel_per_count: range.span() * geometry.pix_div as f64
                        / (ADC_RANGE as f64 * volts_per_div),
                    afe_range_index,
                }
            })
            .collect();

        let table = Self {
            entries,
            vertical_divs: geometry.vertical_divs,
        };
        table.validate()?;
        debug_assert!(table.validate().is_ok());
        Ok(table)
    }

    /// Look up an entry, failing with `OutOfRange` on a bad index
    pub fn get(&self, index: usize) -> Result<&VoltageEntry> {
        self.entries.get(index).ok_or(ScopeError::OutOfRange {
            table: "voltage",
            index,
            len: self.entries.len(),
        })
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table is empty (never true for a constructed table)
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over all entries in index order
    pub fn iter(&self) -> impl Iterator<Item = &VoltageEntry> {
        self.entries.iter()
    }

    /// Check every entry (and the sub-range table) against the invariants
    pub fn validate(&self) -> Result<()> {
        RangeTable::validate()?;
        for (i, e) in self.entries.iter().enumerate() {
            let range = RangeTable::get(e.afe_range_index)?;
            if e.pixel_per_count <= 0.0 {
                return Err(ScopeError::Config(format!(
                    "voltage entry {}: non-positive pixel per count",
                    i
                )));
            }
            // The sub-range must cover the whole visible screen at this
            // scale, otherwise the trace clips inside the grid.
            let visible_span = e.volts_per_div * self.vertical_divs as f64;
            if range.span() < visible_span {
                return Err(ScopeError::Config(format!(
                    "voltage entry {}: range span {} V cannot cover {} V of screen",
                    i,
                    range.span(),
                    visible_span
                )));
            }
        }
        Ok(())
    }
}
