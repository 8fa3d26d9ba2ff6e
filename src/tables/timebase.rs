//! Timebase table: time/div → sample rate and pixel stretch
//!
//! Each entry fixes how a capture maps onto the horizontal axis. The sample
//! rate cannot exceed 1 MS/s (aliasing), so for short time/div settings the
//! rate saturates and the pixels drawn per sample are stretched instead.
//! Every entry must satisfy, for the geometry it was built for:
//!
//! - `sample_rate <= 1_000_000`
//! - `sample_rate * time_per_div` is a whole number of samples per division
//! - samples per division × pixels per sample == pixels per division
//!
//! The combinations below divide without remainder for a `pix_div` of
//! 60 or 80; any future entry has to be chosen with the same care to avoid
//! integer-division surprises.

use crate::config::{DisplayGeometry, SUPPORTED_PIX_DIV};
use crate::error::{Result, ScopeError};
use serde::{Deserialize, Serialize};

/// Maximum sample rate before aliasing sets in (samples/sec)
pub const MAX_SAMPLE_RATE: u32 = 1_000_000;

/// Number of timebase settings
pub const TIMEBASE_LEN: usize = 10;

/// Time/div values, in microseconds, from fastest to slowest sweep
const TIME_PER_DIV_US: [u32; TIMEBASE_LEN] =
    [10, 20, 50, 100, 200, 500, 1000, 2000, 5000, 10000];

/// One timebase setting
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimebaseEntry {
    /// Time per division in microseconds
    pub time_per_div_us: f64,
    /// ADC sample rate in samples per second
    pub sample_rate: u32,
    /// Horizontal pixels drawn per sample
    pub pixels_per_sample: u32,
}

impl TimebaseEntry {
    /// Seconds of signal between two adjacent samples
    pub fn seconds_per_sample(&self) -> f64 {
        1.0 / self.sample_rate as f64
    }

    /// Whole samples acquired per horizontal division
    pub fn samples_per_div(&self) -> u32 {
        (self.sample_rate as u64 * self.time_per_div_us as u64 / 1_000_000) as u32
    }

    /// Human-readable setting, e.g. "50 µs/div" or "2 ms/div"
    pub fn label(&self) -> String {
        let us = self.time_per_div_us;
        if us >= 1000.0 {
            format!("{} ms/div", us / 1000.0)
        } else {
            format!("{} µs/div", us)
        }
    }
}

/// Immutable table of timebase settings for one display geometry
#[derive(Debug, Clone)]
pub struct TimebaseTable {
    entries: Vec<TimebaseEntry>,
    pix_div: u32,
}

impl TimebaseTable {
    /// Build and validate the table for the given pixels-per-division
    pub fn new(pix_div: u32) -> Result<Self> {
        if !SUPPORTED_PIX_DIV.contains(&pix_div) {
            return Err(ScopeError::Config(format!(
                "unsupported pix_div {} (supported: {:?})",
                pix_div, SUPPORTED_PIX_DIV
            )));
        }

        let entries = TIME_PER_DIV_US
            .iter()
            .map(|&t_div| {
                // Saturate the rate at 1 MS/s and stretch pixels instead.
                // The 50 µs entry needs pix_div/50 pixels per sample, which
                // is not integral for either supported pix_div, so it runs
                // at the 100 µs rate with a 2-pixel stretch.
                let (sample_rate, pixels_per_sample) = match t_div {
                    10 | 20 => (MAX_SAMPLE_RATE, pix_div / t_div),
                    50 => (MAX_SAMPLE_RATE / 100 * pix_div, 2),
                    _ => (MAX_SAMPLE_RATE / t_div * pix_div, 1),
                };
                TimebaseEntry {
                    time_per_div_us: t_div as f64,
                    sample_rate,
                    pixels_per_sample,
                }
            })
            .collect();

        let table = Self { entries, pix_div };
        table.validate()?;
        debug_assert!(table.validate().is_ok());
        Ok(table)
    }

    /// Build the table for a geometry
    pub fn for_geometry(geometry: &DisplayGeometry) -> Result<Self> {
        Self::new(geometry.pix_div)
    }

    /// Look up an entry, failing with `OutOfRange` on a bad index
    pub fn get(&self, index: usize) -> Result<&TimebaseEntry> {
        self.entries.get(index).ok_or(ScopeError::OutOfRange {
            table: "timebase",
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
    pub fn iter(&self) -> impl Iterator<Item = &TimebaseEntry> {
        self.entries.iter()
    }

    /// The pixels-per-division this table was built for
    pub fn pix_div(&self) -> u32 {
        self.pix_div
    }

    /// Check every entry against the divisibility invariants
    ///
    /// Violations are configuration defects, not runtime conditions: the
    /// table is checked at construction and the engine refuses to start on
    /// a bad one.
    pub fn validate(&self) -> Result<()> {
        for (i, e) in self.entries.iter().enumerate() {
            if e.sample_rate > MAX_SAMPLE_RATE {
                return Err(ScopeError::Config(format!(
                    "timebase entry {}: sample rate {} exceeds {} (aliasing)",
                    i, e.sample_rate, MAX_SAMPLE_RATE
                )));
            }
            let t_div_us = e.time_per_div_us as u64;
            if (e.sample_rate as u64 * t_div_us) % 1_000_000 != 0 {
                return Err(ScopeError::Config(format!(
                    "timebase entry {}: non-integral samples per division",
                    i
                )));
            }
            let samples_per_div = e.sample_rate as u64 * t_div_us / 1_000_000;
            if samples_per_div * e.pixels_per_sample as u64 != self.pix_div as u64 {
                return Err(ScopeError::Config(format!(
                    "timebase entry {}: {} samples/div x {} px/sample != {} px/div",
                    i, samples_per_div, e.pixels_per_sample, self.pix_div
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_valid_for_all_supported_pix_div() {
        for &pix_div in &SUPPORTED_PIX_DIV {
            let table = TimebaseTable::new(pix_div).expect("table should build");
            assert_eq!(table.len(), TIMEBASE_LEN);
            table.validate().expect("table should validate");
        }
    }

    #[test]
    fn test_unsupported_pix_div_rejected() {
        assert!(TimebaseTable::new(100).is_err());
        assert!(TimebaseTable::new(0).is_err());
    }

    #[test]
    fn test_fast_entries_stretch_pixels() {
        let table = TimebaseTable::new(80).unwrap();
        let e = table.get(0).unwrap();
        assert_eq!(e.sample_rate, 1_000_000);
        assert_eq!(e.pixels_per_sample, 8);

        let e = table.get(2).unwrap();
        assert_eq!(e.sample_rate, 800_000);
        assert_eq!(e.pixels_per_sample, 2);
    }

    #[test]
    fn test_reference_entry_one_ms() {
        // 1 ms/div at pix_div 80 runs at 80 kS/s with no pixel stretch
        let table = TimebaseTable::new(80).unwrap();
        let e = table.get(6).unwrap();
        assert_eq!(e.time_per_div_us, 1000.0);
        assert_eq!(e.sample_rate, 80_000);
        assert_eq!(e.pixels_per_sample, 1);
        assert_eq!(e.samples_per_div(), 80);
    }

    #[test]
    fn test_slowest_entry() {
        let table = TimebaseTable::new(60).unwrap();
        let e = table.get(9).unwrap();
        assert_eq!(e.time_per_div_us, 10_000.0);
        assert_eq!(e.sample_rate, 6_000);
    }

    #[test]
    fn test_out_of_range_lookup() {
        let table = TimebaseTable::new(80).unwrap();
        let err = table.get(TIMEBASE_LEN).unwrap_err();
        assert!(matches!(err, ScopeError::OutOfRange { table: "timebase", .. }));
    }

    #[test]
    fn test_labels() {
        let table = TimebaseTable::new(80).unwrap();
        assert_eq!(table.get(2).unwrap().label(), "50 µs/div");
        assert_eq!(table.get(6).unwrap().label(), "1 ms/div");
        assert_eq!(table.get(9).unwrap().label(), "10 ms/div");
    }

    #[test]
    fn test_entries_monotonic_in_time_per_div() {
        let table = TimebaseTable::new(80).unwrap();
        for pair in table.entries.windows(2) {
            assert!(pair[0].time_per_div_us < pair[1].time_per_div_us);
        }
    }
}
