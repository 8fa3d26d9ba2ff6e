//! Builders for engine setups and synthetic capture buffers

use scopevis_rs::config::ScopeConfig;
use scopevis_rs::engine::{NullAfeSelector, ScopeEngine};
use scopevis_rs::tables::RangeTable;
use scopevis_rs::trigger::TriggerSlope;
use scopevis_rs::types::AdcCount;

/// Builds a `ScopeEngine` with a no-op AFE selector
pub struct EngineBuilder {
    config: ScopeConfig,
    timebase_index: Option<usize>,
    trigger: Option<(usize, TriggerSlope, f64)>,
}

impl EngineBuilder {
    pub fn new() -> Self {
        Self {
            config: ScopeConfig::default(),
            timebase_index: None,
            trigger: None,
        }
    }

    pub fn timebase(mut self, index: usize) -> Self {
        self.timebase_index = Some(index);
        self
    }

    pub fn trigger(mut self, channel: usize, slope: TriggerSlope, level: f64) -> Self {
        self.trigger = Some((channel, slope, level));
        self
    }

    pub fn build(self) -> ScopeEngine<NullAfeSelector> {
        let mut engine =
            ScopeEngine::new(self.config, NullAfeSelector).expect("engine should build");
        if let Some(index) = self.timebase_index {
            engine.select_timebase(index).expect("valid timebase index");
        }
        if let Some((channel, slope, level)) = self.trigger {
            engine.set_trigger(channel, slope, level).expect("valid trigger");
        }
        engine
    }
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Synthesize a square-wave capture in ADC counts
///
/// The wave starts low, swings between `low_volts` and `high_volts`
/// through the given AFE sub-range, and completes `period_samples` per
/// cycle (50% duty).
pub fn square_wave_counts(
    range_index: usize,
    low_volts: f64,
    high_volts: f64,
    period_samples: usize,
    len: usize,
) -> Vec<AdcCount> {
    let range = RangeTable::get(range_index).expect("valid range index");
    let low = range.volts_to_count(low_volts);
    let high = range.volts_to_count(high_volts);
    (0..len)
        .map(|i| {
            if (i / (period_samples / 2)) % 2 == 0 {
                low
            } else {
                high
            }
        })
        .collect()
}
