//! Frequency estimation from consecutive trigger edges
//!
//! Once a pass has a trigger point, the distance to the *next* qualifying
//! same-direction edge (located with the identical hysteresis rule the
//! trigger itself uses) is one signal period in samples. The active
//! timebase entry converts that to seconds, and the reciprocal is the
//! frequency readout.
//!
//! A buffer holding less than one full period after the trigger point
//! yields no estimate; the display shows a blank readout, never zero and
//! never a stale value. Successive estimates are independent: there is no
//! smoothing or averaging across passes.

use crate::tables::TimebaseEntry;
use crate::trigger::TriggerDetector;
use crate::types::AdcCount;

/// Estimates signal frequency from trigger edge spacing
#[derive(Debug, Clone, Copy, Default)]
pub struct FrequencyEstimator;

impl FrequencyEstimator {
    pub fn new() -> Self {
        Self
    }

    /// Estimate the frequency of the triggered signal, in Hz
    ///
    /// `trigger_index` is the qualifying crossing found by `detector` on
    /// this same buffer. Returns `None` when no second edge lies within the
    /// buffer (unknown frequency, expected condition).
    pub fn estimate(
        &self,
        detector: &TriggerDetector,
        samples: &[AdcCount],
        trigger_index: usize,
        timebase: &TimebaseEntry,
    ) -> Option<f64> {
        let next = detector.next_edge(samples, trigger_index + 1)?;
        let period_samples = next - trigger_index;
        if period_samples == 0 {
            return None;
        }
        let period_secs = period_samples as f64 * timebase.seconds_per_sample();
        Some(1.0 / period_secs)
    }
}
