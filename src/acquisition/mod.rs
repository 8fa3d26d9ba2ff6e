//! Acquisition seam between the core and the sampling hardware
//!
//! The ADC-sampling facility (DMA- or interrupt-driven on real hardware) is
//! a black box to this crate: the engine only requires something that can
//! fill a complete, stable buffer of counts for a channel at a requested
//! rate. Double-buffering against an in-progress conversion is that
//! facility's responsibility: the core is always handed a finished buffer
//! and never reads one concurrently being written.
//!
//! # Components
//!
//! - [`SampleSource`] - The trait acquisition hardware implements
//! - [`MockAdc`] - Synthetic-waveform source for tests (feature-gated)
//!
//! # Enabling the mock
//!
//! The mock source is only available when the `mock-adc` feature is
//! enabled:
//!
//! ```bash
//! cargo test --features mock-adc
//! ```

#[cfg(feature = "mock-adc")]
pub mod mock_adc;

#[cfg(feature = "mock-adc")]
pub use mock_adc::{MockAdc, MockChannelConfig, WaveformPattern};

use crate::error::Result;
use crate::types::AdcCount;

/// A facility that can fill sample buffers for the scope's channels
///
/// Implementations are synchronous from the core's point of view: `fill`
/// returns once `buf` holds one complete capture taken at `sample_rate`.
pub trait SampleSource {
    /// Fill `buf` with consecutive samples of `channel` taken at
    /// `sample_rate` samples per second
    fn fill(&mut self, channel: usize, sample_rate: u32, buf: &mut [AdcCount]) -> Result<()>;
}
