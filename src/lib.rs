//! # ScopeVis-RS: Oscilloscope Acquisition Core
//!
//! The numeric mapping and trigger-detection engine of a digital
//! oscilloscope: raw ADC sample buffers in, pixel-space trace parameters,
//! a stable trigger point, and a frequency readout out. Rendering, touch
//! input, and persistence live in the embedding application; this crate
//! never draws and never blocks.
//!
//! ## Architecture
//!
//! - **Tables**: immutable timebase and voltage/AFE-range lookup tables,
//!   validated at construction against the divisibility and offset
//!   invariants that keep the pixel mapping exact
//! - **Engine**: owns per-channel state and the trigger configuration;
//!   runs one acquisition pass at a time to completion
//! - **Trigger**: two-threshold (hysteretic) edge detector; a scan arms on
//!   the far side of the dead-band before a level crossing qualifies
//! - **Analysis**: frequency estimation from the spacing of consecutive
//!   trigger edges
//! - **Acquisition**: the `SampleSource` seam to the sampling hardware,
//!   plus a feature-gated mock source (`mock-adc`) for tests
//! - **Worker**: optional thread loop applying configuration changes
//!   strictly between passes, over crossbeam channels
//!
//! ## Example
//!
//! ```ignore
//! use scopevis_rs::{
//!     config::ScopeConfig,
//!     engine::{NullAfeSelector, ScopeEngine},
//!     trigger::TriggerSlope,
//! };
//!
//! let mut engine = ScopeEngine::new(ScopeConfig::default(), NullAfeSelector)?;
//! engine.select_timebase(6)?;                          // 1 ms/div
//! engine.select_voltage(0, 3)?;                        // 1 V/div
//! engine.set_trigger(0, TriggerSlope::Rising, 0.825)?; // mid-range
//!
//! // One stable buffer per channel from the acquisition facility
//! let summary = engine.process_pass(&buffers)?;
//! if let Some(t0) = summary.trigger_sample_index {
//!     // Map counts to screen rows starting at the trigger point
//!     let ch = engine.channel(0)?;
//!     let y = ch.to_pixel_y(buffers[0][t0]);
//! }
//! ```

pub mod acquisition;
pub mod analysis;
pub mod channel;
pub mod config;
pub mod engine;
pub mod error;
pub mod tables;
pub mod trigger;
pub mod types;

// Re-export commonly used types
pub use channel::ChannelState;
pub use config::{ChannelConfig, DisplayGeometry, ScopeConfig};
pub use engine::{AfeSelector, NullAfeSelector, PassSummary, ScopeBridge, ScopeEngine, ScopeWorker};
pub use error::{Result, ScopeError};
pub use tables::{AfeRange, RangeTable, TimebaseEntry, TimebaseTable, VoltageEntry, VoltageTable};
pub use trigger::{TriggerConfig, TriggerDetector, TriggerSlope};
pub use types::{AdcCount, TraceColor, ADC_BITS, ADC_RANGE};
