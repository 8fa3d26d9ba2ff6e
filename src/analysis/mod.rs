//! Signal analysis built on top of trigger detection
//!
//! Currently frequency estimation from consecutive trigger edges; the
//! module boundary keeps room for further derived measurements.

pub mod frequency;

pub use frequency::FrequencyEstimator;
