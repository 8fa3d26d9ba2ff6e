//! Static lookup tables for timebase and voltage-range selection
//!
//! The scope's horizontal and vertical scales are discrete: the user steps
//! through tabulated time/div and volts/div settings, and every derived
//! number (sample rate, pixel stretch, pixel-per-count scale, front-end
//! sub-range) comes out of these tables. The tables are immutable after
//! construction; a handcrafted entry that violates the divisibility or
//! offset invariants is a latent rendering-corruption bug, so construction
//! validates and refuses bad tables outright.

pub mod afe;
pub mod timebase;

pub use afe::{AfeRange, RangeTable, VoltageEntry, VoltageTable, AFE_RANGE_COUNT};
pub use timebase::{TimebaseEntry, TimebaseTable, TIMEBASE_LEN};
