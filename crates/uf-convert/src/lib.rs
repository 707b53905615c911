//! uf-convert: quantities and their conversion to canonical base units.
//!
//! Provides:
//! - quantity (value + metric with dimension checked arithmetic)
//! - formula (small interpreted expression tree for conversion rules)
//! - conversion (rules, canonicalization and base-unit conversion)
//! - records / config (plain inputs for building a unit system)
//! - system (SystemOfUnits façade and its builder)

pub mod config;
pub mod conversion;
pub mod formula;
pub mod quantity;
pub mod records;
pub mod system;

mod validate;

pub use config::SystemConfig;
pub use conversion::{Conversion, Conversions};
pub use formula::Formula;
pub use quantity::Quantity;
pub use records::{ConversionRecord, PrefixRecord, UnitRecord, UnitSystemRecords};
pub use system::{SystemBuilder, SystemOfUnits};
