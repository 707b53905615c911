//! uf-core: numeric foundation for unitflow.
//!
//! Contains:
//! - exponential (normalized significand × 10^exponent with uncertainty)
//! - decimal (text based precision and rounding helpers)
//! - error (shared error types)

pub mod decimal;
pub mod error;
pub mod exponential;

pub use error::{UfError, UfResult};
pub use exponential::{Exponential, MAX_EXPONENT};
pub use rust_decimal::Decimal;
