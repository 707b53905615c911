//! uf-metric: units, prefixes and the dimensional algebra over them.
//!
//! Provides:
//! - unit (Unit / Prefix descriptors)
//! - metric (Axis / Metric algebra, reduction and prefix stripping)
//! - parser (unit expression → signed unary terms)
//! - registry (symbol lookup and Metric assembly)

pub mod metric;
pub mod parser;
pub mod registry;
pub mod unit;

pub use metric::{Axis, Metric};
pub use parser::{Operator, Token, Unary, to_unary_tokens};
pub use registry::{PrefixMatch, UnitRegistry};
pub use unit::{Prefix, UNITY_SYMBOL, Unit};
