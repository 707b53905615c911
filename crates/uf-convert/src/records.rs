//! Plain definition records a unit system is built from.
//!
//! Numeric fields are strings so that catalog files keep exact decimal text.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrefixRecord {
    pub name: String,
    pub symbol: String,
    /// Multiplier as a numeral, e.g. `1e3`.
    pub factor: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitRecord {
    pub name: String,
    pub symbol: String,
    /// Present only on base units.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dimension: Option<String>,
}

/// `symbol = coefficient × formula`, where the formula is a unit expression
/// whose integer terms become numeric factors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionRecord {
    pub symbol: String,
    pub formula: String,
    #[serde(default = "default_coefficient")]
    pub coefficient: String,
}

fn default_coefficient() -> String {
    "1".to_string()
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitSystemRecords {
    #[serde(default)]
    pub prefixes: Vec<PrefixRecord>,
    #[serde(default)]
    pub units: Vec<UnitRecord>,
    #[serde(default)]
    pub conversions: Vec<ConversionRecord>,
}

impl UnitSystemRecords {
    pub fn is_empty(&self) -> bool {
        self.prefixes.is_empty() && self.units.is_empty() && self.conversions.is_empty()
    }
}
