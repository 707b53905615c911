//! Unit and prefix descriptors.

use std::fmt;

use uf_core::Exponential;

/// Symbol of the dimensionless unit every registry carries.
pub const UNITY_SYMBOL: &str = "1";

/// A named unit. Units with a dimension tag are base units.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Unit {
    pub symbol: String,
    pub name: String,
    pub dimension: Option<String>,
}

impl Unit {
    pub fn base(
        name: impl Into<String>,
        symbol: impl Into<String>,
        dimension: impl Into<String>,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            name: name.into(),
            dimension: Some(dimension.into()),
        }
    }

    pub fn derived(name: impl Into<String>, symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            name: name.into(),
            dimension: None,
        }
    }

    pub fn unity() -> Self {
        Self::base("unity", UNITY_SYMBOL, "dimensionless")
    }

    pub fn is_base(&self) -> bool {
        self.dimension.is_some()
    }

    pub fn is_unity(&self) -> bool {
        self.symbol == UNITY_SYMBOL
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.symbol)
    }
}

/// A multiplicative prefix such as `k` (10^3).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prefix {
    pub symbol: String,
    pub name: String,
    pub factor: Exponential,
}

impl Prefix {
    pub fn new(name: impl Into<String>, symbol: impl Into<String>, factor: Exponential) -> Self {
        Self {
            symbol: symbol.into(),
            name: name.into(),
            factor,
        }
    }
}

impl fmt::Display for Prefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.symbol)
    }
}
