//! Unit system settings.

use serde::{Deserialize, Serialize};
use uf_core::{Decimal, UfError, UfResult};
use uf_metric::PrefixMatch;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SystemConfig {
    /// Units in the last written decimal that a parsed numeral may be off by.
    pub error_digit: Decimal,
    pub prefix_match: PrefixMatch,
    /// Reject rule sets with dangling targets or cycles at build time.
    pub validate_graph: bool,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            error_digit: Decimal::ONE,
            prefix_match: PrefixMatch::default(),
            validate_graph: true,
        }
    }
}

impl SystemConfig {
    pub fn validate(&self) -> UfResult<()> {
        if self.error_digit <= Decimal::ZERO {
            return Err(UfError::definition(format!(
                "error digit must be positive, got {}",
                self.error_digit
            )));
        }
        Ok(())
    }
}
