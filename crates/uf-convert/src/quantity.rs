//! A measured value in a metric.

use std::fmt;

use uf_core::{Exponential, UfError, UfResult};
use uf_metric::Metric;

#[derive(Debug, Clone, PartialEq)]
pub struct Quantity {
    pub value: Exponential,
    pub metric: Metric,
}

impl Quantity {
    pub fn new(value: Exponential, metric: Metric) -> Self {
        Self { value, metric }
    }

    pub fn dimensionless(value: Exponential) -> Self {
        Self::new(value, Metric::dimensionless())
    }

    pub fn is_dimless(&self) -> bool {
        self.metric.is_dimless()
    }

    pub fn is_in_base_units(&self) -> bool {
        self.metric.is_in_base_units()
    }

    /// Same quantity with every prefix folded into the value.
    pub fn unprefixed(&self) -> Quantity {
        Quantity::new(self.metric.unprefix(self.value), self.metric.unprefixed())
    }

    pub fn same_dimension(&self, other: &Quantity) -> bool {
        self.metric.same_dimension(&other.metric)
    }

    fn mismatch(&self, other: &Quantity) -> UfError {
        UfError::DimensionMismatch {
            left: self.metric.symbols(),
            right: other.metric.symbols(),
        }
    }

    /// Sum in the left operand's prefix-free metric.
    pub fn add(&self, other: &Quantity) -> UfResult<Quantity> {
        if !self.same_dimension(other) {
            return Err(self.mismatch(other));
        }
        let (a, b) = (self.unprefixed(), other.unprefixed());
        Ok(Quantity::new(a.value + b.value, a.metric))
    }

    /// Difference in the left operand's prefix-free metric.
    pub fn sub(&self, other: &Quantity) -> UfResult<Quantity> {
        if !self.same_dimension(other) {
            return Err(self.mismatch(other));
        }
        let (a, b) = (self.unprefixed(), other.unprefixed());
        Ok(Quantity::new(a.value - b.value, a.metric))
    }

    pub fn mul(&self, other: &Quantity) -> Quantity {
        Quantity::new(self.value * other.value, self.metric.multiply(&other.metric))
    }

    pub fn div(&self, other: &Quantity) -> Quantity {
        Quantity::new(self.value / other.value, self.metric.divide(&other.metric))
    }

    /// Equal metrics once prefixes are folded in, and mutually approximate
    /// values.
    pub fn approximates(&self, other: &Quantity) -> bool {
        let (a, b) = (self.unprefixed(), other.unprefixed());
        a.metric == b.metric && a.value.approximates(&b.value)
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.metric.axes().is_empty() {
            write!(f, "{}", self.value)
        } else {
            write!(f, "{} {}", self.value, self.metric)
        }
    }
}
