//! Conversion rules and canonicalization to base units.

use std::collections::HashMap;
use std::fmt;

use tracing::debug;
use uf_core::{Exponential, UfError, UfResult};
use uf_metric::{Metric, Unit};

use crate::formula::Formula;
use crate::quantity::Quantity;

/// Maps a value in `from` to a value in `to`.
#[derive(Debug, Clone)]
pub struct Conversion {
    from: Metric,
    to: Metric,
    formula: Formula,
}

impl Conversion {
    pub fn new(from: Metric, to: Metric, formula: Formula) -> Self {
        Self { from, to, formula }
    }

    pub fn from(&self) -> &Metric {
        &self.from
    }

    pub fn to(&self) -> &Metric {
        &self.to
    }

    pub fn formula(&self) -> &Formula {
        &self.formula
    }

    /// Unit symbol of a single-axis `from` metric.
    pub fn from_unit(&self) -> Option<&str> {
        match self.from.axes() {
            [axis] if axis.exponent == 1 && axis.prefix.is_none() => Some(&axis.unit.symbol),
            _ => None,
        }
    }

    pub fn convert(&self, value: Exponential) -> Quantity {
        Quantity::new(self.formula.evaluate(value), self.to.clone())
    }

    /// Convert a quantity whose prefix-free metric is `from`.
    pub fn apply(&self, quantity: &Quantity) -> UfResult<Quantity> {
        let base = quantity.unprefixed();
        if base.metric != self.from {
            return Err(UfError::DimensionMismatch {
                left: quantity.metric.symbols(),
                right: self.from.symbols(),
            });
        }
        Ok(self.convert(base.value))
    }
}

impl fmt::Display for Conversion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ==> {} : {}", self.from, self.to, self.formula)
    }
}

/// Rules in insertion order, looked up by their `from` unit.
#[derive(Debug, Clone, Default)]
pub struct Conversions {
    rules: Vec<Conversion>,
    by_unit: HashMap<String, usize>,
}

impl Conversions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a rule. Only the first rule for a unit is ever looked up.
    pub fn add(&mut self, conversion: Conversion) -> UfResult<()> {
        let unit = conversion
            .from_unit()
            .ok_or_else(|| {
                UfError::definition(format!(
                    "conversion source '{}' must be a single unprefixed unit",
                    conversion.from
                ))
            })?
            .to_string();
        self.by_unit.entry(unit).or_insert(self.rules.len());
        self.rules.push(conversion);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Conversion> {
        self.rules.iter()
    }

    /// The rules lookups can reach: the first one per unit.
    pub(crate) fn active(&self) -> impl Iterator<Item = &Conversion> {
        self.rules
            .iter()
            .enumerate()
            .filter(|(i, c)| c.from_unit().and_then(|u| self.by_unit.get(u)) == Some(i))
            .map(|(_, c)| c)
    }

    pub fn find(&self, unit: &Unit) -> Option<&Conversion> {
        self.find_symbol(&unit.symbol)
    }

    pub fn find_symbol(&self, symbol: &str) -> Option<&Conversion> {
        self.by_unit.get(symbol).map(|&i| &self.rules[i])
    }

    pub fn find_metric(&self, from: &Metric) -> Option<&Conversion> {
        self.rules.iter().find(|c| &c.from == from)
    }

    /// One substitution pass over every axis. `None` when nothing changed.
    fn substitute(&self, quantity: &Quantity) -> Option<Quantity> {
        let mut value = quantity.value;
        let mut axes = Vec::with_capacity(quantity.metric.axes().len());
        let mut modified = false;

        for axis in quantity.metric.axes() {
            match self.find(&axis.unit) {
                Some(rule) => {
                    let part = rule.convert(Exponential::one());
                    value = value * part.value.powi(axis.exponent);
                    axes.extend(part.metric.multiply_exponents(axis.exponent).into_axes());
                    modified = true;
                }
                None => axes.push(axis.clone()),
            }
        }
        modified.then(|| Quantity::new(value, Metric::new(axes)))
    }

    /// Rewrite a quantity in prefix-free base units.
    ///
    /// Substitution repeats until a pass changes nothing, since rule targets
    /// may themselves be derived or prefixed.
    pub fn canonical(&self, quantity: &Quantity) -> UfResult<Quantity> {
        let stalled = || UfError::NonConvertible {
            metric: quantity.metric.symbols(),
        };
        let limit = self.rules.len() + 1;
        let mut current = quantity.unprefixed();
        let mut passes = 0;

        while let Some(next) = self.substitute(&current) {
            passes += 1;
            if passes > limit {
                return Err(stalled());
            }
            current = next.unprefixed();
            debug!(pass = passes, metric = %current.metric, "canonical substitution");
        }

        if !current.metric.is_in_base_units() {
            return Err(stalled());
        }
        Ok(Quantity::new(current.value, current.metric.reduced()))
    }

    /// Convert to `target`, which must be a (possibly prefixed) base-unit metric.
    pub fn convert(&self, quantity: &Quantity, target: &Metric) -> UfResult<Quantity> {
        let base_target = target.unprefixed();
        if !base_target.is_in_base_units() {
            return Err(UfError::NotImplemented {
                what: format!("conversion from {} to derived metric {}", quantity.metric, target),
            });
        }
        let canonical = self.canonical(quantity)?;
        if !canonical.metric.same_dimension(&base_target) {
            return Err(UfError::DimensionMismatch {
                left: quantity.metric.symbols(),
                right: target.symbols(),
            });
        }
        let value = canonical.value / target.prefix_scale();
        Ok(Quantity::new(value, target.clone()))
    }
}
