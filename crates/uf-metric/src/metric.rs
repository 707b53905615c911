//! Compound units as ordered lists of prefixed, powered axes.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::{Div, Mul};
use std::sync::Arc;

use uf_core::Exponential;

use crate::unit::{Prefix, Unit};

/// One `prefix? unit ^ exponent` factor of a metric.
#[derive(Debug, Clone)]
pub struct Axis {
    pub prefix: Option<Arc<Prefix>>,
    pub unit: Arc<Unit>,
    pub exponent: i32,
}

impl Axis {
    pub fn new(prefix: Option<Arc<Prefix>>, unit: Arc<Unit>, exponent: i32) -> Self {
        Self {
            prefix,
            unit,
            exponent,
        }
    }

    /// A zero exponent contributes nothing and is dropped on reduction.
    pub fn is_void(&self) -> bool {
        self.exponent == 0
    }

    /// Prefixed symbol without the exponent (`kg`).
    pub fn symbol(&self) -> String {
        match &self.prefix {
            Some(p) => format!("{}{}", p.symbol, self.unit.symbol),
            None => self.unit.symbol.clone(),
        }
    }

    /// Expression form (`kg`, `s-2`).
    pub fn symbols(&self) -> String {
        if self.exponent == 1 {
            self.symbol()
        } else {
            format!("{}{}", self.symbol(), self.exponent)
        }
    }

    pub fn mergeable(&self, other: &Axis) -> bool {
        self.unit.symbol == other.unit.symbol
            && self.prefix.as_ref().map(|p| &p.symbol) == other.prefix.as_ref().map(|p| &p.symbol)
    }

    pub fn unprefixed(&self) -> Axis {
        Axis::new(None, Arc::clone(&self.unit), self.exponent)
    }

    /// Scale removed by stripping the prefix: `factor ^ exponent`.
    pub fn prefix_scale(&self) -> Exponential {
        match &self.prefix {
            Some(p) => p.factor.powi(self.exponent),
            None => Exponential::one(),
        }
    }

    fn with_exponent(&self, exponent: i32) -> Axis {
        Axis::new(self.prefix.clone(), Arc::clone(&self.unit), exponent)
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.exponent {
            0 => f.write_str("1"),
            1 => f.write_str(&self.symbol()),
            n => write!(f, "{}^{}", self.symbol(), n),
        }
    }
}

/// An ordered product of axes.
///
/// Metrics compare by dimension and scale: the reduced, prefix-free axes must
/// match and so must the total prefix scale. `kg` and `g` differ while `km.mm`
/// equals `m2`.
#[derive(Debug, Clone, Default)]
pub struct Metric {
    axes: Vec<Axis>,
}

impl Metric {
    pub fn new(axes: Vec<Axis>) -> Self {
        Self { axes }
    }

    pub fn dimensionless() -> Self {
        Self::default()
    }

    pub fn from_axis(axis: Axis) -> Self {
        Self { axes: vec![axis] }
    }

    pub fn axes(&self) -> &[Axis] {
        &self.axes
    }

    pub fn into_axes(self) -> Vec<Axis> {
        self.axes
    }

    pub fn is_dimless(&self) -> bool {
        self.reduced().axes.is_empty()
    }

    pub fn multiply(&self, other: &Metric) -> Metric {
        let mut axes = self.axes.clone();
        axes.extend(other.axes.iter().cloned());
        Metric::new(axes).reduced()
    }

    pub fn divide(&self, other: &Metric) -> Metric {
        self.multiply(&other.multiply_exponents(-1))
    }

    pub fn multiply_exponents(&self, n: i32) -> Metric {
        Metric::new(
            self.axes
                .iter()
                .map(|a| a.with_exponent(a.exponent.saturating_mul(n)))
                .collect(),
        )
    }

    /// Merge axes sharing unit and prefix, drop void and unity axes, and sort
    /// by rendered axis text.
    pub fn reduced(&self) -> Metric {
        let mut merged: Vec<Axis> = Vec::with_capacity(self.axes.len());
        for axis in &self.axes {
            match merged.iter_mut().find(|m| m.mergeable(axis)) {
                Some(m) => m.exponent = m.exponent.saturating_add(axis.exponent),
                None => merged.push(axis.clone()),
            }
        }
        merged.retain(|a| !a.is_void() && !a.unit.is_unity());
        merged.sort_by_cached_key(|a| a.to_string());
        Metric::new(merged)
    }

    pub fn unprefixed(&self) -> Metric {
        Metric::new(self.axes.iter().map(Axis::unprefixed).collect())
    }

    /// Product of every axis' prefix scale.
    pub fn prefix_scale(&self) -> Exponential {
        self.axes
            .iter()
            .filter(|a| a.prefix.is_some())
            .fold(Exponential::one(), |acc, a| acc * a.prefix_scale())
    }

    /// Rescale `value` for the prefix-free form of this metric.
    pub fn unprefix(&self, value: Exponential) -> Exponential {
        if self.axes.iter().any(|a| a.prefix.is_some()) {
            value * self.prefix_scale()
        } else {
            value
        }
    }

    pub fn is_in_base_units(&self) -> bool {
        self.axes.iter().all(|a| a.unit.is_base())
    }

    /// Same units and exponents once prefixes are stripped, regardless of scale.
    pub fn same_dimension(&self, other: &Metric) -> bool {
        self.dimension_key() == other.dimension_key()
    }

    /// Expression form, axes joined by `.` (`kg.m.s-2`).
    pub fn symbols(&self) -> String {
        self.axes
            .iter()
            .map(Axis::symbols)
            .collect::<Vec<_>>()
            .join(".")
    }

    /// Dimensions of the prefix-free reduced form (`mass^1.length^1.time^-2`).
    /// Units without a dimension tag contribute their symbol.
    pub fn dimension_text(&self) -> String {
        self.unprefixed()
            .reduced()
            .axes
            .iter()
            .map(|a| {
                let dim = a.unit.dimension.as_deref().unwrap_or(&a.unit.symbol);
                format!("{dim}^{}", a.exponent)
            })
            .collect::<Vec<_>>()
            .join(".")
    }

    /// Exponents per unit symbol, keyed after stripping prefixes and reducing.
    fn dimension_key(&self) -> Vec<(String, i32)> {
        self.unprefixed()
            .reduced()
            .axes
            .iter()
            .map(|a| (a.unit.symbol.clone(), a.exponent))
            .collect()
    }
}

impl PartialEq for Metric {
    fn eq(&self, other: &Self) -> bool {
        self.dimension_key() == other.dimension_key()
            && self.prefix_scale() == other.prefix_scale()
    }
}

impl Eq for Metric {}

impl Hash for Metric {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.dimension_key().hash(state);
        let scale = self.prefix_scale();
        scale.significand().normalize().hash(state);
        scale.exponent().hash(state);
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.symbols())
    }
}

impl Mul for &Metric {
    type Output = Metric;

    fn mul(self, rhs: &Metric) -> Metric {
        self.multiply(rhs)
    }
}

impl Div for &Metric {
    type Output = Metric;

    fn div(self, rhs: &Metric) -> Metric {
        self.divide(rhs)
    }
}
