//! Symbol lookup for units and prefixes.

use std::collections::HashMap;
use std::sync::Arc;

use uf_core::{UfError, UfResult};

use crate::metric::{Axis, Metric};
use crate::parser::{Unary, to_unary_tokens};
use crate::unit::{Prefix, UNITY_SYMBOL, Unit};

/// How to choose between prefixes that all start a symbol.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum PrefixMatch {
    /// The prefix declared first wins.
    #[default]
    DeclarationOrder,
    /// The longest matching prefix wins.
    Longest,
}

/// Units keyed by symbol plus prefixes in declaration order.
///
/// Every registry contains the unity unit `1`.
#[derive(Debug, Clone)]
pub struct UnitRegistry {
    units: HashMap<String, Arc<Unit>>,
    prefixes: Vec<Arc<Prefix>>,
    prefix_index: HashMap<String, usize>,
    /// Distinct prefix symbol lengths in bytes, longest first.
    prefix_lengths: Vec<usize>,
    prefix_match: PrefixMatch,
}

impl Default for UnitRegistry {
    fn default() -> Self {
        Self::new(PrefixMatch::default())
    }
}

impl UnitRegistry {
    pub fn new(prefix_match: PrefixMatch) -> Self {
        let unity = Arc::new(Unit::unity());
        let mut units = HashMap::new();
        units.insert(unity.symbol.clone(), unity);
        Self {
            units,
            prefixes: Vec::new(),
            prefix_index: HashMap::new(),
            prefix_lengths: Vec::new(),
            prefix_match,
        }
    }

    pub fn prefix_match(&self) -> PrefixMatch {
        self.prefix_match
    }

    pub fn add_unit(&mut self, unit: Unit) -> UfResult<Arc<Unit>> {
        if self.units.contains_key(&unit.symbol) {
            return Err(UfError::definition(format!(
                "unit '{}' is declared twice",
                unit.symbol
            )));
        }
        let unit = Arc::new(unit);
        self.units.insert(unit.symbol.clone(), Arc::clone(&unit));
        Ok(unit)
    }

    pub fn add_prefix(&mut self, prefix: Prefix) -> UfResult<Arc<Prefix>> {
        if prefix.symbol.is_empty() || self.prefix_index.contains_key(&prefix.symbol) {
            return Err(UfError::definition(format!(
                "prefix '{}' is empty or declared twice",
                prefix.symbol
            )));
        }
        let len = prefix.symbol.len();
        if !self.prefix_lengths.contains(&len) {
            self.prefix_lengths.push(len);
            self.prefix_lengths.sort_unstable_by(|a, b| b.cmp(a));
        }
        let prefix = Arc::new(prefix);
        self.prefix_index
            .insert(prefix.symbol.clone(), self.prefixes.len());
        self.prefixes.push(Arc::clone(&prefix));
        Ok(prefix)
    }

    pub fn unity(&self) -> Option<Arc<Unit>> {
        self.find_unit(UNITY_SYMBOL)
    }

    pub fn find_unit(&self, symbol: &str) -> Option<Arc<Unit>> {
        self.units.get(symbol).cloned()
    }

    pub fn find_prefix(&self, symbol: &str) -> Option<Arc<Prefix>> {
        self.prefix_index
            .get(symbol)
            .map(|&i| Arc::clone(&self.prefixes[i]))
    }

    /// Prefix whose symbol starts `text`, chosen by the registry's policy.
    pub fn get_prefix(&self, text: &str) -> Option<Arc<Prefix>> {
        let mut candidates = self
            .prefix_lengths
            .iter()
            .filter(|&&len| len <= text.len() && text.is_char_boundary(len))
            .filter_map(|&len| self.prefix_index.get(&text[..len]).copied());

        let index = match self.prefix_match {
            PrefixMatch::Longest => candidates.next(),
            PrefixMatch::DeclarationOrder => candidates.min(),
        }?;
        Some(Arc::clone(&self.prefixes[index]))
    }

    /// Resolve one symbol to an axis: an exact unit first, else prefix + unit.
    pub fn parse_axis(&self, symbol: &str, exponent: i32) -> Option<Axis> {
        if let Some(unit) = self.find_unit(symbol) {
            return Some(Axis::new(None, unit, exponent));
        }
        let prefix = self.get_prefix(symbol)?;
        let unit = self.find_unit(&symbol[prefix.symbol.len()..])?;
        Some(Axis::new(Some(prefix), unit, exponent))
    }

    pub fn parse_metric(&self, expression: &str) -> UfResult<Metric> {
        let tokens = to_unary_tokens(expression)?;
        self.parse_metric_tokens(&tokens, expression)
    }

    /// Build a metric from parsed terms. `expression` is only used in errors.
    pub fn parse_metric_tokens(&self, tokens: &[Unary], expression: &str) -> UfResult<Metric> {
        let axes = tokens
            .iter()
            .map(|u| {
                self.parse_axis(&u.expression, u.exponent).ok_or_else(|| {
                    UfError::UnresolvedSymbol {
                        symbol: u.expression.clone(),
                        expression: expression.to_string(),
                    }
                })
            })
            .collect::<UfResult<Vec<_>>>()?;
        Ok(Metric::new(axes))
    }

    pub fn units(&self) -> impl Iterator<Item = &Arc<Unit>> {
        self.units.values()
    }

    pub fn prefixes(&self) -> &[Arc<Prefix>] {
        &self.prefixes
    }
}
