//! Unit system façade and its builder.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{info, warn};
use uf_core::{Exponential, UfError, UfResult};
use uf_metric::{Metric, Prefix, Unit, UnitRegistry, to_unary_tokens};

use crate::config::SystemConfig;
use crate::conversion::{Conversion, Conversions};
use crate::formula::Formula;
use crate::quantity::Quantity;
use crate::records::UnitSystemRecords;
use crate::validate;

/// Leading numeral, then the unit expression.
static QUANTITY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(-?(?:\d+(?:\.\d*)?|\.\d+)(?:e[+-]?\d+)?)(.*)$")
        .expect("quantity pattern is valid")
});

/// An immutable registry of units plus the rules that reduce them to base
/// units.
#[derive(Debug, Clone)]
pub struct SystemOfUnits {
    registry: UnitRegistry,
    conversions: Conversions,
    config: SystemConfig,
}

impl SystemOfUnits {
    pub fn builder() -> SystemBuilder {
        SystemBuilder::default()
    }

    pub fn registry(&self) -> &UnitRegistry {
        &self.registry
    }

    pub fn conversions(&self) -> &Conversions {
        &self.conversions
    }

    pub fn config(&self) -> &SystemConfig {
        &self.config
    }

    pub fn metric(&self, expression: &str) -> UfResult<Metric> {
        self.registry.parse_metric(expression)
    }

    /// Parse a numeral with this system's error digit.
    pub fn number(&self, text: &str) -> UfResult<Exponential> {
        Exponential::parse_with(text, self.config.error_digit)
    }

    /// Parse `4.0[lbf_av]` or `10.0km/h`. A bare number is dimensionless.
    pub fn quantity(&self, expression: &str) -> UfResult<Quantity> {
        if expression.chars().any(char::is_whitespace) {
            return Err(UfError::format(format!(
                "whitespace in quantity '{expression}'"
            )));
        }
        let caps = QUANTITY.captures(expression).ok_or_else(|| {
            UfError::format(format!("'{expression}' does not start with a number"))
        })?;
        let symbols = &caps[2];
        if symbols.starts_with([',', '.']) {
            return Err(UfError::format(format!(
                "'{expression}' is not a number followed by units"
            )));
        }
        self.quantity_with(self.number(&caps[1])?, symbols)
    }

    pub fn quantity_with(&self, value: Exponential, symbols: &str) -> UfResult<Quantity> {
        Ok(Quantity::new(value, self.metric(symbols)?))
    }

    /// Numeral text and unit expression given separately, e.g. `("4.0", "[lbf_av]")`.
    pub fn quantity_from_parts(&self, value: &str, symbols: &str) -> UfResult<Quantity> {
        self.quantity_with(self.number(value)?, symbols)
    }

    pub fn canonical(&self, quantity: &Quantity) -> UfResult<Quantity> {
        self.conversions.canonical(quantity)
    }

    pub fn canonical_str(&self, expression: &str) -> UfResult<Quantity> {
        self.canonical(&self.quantity(expression)?)
    }

    pub fn convert(&self, quantity: &Quantity, target: &Metric) -> UfResult<Quantity> {
        self.conversions.convert(quantity, target)
    }

    pub fn convert_str(&self, expression: &str, target: &str) -> UfResult<Quantity> {
        self.convert(&self.quantity(expression)?, &self.metric(target)?)
    }
}

/// A conversion rule waiting for the registry to be complete.
#[derive(Debug, Clone)]
struct PendingConversion {
    symbol: String,
    formula: String,
    coefficient: Exponential,
}

/// Collects prefixes, units and conversion rules, then freezes them into a
/// [`SystemOfUnits`].
///
/// Units and prefixes are checked as they are added. Conversion formulas are
/// compiled in `build()`, once every unit they mention is known.
#[derive(Debug, Default)]
pub struct SystemBuilder {
    config: SystemConfig,
    registry: UnitRegistry,
    pending: Vec<PendingConversion>,
}

impl SystemBuilder {
    pub fn new(config: SystemConfig) -> Self {
        Self {
            config,
            registry: UnitRegistry::new(config.prefix_match),
            pending: Vec::new(),
        }
    }

    pub fn config(&self) -> &SystemConfig {
        &self.config
    }

    pub fn add_prefix(
        &mut self,
        name: impl Into<String>,
        symbol: impl Into<String>,
        factor: Exponential,
    ) -> UfResult<()> {
        self.registry.add_prefix(Prefix::new(name, symbol, factor))?;
        Ok(())
    }

    pub fn add_base_unit(
        &mut self,
        name: impl Into<String>,
        symbol: impl Into<String>,
        dimension: impl Into<String>,
    ) -> UfResult<()> {
        self.registry.add_unit(Unit::base(name, symbol, dimension))?;
        Ok(())
    }

    pub fn add_unit(&mut self, name: impl Into<String>, symbol: impl Into<String>) -> UfResult<()> {
        self.registry.add_unit(Unit::derived(name, symbol))?;
        Ok(())
    }

    /// `symbol = coefficient × formula`.
    pub fn add_conversion(
        &mut self,
        symbol: impl Into<String>,
        formula: impl Into<String>,
        coefficient: Exponential,
    ) {
        self.pending.push(PendingConversion {
            symbol: symbol.into(),
            formula: formula.into(),
            coefficient,
        });
    }

    pub fn add_records(&mut self, records: &UnitSystemRecords) -> UfResult<()> {
        for p in &records.prefixes {
            self.add_prefix(&p.name, &p.symbol, Exponential::exact_str(&p.factor)?)?;
        }
        for u in &records.units {
            match &u.dimension {
                Some(dimension) => self.add_base_unit(&u.name, &u.symbol, dimension)?,
                None => self.add_unit(&u.name, &u.symbol)?,
            }
        }
        for c in &records.conversions {
            self.add_conversion(&c.symbol, &c.formula, Exponential::exact_str(&c.coefficient)?);
        }
        Ok(())
    }

    fn compile(&self, pending: &PendingConversion) -> UfResult<Conversion> {
        let from = self.registry.parse_metric(&pending.symbol)?;
        let terms = to_unary_tokens(&pending.formula)?;
        let units: Vec<_> = terms.iter().filter(|t| !t.is_numeric()).cloned().collect();
        let to = self.registry.parse_metric_tokens(&units, &pending.formula)?;
        let formula = Formula::compile(&terms, pending.coefficient)?;
        Ok(Conversion::new(from, to, formula))
    }

    /// Compile conversions, validate the rule graph, and freeze the system.
    ///
    /// A formula that cannot be compiled (a special unit such as `cel(1 K)`)
    /// is skipped with a warning. Its unit stays usable but not convertible.
    pub fn build(self) -> UfResult<SystemOfUnits> {
        self.config.validate()?;

        let mut conversions = Conversions::new();
        for pending in &self.pending {
            match self.compile(pending) {
                Ok(conversion) => conversions.add(conversion)?,
                Err(e) => warn!(
                    symbol = %pending.symbol,
                    formula = %pending.formula,
                    error = %e,
                    "skipping conversion"
                ),
            }
        }

        if self.config.validate_graph {
            validate::validate_conversions(&conversions)?;
        }

        info!(
            units = self.registry.units().count(),
            prefixes = self.registry.prefixes().len(),
            rules = conversions.len(),
            "unit system built"
        );

        Ok(SystemOfUnits {
            registry: self.registry,
            conversions,
            config: self.config,
        })
    }
}
