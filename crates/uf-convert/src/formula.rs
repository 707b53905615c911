//! Conversion formulas as a small interpreted expression tree.

use std::fmt;

use uf_core::{Exponential, UfResult};
use uf_metric::Unary;

#[derive(Debug, Clone, PartialEq)]
pub enum Formula {
    /// The input value.
    Value,
    Constant(Exponential),
    Product(Box<Formula>, Box<Formula>),
    Quotient(Box<Formula>, Box<Formula>),
}

impl Formula {
    /// `value × coefficient`, then each numeric term multiplied in (positive
    /// exponent) or divided out (negative exponent).
    ///
    /// Non-numeric terms are ignored; they make up the target metric.
    pub fn compile(terms: &[Unary], coefficient: Exponential) -> UfResult<Formula> {
        let mut formula = Formula::Value.times(coefficient);
        for term in terms.iter().filter(|t| t.is_numeric()) {
            let factor = term.numeric()?.powi(term.exponent.abs());
            formula = if term.exponent < 0 {
                Formula::Quotient(Box::new(formula), Box::new(Formula::Constant(factor)))
            } else {
                formula.times(factor)
            };
        }
        Ok(formula)
    }

    fn times(self, factor: Exponential) -> Formula {
        Formula::Product(Box::new(self), Box::new(Formula::Constant(factor)))
    }

    pub fn evaluate(&self, value: Exponential) -> Exponential {
        match self {
            Formula::Value => value,
            Formula::Constant(c) => *c,
            Formula::Product(a, b) => a.evaluate(value) * b.evaluate(value),
            Formula::Quotient(a, b) => a.evaluate(value) / b.evaluate(value),
        }
    }
}

impl fmt::Display for Formula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Formula::Value => f.write_str("x"),
            Formula::Constant(c) => write!(f, "{c}"),
            Formula::Product(a, b) => write!(f, "({a} * {b})"),
            Formula::Quotient(a, b) => write!(f, "({a} / {b})"),
        }
    }
}
