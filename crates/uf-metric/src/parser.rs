//! Unit expression parser.
//!
//! Turns `kg.m/s2` into signed unary terms (`kg^1`, `m^1`, `s^-2`). Curly brace
//! annotations are resolved first, then the expression is split into operands
//! and operators. Each operator sets the sign of the term that follows it.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use uf_core::exponential::parse_exponent;
use uf_core::{Exponential, UfError, UfResult};

use crate::unit::UNITY_SYMBOL;

static EXPONENT_SUFFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[+-]?\d+$").expect("exponent pattern is valid"));

/// Binary operator between operands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    /// `.` or `*`
    Multiply,
    /// `/`
    Divide,
}

impl Operator {
    fn from_char(c: char) -> Option<Self> {
        match c {
            '.' | '*' => Some(Operator::Multiply),
            '/' => Some(Operator::Divide),
            _ => None,
        }
    }

    /// Sign given to the term after this operator.
    pub fn sign(self) -> i32 {
        match self {
            Operator::Multiply => 1,
            Operator::Divide => -1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Operand(String),
    Operator(Operator),
}

/// A symbol raised to a signed integer power.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unary {
    pub exponent: i32,
    pub expression: String,
}

impl Unary {
    pub fn new(exponent: i32, expression: impl Into<String>) -> Self {
        Self {
            exponent,
            expression: expression.into(),
        }
    }

    /// Plain integer terms such as `60` or `360` in a conversion formula.
    pub fn is_numeric(&self) -> bool {
        !self.expression.is_empty() && self.expression.chars().all(|c| c.is_ascii_digit())
    }

    pub fn numeric(&self) -> UfResult<Exponential> {
        Exponential::exact_str(&self.expression)
    }

    /// The numeric value raised to the term's exponent.
    pub fn factor(&self) -> UfResult<Exponential> {
        Ok(self.numeric()?.powi(self.exponent))
    }
}

impl fmt::Display for Unary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}^{}", self.expression, self.exponent)
    }
}

/// Replace or remove `{...}` annotations.
///
/// An annotation at the start, after an operator, or spanning the whole
/// expression becomes the unity symbol. One glued to a unit (`ml{total}`) is
/// dropped. An annotation must be followed by an operator or the end of the
/// expression; nested or unbalanced braces are rejected.
pub fn canonicalize_annotations(expression: &str) -> UfResult<String> {
    let misplaced = |why: &str| UfError::format(format!("{why} in '{expression}'"));
    let mut out = String::with_capacity(expression.len());
    let mut chars = expression.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '{' => {
                let mut closed = false;
                for inner in chars.by_ref() {
                    match inner {
                        '}' => {
                            closed = true;
                            break;
                        }
                        '{' => return Err(misplaced("nested annotation")),
                        _ => {}
                    }
                }
                if !closed {
                    return Err(misplaced("unterminated annotation"));
                }
                if let Some(next) = chars.peek() {
                    if Operator::from_char(*next).is_none() {
                        return Err(misplaced("annotation followed by a symbol"));
                    }
                }
                let standalone = out
                    .chars()
                    .last()
                    .is_none_or(|prev| Operator::from_char(prev).is_some());
                if standalone {
                    out.push_str(UNITY_SYMBOL);
                }
            }
            '}' => return Err(misplaced("unbalanced '}'")),
            _ => out.push(c),
        }
    }
    Ok(out)
}

/// Split an annotation-free expression into operands and operators.
///
/// `*` right after a `10` operand belongs to the UCUM `10*` symbol.
pub fn tokenize(expression: &str) -> UfResult<Vec<Token>> {
    let empty = || UfError::format(format!("empty operand in '{expression}'"));
    let mut tokens = Vec::new();
    let mut operand = String::new();

    for c in expression.chars() {
        let op = Operator::from_char(c).filter(|_| !(c == '*' && operand == "10"));
        match op {
            Some(op) => {
                if operand.is_empty() {
                    // A leading `/s` or `.s` reads as `1/s`.
                    if !tokens.is_empty() {
                        return Err(empty());
                    }
                } else {
                    tokens.push(Token::Operand(std::mem::take(&mut operand)));
                }
                tokens.push(Token::Operator(op));
            }
            None => operand.push(c),
        }
    }
    if operand.is_empty() {
        if !tokens.is_empty() {
            return Err(empty());
        }
    } else {
        tokens.push(Token::Operand(operand));
    }
    Ok(tokens)
}

fn split_exponent(operand: &str) -> UfResult<Unary> {
    match EXPONENT_SUFFIX.find(operand) {
        Some(m) if m.len() < operand.len() => {
            let exponent = parse_exponent(m.as_str(), operand)?;
            Ok(Unary::new(exponent, &operand[..m.start()]))
        }
        _ => Ok(Unary::new(1, operand)),
    }
}

/// Parse a unit expression into signed unary terms.
///
/// An empty expression yields no terms.
pub fn to_unary_tokens(expression: &str) -> UfResult<Vec<Unary>> {
    if expression.chars().any(char::is_whitespace) {
        return Err(UfError::format(format!(
            "whitespace in unit expression '{expression}'"
        )));
    }
    let canonical = canonicalize_annotations(expression)?;
    let mut sign = 1;
    let mut terms = Vec::new();
    for token in tokenize(&canonical)? {
        match token {
            Token::Operator(op) => sign = op.sign(),
            Token::Operand(text) => {
                let mut unary = split_exponent(&text)?;
                unary.exponent *= sign;
                terms.push(unary);
            }
        }
    }
    Ok(terms)
}
