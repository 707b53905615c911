//! Decimal text helpers.
//!
//! Precision in this crate is a property of the written digits, so every helper
//! here works on `Decimal` values or their canonical text, never on `f64`.

use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};

use crate::{UfError, UfResult};

/// Multiplier applied to one unit in the last written digit.
pub const DEFAULT_ERROR_DIGIT: Decimal = Decimal::ONE;

const MAX_SHIFT: i32 = 28;

/// Exact power of ten. Values beyond the `Decimal` range saturate.
pub fn pow10(exp: i32) -> Decimal {
    if exp >= 0 {
        Decimal::from_i128_with_scale(10i128.pow(exp.min(MAX_SHIFT) as u32), 0)
    } else if exp < -MAX_SHIFT {
        Decimal::ZERO
    } else {
        Decimal::new(1, (-exp) as u32)
    }
}

/// Move the decimal point of `d` by `digits` places (positive is left to right).
pub fn shift(d: Decimal, digits: i32) -> Decimal {
    if digits == 0 {
        return d;
    }
    if digits < -MAX_SHIFT {
        return Decimal::ZERO;
    }
    d.saturating_mul(pow10(digits))
}

/// Uncertainty implied by the number of decimals written in `value`.
pub fn notation_error(value: Decimal, error_digit: Decimal) -> Decimal {
    shift(error_digit, -(value.scale() as i32))
}

/// Parse decimal text keeping its written scale.
///
/// Accepts a bare leading or trailing point (`.5`, `4000.`).
pub fn parse_decimal(text: &str) -> UfResult<Decimal> {
    let (sign, digits) = match text.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", text),
    };
    let well_formed = digits.chars().all(|c| c.is_ascii_digit() || c == '.')
        && digits.matches('.').count() <= 1
        && digits.chars().any(|c| c.is_ascii_digit());
    if !well_formed {
        return Err(UfError::format(format!("'{text}' is not a number")));
    }
    let digits = digits.strip_suffix('.').unwrap_or(digits);
    let normalized = if digits.starts_with('.') {
        format!("{sign}0{digits}")
    } else {
        format!("{sign}{digits}")
    };
    Decimal::from_str(&normalized)
        .map_err(|e| UfError::format(format!("'{text}' is not a number: {e}")))
}

/// Significant digits of a numeral, point removed.
///
/// Trailing zeros count, leading zeros don't. Returns an empty string when the
/// text holds no non-zero digit.
pub fn significant_figures(text: &str) -> String {
    let digits: String = text.chars().filter(|c| *c != '.').collect();
    match digits.find(|c: char| ('1'..='9').contains(&c)) {
        Some(first) => digits[first..].to_string(),
        None => String::new(),
    }
}

/// Pad or truncate decimal text to exactly `prec` digits after the point.
pub fn to_precision(text: &str, prec: usize) -> String {
    let (mut out, mut current) = match text.find('.') {
        Some(pt) => {
            let keep = if prec > 0 { pt + 1 + prec } else { pt };
            let end = keep.min(text.len());
            let current = text.len() - pt - 1;
            (text[..end].to_string(), current.min(prec))
        }
        None => {
            let mut s = text.to_string();
            if prec > 0 {
                s.push('.');
            }
            (s, 0)
        }
    };
    if prec > 0 && !out.contains('.') {
        out.push('.');
    }
    while current < prec {
        out.push('0');
        current += 1;
    }
    out
}

/// Round half-to-even at decimal place `place`. Negative places round left of
/// the point and return an integer.
pub fn round_at(value: Decimal, place: i32) -> Decimal {
    if place >= 0 {
        value.round_dp_with_strategy(place as u32, RoundingStrategy::MidpointNearestEven)
    } else {
        let scaled =
            shift(value, place).round_dp_with_strategy(0, RoundingStrategy::MidpointNearestEven);
        let mut out = shift(scaled, -place);
        out.rescale(0);
        out
    }
}

/// Round `value` at `place` and render it with `prec` decimals.
pub fn round(value: Decimal, place: i32, prec: usize) -> String {
    to_precision(&round_at(value, place).to_string(), prec)
}

/// Decimal place of the first significant digit (`0.07` is 2, `14.03` is -1)
/// together with that digit.
fn first_significant(text: &str) -> Option<(i32, char)> {
    let (int_part, frac_part) = text.split_once('.').unwrap_or((text, ""));
    let int_part = int_part.trim_start_matches('-');
    if let Some(i) = int_part.find(|c: char| ('1'..='9').contains(&c)) {
        let place = -((int_part.len() - 1 - i) as i32);
        return int_part[i..].chars().next().map(|c| (place, c));
    }
    frac_part
        .char_indices()
        .find(|(_, c)| ('1'..='9').contains(c))
        .map(|(j, c)| (j as i32 + 1, c))
}

/// Round an uncertainty to one significant digit, or two when the leading digit
/// is a `1`.
pub fn round_uncertainty(uncertainty: Decimal) -> Decimal {
    let text = uncertainty.abs().to_string();
    let Some((first, digit)) = first_significant(&text) else {
        return Decimal::ZERO;
    };
    let available = text.split_once('.').map_or(0, |(_, f)| f.len() as i32);
    let place = if digit == '1' { first + 1 } else { first };
    round_at(uncertainty.abs(), available.min(place))
}

/// Render `value` at the precision implied by its rounded `error`.
pub fn decimal_to_string(value: Decimal, error: Decimal) -> String {
    if error.is_zero() {
        return value.to_string();
    }
    let prec = round_uncertainty(error).scale();
    round(value, prec as i32, prec as usize)
}
