//! Exponential notation numbers carrying an absolute uncertainty.
//!
//! A value is `significand × 10^exponent ± error × 10^exponent`. Every
//! constructor and operation returns a normalized value (`1 ≤ |significand| < 10`
//! or zero). The significand keeps its full working precision; rounding to the
//! precision implied by the error only happens when the value is rendered.

use std::fmt;
use std::ops::{Add, Div, Mul, Neg, Sub};
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;
use rust_decimal::prelude::{MathematicalOps, ToPrimitive};
use tracing::debug;

use crate::decimal::{self, DEFAULT_ERROR_DIGIT};
use crate::{UfError, UfResult};

/// Largest decimal exponent accepted from text, for numerals and unit powers.
pub const MAX_EXPONENT: i32 = 9999;

static NUMERAL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(-?\d*(?:\.\d*)?)(?:e([+-]?\d+))?$").expect("numeral pattern is valid")
});

static RENDERED: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\[(-?\d+(?:\.\d+)?)±(\d+(?:\.\d+)?)\]e([+-]?\d+)$")
        .expect("rendered pattern is valid")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Exponential {
    significand: Decimal,
    exponent: i32,
    error: Decimal,
}

impl Exponential {
    pub fn new(significand: Decimal, exponent: i32, error: Decimal) -> Self {
        Self {
            significand,
            exponent,
            error: error.abs(),
        }
        .normalized()
    }

    /// A defined value with no measurement error.
    pub fn exact(value: Decimal) -> Self {
        Self::new(value, 0, Decimal::ZERO)
    }

    pub fn exact_str(text: &str) -> UfResult<Self> {
        let parsed = Self::parse_with(text, DEFAULT_ERROR_DIGIT)?;
        Ok(Self {
            error: Decimal::ZERO,
            ..parsed
        })
    }

    /// `value` with the notation error implied by its written decimals.
    pub fn with_error_digit(value: Decimal, error_digit: Decimal) -> Self {
        Self::new(value, 0, decimal::notation_error(value, error_digit))
    }

    /// Parse a numeral (`-4.30e3`, `.5`) or a rendered value (`[4.3±0.1]e3`).
    ///
    /// The implied error of a numeral is `error_digit` units in its last
    /// written decimal.
    pub fn parse_with(text: &str, error_digit: Decimal) -> UfResult<Self> {
        if let Some(caps) = RENDERED.captures(text) {
            let significand = decimal::parse_decimal(&caps[1])?;
            let error = decimal::parse_decimal(&caps[2])?;
            let exponent = parse_exponent(&caps[3], text)?;
            return Ok(Self::new(significand, exponent, error));
        }

        let caps = NUMERAL
            .captures(text)
            .ok_or_else(|| UfError::format(format!("'{text}' is not a numeral")))?;
        let significand = decimal::parse_decimal(&caps[1])?;
        let exponent = match caps.get(2) {
            Some(m) => parse_exponent(m.as_str(), text)?,
            None => 0,
        };
        let error = decimal::notation_error(significand, error_digit);
        Ok(Self::new(significand, exponent, error))
    }

    pub fn one() -> Self {
        Self::exact(Decimal::ONE)
    }

    pub fn zero() -> Self {
        Self::exact(Decimal::ZERO)
    }

    pub fn significand(&self) -> Decimal {
        self.significand
    }

    pub fn exponent(&self) -> i32 {
        self.exponent
    }

    pub fn error(&self) -> Decimal {
        self.error
    }

    pub fn is_zero(&self) -> bool {
        self.significand.is_zero()
    }

    pub fn is_exact(&self) -> bool {
        self.error.is_zero()
    }

    /// Significand rendered at the precision its error supports.
    pub fn significand_text(&self) -> String {
        if self.error.is_zero() {
            self.significand.normalize().to_string()
        } else {
            decimal::decimal_to_string(self.significand, self.error)
        }
    }

    /// Multiply by `10^n`.
    pub fn raised(self, n: i32) -> Self {
        Self {
            exponent: self.exponent.saturating_add(n),
            ..self
        }
    }

    pub fn to_f64(&self) -> f64 {
        self.significand.to_f64().unwrap_or(f64::NAN) * 10f64.powi(self.exponent)
    }

    /// Division that refuses a zero divisor instead of degrading the result.
    pub fn checked_div(self, rhs: Self) -> Option<Self> {
        if rhs.is_zero() { None } else { Some(self / rhs) }
    }

    /// Integer power by repeated squaring. The relative error scales with `|n|`.
    pub fn powi(self, n: i32) -> Self {
        let mut result = Self::one();
        let mut base = self;
        let mut k = n.unsigned_abs();
        while k > 0 {
            if k & 1 == 1 {
                result = result * base;
            }
            k >>= 1;
            if k > 0 {
                base = base * base;
            }
        }
        if !self.is_zero() {
            result.error = result
                .significand
                .abs()
                .saturating_mul(Decimal::from(n.unsigned_abs()))
                .saturating_mul(self.error)
                / self.significand.abs();
        }
        if n < 0 { Self::one() / result } else { result }
    }

    /// Real power. Fails when the result is not a real decimal number.
    pub fn powf(self, power: Decimal) -> UfResult<Self> {
        if power.fract().is_zero() {
            if let Some(n) = power.to_i32() {
                return Ok(self.powi(n));
            }
        }
        if self.is_zero() && power.is_sign_positive() {
            return Ok(self);
        }
        if self.significand.is_sign_negative() || self.is_zero() {
            return Err(UfError::format(format!("{self} cannot be raised to {power}")));
        }

        let overflow = || UfError::format(format!("{self} raised to {power} is out of range"));
        let scaled = Decimal::from(self.exponent)
            .checked_mul(power)
            .ok_or_else(overflow)?;
        let whole = scaled.floor();
        let frac = scaled - whole;
        let carry = if frac.is_zero() {
            Decimal::ONE
        } else {
            Decimal::TEN.checked_powd(frac).ok_or_else(overflow)?
        };
        let magnitude = self.significand.checked_powd(power).ok_or_else(overflow)? * carry;
        let exponent = whole.to_i32().ok_or_else(overflow)?;
        let error = magnitude * power.abs() * self.error / self.significand;
        Ok(Self::new(magnitude, exponent, error))
    }

    /// True when both values share an exponent and each point estimate lies
    /// within the other's error interval.
    ///
    /// Not transitive. Use it for tolerant comparison only.
    pub fn approximates(&self, other: &Self) -> bool {
        self.exponent == other.exponent
            && (self.significand - other.significand).abs() <= self.error.min(other.error)
    }

    /// Same rendered text.
    pub fn similar(&self, other: &Self) -> bool {
        self.to_string() == other.to_string()
    }

    fn normalized(mut self) -> Self {
        if self.significand.is_zero() {
            return self;
        }
        while self.significand.abs() >= Decimal::TEN {
            self.significand = decimal::shift(self.significand, -1);
            self.error = decimal::shift(self.error, -1);
            self.exponent = self.exponent.saturating_add(1);
        }
        while self.significand.abs() < Decimal::ONE {
            self.significand = decimal::shift(self.significand, 1);
            self.error = decimal::shift(self.error, 1);
            self.exponent = self.exponent.saturating_sub(1);
        }
        self
    }
}

/// Parse a signed decimal exponent no larger than [`MAX_EXPONENT`] in magnitude.
pub fn parse_exponent(digits: &str, text: &str) -> UfResult<i32> {
    digits
        .parse::<i32>()
        .ok()
        .filter(|e| e.unsigned_abs() <= MAX_EXPONENT.unsigned_abs())
        .ok_or_else(|| UfError::format(format!("exponent of '{text}' is out of range")))
}

impl From<Decimal> for Exponential {
    fn from(value: Decimal) -> Self {
        Self::with_error_digit(value, DEFAULT_ERROR_DIGIT)
    }
}

impl From<i32> for Exponential {
    fn from(value: i32) -> Self {
        Self::from(Decimal::from(value))
    }
}

impl From<i64> for Exponential {
    fn from(value: i64) -> Self {
        Self::from(Decimal::from(value))
    }
}

impl FromStr for Exponential {
    type Err = UfError;

    fn from_str(s: &str) -> UfResult<Self> {
        Self::parse_with(s, DEFAULT_ERROR_DIGIT)
    }
}

impl fmt::Display for Exponential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}±{}]e{}",
            self.significand_text(),
            decimal::round_uncertainty(self.error),
            self.exponent
        )
    }
}

impl Neg for Exponential {
    type Output = Self;

    fn neg(self) -> Self {
        Self {
            significand: -self.significand,
            ..self
        }
    }
}

impl Add for Exponential {
    type Output = Self;

    /// Errors add linearly.
    fn add(self, rhs: Self) -> Self {
        let (hi, lo) = if self.exponent >= rhs.exponent {
            (self, rhs)
        } else {
            (rhs, self)
        };
        let delta = lo.exponent.saturating_sub(hi.exponent);
        let significand = hi.significand + decimal::shift(lo.significand, delta);
        let error = hi.error + decimal::shift(lo.error, delta);
        Self::new(significand, hi.exponent, error)
    }
}

impl Sub for Exponential {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        self + (-rhs)
    }
}

impl Mul for Exponential {
    type Output = Self;

    /// Relative errors add.
    fn mul(self, rhs: Self) -> Self {
        let significand = self.significand * rhs.significand;
        let error = self
            .significand
            .abs()
            .saturating_mul(rhs.error)
            .saturating_add(rhs.significand.abs().saturating_mul(self.error));
        Self::new(significand, self.exponent.saturating_add(rhs.exponent), error)
    }
}

impl Div for Exponential {
    type Output = Self;

    /// Relative errors add. A zero divisor leaves a zero significand that only
    /// carries the dividend's error; see [`Exponential::checked_div`].
    fn div(self, rhs: Self) -> Self {
        if rhs.is_zero() {
            debug!(dividend = %self, "division by a zero significand");
            return Self::new(Decimal::ZERO, self.exponent, self.error);
        }
        let quotient = self.significand / rhs.significand;
        let error = (self.error + quotient.abs() * rhs.error) / rhs.significand.abs();
        Self::new(quotient, self.exponent.saturating_sub(rhs.exponent), error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn exp(significand: Decimal, error: Decimal) -> Exponential {
        Exponential::new(significand, 0, error)
    }

    fn parse(text: &str) -> Exponential {
        text.parse().unwrap()
    }

    #[test]
    fn parses_numerals() {
        let e = parse("23.343e8");
        assert_eq!(e.significand(), dec!(2.3343));
        assert_eq!(e.exponent(), 9);
        assert_eq!(e.error(), dec!(0.0001));

        let e = parse("4.3");
        assert_eq!(e.significand(), dec!(4.3));
        assert_eq!(e.exponent(), 0);
        assert_eq!(e.error(), dec!(0.1));

        let e = parse("40");
        assert_eq!(e.significand(), dec!(4.0));
        assert_eq!(e.exponent(), 1);
        assert_eq!(e.error(), dec!(0.1));

        let e = parse("9.1093822e-31");
        assert_eq!(e.significand(), dec!(9.1093822));
        assert_eq!(e.exponent(), -31);
    }

    #[test]
    fn rejects_malformed_numerals() {
        for bad in ["", "e5", "-", "4,4", "4.4.4", "4 ", "1e", "abc"] {
            let err = bad.parse::<Exponential>().unwrap_err();
            assert!(matches!(err, UfError::Format { .. }), "{bad}: {err}");
        }
    }

    #[test]
    fn notation_errors() {
        let a = Exponential::from(4);
        assert_eq!(a.significand(), dec!(4));
        assert_eq!(a.error(), dec!(1));

        let a = Exponential::from(dec!(4.0));
        assert_eq!(a.error(), dec!(0.1));

        let a = Exponential::with_error_digit(dec!(4.0), dec!(5));
        assert_eq!(a.error(), dec!(0.5));

        let a = Exponential::parse_with("4.00", dec!(2)).unwrap();
        assert_eq!(a.error(), dec!(0.02));
    }

    #[test]
    fn normalizing() {
        let a = Exponential::new(dec!(34), 3, Decimal::ZERO);
        assert_eq!(a.significand(), dec!(3.4));
        assert_eq!(a.exponent(), 4);

        let a = Exponential::new(dec!(0.0049), 0, Decimal::ZERO);
        assert_eq!(a.significand(), dec!(4.9));
        assert_eq!(a.exponent(), -3);

        assert_eq!(parse("13.214").significand(), dec!(1.3214));
        assert_eq!(Exponential::zero().exponent(), 0);
    }

    #[test]
    fn addition() {
        let c = Exponential::from(dec!(4.0)) + Exponential::from(dec!(2.0));
        assert_eq!(c.significand(), dec!(6.0));
        assert_eq!(c.error(), dec!(0.2));
        assert_eq!(c.exponent(), 0);

        let c = Exponential::from(dec!(4.0)) + Exponential::from(dec!(20.0));
        assert_eq!(c.significand(), dec!(2.4));
        assert_eq!(c.error(), dec!(0.02));
        assert_eq!(c.exponent(), 1);

        let c = Exponential::from(8) + Exponential::from(7);
        assert_eq!(c.significand(), dec!(1.5));
        assert_eq!(c.error(), dec!(0.2));
        assert_eq!(c.exponent(), 1);

        let c = parse("13.214") + parse("234.6");
        assert_eq!(c.significand(), dec!(2.47814));
        assert_eq!(c.error(), dec!(0.00101));
        assert_eq!(c.exponent(), 2);
        assert_eq!(c.to_string(), "[2.4781±0.0010]e2");

        let c = parse("13.214e3") + parse("234.6e3");
        assert_eq!(c.exponent(), 5);
        assert_eq!(c.error(), dec!(0.00101));
    }

    #[test]
    fn subtraction() {
        let c = Exponential::from(dec!(12.0)) - Exponential::from(dec!(8.0));
        assert_eq!(c.significand(), dec!(4.0));
        assert_eq!(c.error(), dec!(0.2));

        let c = parse("12.0e3") - parse("8.0e3");
        assert_eq!(c.significand(), dec!(4.0));
        assert_eq!(c.error(), dec!(0.2));
        assert_eq!(c.exponent(), 3);
    }

    #[test]
    fn multiplication() {
        let c = exp(dec!(4.52), dec!(0.02)) * exp(dec!(2.0), dec!(0.2));
        assert_eq!(c.to_string(), "[9.0±0.9]e0");

        let c = exp(dec!(4.0), dec!(0.5)) * exp(dec!(2.0), dec!(0.5));
        assert_eq!(c.significand(), dec!(8));
        assert_eq!(c.error(), dec!(3));
        assert_eq!(c.to_string(), "[8±3]e0");

        let c = exp(dec!(40.00), dec!(0.05)) * exp(dec!(30.00), dec!(0.05));
        assert_eq!(c.significand(), dec!(1.2));
        assert_eq!(c.error(), dec!(0.0035));
        assert_eq!(c.exponent(), 3);
        assert_eq!(c.to_string(), "[1.200±0.004]e3");
    }

    #[test]
    fn division() {
        let c = exp(dec!(2.0), dec!(0.2)) / exp(dec!(3.0), dec!(0.6));
        assert_eq!(c.exponent(), -1);
        assert_eq!(c.to_string(), "[7±2]e-1");

        let c = exp(dec!(200.0), dec!(0.5)) / exp(dec!(50.0), dec!(0.5));
        assert_eq!(c.significand(), dec!(4));
        assert_eq!(c.error(), dec!(0.05));

        let c = exp(dec!(200.00), dec!(0.01)) / exp(dec!(50.0), dec!(0.1));
        assert_eq!(c.to_string(), "[4.000±0.008]e0");
    }

    #[test]
    fn division_by_zero_keeps_dividend_error() {
        let a = exp(dec!(2.0), dec!(0.2));
        let c = a / Exponential::zero();
        assert!(c.is_zero());
        assert_eq!(c.error(), dec!(0.2));
        assert!(a.checked_div(Exponential::zero()).is_none());
        assert!(a.checked_div(Exponential::one()).is_some());
    }

    #[test]
    fn chained_division() {
        let sixty = Exponential::exact_str("60").unwrap();
        let d = parse("10.0") / sixty / sixty;
        assert!(d.approximates(&parse("2.8e-3")));
    }

    #[test]
    fn powers() {
        let a = exp(dec!(4.1), dec!(0.1));
        let squared = a.powi(2);
        assert_eq!(squared.exponent(), 1);
        assert_eq!(squared.error(), dec!(0.082));
        assert_eq!(squared.to_string(), "[1.68±0.08]e1");

        let root = a.powf(dec!(0.5)).unwrap();
        assert_eq!(root.exponent(), 0);
        assert_eq!(root.to_string(), "[2.02±0.02]e0");

        assert_eq!(a.powi(0), Exponential::one());
        assert_eq!(a.powf(dec!(2)).unwrap(), squared);
        assert!(exp(dec!(-4.0), dec!(0.1)).powf(dec!(0.5)).is_err());
    }

    #[test]
    fn fractional_power_of_large_exponent() {
        let a = Exponential::new(dec!(4.0), 3, dec!(0.1));
        let root = a.powf(dec!(0.5)).unwrap();
        assert_eq!(root.exponent(), 1);
        assert!((root.to_f64() - 63.2455).abs() < 1e-3);
    }

    #[test]
    fn products_and_powers() {
        let a = exp(dec!(4.52), dec!(0.02));
        let b = exp(dec!(2.0), dec!(0.2));
        let c = exp(dec!(3.02), dec!(0.6));
        let d = a * c.powi(2) / b.powf(dec!(0.5)).unwrap();
        assert_eq!(d.exponent(), 1);
        assert_eq!(d.to_string(), "[2.9±1.3]e1");

        let c = exp(dec!(3.0), dec!(0.6));
        let d = a * b + c.powi(2);
        assert_eq!(d.error(), dec!(0.4544));
        assert_eq!(d.exponent(), 1);
        assert_eq!(d.to_string(), "[1.8±0.5]e1");
    }

    #[test]
    fn rendering() {
        assert_eq!(exp(dec!(4.55555), dec!(0.7)).to_string(), "[4.6±0.7]e0");
        assert_eq!(exp(dec!(4.666666666), dec!(0.01234)).to_string(), "[4.667±0.012]e0");
        assert_eq!(exp(dec!(0.5), dec!(0.1)).to_string(), "[5.0±1.0]e-1");
        assert_eq!(exp(dec!(0.5), dec!(0.2)).to_string(), "[5±2]e-1");

        assert_eq!(parse("4000").to_string(), "[4.000±0.001]e3");
        assert_eq!(parse("4000.").to_string(), "[4.000±0.001]e3");
        assert_eq!(parse("4000.0").to_string(), "[4.0000±0.0001]e3");
        assert_eq!(parse(".5").to_string(), "[5.0±1.0]e-1");
        assert_eq!(parse("0.5").to_string(), "[5.0±1.0]e-1");
        assert_eq!(parse("000.5").to_string(), "[5.0±1.0]e-1");
        assert_eq!(parse("0.50").to_string(), "[5.00±0.10]e-1");
        assert_eq!(parse(".505").to_string(), "[5.050±0.010]e-1");
        assert_eq!(Exponential::exact_str("60").unwrap().to_string(), "[6±0]e1");
    }

    #[test]
    fn significand_text_follows_error() {
        assert_eq!(parse("4000").significand_text(), "4.000");
        assert_eq!(parse("4").significand_text(), "4");
        assert_eq!(parse("4.08").significand_text(), "4.08");
        assert_eq!(exp(dec!(4.08), dec!(0.1)).significand_text(), "4.1");
        assert_eq!(exp(dec!(4.03), dec!(0.5)).significand_text(), "4.0");
        assert_eq!(exp(dec!(4.030), dec!(0.12)).significand_text(), "4.03");
        assert_eq!(exp(dec!(4.03), dec!(0.0005)).significand_text(), "4.0300");
    }

    #[test]
    fn parses_rendered_form() {
        let e = parse("[4.52±0.02]e3");
        assert_eq!(e.significand(), dec!(4.52));
        assert_eq!(e.error(), dec!(0.02));
        assert_eq!(e.exponent(), 3);
        assert!(parse("[1.2±0.1]e-4").similar(&parse("1.2e-4")));
    }

    #[test]
    fn approximation_is_mutual() {
        let wide = exp(dec!(2.0), dec!(0.5));
        let narrow = exp(dec!(2.3), dec!(0.1));
        assert!(!wide.approximates(&narrow));
        assert!(!narrow.approximates(&wide));

        let close = exp(dec!(2.05), dec!(0.1));
        assert!(wide.approximates(&close));
        assert!(close.approximates(&wide));

        assert!(!parse("2.0").approximates(&parse("2.0e1")));
    }

    #[test]
    fn exponents_out_of_range_are_format_errors() {
        for bad in ["1e2000000000", "1e10000", "[1.0±0.1]e-10000", "1e99999999999"] {
            let err = bad.parse::<Exponential>().unwrap_err();
            assert!(matches!(err, UfError::Format { .. }), "{bad}: {err}");
        }
        let big = parse("1e9999");
        let product = big * big * big;
        assert_eq!(product.exponent(), 29997);
        assert_eq!((product / big).exponent(), 19998);
        assert_eq!(parse("1e-9999").raised(i32::MIN).exponent(), i32::MIN);
    }

    #[test]
    fn large_powers_use_the_closed_form_error() {
        let a = exp(dec!(1.0), dec!(0.1));
        let p = a.powi(1_000_000_000);
        assert_eq!(p.significand(), dec!(1));
        assert_eq!(p.exponent(), 0);
        assert_eq!(p.error(), dec!(100000000));

        let ten = Exponential::exact(dec!(10));
        assert_eq!(ten.powi(5000).exponent(), 5000);
        assert_eq!(ten.powi(-5000).exponent(), -5000);
        assert!(ten.powi(-5000).is_exact());

        let b = exp(dec!(2.0), dec!(0.1));
        let cubed = b.powi(3);
        assert_eq!(cubed.significand(), dec!(8));
        assert_eq!(cubed.error(), dec!(1.2));
    }

    #[test]
    fn raised_and_float() {
        let e = parse("4.5").raised(3);
        assert_eq!(e.exponent(), 3);
        assert!((e.to_f64() - 4500.0).abs() < 1e-9);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn value() -> impl Strategy<Value = Exponential> {
        (-99_999i64..99_999, 0u32..4, -12i32..12, 0i64..500, 1u32..4).prop_map(
            |(mantissa, scale, exponent, err, err_scale)| {
                Exponential::new(
                    Decimal::new(mantissa, scale),
                    exponent,
                    Decimal::new(err, err_scale),
                )
            },
        )
    }

    proptest! {
        #[test]
        fn normalize_is_idempotent(x in value()) {
            let again = Exponential::new(x.significand(), x.exponent(), x.error());
            prop_assert_eq!(again, x);
            prop_assert!(x.is_zero() || (x.significand().abs() >= Decimal::ONE
                && x.significand().abs() < Decimal::TEN));
        }

        #[test]
        fn rendered_text_round_trips(
            mantissa in 1000i64..9000,
            exponent in -12i32..12,
            err in 1i64..500,
        ) {
            let x = Exponential::new(Decimal::new(mantissa, 3), exponent, Decimal::new(err, 3));
            let back: Exponential = x.to_string().parse().unwrap();
            prop_assert!(back.approximates(&x), "{} vs {}", back, x);
        }

        #[test]
        fn add_and_multiply_commute(a in value(), b in value()) {
            prop_assert_eq!((a + b).significand(), (b + a).significand());
            prop_assert_eq!((a * b).significand(), (b * a).significand());
            prop_assert_eq!((a * b).error(), (b * a).error());
        }
    }
}
