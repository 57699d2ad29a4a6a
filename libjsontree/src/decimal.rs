//! Exact fixed-point decimal numbers.
//!
//! A JSON literal with a fractional part and no exponent keeps its exact
//! decimal digits instead of being rounded to binary floating point.

use num_bigint::BigInt;
use num_traits::{Signed, Zero};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A decimal number `mantissa / 10^scale`.
#[derive(Clone, Debug)]
pub struct Decimal {
    mantissa: BigInt,
    scale: u32,
}

/// Error returned when a string is not a plain decimal literal.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid decimal literal \"{0}\"")]
pub struct ParseDecimalError(String);

impl Decimal {
    /// Create a decimal from its unscaled digits and the number of fractional digits.
    pub fn new(mantissa: impl Into<BigInt>, scale: u32) -> Self {
        Self {
            mantissa: mantissa.into(),
            scale,
        }
    }

    /// The unscaled digits.
    pub fn mantissa(&self) -> &BigInt {
        &self.mantissa
    }

    /// Number of fractional digits.
    pub fn scale(&self) -> u32 {
        self.scale
    }

    /// Same value with trailing fractional zeros removed.
    pub fn normalized(&self) -> Self {
        let ten = BigInt::from(10);
        let mut mantissa = self.mantissa.clone();
        let mut scale = self.scale;
        while scale > 0 && !mantissa.is_zero() && (&mantissa % &ten).is_zero() {
            mantissa /= &ten;
            scale -= 1;
        }
        if mantissa.is_zero() {
            scale = 0;
        }
        Self { mantissa, scale }
    }

    /// Nearest `f64`, rounded from the exact decimal digits.
    pub fn to_f64(&self) -> f64 {
        self.to_string().parse().unwrap_or(f64::NAN)
    }
}

impl PartialEq for Decimal {
    fn eq(&self, other: &Self) -> bool {
        let a = self.normalized();
        let b = other.normalized();
        a.scale == b.scale && a.mantissa == b.mantissa
    }
}

impl Eq for Decimal {}

impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.mantissa.is_negative() {
            write!(f, "-")?;
        }
        let digits = self.mantissa.magnitude().to_string();
        let scale = self.scale as usize;
        if scale == 0 {
            return write!(f, "{}", digits);
        }
        let padded = format!("{:0>width$}", digits, width = scale + 1);
        let (int_part, frac_part) = padded.split_at(padded.len() - scale);
        write!(f, "{}.{}", int_part, frac_part)
    }
}

impl FromStr for Decimal {
    type Err = ParseDecimalError;

    /// Accepts `-?digits(.digits)?`.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let invalid = || ParseDecimalError(s.to_string());
        let unsigned = s.strip_prefix('-').unwrap_or(s);
        let (int_part, frac_part) = match unsigned.split_once('.') {
            Some((i, f)) => (i, f),
            None => (unsigned, ""),
        };
        let all_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
        if int_part.is_empty()
            || !all_digits(int_part)
            || !all_digits(frac_part)
            || (unsigned.contains('.') && frac_part.is_empty())
        {
            return Err(invalid());
        }

        let mut digits = String::with_capacity(s.len());
        if s.starts_with('-') {
            digits.push('-');
        }
        digits.push_str(int_part);
        digits.push_str(frac_part);
        let mantissa = BigInt::parse_bytes(digits.as_bytes(), 10).ok_or_else(invalid)?;
        let scale = u32::try_from(frac_part.len()).map_err(|_| invalid())?;
        Ok(Self { mantissa, scale })
    }
}

impl From<i64> for Decimal {
    fn from(n: i64) -> Self {
        Self::new(n, 0)
    }
}
