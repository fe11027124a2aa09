//! Arbitrary-precision token amounts.
//!
//! Upstream amounts carry up to 18 fractional digits on top of integer parts
//! of any size, so they are held as `BigDecimal` and never pass through f64.
//! On the wire an amount is always a plain decimal string (no exponent).

use std::fmt;
use std::ops::{Add, Sub};
use std::str::FromStr;

use bigdecimal::{BigDecimal, ParseBigDecimalError, Signed, Zero};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Significant digits kept by [`Amount::checked_div`].
pub const QUOTIENT_PRECISION: u64 = 50;

/// Exact decimal amount. Scale is preserved as parsed (`9.50` stays `9.50`);
/// equality and ordering compare values (`9.50 == 9.5`).
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Amount(BigDecimal);

impl Amount {
    pub fn zero() -> Self {
        Amount(BigDecimal::zero())
    }

    pub fn from_count(n: usize) -> Self {
        Amount(BigDecimal::from(n as u64))
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    pub fn is_negative(&self) -> bool {
        self.0.is_negative()
    }

    /// Same value with trailing zeros stripped (`-5.00` -> `-5`).
    pub fn normalized(&self) -> Self {
        Amount(self.0.normalized())
    }

    pub fn mul_int(&self, n: i64) -> Self {
        Amount(&self.0 * BigDecimal::from(n))
    }

    /// `self / divisor` rounded to [`QUOTIENT_PRECISION`] significant digits.
    /// `None` for a zero divisor.
    pub fn checked_div(&self, divisor: &Amount) -> Option<Self> {
        if divisor.is_zero() {
            return None;
        }
        Some(Amount((&self.0 / &divisor.0).with_prec(QUOTIENT_PRECISION)))
    }

    pub fn as_big_decimal(&self) -> &BigDecimal {
        &self.0
    }
}

impl From<BigDecimal> for Amount {
    fn from(v: BigDecimal) -> Self {
        Amount(v)
    }
}

impl FromStr for Amount {
    type Err = ParseBigDecimalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BigDecimal::from_str(s).map(Amount)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.to_plain_string())
    }
}

impl Add<&Amount> for &Amount {
    type Output = Amount;

    fn add(self, rhs: &Amount) -> Amount {
        Amount(&self.0 + &rhs.0)
    }
}

impl Sub<&Amount> for &Amount {
    type Output = Amount;

    fn sub(self, rhs: &Amount) -> Amount {
        Amount(&self.0 - &rhs.0)
    }
}

impl Serialize for Amount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
