use std::fmt;

use num_bigint::BigInt;
use num_integer::Integer as _;
use num_traits::{One, Signed, ToPrimitive, Zero};

use super::{Number, NumberOps, Rational, eager_exponent};
use crate::core::error::{Result, SymError};

/// Arbitrary-precision integer.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Integer(BigInt);

impl Integer {
    #[must_use]
    pub fn new(value: impl Into<BigInt>) -> Self {
        Self(value.into())
    }

    #[inline]
    #[must_use]
    pub fn as_bigint(&self) -> &BigInt {
        &self.0
    }

    #[must_use]
    pub fn into_bigint(self) -> BigInt {
        self.0
    }

    #[must_use]
    pub fn to_i64(&self) -> Option<i64> {
        self.0.to_i64()
    }

    #[must_use]
    pub fn to_f64(&self) -> f64 {
        self.0.to_f64().unwrap_or(f64::NAN)
    }

    #[must_use]
    pub fn is_even(&self) -> bool {
        self.0.is_even()
    }

    #[must_use]
    pub fn abs(&self) -> Self {
        Self(self.0.abs())
    }

    /// Floor division: `(q, r)` with `self = q*other + r` and `r` having the
    /// sign of `other`.
    ///
    /// # Panics
    /// Panics if `other` is zero.
    #[must_use]
    pub fn div_mod_floor(&self, other: &Self) -> (Self, Self) {
        let (q, r) = self.0.div_mod_floor(&other.0);
        (Self(q), Self(r))
    }

    /// Significant bits of the magnitude.
    #[must_use]
    pub fn bits(&self) -> u64 {
        self.0.bits()
    }

    /// Exact non-negative `n`-th root, if `self` is a perfect `n`-th power.
    #[must_use]
    pub fn exact_root(&self, n: u32) -> Option<Self> {
        if n == 0 || self.0.is_negative() {
            return None;
        }
        let root = self.0.nth_root(n);
        (root.pow(n) == self.0).then_some(Self(root))
    }

    /// Splits a positive `self` into `outer^n * inner`, moving every `n`-th
    /// power of a divisor below `bound` (and a perfect `n`-th power
    /// remainder) into `outer`. Non-positive values are returned whole.
    #[must_use]
    pub fn split_power(&self, n: u32, bound: u32) -> (Self, Self) {
        let mut outer = BigInt::one();
        let mut inner = self.0.clone();
        if n < 2 || !inner.is_positive() {
            return (Self(outer), Self(inner));
        }
        for d in 2..bound {
            let d = BigInt::from(d);
            // d^n > inner from here on
            if (d.bits() - 1).saturating_mul(u64::from(n)) >= inner.bits() {
                break;
            }
            let step = d.pow(n);
            while (&inner % &step).is_zero() {
                inner /= &step;
                outer *= &d;
            }
        }
        let root = inner.nth_root(n);
        if !inner.is_one() && root.pow(n) == inner {
            outer *= root;
            inner = BigInt::one();
        }
        (Self(outer), Self(inner))
    }

    /// `self ^ exp` for an integer exponent.
    ///
    /// # Errors
    /// Domain error for `0 ^ negative`; not implemented when the result would
    /// exceed [`MAX_EXACT_POWER_BITS`](super::MAX_EXACT_POWER_BITS) and the
    /// base is not `0` or `±1`.
    pub fn pow_integer(&self, exp: &Self) -> Result<Number> {
        if self.is_one() || exp.0.is_zero() {
            return Ok(Number::one());
        }
        if self.0.is_zero() {
            return if exp.0.is_negative() {
                Err(SymError::division_by_zero())
            } else {
                Ok(Number::zero())
            };
        }
        if self.is_minus_one() {
            let sign = if exp.is_even() { 1 } else { -1 };
            return Ok(Number::integer(sign));
        }
        let Some(magnitude) = eager_exponent(self.bits(), exp) else {
            return Err(SymError::not_implemented(format!(
                "integer power {self}^{exp} is too large to evaluate"
            )));
        };
        let power = self.0.pow(magnitude);
        if exp.0.is_negative() {
            Rational::from_ratio(BigInt::one(), power)
        } else {
            Ok(Number::Integer(Self(power)))
        }
    }

    fn to_number(&self) -> Number {
        Number::Integer(self.clone())
    }
}

impl NumberOps for Integer {
    fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    fn is_one(&self) -> bool {
        self.0.is_one()
    }

    fn is_minus_one(&self) -> bool {
        self.0.is_negative() && self.0.magnitude().is_one()
    }

    fn is_positive(&self) -> bool {
        self.0.is_positive()
    }

    fn is_negative(&self) -> bool {
        self.0.is_negative()
    }

    fn is_exact(&self) -> bool {
        true
    }

    fn add(&self, other: &Number) -> Number {
        match other {
            Number::Integer(o) => Number::Integer(Self(&self.0 + &o.0)),
            _ => other.add(&self.to_number()),
        }
    }

    fn sub(&self, other: &Number) -> Number {
        match other {
            Number::Integer(o) => Number::Integer(Self(&self.0 - &o.0)),
            _ => other.rsub(&self.to_number()),
        }
    }

    fn rsub(&self, other: &Number) -> Number {
        match other {
            Number::Integer(o) => Number::Integer(Self(&o.0 - &self.0)),
            _ => other.sub(&self.to_number()),
        }
    }

    fn mul(&self, other: &Number) -> Number {
        match other {
            Number::Integer(o) => Number::Integer(Self(&self.0 * &o.0)),
            _ => other.mul(&self.to_number()),
        }
    }

    fn div(&self, other: &Number) -> Result<Number> {
        match other {
            Number::Integer(o) => Rational::from_ratio(self.0.clone(), o.0.clone()),
            _ => other.rdiv(&self.to_number()),
        }
    }

    fn rdiv(&self, other: &Number) -> Result<Number> {
        match other {
            Number::Integer(o) => Rational::from_ratio(o.0.clone(), self.0.clone()),
            _ => other.div(&self.to_number()),
        }
    }

    fn pow(&self, other: &Number) -> Result<Number> {
        match other {
            Number::Integer(exp) => self.pow_integer(exp),
            _ => other.rpow(&self.to_number()),
        }
    }

    fn rpow(&self, other: &Number) -> Result<Number> {
        // Every kind handles an integer exponent itself.
        other.pow(&self.to_number())
    }
}

impl fmt::Display for Integer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for Integer {
    fn from(value: i64) -> Self {
        Self::new(value)
    }
}

impl From<BigInt> for Integer {
    fn from(value: BigInt) -> Self {
        Self(value)
    }
}
