use std::fmt;

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{Signed, ToPrimitive, Zero};

use super::{Integer, Number, NumberOps, eager_exponent};
use crate::core::error::{Result, SymError};

/// Exact fraction in lowest terms with denominator greater than one.
///
/// Integral values never appear as `Rational`: every constructor demotes
/// them to [`Integer`].
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Rational(BigRational);

impl Rational {
    /// `n/d` reduced to lowest terms.
    ///
    /// # Errors
    /// Domain error when `d` is zero.
    pub fn from_ratio(n: BigInt, d: BigInt) -> Result<Number> {
        if d.is_zero() {
            return Err(SymError::division_by_zero());
        }
        Ok(Self::from_big_rational(BigRational::new(n, d)))
    }

    /// Wraps an already reduced fraction, demoting integral values.
    #[must_use]
    pub fn from_big_rational(value: BigRational) -> Number {
        if value.is_integer() {
            Number::Integer(Integer::new(value.to_integer()))
        } else {
            Number::Rational(Self(value))
        }
    }

    #[inline]
    #[must_use]
    pub fn as_big_rational(&self) -> &BigRational {
        &self.0
    }

    #[must_use]
    pub fn numer(&self) -> Integer {
        Integer::new(self.0.numer().clone())
    }

    #[must_use]
    pub fn denom(&self) -> Integer {
        Integer::new(self.0.denom().clone())
    }

    #[must_use]
    pub fn to_f64(&self) -> f64 {
        self.0.to_f64().unwrap_or(f64::NAN)
    }

    /// Bits of the larger of numerator and denominator.
    #[must_use]
    pub fn bits(&self) -> u64 {
        self.0.numer().bits().max(self.0.denom().bits())
    }

    /// `self ^ exp` for an integer exponent. The receiver is never zero, so
    /// negative exponents always succeed.
    ///
    /// # Errors
    /// Not implemented when the result would be too large to evaluate.
    pub fn pow_integer(&self, exp: &Integer) -> Result<Number> {
        let Some(magnitude) = eager_exponent(self.bits(), exp) else {
            return Err(SymError::not_implemented(format!(
                "rational power ({self})^{exp} is too large to evaluate"
            )));
        };
        let numer = self.0.numer().pow(magnitude);
        let denom = self.0.denom().pow(magnitude);
        if exp.as_bigint().is_negative() {
            Self::from_ratio(denom, numer)
        } else {
            Self::from_ratio(numer, denom)
        }
    }

    fn to_number(&self) -> Number {
        Number::Rational(self.clone())
    }
}

impl NumberOps for Rational {
    fn is_zero(&self) -> bool {
        false
    }

    fn is_one(&self) -> bool {
        false
    }

    fn is_minus_one(&self) -> bool {
        false
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
        match other.to_big_rational() {
            Some(o) => Self::from_big_rational(&self.0 + o),
            None => other.add(&self.to_number()),
        }
    }

    fn sub(&self, other: &Number) -> Number {
        match other.to_big_rational() {
            Some(o) => Self::from_big_rational(&self.0 - o),
            None => other.rsub(&self.to_number()),
        }
    }

    fn rsub(&self, other: &Number) -> Number {
        match other.to_big_rational() {
            Some(o) => Self::from_big_rational(o - &self.0),
            None => other.sub(&self.to_number()),
        }
    }

    fn mul(&self, other: &Number) -> Number {
        match other.to_big_rational() {
            Some(o) => Self::from_big_rational(&self.0 * o),
            None => other.mul(&self.to_number()),
        }
    }

    fn div(&self, other: &Number) -> Result<Number> {
        match other.to_big_rational() {
            Some(o) if o.is_zero() => Err(SymError::division_by_zero()),
            Some(o) => Ok(Self::from_big_rational(&self.0 / o)),
            None => other.rdiv(&self.to_number()),
        }
    }

    fn rdiv(&self, other: &Number) -> Result<Number> {
        match other.to_big_rational() {
            Some(o) => Ok(Self::from_big_rational(o / &self.0)),
            None => other.div(&self.to_number()),
        }
    }

    fn pow(&self, other: &Number) -> Result<Number> {
        match other {
            Number::Integer(exp) => self.pow_integer(exp),
            Number::Rational(_) | Number::Complex(_) => Err(SymError::not_implemented(format!(
                "exact power {self}^({other})"
            ))),
            _ => other.rpow(&self.to_number()),
        }
    }

    fn rpow(&self, other: &Number) -> Result<Number> {
        if other.is_exact() {
            Err(SymError::not_implemented(format!(
                "exact power ({other})^({self})"
            )))
        } else {
            other.pow(&self.to_number())
        }
    }
}

impl fmt::Display for Rational {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.0.numer(), self.0.denom())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, reason = "Standard test relaxations")]
mod tests {
    use super::*;

    #[test]
    fn construction_reduces_and_demotes() {
        let half = Rational::from_ratio(BigInt::from(2), BigInt::from(4)).unwrap();
        assert_eq!(half.to_string(), "1/2");
        let two = Rational::from_ratio(BigInt::from(4), BigInt::from(2)).unwrap();
        assert_eq!(two, Number::integer(2));
        let neg = Rational::from_ratio(BigInt::from(1), BigInt::from(-3)).unwrap();
        assert_eq!(neg.to_string(), "-1/3");
    }

    #[test]
    fn negative_integer_power_inverts() {
        let Number::Rational(two_thirds) =
            Rational::from_ratio(BigInt::from(2), BigInt::from(3)).unwrap()
        else {
            panic!("expected a rational");
        };
        let inv_sq = two_thirds.pow_integer(&Integer::new(-2)).unwrap();
        assert_eq!(inv_sq, Number::rational(9, 4).unwrap());
    }
}
