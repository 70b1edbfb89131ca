//! Inexact numbers. Any arithmetic involving one of these yields an inexact
//! result.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use num_complex::Complex64;

use super::{Number, NumberOps};
use crate::core::error::{Result, SymError};

/// `-0.0` is folded into `0.0` so equality and hashing can work on bits.
#[inline]
fn normalize(value: f64) -> f64 {
    if value == 0.0 { 0.0 } else { value }
}

/// Double-precision real.
#[derive(Clone, Copy, Debug)]
pub struct RealDouble(f64);

impl RealDouble {
    #[must_use]
    pub fn new(value: f64) -> Self {
        Self(normalize(value))
    }

    #[inline]
    #[must_use]
    pub fn value(self) -> f64 {
        self.0
    }

    fn to_number(self) -> Number {
        Number::RealDouble(self)
    }
}

impl PartialEq for RealDouble {
    fn eq(&self, other: &Self) -> bool {
        self.0.to_bits() == other.0.to_bits()
    }
}

impl Eq for RealDouble {}

impl Hash for RealDouble {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.to_bits().hash(state);
    }
}

impl PartialOrd for RealDouble {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for RealDouble {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

/// Double-precision complex.
#[derive(Clone, Copy, Debug)]
pub struct ComplexDouble(Complex64);

impl ComplexDouble {
    #[must_use]
    pub fn new(value: Complex64) -> Self {
        Self(Complex64::new(normalize(value.re), normalize(value.im)))
    }

    #[inline]
    #[must_use]
    pub fn value(self) -> Complex64 {
        self.0
    }

    fn to_number(self) -> Number {
        Number::ComplexDouble(self)
    }
}

impl PartialEq for ComplexDouble {
    fn eq(&self, other: &Self) -> bool {
        self.0.re.to_bits() == other.0.re.to_bits() && self.0.im.to_bits() == other.0.im.to_bits()
    }
}

impl Eq for ComplexDouble {}

impl Hash for ComplexDouble {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.re.to_bits().hash(state);
        self.0.im.to_bits().hash(state);
    }
}

impl PartialOrd for ComplexDouble {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ComplexDouble {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0
            .re
            .total_cmp(&other.0.re)
            .then_with(|| self.0.im.total_cmp(&other.0.im))
    }
}

fn check_divisor(divisor: &Number) -> Result<()> {
    if divisor.is_exact_zero() {
        Err(SymError::division_by_zero())
    } else {
        Ok(())
    }
}

/// Real power, switching to the principal complex value for a negative
/// base with a non-integral exponent.
fn real_pow(base: f64, exp: f64) -> Number {
    if base < 0.0 && exp.fract() != 0.0 {
        Number::complex_double(Complex64::new(base, 0.0).powf(exp))
    } else {
        Number::real_double(base.powf(exp))
    }
}

impl NumberOps for RealDouble {
    fn is_zero(&self) -> bool {
        self.0 == 0.0
    }

    fn is_one(&self) -> bool {
        self.0 == 1.0
    }

    fn is_minus_one(&self) -> bool {
        self.0 == -1.0
    }

    fn is_positive(&self) -> bool {
        self.0 > 0.0
    }

    fn is_negative(&self) -> bool {
        self.0 < 0.0
    }

    fn is_exact(&self) -> bool {
        false
    }

    fn add(&self, other: &Number) -> Number {
        match other {
            Number::ComplexDouble(_) => other.add(&self.to_number()),
            Number::Complex(c) => Number::complex_double(c.to_complex64() + self.0),
            real => Number::real_double(self.0 + real.to_f64().unwrap_or(f64::NAN)),
        }
    }

    fn sub(&self, other: &Number) -> Number {
        match other {
            Number::ComplexDouble(_) => other.rsub(&self.to_number()),
            Number::Complex(c) => Number::complex_double(self.0 - c.to_complex64()),
            real => Number::real_double(self.0 - real.to_f64().unwrap_or(f64::NAN)),
        }
    }

    fn rsub(&self, other: &Number) -> Number {
        match other {
            Number::ComplexDouble(_) => other.sub(&self.to_number()),
            Number::Complex(c) => Number::complex_double(c.to_complex64() - self.0),
            real => Number::real_double(real.to_f64().unwrap_or(f64::NAN) - self.0),
        }
    }

    fn mul(&self, other: &Number) -> Number {
        match other {
            Number::ComplexDouble(_) => other.mul(&self.to_number()),
            Number::Complex(c) => Number::complex_double(c.to_complex64() * self.0),
            real => Number::real_double(self.0 * real.to_f64().unwrap_or(f64::NAN)),
        }
    }

    fn div(&self, other: &Number) -> Result<Number> {
        check_divisor(other)?;
        Ok(match other {
            Number::ComplexDouble(_) => return other.rdiv(&self.to_number()),
            Number::Complex(c) => Number::complex_double(self.0 / c.to_complex64()),
            real => Number::real_double(self.0 / real.to_f64().unwrap_or(f64::NAN)),
        })
    }

    fn rdiv(&self, other: &Number) -> Result<Number> {
        Ok(match other {
            Number::ComplexDouble(_) => return other.div(&self.to_number()),
            Number::Complex(c) => Number::complex_double(c.to_complex64() / self.0),
            real => Number::real_double(real.to_f64().unwrap_or(f64::NAN) / self.0),
        })
    }

    fn pow(&self, other: &Number) -> Result<Number> {
        Ok(match other {
            Number::ComplexDouble(_) => return other.rpow(&self.to_number()),
            Number::Complex(c) => {
                Number::complex_double(Complex64::new(self.0, 0.0).powc(c.to_complex64()))
            }
            Number::Integer(i) => match i.to_i64().and_then(|k| i32::try_from(k).ok()) {
                Some(k) => Number::real_double(self.0.powi(k)),
                None => real_pow(self.0, i.to_f64()),
            },
            real => real_pow(self.0, real.to_f64().unwrap_or(f64::NAN)),
        })
    }

    fn rpow(&self, other: &Number) -> Result<Number> {
        Ok(match other {
            Number::ComplexDouble(_) => return other.pow(&self.to_number()),
            Number::Complex(c) => Number::complex_double(c.to_complex64().powf(self.0)),
            real => real_pow(real.to_f64().unwrap_or(f64::NAN), self.0),
        })
    }
}

impl NumberOps for ComplexDouble {
    fn is_zero(&self) -> bool {
        self.0.re == 0.0 && self.0.im == 0.0
    }

    fn is_one(&self) -> bool {
        self.0.re == 1.0 && self.0.im == 0.0
    }

    fn is_minus_one(&self) -> bool {
        self.0.re == -1.0 && self.0.im == 0.0
    }

    fn is_positive(&self) -> bool {
        false
    }

    fn is_negative(&self) -> bool {
        false
    }

    fn is_exact(&self) -> bool {
        false
    }

    fn add(&self, other: &Number) -> Number {
        Number::complex_double(self.0 + other.to_complex64())
    }

    fn sub(&self, other: &Number) -> Number {
        Number::complex_double(self.0 - other.to_complex64())
    }

    fn rsub(&self, other: &Number) -> Number {
        Number::complex_double(other.to_complex64() - self.0)
    }

    fn mul(&self, other: &Number) -> Number {
        Number::complex_double(self.0 * other.to_complex64())
    }

    fn div(&self, other: &Number) -> Result<Number> {
        check_divisor(other)?;
        Ok(Number::complex_double(self.0 / other.to_complex64()))
    }

    fn rdiv(&self, other: &Number) -> Result<Number> {
        Ok(Number::complex_double(other.to_complex64() / self.0))
    }

    fn pow(&self, other: &Number) -> Result<Number> {
        if let Some(k) = other.to_i64().and_then(|k| i32::try_from(k).ok()) {
            return Ok(Number::complex_double(self.0.powi(k)));
        }
        Ok(Number::complex_double(self.0.powc(other.to_complex64())))
    }

    fn rpow(&self, other: &Number) -> Result<Number> {
        Ok(Number::complex_double(other.to_complex64().powc(self.0)))
    }
}

impl fmt::Display for RealDouble {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Debug formatting keeps the decimal point on integral values.
        write!(f, "{:?}", self.0)
    }
}

impl fmt::Display for ComplexDouble {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0.im.is_sign_negative() { '-' } else { '+' };
        write!(f, "{:?} {sign} {:?}*I", self.0.re, self.0.im.abs())
    }
}
