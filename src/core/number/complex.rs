use std::fmt;

use num_complex::Complex64;
use num_rational::BigRational;
use num_traits::{One, Signed, ToPrimitive, Zero};

use super::{Integer, Number, NumberOps, Rational, eager_exponent};
use crate::core::error::{Result, SymError};

/// Exact complex number `re + im*I` with rational parts and `im != 0`.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Complex {
    re: BigRational,
    im: BigRational,
}

impl Complex {
    /// Builds `re + im*I`, demoting to a real kind when `im` is zero.
    #[must_use]
    pub fn from_parts(re: BigRational, im: BigRational) -> Number {
        if im.is_zero() {
            Rational::from_big_rational(re)
        } else {
            Number::Complex(Self { re, im })
        }
    }

    /// The imaginary unit.
    #[must_use]
    pub fn i() -> Number {
        Self::from_parts(BigRational::zero(), BigRational::one())
    }

    #[must_use]
    pub fn real_part(&self) -> Number {
        Rational::from_big_rational(self.re.clone())
    }

    #[must_use]
    pub fn imaginary_part(&self) -> Number {
        Rational::from_big_rational(self.im.clone())
    }

    /// `true` when the real part is zero.
    #[must_use]
    pub fn is_pure_imaginary(&self) -> bool {
        self.re.is_zero()
    }

    #[must_use]
    pub fn to_complex64(&self) -> Complex64 {
        Complex64::new(
            self.re.to_f64().unwrap_or(f64::NAN),
            self.im.to_f64().unwrap_or(f64::NAN),
        )
    }

    fn mul_parts(&self, re: &BigRational, im: &BigRational) -> (BigRational, BigRational) {
        (
            &self.re * re - &self.im * im,
            &self.re * im + &self.im * re,
        )
    }

    fn norm_sqr(&self) -> BigRational {
        &self.re * &self.re + &self.im * &self.im
    }

    /// `1 / self`; never fails since `im != 0`.
    fn recip_parts(&self) -> (BigRational, BigRational) {
        let n = self.norm_sqr();
        (&self.re / &n, -(&self.im / &n))
    }

    /// Bits of the largest numerator or denominator of either part.
    #[must_use]
    pub fn bits(&self) -> u64 {
        [
            self.re.numer(),
            self.re.denom(),
            self.im.numer(),
            self.im.denom(),
        ]
        .into_iter()
        .map(|part| part.bits())
        .max()
        .unwrap_or(0)
    }

    /// Exact power by squaring.
    ///
    /// # Errors
    /// Not implemented when the result would be too large to evaluate.
    pub fn pow_integer(&self, exp: &Integer) -> Result<Number> {
        let Some(mut k) = eager_exponent(self.bits(), exp) else {
            return Err(SymError::not_implemented(format!(
                "complex power ({self})^{exp} is too large to evaluate"
            )));
        };
        let (mut base_re, mut base_im) = if exp.as_bigint().is_negative() {
            self.recip_parts()
        } else {
            (self.re.clone(), self.im.clone())
        };
        let mut acc = (BigRational::one(), BigRational::zero());
        while k > 0 {
            if k & 1 == 1 {
                acc = (
                    &acc.0 * &base_re - &acc.1 * &base_im,
                    &acc.0 * &base_im + &acc.1 * &base_re,
                );
            }
            k >>= 1;
            if k > 0 {
                let sq_re = &base_re * &base_re - &base_im * &base_im;
                let sq_im = BigRational::from_integer(2.into()) * &base_re * &base_im;
                base_re = sq_re;
                base_im = sq_im;
            }
        }
        Ok(Self::from_parts(acc.0, acc.1))
    }

    fn to_number(&self) -> Number {
        Number::Complex(self.clone())
    }
}

impl NumberOps for Complex {
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
        false
    }

    fn is_negative(&self) -> bool {
        false
    }

    fn is_exact(&self) -> bool {
        true
    }

    fn add(&self, other: &Number) -> Number {
        match other {
            Number::Complex(o) => Self::from_parts(&self.re + &o.re, &self.im + &o.im),
            _ => match other.to_big_rational() {
                Some(r) => Self::from_parts(&self.re + r, self.im.clone()),
                None => other.add(&self.to_number()),
            },
        }
    }

    fn sub(&self, other: &Number) -> Number {
        match other {
            Number::Complex(o) => Self::from_parts(&self.re - &o.re, &self.im - &o.im),
            _ => match other.to_big_rational() {
                Some(r) => Self::from_parts(&self.re - r, self.im.clone()),
                None => other.rsub(&self.to_number()),
            },
        }
    }

    fn rsub(&self, other: &Number) -> Number {
        match other {
            Number::Complex(o) => Self::from_parts(&o.re - &self.re, &o.im - &self.im),
            _ => match other.to_big_rational() {
                Some(r) => Self::from_parts(r - &self.re, -self.im.clone()),
                None => other.sub(&self.to_number()),
            },
        }
    }

    fn mul(&self, other: &Number) -> Number {
        match other {
            Number::Complex(o) => {
                let (re, im) = self.mul_parts(&o.re, &o.im);
                Self::from_parts(re, im)
            }
            _ => match other.to_big_rational() {
                Some(r) => Self::from_parts(&self.re * &r, &self.im * &r),
                None => other.mul(&self.to_number()),
            },
        }
    }

    fn div(&self, other: &Number) -> Result<Number> {
        match other {
            Number::Complex(o) => {
                let (re, im) = o.recip_parts();
                let (re, im) = self.mul_parts(&re, &im);
                Ok(Self::from_parts(re, im))
            }
            _ => match other.to_big_rational() {
                Some(r) if r.is_zero() => Err(SymError::division_by_zero()),
                Some(r) => Ok(Self::from_parts(&self.re / &r, &self.im / &r)),
                None => other.rdiv(&self.to_number()),
            },
        }
    }

    fn rdiv(&self, other: &Number) -> Result<Number> {
        match other.to_big_rational() {
            Some(r) => {
                let (re, im) = self.recip_parts();
                Ok(Self::from_parts(re * &r, im * &r))
            }
            None => other.div(&self.to_number()),
        }
    }

    fn pow(&self, other: &Number) -> Result<Number> {
        match other {
            Number::Integer(exp) => self.pow_integer(exp),
            _ if other.is_exact() => Err(SymError::not_implemented(format!(
                "exact power ({self})^({other})"
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

impl fmt::Display for Complex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let im = Rational::from_big_rational(self.im.abs());
        let im_term = if im.is_one() {
            "I".to_owned()
        } else {
            format!("{im}*I")
        };
        if self.re.is_zero() {
            let sign = if self.im.is_negative() { "-" } else { "" };
            return write!(f, "{sign}{im_term}");
        }
        let sign = if self.im.is_negative() { '-' } else { '+' };
        write!(f, "{} {sign} {im_term}", self.real_part())
    }
}
