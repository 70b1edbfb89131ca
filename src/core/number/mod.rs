//! Numeric kinds and the capability set they share.
//!
//! Five concrete kinds exist, ordered by arithmetic rank:
//!
//! | rank | kind            | exact |
//! |------|-----------------|-------|
//! | 0    | [`Integer`]       | yes   |
//! | 1    | [`Rational`]      | yes   |
//! | 2    | [`Complex`]       | yes   |
//! | 3    | [`RealDouble`]    | no    |
//! | 4    | [`ComplexDouble`] | no    |
//!
//! # Mixed-kind arithmetic
//!
//! Binary operations are resolved by two chained single dispatches. The
//! [`Number`] enum dispatches on the left operand and hands the right operand
//! to the concrete left kind. That kind handles every right operand of rank
//! lower than or equal to its own; for a higher-ranked right operand it calls
//! the right operand's complementary operation with itself as argument:
//!
//! - `a + b` → `b.add(a)`, `a * b` → `b.mul(a)`
//! - `a - b` → `b.rsub(a)` (computes `a - b`)
//! - `a / b` → `b.rdiv(a)` (computes `a / b`)
//! - `a ^ b` → `b.rpow(a)` (computes `a ^ b`)
//!
//! Fallback only ever moves to a strictly higher rank, so resolution
//! terminates, and no kind needs to know about kinds ranked above it.

mod complex;
mod float;
mod integer;
mod rational;

use std::fmt;

use num_bigint::BigInt;
use num_complex::Complex64;
use num_rational::BigRational;
use num_traits::ToPrimitive;

pub use complex::Complex;
pub use float::{ComplexDouble, RealDouble};
pub use integer::Integer;
pub use rational::Rational;

use crate::core::error::Result;

/// Largest exact power, in bits of the result's parts, that is evaluated
/// eagerly. Beyond it `b^k` stays a symbolic power.
pub const MAX_EXACT_POWER_BITS: u64 = 1 << 20;

/// Exponent magnitude for an eager power of a base whose parts have at most
/// `base_bits` bits, or `None` when the result would exceed
/// [`MAX_EXACT_POWER_BITS`].
pub(crate) fn eager_exponent(base_bits: u64, exp: &Integer) -> Option<u32> {
    let k = exp.as_bigint().magnitude().to_u32()?;
    (base_bits.saturating_mul(u64::from(k)) <= MAX_EXACT_POWER_BITS).then_some(k)
}

/// Capability set shared by every numeric kind.
///
/// `sub`, `div` and `pow` take the receiver as the left operand; `rsub`,
/// `rdiv` and `rpow` take it as the right operand and exist so a lower-ranked
/// kind can defer to a higher-ranked one.
pub trait NumberOps {
    /// Additive identity (exact `0`, or inexact `0.0`).
    fn is_zero(&self) -> bool;
    /// Multiplicative identity.
    fn is_one(&self) -> bool;
    /// `-1`.
    fn is_minus_one(&self) -> bool;
    /// Strictly positive real. Always `false` for complex kinds.
    fn is_positive(&self) -> bool;
    /// Strictly negative real. Always `false` for complex kinds.
    fn is_negative(&self) -> bool;
    /// `false` for floating-point kinds.
    fn is_exact(&self) -> bool;

    /// Exact zero, the only value that absorbs a product and the only
    /// divisor rejected with a domain error.
    fn is_exact_zero(&self) -> bool {
        self.is_exact() && self.is_zero()
    }

    /// `self + other`
    fn add(&self, other: &Number) -> Number;
    /// `self - other`
    fn sub(&self, other: &Number) -> Number;
    /// `other - self`
    fn rsub(&self, other: &Number) -> Number;
    /// `self * other`
    fn mul(&self, other: &Number) -> Number;
    /// `self / other`
    fn div(&self, other: &Number) -> Result<Number>;
    /// `other / self`
    fn rdiv(&self, other: &Number) -> Result<Number>;
    /// `self ^ other`
    fn pow(&self, other: &Number) -> Result<Number>;
    /// `other ^ self`
    fn rpow(&self, other: &Number) -> Result<Number>;
}

/// A numeric value of any kind.
///
/// Variant order matches the kind-tag order, so the derived `Ord` compares
/// kind first and value second.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Number {
    Integer(Integer),
    Rational(Rational),
    Complex(Complex),
    RealDouble(RealDouble),
    ComplexDouble(ComplexDouble),
}

impl Number {
    /// Small integer shortcut.
    #[must_use]
    pub fn integer(value: i64) -> Self {
        Self::Integer(Integer::new(value))
    }

    /// Exact `n/d` in lowest terms; demotes to an [`Integer`] when `d`
    /// divides `n`.
    ///
    /// # Errors
    /// Domain error when `d` is zero.
    pub fn rational(n: impl Into<BigInt>, d: impl Into<BigInt>) -> Result<Self> {
        Rational::from_ratio(n.into(), d.into())
    }

    /// Inexact real.
    #[must_use]
    pub fn real_double(value: f64) -> Self {
        Self::RealDouble(RealDouble::new(value))
    }

    /// Inexact complex.
    #[must_use]
    pub fn complex_double(value: Complex64) -> Self {
        Self::ComplexDouble(ComplexDouble::new(value))
    }

    #[must_use]
    pub fn zero() -> Self {
        Self::integer(0)
    }

    #[must_use]
    pub fn one() -> Self {
        Self::integer(1)
    }

    #[must_use]
    pub fn minus_one() -> Self {
        Self::integer(-1)
    }

    /// `-self`
    #[must_use]
    pub fn neg(&self) -> Self {
        self.mul(&Self::minus_one())
    }

    /// The value as an exact rational, for the exact real kinds.
    #[must_use]
    pub fn to_big_rational(&self) -> Option<BigRational> {
        match self {
            Self::Integer(i) => Some(BigRational::from_integer(i.as_bigint().clone())),
            Self::Rational(r) => Some(r.as_big_rational().clone()),
            _ => None,
        }
    }

    /// Nearest `f64` for the real kinds.
    #[must_use]
    pub fn to_f64(&self) -> Option<f64> {
        match self {
            Self::Integer(i) => Some(i.to_f64()),
            Self::Rational(r) => r.as_big_rational().to_f64(),
            Self::RealDouble(d) => Some(d.value()),
            Self::Complex(_) | Self::ComplexDouble(_) => None,
        }
    }

    /// Nearest double-precision complex value. Total over all kinds.
    #[must_use]
    pub fn to_complex64(&self) -> Complex64 {
        match self {
            Self::Complex(c) => c.to_complex64(),
            Self::ComplexDouble(c) => c.value(),
            real => Complex64::new(real.to_f64().unwrap_or(f64::NAN), 0.0),
        }
    }

    /// Integer value when the number is an [`Integer`] that fits an `i64`.
    #[must_use]
    pub fn to_i64(&self) -> Option<i64> {
        match self {
            Self::Integer(i) => i.to_i64(),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_integer(&self) -> bool {
        matches!(self, Self::Integer(_))
    }

    #[must_use]
    pub fn is_rational(&self) -> bool {
        matches!(self, Self::Rational(_))
    }

    /// Inexact kinds collapse any arithmetic they take part in to inexact.
    #[must_use]
    pub fn is_inexact(&self) -> bool {
        !self.is_exact()
    }

    /// `true` if the exact power `self^exp` is too large to evaluate and
    /// stays symbolic. Zero and `±1` bases are always evaluated.
    #[must_use]
    pub fn defers_power(&self, exp: &Integer) -> bool {
        let bits = match self {
            Self::Integer(n) => {
                if n.is_zero() || n.is_one() || n.is_minus_one() {
                    return false;
                }
                n.bits()
            }
            Self::Rational(r) => r.bits(),
            Self::Complex(c) => c.bits(),
            Self::RealDouble(_) | Self::ComplexDouble(_) => return false,
        };
        eager_exponent(bits, exp).is_none()
    }

    /// Rank in the mutual-fallback chain.
    #[must_use]
    pub fn rank(&self) -> u8 {
        match self {
            Self::Integer(_) => 0,
            Self::Rational(_) => 1,
            Self::Complex(_) => 2,
            Self::RealDouble(_) => 3,
            Self::ComplexDouble(_) => 4,
        }
    }
}

macro_rules! forward_to_kind {
    ($self:ident, $n:ident => $body:expr) => {
        match $self {
            Number::Integer($n) => $body,
            Number::Rational($n) => $body,
            Number::Complex($n) => $body,
            Number::RealDouble($n) => $body,
            Number::ComplexDouble($n) => $body,
        }
    };
}

impl NumberOps for Number {
    fn is_zero(&self) -> bool {
        forward_to_kind!(self, n => n.is_zero())
    }

    fn is_one(&self) -> bool {
        forward_to_kind!(self, n => n.is_one())
    }

    fn is_minus_one(&self) -> bool {
        forward_to_kind!(self, n => n.is_minus_one())
    }

    fn is_positive(&self) -> bool {
        forward_to_kind!(self, n => n.is_positive())
    }

    fn is_negative(&self) -> bool {
        forward_to_kind!(self, n => n.is_negative())
    }

    fn is_exact(&self) -> bool {
        forward_to_kind!(self, n => n.is_exact())
    }

    fn add(&self, other: &Number) -> Number {
        forward_to_kind!(self, n => n.add(other))
    }

    fn sub(&self, other: &Number) -> Number {
        forward_to_kind!(self, n => n.sub(other))
    }

    fn rsub(&self, other: &Number) -> Number {
        forward_to_kind!(self, n => n.rsub(other))
    }

    fn mul(&self, other: &Number) -> Number {
        forward_to_kind!(self, n => n.mul(other))
    }

    fn div(&self, other: &Number) -> Result<Number> {
        forward_to_kind!(self, n => n.div(other))
    }

    fn rdiv(&self, other: &Number) -> Result<Number> {
        forward_to_kind!(self, n => n.rdiv(other))
    }

    fn pow(&self, other: &Number) -> Result<Number> {
        forward_to_kind!(self, n => n.pow(other))
    }

    fn rpow(&self, other: &Number) -> Result<Number> {
        forward_to_kind!(self, n => n.rpow(other))
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        forward_to_kind!(self, n => fmt::Display::fmt(n, f))
    }
}

impl From<i64> for Number {
    fn from(value: i64) -> Self {
        Self::integer(value)
    }
}

impl From<Integer> for Number {
    fn from(value: Integer) -> Self {
        Self::Integer(value)
    }
}

impl From<f64> for Number {
    fn from(value: f64) -> Self {
        Self::real_double(value)
    }
}
