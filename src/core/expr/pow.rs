//! Canonical powers.

use log::trace;
use num_rational::BigRational;
use num_traits::{ToPrimitive, Zero};

use super::mul::{FactorDict, Mul};
use super::{Expr, ExprKind, is_exact_one, mul};
use crate::core::constants;
use crate::core::error::{Result, SymError};
use crate::core::number::{Complex, Integer, Number, NumberOps, Rational};

/// Payload of a power node `base^exp`.
#[derive(Debug, PartialEq, Eq)]
pub struct Pow {
    base: Expr,
    exp: Expr,
}

impl Pow {
    #[inline]
    #[must_use]
    pub fn base(&self) -> &Expr {
        &self.base
    }

    #[inline]
    #[must_use]
    pub fn exp(&self) -> &Expr {
        &self.exp
    }

    /// Canonical-form predicate for a prospective `base^exp`.
    #[must_use]
    pub fn is_canonical(base: &Expr, exp: &Expr) -> bool {
        if let Some(e) = exp.as_number()
            && (e.is_zero() || is_exact_one(e))
        {
            return false;
        }
        if let Some(b) = base.as_number() {
            if b.is_exact_zero() || is_exact_one(b) {
                return false;
            }
            if let Some(e) = exp.as_number() {
                if b.is_inexact() || e.is_inexact() {
                    return false;
                }
                // Only powers too large to evaluate survive
                if let Number::Integer(k) = e {
                    return b.defers_power(k);
                }
            }
        }
        match base.kind() {
            ExprKind::Mul(_) | ExprKind::Pow(_) => !exp.as_number().is_some_and(Number::is_integer),
            _ => true,
        }
    }

    /// Wraps `base^exp` without normalization. Callers guarantee the pair is
    /// canonical.
    pub(crate) fn new_unchecked(base: Expr, exp: Expr) -> Expr {
        debug_assert!(
            Self::is_canonical(&base, &exp),
            "non-canonical power ({base})^({exp})"
        );
        Expr::from_kind(ExprKind::Pow(Pow { base, exp }))
    }
}

/// Canonical `base^exp`.
///
/// - `x^0 = 1` (including `0^0`), `x^1 = x`, `1^x = 1`, `0^x = 0`
/// - numeric powers evaluate; an exact fractional power of a rational keeps
///   only the irreducible surd (`12^(1/2) = 2*3^(1/2)`), and a negative base
///   under a square root contributes `I`
/// - `(c*x*y)^n` distributes for integer `n`; `(b^e)^n = b^(e*n)` for
///   integer `n`
///
/// # Errors
/// Domain error for `0^e` with a negative real `e`.
pub fn pow(base: &Expr, exp: &Expr) -> Result<Expr> {
    if let Some(e) = exp.as_number() {
        if e.is_zero() {
            if e.is_exact() {
                return Ok(constants::one());
            }
            return Ok(match base.as_number() {
                Some(b) => Expr::from(b.pow(e)?),
                None => Expr::from(Number::real_double(1.0)),
            });
        }
        if is_exact_one(e) {
            return Ok(base.clone());
        }
    }

    if let Some(b) = base.as_number() {
        if b.is_exact_zero() {
            return match exp.as_number() {
                Some(e) if e.is_negative() => Err(SymError::division_by_zero()),
                Some(e) if e.is_inexact() => Ok(Expr::from(b.pow(e)?)),
                _ => Ok(constants::zero()),
            };
        }
        if is_exact_one(b) {
            return Ok(constants::one());
        }
        return match exp.as_number() {
            Some(e) => pow_number(b, e, base, exp),
            None => Ok(Pow::new_unchecked(base.clone(), exp.clone())),
        };
    }

    if let Some(e) = exp.as_number() {
        match base.kind() {
            ExprKind::Mul(m) => {
                let mut coef = Number::one();
                let mut dict = FactorDict::default();
                m.power_num(base, &mut coef, &mut dict, e)?;
                return Ok(Mul::from_canonical(coef, dict));
            }
            ExprKind::Pow(p) if e.is_integer() => {
                return pow(p.base(), &mul(p.exp(), exp));
            }
            _ => {}
        }
    }
    Ok(Pow::new_unchecked(base.clone(), exp.clone()))
}

/// `b^e` for numeric `b` (neither exact zero nor exact one) and numeric `e`.
fn pow_number(b: &Number, e: &Number, base: &Expr, exp: &Expr) -> Result<Expr> {
    match (b, e) {
        (_, Number::Integer(_)) => match b.pow(e) {
            Ok(value) => Ok(Expr::from(value)),
            Err(err) if err.is_not_implemented() => {
                Ok(Pow::new_unchecked(base.clone(), exp.clone()))
            }
            Err(err) => Err(err),
        },
        (Number::Integer(n), Number::Rational(r)) => {
            integer_rational_power(n, &r.numer(), &r.denom(), base, exp)
        }
        (Number::Rational(q), Number::Rational(r)) => {
            // (n/d)^e = n^e * d^(-e)
            let numer = integer_rational_power(&q.numer(), &r.numer(), &r.denom(), base, exp)?;
            let neg_num = Integer::new(-r.numer().into_bigint());
            let denom = integer_rational_power(&q.denom(), &neg_num, &r.denom(), base, exp)?;
            Ok(&numer * &denom)
        }
        _ if b.is_exact() && e.is_exact() => Ok(Pow::new_unchecked(base.clone(), exp.clone())),
        _ => Ok(Expr::from(b.pow(e)?)),
    }
}

/// Trial divisors tried when pulling perfect powers out of a radicand.
const SURD_TRIAL_BOUND: u32 = 1000;

/// `n^(num/den)` with `den > 1`: integral part of the exponent into the
/// coefficient, perfect `den`-th power factors of `n` pulled out of the
/// radical, the remaining surd kept with an exponent in `(0, 1)`.
fn integer_rational_power(
    n: &Integer,
    num: &Integer,
    den: &Integer,
    base: &Expr,
    exp: &Expr,
) -> Result<Expr> {
    let unevaluated = || -> Result<Expr> { Ok(Pow::new_unchecked(base.clone(), exp.clone())) };
    let Some(degree) = den.as_bigint().to_u32() else {
        return unevaluated();
    };
    let (q, rem) = num.div_mod_floor(den);
    let mut coef = match n.pow_integer(&q) {
        Ok(value) => value,
        Err(err) if err.is_not_implemented() => return unevaluated(),
        Err(err) => return Err(err),
    };
    if rem.as_bigint().is_zero() {
        return Ok(Expr::from(coef));
    }

    let mut radicand = n.clone();
    if radicand.is_negative() && degree == 2 {
        // (-a)^(1/2) = I * a^(1/2)
        coef = coef.mul(&Complex::i());
        radicand = radicand.abs();
    }
    let (outer, inner) = radicand.split_power(degree, SURD_TRIAL_BOUND);
    if !outer.is_one() {
        trace!("exact root: {radicand}^(1/{degree}) = {outer}*{inner}^(1/{degree})");
        match outer.pow_integer(&rem) {
            Ok(value) => coef = coef.mul(&value),
            Err(err) if err.is_not_implemented() => return unevaluated(),
            Err(err) => return Err(err),
        }
    }
    if inner.is_one() {
        return Ok(Expr::from(coef));
    }

    let reduced = Rational::from_big_rational(BigRational::new(
        rem.into_bigint(),
        den.as_bigint().clone(),
    ));
    let mut dict = FactorDict::default();
    dict.insert(Expr::from(Number::Integer(inner)), Expr::from(reduced));
    Ok(Mul::from_canonical(coef, dict))
}

impl Expr {
    /// `self^exp`; see [`pow`].
    ///
    /// # Errors
    /// Domain error for `0^e` with a negative real `e`.
    pub fn pow(&self, exp: &Expr) -> Result<Expr> {
        pow(self, exp)
    }
}
