//! Free-function constructors.
//!
//! Every function here returns a canonical node. Infallible ones cover the
//! operations that can never hit an undefined case (`add`, `mul`, `neg`,
//! ...); the rest return [`Result`].

use num_bigint::BigInt;

use super::add::add_all;
use super::mul::mul_all;
use super::pow::pow;
use super::{Expr, is_exact_one};
use crate::core::constants;
use crate::core::error::{Result, SymError};
use crate::core::number::{Complex, Number, NumberOps, Rational};
use crate::core::symbol::Symbol;

/// Interned symbol.
#[must_use]
pub fn symbol(name: &str) -> Expr {
    Expr::from(Symbol::new(name))
}

/// Exact integer.
#[must_use]
pub fn integer(value: i64) -> Expr {
    Expr::from(Number::integer(value))
}

/// Exact `n / d` in lowest terms (an integer when `d` divides `n`).
///
/// # Errors
/// Domain error when `d` is zero.
pub fn rational(n: i64, d: i64) -> Result<Expr> {
    Rational::from_ratio(BigInt::from(n), BigInt::from(d)).map(Expr::from)
}

/// Exact complex number `re + im*I`; a real number when `im` is zero.
///
/// # Errors
/// Type error when either part is not an exact real (integer or rational).
pub fn complex(re: Number, im: Number) -> Result<Expr> {
    let part = |n: Number| {
        n.to_big_rational().ok_or(SymError::Type {
            expected: "exact real number",
            found: Expr::from(n).kind_tag(),
        })
    };
    let (re, im) = (part(re)?, part(im)?);
    Ok(Expr::from(Complex::from_parts(re, im)))
}

/// Machine-precision real number.
#[must_use]
pub fn real_double(value: f64) -> Expr {
    Expr::from(Number::real_double(value))
}

/// `a + b`
#[must_use]
pub fn add(a: &Expr, b: &Expr) -> Expr {
    add_all([a, b])
}

/// `a - b`
#[must_use]
pub fn sub(a: &Expr, b: &Expr) -> Expr {
    add(a, &neg(b))
}

/// `a * b`
#[must_use]
pub fn mul(a: &Expr, b: &Expr) -> Expr {
    if let (Some(x), Some(y)) = (a.as_number(), b.as_number()) {
        return Expr::from(x.mul(y));
    }
    if a.is_one() {
        return b.clone();
    }
    if b.is_one() {
        return a.clone();
    }
    mul_all([a, b])
}

/// `-a`
#[must_use]
pub fn neg(a: &Expr) -> Expr {
    match a.as_number() {
        Some(n) => Expr::from(n.neg()),
        None => mul(&constants::minus_one(), a),
    }
}

/// `a / b`, built as `a * b^-1`.
///
/// # Errors
/// Domain error when `b` is an exact zero.
pub fn div(a: &Expr, b: &Expr) -> Result<Expr> {
    if let (Some(x), Some(y)) = (a.as_number(), b.as_number()) {
        return x.div(y).map(Expr::from);
    }
    if b.as_number().is_some_and(is_exact_one) {
        return Ok(a.clone());
    }
    let inverse = pow(b, &constants::minus_one())?;
    Ok(mul(a, &inverse))
}

/// `x^(1/2)`
#[must_use]
pub fn sqrt(x: &Expr) -> Expr {
    // Exponent 1/2 is positive, so only the zero-base domain check could
    // fire, and 0^(1/2) is 0.
    match pow(x, &constants::half()) {
        Ok(e) => e,
        Err(err) => unreachable!("square root cannot fail: {err}"),
    }
}

/// `x^(1/n)`
///
/// # Errors
/// Domain error for the zeroth root.
pub fn root(x: &Expr, n: i64) -> Result<Expr> {
    if n == 0 {
        return Err(SymError::domain("zeroth root"));
    }
    pow(x, &rational(1, n)?)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, reason = "Standard test relaxations")]
mod tests {
    use super::*;
    use crate::core::expr::TypeId;

    #[test]
    fn rational_reduces_and_demotes() {
        assert_eq!(rational(4, 2).unwrap(), integer(2));
        assert_eq!(rational(2, 4).unwrap(), rational(-1, -2).unwrap());
        assert!(matches!(rational(1, 0), Err(SymError::Domain(_))));
    }

    #[test]
    fn complex_requires_exact_parts() {
        let z = complex(Number::integer(3), Number::integer(-1)).unwrap();
        assert_eq!(z.kind_tag(), TypeId::Complex);
        assert_eq!(complex(Number::integer(3), Number::zero()).unwrap(), integer(3));
        let err = complex(Number::real_double(1.5), Number::one()).unwrap_err();
        assert_eq!(
            err,
            SymError::Type {
                expected: "exact real number",
                found: TypeId::RealDouble
            }
        );
    }

    #[test]
    fn arithmetic_on_numbers_folds() {
        assert_eq!(add(&integer(2), &integer(3)), integer(5));
        assert_eq!(sub(&integer(2), &integer(3)), integer(-1));
        assert_eq!(mul(&integer(6), &rational(1, 3).unwrap()), integer(2));
        assert_eq!(div(&integer(1), &integer(2)).unwrap(), rational(1, 2).unwrap());
        assert_eq!(neg(&integer(7)), integer(-7));
    }

    #[test]
    fn division_by_exact_zero_fails() {
        let x = symbol("x");
        assert!(matches!(div(&x, &integer(0)), Err(SymError::Domain(_))));
        assert!(matches!(div(&integer(1), &integer(0)), Err(SymError::Domain(_))));
    }

    #[test]
    fn division_cancels() {
        let x = symbol("x");
        assert_eq!(div(&x, &x).unwrap(), integer(1));
        let e = div(&(integer(6) * &x), &integer(3)).unwrap();
        assert_eq!(e, integer(2) * &x);
    }

    #[test]
    fn roots() {
        assert_eq!(sqrt(&integer(9)), integer(3));
        assert_eq!(root(&integer(27), 3).unwrap(), integer(3));
        assert!(matches!(root(&integer(27), 0), Err(SymError::Domain(_))));
        assert_eq!(sqrt(&integer(0)), integer(0));
    }

    #[test]
    fn double_negation() {
        let x = symbol("x");
        assert_eq!(neg(&neg(&x)), x);
        assert_eq!(sub(&x, &x), integer(0));
    }
}
