//! Multiplies out products and integer powers of sums.

use log::trace;

use crate::core::{Expr, ExprKind, Mul, Number, Result, integer, mul, pow};
use crate::transform::bottom_up;

/// Distributes every product over its sum factors and multiplies out
/// integer powers of sums, innermost first:
///
/// - `(x + y)^2` becomes `x^2 + 2*x*y + y^2`
/// - `(x + 1)*(x - 1)` becomes `x^2 - 1`
/// - `(x + y)^-2` becomes `1/(x^2 + 2*x*y + y^2)`
///
/// Sums under a non-integer exponent or inside a function argument are
/// expanded in place but not distributed. A node with nothing to distribute
/// is returned as is.
///
/// # Errors
/// Whatever a rebuilding factory raises.
pub fn expand(expr: &Expr) -> Result<Expr> {
    bottom_up(expr, &mut |node| match node.kind() {
        ExprKind::Pow(p) => match sum_power(p.base(), p.exp()) {
            Some(Power::Positive(n)) => Ok(power_of_sum(p.base(), n)),
            Some(Power::Negative(n)) => pow(&power_of_sum(p.base(), n), &integer(-1)),
            None => Ok(node.clone()),
        },
        ExprKind::Mul(m) => distribute(m).map(|out| out.unwrap_or_else(|| node.clone())),
        _ => Ok(node.clone()),
    })
}

enum Power {
    Positive(u32),
    Negative(u32),
}

/// Integer exponent on a sum, split by sign.
fn sum_power(base: &Expr, exp: &Expr) -> Option<Power> {
    if base.as_add().is_none() {
        return None;
    }
    let k = exp.as_number().and_then(Number::to_i64)?;
    let n = u32::try_from(k.unsigned_abs()).ok()?;
    match k {
        1.. => Some(Power::Positive(n)),
        ..0 => Some(Power::Negative(n)),
        0 => None,
    }
}

/// The summands of an expression, or the expression itself.
fn summands(expr: &Expr) -> Vec<Expr> {
    match expr.kind() {
        ExprKind::Add(a) => a.args(),
        _ => vec![expr.clone()],
    }
}

/// Every pairwise product of `lhs` and `rhs` terms, collected into one sum.
fn cross(lhs: &[Expr], rhs: &[Expr]) -> Expr {
    let mut terms = Vec::with_capacity(lhs.len() * rhs.len());
    for a in lhs {
        for b in rhs {
            terms.push(mul(a, b));
        }
    }
    Expr::sum(terms)
}

/// `base^n` for a sum `base`, multiplied out term by term.
fn power_of_sum(base: &Expr, n: u32) -> Expr {
    let terms = summands(base);
    let mut acc = base.clone();
    for _ in 1..n {
        acc = cross(&summands(&acc), &terms);
    }
    trace!("expand: ({base})^{n} has {} terms", summands(&acc).len());
    acc
}

/// Distributes a product over its sum factors. `None` when no factor is a
/// sum under a positive integer exponent.
fn distribute(m: &Mul) -> Result<Option<Expr>> {
    let mut sums = Vec::new();
    let mut rest = Vec::new();
    for (base, exp) in m.sorted_factors() {
        match sum_power(base, exp) {
            Some(Power::Positive(n)) => sums.push(power_of_sum(base, n)),
            Some(Power::Negative(n)) => rest.push(pow(&power_of_sum(base, n), &integer(-1))?),
            None => rest.push(Mul::factor_expr(base, exp)),
        }
    }
    if sums.is_empty() {
        return Ok(None);
    }
    rest.push(Expr::from(m.coef().clone()));
    let mut acc = vec![Expr::product(rest)];
    for s in &sums {
        acc = summands(&cross(&acc, &summands(s)));
    }
    Ok(Some(Expr::sum(acc)))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, reason = "Standard test relaxations")]
mod tests {
    use super::*;
    use crate::core::{TypeId, div, sin, symbol};

    fn sq(e: &Expr) -> Expr {
        pow(e, &integer(2)).unwrap()
    }

    #[test]
    fn square_of_a_binomial() {
        let (x, y) = (symbol("x"), symbol("y"));
        let out = expand(&sq(&(&x + &y))).unwrap();
        assert_eq!(out, sq(&x) + integer(2) * &x * &y + sq(&y));
        assert_eq!(out.as_add().unwrap().dict().len(), 3);
    }

    #[test]
    fn difference_of_squares_cancels() {
        let x = symbol("x");
        let e = (&x + integer(1)) * (&x - integer(1));
        assert_eq!(e.kind_tag(), TypeId::Mul);
        assert_eq!(expand(&e).unwrap(), sq(&x) - integer(1));
    }

    #[test]
    fn cube_and_coefficients() {
        let x = symbol("x");
        let cube = pow(&(&x + integer(1)), &integer(3)).unwrap();
        let expected = pow(&x, &integer(3)).unwrap()
            + integer(3) * sq(&x)
            + integer(3) * &x
            + integer(1);
        assert_eq!(expand(&cube).unwrap(), expected);

        let (y, z) = (symbol("y"), symbol("z"));
        let e = integer(3) * &z * (&x + &y);
        let e = mul(&e, &(&x - &y));
        assert_eq!(
            expand(&e).unwrap(),
            integer(3) * &z * sq(&x) - integer(3) * &z * sq(&y)
        );
    }

    #[test]
    fn nested_sums_expand_innermost_first() {
        let (x, y) = (symbol("x"), symbol("y"));
        let inner = sq(&(&x + integer(1)));
        let e = mul(&(&inner + &y), &x);
        let expected = pow(&x, &integer(3)).unwrap()
            + integer(2) * sq(&x)
            + &x
            + &x * &y;
        assert_eq!(expand(&e).unwrap(), expected);

        let wrapped = sin(&sq(&(&x + &y)));
        assert_eq!(
            expand(&wrapped).unwrap(),
            sin(&(sq(&x) + integer(2) * &x * &y + sq(&y)))
        );
    }

    #[test]
    fn negative_powers_expand_under_the_reciprocal() {
        let (x, y) = (symbol("x"), symbol("y"));
        let e = pow(&(&x + &y), &integer(-2)).unwrap();
        let den = sq(&x) + integer(2) * &x * &y + sq(&y);
        assert_eq!(expand(&e).unwrap(), div(&integer(1), &den).unwrap());
    }

    #[test]
    fn fractional_powers_and_plain_products_are_kept() {
        let (x, y) = (symbol("x"), symbol("y"));
        let root = pow(&(&x + &y), &crate::core::rational(1, 2).unwrap()).unwrap();
        assert!(Expr::ptr_eq(&expand(&root).unwrap(), &root));

        let plain = integer(2) * &x * sq(&y) + sin(&x);
        assert!(Expr::ptr_eq(&expand(&plain).unwrap(), &plain));
    }
}
