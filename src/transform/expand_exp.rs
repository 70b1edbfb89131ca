//! Rewrites trigonometric and hyperbolic functions as powers of `E`.

use crate::core::constants;
use crate::core::{Expr, ExprKind, FunctionKind, Result, add, div, exp, integer, mul, neg, sub};
use crate::transform::bottom_up;

/// Replaces every `sin`, `cos`, `tan`, `sinh`, `cosh` and `tanh` by its
/// exponential form:
///
/// - `sin(u) = (E^(I*u) - E^(-I*u)) / (2*I)`
/// - `cos(u) = (E^(I*u) + E^(-I*u)) / 2`
/// - `sinh(u) = (E^u - E^(-u)) / 2`
/// - `cosh(u) = (E^u + E^(-u)) / 2`
///
/// with `tan` and `tanh` as the corresponding quotients. Every other node is
/// rebuilt only if one of its children changed.
///
/// # Errors
/// Whatever a rebuilding factory raises.
pub fn expand_as_exp(expr: &Expr) -> Result<Expr> {
    bottom_up(expr, &mut |node| {
        let ExprKind::Function(f) = node.kind() else {
            return Ok(node.clone());
        };
        match f.kind() {
            FunctionKind::Sin | FunctionKind::Cos | FunctionKind::Tan => {
                let iu = mul(&constants::i(), f.arg());
                circular(f.kind(), &exp(&iu), &exp(&neg(&iu)))
            }
            FunctionKind::Sinh | FunctionKind::Cosh | FunctionKind::Tanh => {
                let u = f.arg();
                hyperbolic(f.kind(), &exp(u), &exp(&neg(u)))
            }
            FunctionKind::Log | FunctionKind::Abs => Ok(node.clone()),
        }
    })
}

/// `plus = E^(I*u)`, `minus = E^(-I*u)`.
fn circular(kind: FunctionKind, plus: &Expr, minus: &Expr) -> Result<Expr> {
    let (diff, sum) = (sub(plus, minus), add(plus, minus));
    match kind {
        FunctionKind::Sin => div(&diff, &mul(&integer(2), &constants::i())),
        FunctionKind::Cos => div(&sum, &integer(2)),
        _ => div(&diff, &mul(&constants::i(), &sum)),
    }
}

/// `plus = E^u`, `minus = E^(-u)`.
fn hyperbolic(kind: FunctionKind, plus: &Expr, minus: &Expr) -> Result<Expr> {
    let (diff, sum) = (sub(plus, minus), add(plus, minus));
    match kind {
        FunctionKind::Sinh => div(&diff, &integer(2)),
        FunctionKind::Cosh => div(&sum, &integer(2)),
        _ => div(&diff, &sum),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, reason = "Standard test relaxations")]
mod tests {
    use super::*;
    use crate::core::traversal::preorder;
    use crate::core::{TypeId, cosh, log, pow, sin, sinh, symbol, tan};

    fn has_function(expr: &Expr) -> bool {
        let mut found = false;
        preorder(expr, &mut |n| found |= n.kind_tag() >= TypeId::Sin);
        found
    }

    #[test]
    fn hyperbolic_forms() {
        let x = symbol("x");
        let (p, m) = (exp(&x), exp(&-&x));
        let half = constants::half();
        assert_eq!(expand_as_exp(&cosh(&x)).unwrap(), mul(&half, &(&p + &m)));
        assert_eq!(expand_as_exp(&sinh(&x)).unwrap(), mul(&half, &(&p - &m)));
    }

    #[test]
    fn circular_forms_use_imaginary_exponents() {
        let x = symbol("x");
        let out = expand_as_exp(&sin(&x)).unwrap();
        assert!(!has_function(&out));
        let mut e_powers = 0;
        preorder(&out, &mut |n| {
            if let Some(p) = n.as_pow() {
                assert_eq!(*p.base(), constants::e());
                e_powers += 1;
            }
        });
        assert_eq!(e_powers, 2);
        assert!(!has_function(&expand_as_exp(&tan(&x)).unwrap()));
    }

    #[test]
    fn nested_and_untouched_nodes() {
        let x = symbol("x");
        let e = sin(&sinh(&x));
        assert!(!has_function(&expand_as_exp(&e).unwrap()));

        let plain = log(&x).unwrap() + pow(&x, &integer(2)).unwrap();
        let out = expand_as_exp(&plain).unwrap();
        assert!(Expr::ptr_eq(&out, &plain));
    }
}
