//! Total order over expressions.
//!
//! Nodes of different kinds order by kind tag. Nodes of the same kind use a
//! per-kind comparator:
//! - numbers: by value within the kind
//! - symbols and constants: by name
//! - `Add`/`Mul`: entry count, then coefficient, then entries sorted by key
//! - `Pow`: base, then exponent
//! - functions: argument count, then arguments left to right
//!
//! The order is consistent with `==`: `expr_cmp(a, b) == Equal` exactly when
//! `a == b`.

use std::cmp::Ordering;

use super::{Expr, ExprKind};

/// Compares two expressions. Antisymmetric and transitive.
pub fn expr_cmp(a: &Expr, b: &Expr) -> Ordering {
    if Expr::ptr_eq(a, b) {
        return Ordering::Equal;
    }
    let (ta, tb) = (a.kind_tag(), b.kind_tag());
    if ta != tb {
        return ta.cmp(&tb);
    }
    match (a.kind(), b.kind()) {
        (ExprKind::Number(x), ExprKind::Number(y)) => x.cmp(y),
        (ExprKind::Symbol(x), ExprKind::Symbol(y)) => x.cmp(y),
        (ExprKind::Constant(x), ExprKind::Constant(y)) => x.cmp(y),
        (ExprKind::Add(x), ExprKind::Add(y)) => x.compare(y),
        (ExprKind::Mul(x), ExprKind::Mul(y)) => x.compare(y),
        (ExprKind::Pow(x), ExprKind::Pow(y)) => expr_cmp(x.base(), y.base())
            .then_with(|| expr_cmp(x.exp(), y.exp())),
        // Same tag, so same function kind
        (ExprKind::Function(x), ExprKind::Function(y)) => expr_cmp(x.arg(), y.arg()),
        (ExprKind::FunctionSymbol(x), ExprKind::FunctionSymbol(y)) => x
            .name()
            .cmp(y.name())
            .then_with(|| cmp_slices(x.args(), y.args())),
        (ExprKind::Derivative(x), ExprKind::Derivative(y)) => expr_cmp(x.arg(), y.arg())
            .then_with(|| cmp_slices(x.symbols(), y.symbols())),
        (ExprKind::Subs(x), ExprKind::Subs(y)) => {
            expr_cmp(x.arg(), y.arg()).then_with(|| cmp_pairs(x.dict(), y.dict()))
        }
        _ => unreachable!("equal kind tags imply equal payload kinds"),
    }
}

/// Length first, then element-wise.
pub(crate) fn cmp_slices(a: &[Expr], b: &[Expr]) -> Ordering {
    a.len()
        .cmp(&b.len())
        .then_with(|| {
            a.iter()
                .zip(b)
                .map(|(x, y)| expr_cmp(x, y))
                .find(|o| o.is_ne())
                .unwrap_or(Ordering::Equal)
        })
}

/// Length first, then pairs element-wise (key before value).
pub(crate) fn cmp_pairs(a: &[(Expr, Expr)], b: &[(Expr, Expr)]) -> Ordering {
    a.len().cmp(&b.len()).then_with(|| {
        a.iter()
            .zip(b)
            .map(|((ka, va), (kb, vb))| expr_cmp(ka, kb).then_with(|| expr_cmp(va, vb)))
            .find(|o| o.is_ne())
            .unwrap_or(Ordering::Equal)
    })
}

impl PartialOrd for Expr {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Expr {
    fn cmp(&self, other: &Self) -> Ordering {
        expr_cmp(self, other)
    }
}
