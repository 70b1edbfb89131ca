//! Structural hashing.
//!
//! The hash of a node depends only on its kind tag and on the hashes of its
//! children, so it is computed once when the node is built. `Add` and `Mul`
//! store their entries in hash maps with no iteration order; each entry is
//! hashed on its own and the per-entry hashes are combined with a wrapping
//! sum, which makes the result independent of insertion and iteration order.

use std::hash::{Hash, Hasher};

use rustc_hash::FxHasher;

use super::ExprKind;
use crate::core::number::Number;

#[inline]
fn number_hash(n: &Number) -> u64 {
    let mut hasher = FxHasher::default();
    n.hash(&mut hasher);
    hasher.finish()
}

#[inline]
fn entry_hash(key: u64, value: u64) -> u64 {
    let mut hasher = FxHasher::default();
    hasher.write_u64(key);
    hasher.write_u64(value);
    hasher.finish()
}

/// Order-independent combination of entry hashes.
#[inline]
fn commutative_sum(entries: impl Iterator<Item = u64>) -> u64 {
    entries.fold(0u64, u64::wrapping_add)
}

/// Computes the structural hash of a payload.
pub fn compute_expr_hash(kind: &ExprKind) -> u64 {
    let mut hasher = FxHasher::default();
    (kind.tag() as u8).hash(&mut hasher);

    match kind {
        ExprKind::Number(n) => n.hash(&mut hasher),
        ExprKind::Symbol(s) => s.hash(&mut hasher),
        ExprKind::Constant(c) => c.name().hash(&mut hasher),

        ExprKind::Add(add) => {
            hasher.write_u64(number_hash(add.coef()));
            let terms = add
                .dict()
                .iter()
                .map(|(term, mult)| entry_hash(term.structural_hash(), number_hash(mult)));
            hasher.write_u64(commutative_sum(terms));
        }

        ExprKind::Mul(mul) => {
            hasher.write_u64(number_hash(mul.coef()));
            let factors = mul
                .dict()
                .iter()
                .map(|(base, exp)| entry_hash(base.structural_hash(), exp.structural_hash()));
            hasher.write_u64(commutative_sum(factors));
        }

        // Non-commutative
        ExprKind::Pow(p) => {
            hasher.write_u64(p.base().structural_hash());
            hasher.write_u64(p.exp().structural_hash());
        }

        ExprKind::Function(f) => hasher.write_u64(f.arg().structural_hash()),

        ExprKind::FunctionSymbol(f) => {
            f.name().hash(&mut hasher);
            hasher.write_usize(f.args().len());
            for arg in f.args() {
                hasher.write_u64(arg.structural_hash());
            }
        }

        // Symbols are kept sorted, so sequence hashing is stable
        ExprKind::Derivative(d) => {
            hasher.write_u64(d.arg().structural_hash());
            for s in d.symbols() {
                hasher.write_u64(s.structural_hash());
            }
        }

        ExprKind::Subs(s) => {
            hasher.write_u64(s.arg().structural_hash());
            for (k, v) in s.dict() {
                hasher.write_u64(k.structural_hash());
                hasher.write_u64(v.structural_hash());
            }
        }
    }

    hasher.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::expr::{Expr, integer, symbol};

    #[test]
    fn entry_order_does_not_matter() {
        let (x, y, z) = (symbol("x"), symbol("y"), symbol("z"));
        let a = Expr::sum(vec![x.clone(), y.clone(), z.clone()]);
        let b = Expr::sum(vec![z.clone(), x.clone(), y.clone()]);
        assert_eq!(compute_expr_hash(a.kind()), compute_expr_hash(b.kind()));
        let p = Expr::product(vec![x.clone(), y.clone(), integer(3)]);
        let q = Expr::product(vec![integer(3), y, x]);
        assert_eq!(p.structural_hash(), q.structural_hash());
    }

    #[test]
    fn kinds_with_same_children_differ() {
        let x = symbol("x");
        let s = crate::core::functions::sin(&x).structural_hash();
        let c = crate::core::functions::cos(&x).structural_hash();
        assert_ne!(s, c);
    }
}
