//! Generic walks over [`Expr::children`].
//!
//! None of these need per-kind code except [`free_symbols`], which has to
//! know that the keys of a `Subs` are bound.

use std::collections::BTreeSet;

use rustc_hash::FxHashSet;

use crate::core::expr::{Expr, ExprKind};
use crate::core::symbol::Symbol;

/// Visits every node, parent before children. Shared subtrees are visited
/// once per occurrence.
pub fn preorder(expr: &Expr, f: &mut impl FnMut(&Expr)) {
    f(expr);
    for child in expr.children() {
        preorder(&child, f);
    }
}

/// Visits every node, children before parent.
pub fn postorder(expr: &Expr, f: &mut impl FnMut(&Expr)) {
    for child in expr.children() {
        postorder(&child, f);
    }
    f(expr);
}

/// Pre-order walk that skips the children of a node when `f` returns
/// `false`.
pub fn preorder_until(expr: &Expr, f: &mut impl FnMut(&Expr) -> bool) {
    if f(expr) {
        for child in expr.children() {
            preorder_until(&child, f);
        }
    }
}

/// Distinct subexpressions, each listed once, in first-seen pre-order.
#[must_use]
pub fn unique_subexpressions(expr: &Expr) -> Vec<Expr> {
    let mut seen = FxHashSet::default();
    let mut out = Vec::new();
    preorder_until(expr, &mut |e| {
        if seen.insert(e.clone()) {
            out.push(e.clone());
            true
        } else {
            false
        }
    });
    out
}

/// Symbols occurring free in `expr`. Keys of an unevaluated substitution are
/// bound inside its argument.
#[must_use]
pub fn free_symbols(expr: &Expr) -> BTreeSet<Symbol> {
    let mut out = BTreeSet::new();
    collect_free(expr, &mut out);
    out
}

fn collect_free(expr: &Expr, out: &mut BTreeSet<Symbol>) {
    match expr.kind() {
        ExprKind::Symbol(s) => {
            out.insert(s.clone());
        }
        ExprKind::Subs(s) => {
            let mut inner = free_symbols(s.arg());
            for (key, value) in s.dict() {
                if let Some(k) = key.as_symbol() {
                    inner.remove(k);
                }
                collect_free(value, out);
            }
            out.extend(inner);
        }
        _ => {
            for child in expr.children() {
                collect_free(&child, out);
            }
        }
    }
}

/// `true` if `symbol` occurs anywhere in `expr`.
#[must_use]
pub fn has_symbol(expr: &Expr, symbol: &Symbol) -> bool {
    match expr.kind() {
        ExprKind::Symbol(s) => s == symbol,
        _ => expr.children().iter().any(|c| has_symbol(c, symbol)),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, reason = "Standard test relaxations")]
mod tests {
    use super::*;
    use crate::core::expr::{integer, pow, symbol};
    use crate::core::functions::{derivative, function_symbol, sin, subs_node};

    fn sym(name: &str) -> Symbol {
        Symbol::new(name)
    }

    #[test]
    fn walks_visit_every_node() {
        let x = symbol("x");
        let e = sin(&x) + pow(&x, &integer(2)).unwrap();
        let mut pre = Vec::new();
        preorder(&e, &mut |n| pre.push(n.clone()));
        let mut post = Vec::new();
        postorder(&e, &mut |n| post.push(n.clone()));
        assert_eq!(pre.len(), post.len());
        assert_eq!(pre[0], e);
        assert_eq!(post.last(), Some(&e));
        assert_eq!(pre.iter().filter(|n| **n == x).count(), 2);
    }

    #[test]
    fn unique_subexpressions_dedup_shared_nodes() {
        let x = symbol("x");
        let e = sin(&x) + pow(&x, &integer(2)).unwrap();
        let unique = unique_subexpressions(&e);
        assert_eq!(unique.iter().filter(|n| **n == x).count(), 1);
    }

    #[test]
    fn free_symbols_respect_substitution_binding() {
        let (x, y, z) = (symbol("x"), symbol("y"), symbol("z"));
        let f = function_symbol("f", vec![x.clone(), y.clone()]);
        let d = derivative(&f, vec![x.clone()]).unwrap();
        let s = subs_node(&d, vec![(x.clone(), z.clone())]);
        let free = free_symbols(&s);
        assert_eq!(free, BTreeSet::from([sym("y"), sym("z")]));
        assert!(has_symbol(&s, &sym("x")));
        assert!(!has_symbol(&s, &sym("w")));
    }

    #[test]
    fn numbers_have_no_symbols() {
        assert!(free_symbols(&integer(4)).is_empty());
    }
}
