//! Rebuild-on-change recursion shared by every rewrite.

use log::trace;

use crate::core::{Expr, Result};

/// Applies `f` to every child of `expr` and rebuilds the node through its
/// factory. If no child changed, `expr` itself is returned and nothing is
/// allocated.
///
/// # Errors
/// Whatever `f` or the node's factory raises.
pub fn map_children(expr: &Expr, f: &mut dyn FnMut(&Expr) -> Result<Expr>) -> Result<Expr> {
    let children = expr.children();
    if children.is_empty() {
        return Ok(expr.clone());
    }
    let mut changed = false;
    let mut rewritten = Vec::with_capacity(children.len());
    for child in &children {
        let new = f(child)?;
        changed |= !Expr::ptr_eq(&new, child) && new != *child;
        rewritten.push(new);
    }
    if changed {
        expr.with_children(rewritten)
    } else {
        Ok(expr.clone())
    }
}

/// Top-down rewrite: `f` sees each node before its children. `Some(r)`
/// replaces the node by `r` without descending into it; `None` recurses into
/// the children and rebuilds.
///
/// # Errors
/// Whatever `f` or a rebuilding factory raises.
pub fn transform<F>(expr: &Expr, f: &mut F) -> Result<Expr>
where
    F: FnMut(&Expr) -> Result<Option<Expr>>,
{
    if let Some(replacement) = f(expr)? {
        return Ok(replacement);
    }
    map_children(expr, &mut |child| transform(child, f))
}

/// Post-order rewrite: children first, the node is rebuilt if any child
/// changed, then `f` is applied to the (possibly rebuilt) node.
///
/// # Errors
/// Whatever `f` or a rebuilding factory raises.
pub fn bottom_up<F>(expr: &Expr, f: &mut F) -> Result<Expr>
where
    F: FnMut(&Expr) -> Result<Expr>,
{
    let rebuilt = map_children(expr, &mut |child| bottom_up(child, f))?;
    let out = f(&rebuilt)?;
    if out != rebuilt {
        trace!("bottom_up: {rebuilt} -> {out}");
    }
    Ok(out)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, reason = "Standard test relaxations")]
mod tests {
    use super::*;
    use crate::core::{cos, integer, pow, sin, symbol};

    #[test]
    fn unchanged_tree_is_reused() {
        let x = symbol("x");
        let e = sin(&x) + pow(&x, &integer(2)).unwrap() * symbol("y");
        let same = bottom_up(&e, &mut |n| Ok(n.clone())).unwrap();
        assert!(Expr::ptr_eq(&same, &e));
        let same = transform(&e, &mut |_| Ok(None)).unwrap();
        assert!(Expr::ptr_eq(&same, &e));
    }

    #[test]
    fn rewrite_recanonicalizes_parent() {
        let (x, y) = (symbol("x"), symbol("y"));
        let e = &x + &y;
        let out = bottom_up(&e, &mut |n| {
            Ok(if *n == x { y.clone() } else { n.clone() })
        })
        .unwrap();
        assert_eq!(out, integer(2) * &y);
    }

    #[test]
    fn bottom_up_sees_rebuilt_nodes() {
        let x = symbol("x");
        let e = sin(&sin(&x));
        // sin -> cos, innermost first
        let out = bottom_up(&e, &mut |n| {
            Ok(match n.kind() {
                crate::core::ExprKind::Function(f) => cos(f.arg()),
                _ => n.clone(),
            })
        })
        .unwrap();
        assert_eq!(out, cos(&cos(&x)));
    }

    #[test]
    fn transform_stops_at_replaced_nodes() {
        let x = symbol("x");
        let e = sin(&x) + &x;
        let mut visited = 0;
        let out = transform(&e, &mut |n| {
            visited += 1;
            Ok(n.kind_tag().eq(&crate::core::TypeId::Sin).then(|| integer(1)))
        })
        .unwrap();
        assert_eq!(out, &x + integer(1));
        // root, x, sin(x); the argument of sin is never reached
        assert_eq!(visited, 3);
    }
}
