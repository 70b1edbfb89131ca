//! Structural substitution.
//!
//! A node is looked up in the replacement map before anything else; a hit
//! replaces the whole subtree. Sums and products are rebuilt entry by entry
//! through the canonical dictionary helpers, so terms that become equal
//! merge (`subs(x + y, {x: y}) = 2*y`).
//!
//! Two flavours differ only on unevaluated derivatives:
//! - [`subs`] pushes a replacement through `Derivative(f(x), x)` when it is a
//!   pure renaming the derivative does not depend on, and otherwise wraps the
//!   result in an unevaluated `Subs`
//! - [`msubs`] treats a derivative as an opaque atom, so `f(t)` and
//!   `Derivative(f(t), t)` are independent targets

use rustc_hash::FxHashMap;

use crate::core::expr::{coef_dict_add_term, dict_add_term_new, fold_factor};
use crate::core::visitor::Visitor;
use crate::core::{
    Add, Derivative, Expr, ExprKind, FactorDict, Function, FunctionSymbol, Mul, Number, NumberOps,
    Pow, Result, Subs, TermDict, derivative, function_symbol, mul, pow, subs_node,
};
use crate::diff::diff;

/// Replacement map: target subexpression → replacement.
pub type SubsMap = FxHashMap<Expr, Expr>;

/// Replaces every occurrence of a key of `map` in `expr`.
///
/// # Errors
/// Whatever a rebuilding factory raises (e.g. `subs(1/x, {x: 0})` is a
/// division by zero).
pub fn subs(expr: &Expr, map: &SubsMap) -> Result<Expr> {
    SubsVisitor::new(map, false).apply(expr)
}

/// Like [`subs`], but unevaluated derivatives are left untouched.
///
/// # Errors
/// Same as [`subs`].
pub fn msubs(expr: &Expr, map: &SubsMap) -> Result<Expr> {
    SubsVisitor::new(map, true).apply(expr)
}

/// Builder for a substitution.
///
/// # Example
/// ```
/// use symb_core::transform::Substitution;
/// use symb_core::{integer, symbol};
///
/// let (x, y) = (symbol("x"), symbol("y"));
/// let out = Substitution::new()
///     .replace(x.clone(), y.clone())
///     .apply(&(&x + &y))
///     .unwrap();
/// assert_eq!(out, integer(2) * &y);
/// ```
#[derive(Clone, Debug, Default)]
pub struct Substitution {
    map: SubsMap,
    opaque_derivatives: bool,
}

impl Substitution {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `from → to`. A later replacement for the same target wins.
    #[must_use]
    pub fn replace(mut self, from: impl Into<Expr>, to: impl Into<Expr>) -> Self {
        self.map.insert(from.into(), to.into());
        self
    }

    /// Leave unevaluated derivatives untouched (the [`msubs`] behaviour).
    #[must_use]
    pub fn opaque_derivatives(mut self, opaque: bool) -> Self {
        self.opaque_derivatives = opaque;
        self
    }

    #[must_use]
    pub fn map(&self) -> &SubsMap {
        &self.map
    }

    /// Runs the substitution.
    ///
    /// # Errors
    /// Same as [`subs`].
    pub fn apply(&self, expr: &Expr) -> Result<Expr> {
        SubsVisitor::new(&self.map, self.opaque_derivatives).apply(expr)
    }
}

struct SubsVisitor<'a> {
    map: &'a SubsMap,
    opaque_derivatives: bool,
}

impl<'a> SubsVisitor<'a> {
    fn new(map: &'a SubsMap, opaque_derivatives: bool) -> Self {
        Self {
            map,
            opaque_derivatives,
        }
    }

    fn apply(&mut self, expr: &Expr) -> Result<Expr> {
        if let Some(replacement) = self.map.get(expr) {
            return Ok(replacement.clone());
        }
        expr.accept(self)
    }

    /// Same substitution flavour with a different map.
    fn with_map(&self, map: &SubsMap, expr: &Expr) -> Result<Expr> {
        SubsVisitor::new(map, self.opaque_derivatives).apply(expr)
    }

    /// Map entries in canonical key order, for deterministic results.
    fn sorted_entries(&self) -> Vec<(&'a Expr, &'a Expr)> {
        let mut entries: Vec<_> = self.map.iter().collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));
        entries
    }
}

fn unchanged(new: &Expr, old: &Expr) -> bool {
    Expr::ptr_eq(new, old) || new == old
}

impl Visitor for SubsVisitor<'_> {
    type Output = Result<Expr>;

    // Atoms not in the map
    fn visit_default(&mut self, expr: &Expr) -> Result<Expr> {
        Ok(expr.clone())
    }

    fn visit_add(&mut self, _: &Expr, add: &Add) -> Result<Expr> {
        let one = Number::one();
        let mut dict = TermDict::default();
        let mut coef = add.coef().clone();
        if !coef.is_exact_zero()
            && let Some(value) = self.map.get(&Expr::from(coef.clone()))
        {
            coef = Number::zero();
            coef_dict_add_term(&mut coef, &mut dict, &one, value);
        }

        for (term, mult) in add.dict() {
            // Whole term `mult*term`, then the multiplicity on its own
            if let Some(value) = self.map.get(&Add::term_expr(term, mult)) {
                coef_dict_add_term(&mut coef, &mut dict, &one, value);
            } else if let Some(value) = self.map.get(&Expr::from(mult.clone())) {
                let scaled = mul(value, &self.apply(term)?);
                coef_dict_add_term(&mut coef, &mut dict, &one, &scaled);
            } else {
                let new = self.apply(term)?;
                coef_dict_add_term(&mut coef, &mut dict, mult, &new);
            }
        }
        Ok(Add::from_canonical(coef, dict))
    }

    fn visit_mul(&mut self, _: &Expr, m: &Mul) -> Result<Expr> {
        let mut coef = m.coef().clone();
        let mut dict = FactorDict::default();
        for (base, exp) in m.dict() {
            let old = Mul::factor_expr(base, exp);
            let new = self.apply(&old)?;
            if unchanged(&new, &old) {
                dict_add_term_new(&mut coef, &mut dict, exp.clone(), base.clone());
                continue;
            }
            if let Some(n) = new.as_number()
                && n.is_zero()
            {
                return Ok(new);
            }
            fold_factor(&mut coef, &mut dict, &new);
        }
        Ok(Mul::from_canonical(coef, dict))
    }

    fn visit_pow(&mut self, expr: &Expr, p: &Pow) -> Result<Expr> {
        let base = self.apply(p.base())?;
        let exp = self.apply(p.exp())?;
        if unchanged(&base, p.base()) && unchanged(&exp, p.exp()) {
            return Ok(expr.clone());
        }
        pow(&base, &exp)
    }

    fn visit_function(&mut self, expr: &Expr, f: &Function) -> Result<Expr> {
        let arg = self.apply(f.arg())?;
        if unchanged(&arg, f.arg()) {
            return Ok(expr.clone());
        }
        f.kind().apply(&arg)
    }

    fn visit_function_symbol(&mut self, expr: &Expr, f: &FunctionSymbol) -> Result<Expr> {
        let args = f
            .args()
            .iter()
            .map(|a| self.apply(a))
            .collect::<Result<Vec<_>>>()?;
        if args.iter().zip(f.args()).all(|(new, old)| unchanged(new, old)) {
            return Ok(expr.clone());
        }
        Ok(function_symbol(f.name(), args))
    }

    fn visit_derivative(&mut self, expr: &Expr, d: &Derivative) -> Result<Expr> {
        if self.opaque_derivatives {
            return Ok(expr.clone());
        }
        // `pushed`: replacements that commute with the differentiation and go
        // inside; `kept`: the rest, applied afterwards as an unevaluated Subs
        let mut pushed = SubsMap::default();
        let mut kept = Vec::new();
        for (from, to) in self.sorted_entries() {
            let single = SubsMap::from_iter([(from.clone(), to.clone())]);
            if self.with_map(&single, d.arg())? == *d.arg() {
                continue;
            }
            if from.is_symbol() && to.is_symbol() && diff(d.arg(), to)?.is_zero() {
                pushed.insert(from.clone(), to.clone());
                continue;
            }
            let mut commutes = true;
            for s in d.symbols() {
                if !diff(from, s)?.is_zero() || !diff(to, s)?.is_zero() {
                    commutes = false;
                    break;
                }
            }
            if commutes {
                pushed.insert(from.clone(), to.clone());
            } else {
                kept.push((from.clone(), to.clone()));
            }
        }

        let symbols = d
            .symbols()
            .iter()
            .map(|s| self.with_map(&pushed, s))
            .collect::<Result<Vec<_>>>()?;
        let inner = derivative(&self.with_map(&pushed, d.arg())?, symbols)?;
        Ok(subs_node(&inner, kept))
    }

    fn visit_subs(&mut self, _: &Expr, s: &Subs) -> Result<Expr> {
        // Replacements whose target is not one of the bound keys go inside
        let mut inner_map = SubsMap::default();
        for (from, to) in self.sorted_entries() {
            let single = SubsMap::from_iter([(from.clone(), to.clone())]);
            let mut rebinds = false;
            for (key, _) in s.dict() {
                if self.with_map(&single, key)? != *key {
                    rebinds = true;
                    break;
                }
            }
            if !rebinds {
                inner_map.insert(from.clone(), to.clone());
            }
        }

        let mut pairs = Vec::with_capacity(s.dict().len());
        for (key, value) in s.dict() {
            pairs.push((key.clone(), self.apply(value)?));
        }
        let presub = self.with_map(&inner_map, s.arg())?;
        if let ExprKind::Subs(nested) = presub.kind() {
            // Outer bindings win over the nested ones
            for (key, value) in nested.dict() {
                if !pairs.iter().any(|(k, _)| k == key) {
                    pairs.push((key.clone(), value.clone()));
                }
            }
            return Ok(subs_node(nested.arg(), pairs));
        }
        Ok(subs_node(&presub, pairs))
    }
}

impl Expr {
    /// Replaces every occurrence of a key of `map`; see [`subs`].
    ///
    /// # Errors
    /// Whatever a rebuilding factory raises.
    pub fn subs(&self, map: &SubsMap) -> Result<Expr> {
        subs(self, map)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, reason = "Standard test relaxations")]
mod tests {
    use super::*;
    use crate::core::{SymError, cos, div, integer, rational, sin, symbol};

    fn map(pairs: &[(Expr, Expr)]) -> SubsMap {
        pairs.iter().cloned().collect()
    }

    #[test]
    fn merged_terms_recanonicalize() {
        let (x, y) = (symbol("x"), symbol("y"));
        let out = subs(&(&x + &y), &map(&[(x.clone(), y.clone())])).unwrap();
        assert_eq!(out, integer(2) * &y);
        assert!(out.as_add().is_none());
    }

    #[test]
    fn identity_map_returns_same_node() {
        let (x, y) = (symbol("x"), symbol("y"));
        let e = sin(&x) * &y + pow(&x, &integer(3)).unwrap();
        let out = subs(&e, &map(&[(x.clone(), x.clone())])).unwrap();
        assert_eq!(out, e);
    }

    #[test]
    fn factors_merge_and_zero_absorbs() {
        let (x, y) = (symbol("x"), symbol("y"));
        let e = &x * &y;
        let out = subs(&e, &map(&[(y.clone(), x.clone())])).unwrap();
        assert_eq!(out, pow(&x, &integer(2)).unwrap());
        let out = subs(&e, &map(&[(y.clone(), integer(0))])).unwrap();
        assert_eq!(out, integer(0));
    }

    #[test]
    fn whole_term_and_subexpression_targets() {
        let (x, y) = (symbol("x"), symbol("y"));
        let two_x = integer(2) * &x;
        let e = &two_x + &y;
        let out = subs(&e, &map(&[(two_x.clone(), integer(5))])).unwrap();
        assert_eq!(out, &y + integer(5));
        let s = sin(&x);
        let out = subs(&(&s * &y), &map(&[(s.clone(), cos(&x))])).unwrap();
        assert_eq!(out, cos(&x) * &y);
    }

    #[test]
    fn numeric_substitution_evaluates() {
        let x = symbol("x");
        let e = pow(&x, &integer(2)).unwrap() + integer(1);
        let out = subs(&e, &map(&[(x.clone(), integer(3))])).unwrap();
        assert_eq!(out, integer(10));
        let out = subs(&sin(&x), &map(&[(x.clone(), integer(0))])).unwrap();
        assert_eq!(out, integer(0));
    }

    #[test]
    fn substituting_into_a_pole_is_a_domain_error() {
        let x = symbol("x");
        let e = div(&integer(1), &x).unwrap();
        let err = subs(&e, &map(&[(x.clone(), integer(0))])).unwrap_err();
        assert!(matches!(err, SymError::Domain(_)));
    }

    #[test]
    fn renaming_goes_through_a_derivative() {
        let (x, y) = (symbol("x"), symbol("y"));
        let f = |a: &Expr| function_symbol("f", vec![a.clone()]);
        let d = derivative(&f(&x), vec![x.clone()]).unwrap();
        let out = subs(&d, &map(&[(x.clone(), y.clone())])).unwrap();
        assert_eq!(out, derivative(&f(&y), vec![y.clone()]).unwrap());
    }

    #[test]
    fn evaluating_a_derivative_at_a_point_wraps_in_subs() {
        let x = symbol("x");
        let f = function_symbol("f", vec![x.clone()]);
        let d = derivative(&f, vec![x.clone()]).unwrap();
        let out = subs(&d, &map(&[(x.clone(), integer(0))])).unwrap();
        assert_eq!(out, subs_node(&d, vec![(x.clone(), integer(0))]));
    }

    #[test]
    fn msubs_leaves_derivatives_alone() {
        let t = symbol("t");
        let f = function_symbol("f", vec![t.clone()]);
        let d = derivative(&f, vec![t.clone()]).unwrap();
        let (q, qd) = (symbol("q"), symbol("qd"));
        let e = &f + &d;
        let m = map(&[(f.clone(), q.clone()), (d.clone(), qd.clone())]);
        assert_eq!(msubs(&e, &m).unwrap(), &q + &qd);
        // f(t) alone does not reach inside the derivative
        let only_f = map(&[(f.clone(), q.clone())]);
        assert_eq!(msubs(&e, &only_f).unwrap(), &q + &d);
    }

    #[test]
    fn nested_subs_merge() {
        let (x, y, z) = (symbol("x"), symbol("y"), symbol("z"));
        let f = function_symbol("f", vec![x.clone(), y.clone()]);
        let d = derivative(&f, vec![x.clone()]).unwrap();
        let at = subs_node(&d, vec![(x.clone(), integer(0))]);
        let out = subs(&at, &map(&[(y.clone(), z.clone())])).unwrap();
        let expected = subs_node(
            &derivative(&function_symbol("f", vec![x.clone(), z.clone()]), vec![x.clone()])
                .unwrap(),
            vec![(x.clone(), integer(0))],
        );
        assert_eq!(out, expected);
    }

    #[test]
    fn builder_matches_free_functions() {
        let (x, y) = (symbol("x"), symbol("y"));
        let e = &x * rational(1, 2).unwrap() + &y;
        let built = Substitution::new().replace(x.clone(), y.clone()).apply(&e).unwrap();
        assert_eq!(built, subs(&e, &map(&[(x.clone(), y.clone())])).unwrap());
        assert_eq!(built, rational(3, 2).unwrap() * &y);
    }
}
