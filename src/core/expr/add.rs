//! Canonical sums.
//!
//! A sum is stored as `coef + Σ mult·term` where `coef` and every `mult` are
//! numbers and the terms are the keys of a hash map. Canonical form:
//! - the map is never empty, and a single term with a zero `coef` (exact or
//!   `0.0`) is a product instead (`3*x`, not `0 + 3*x`; `x + 0.0` is `x`)
//! - no term is a number or another sum
//! - a product term carries coefficient one (its coefficient lives in the
//!   multiplicity)
//! - no multiplicity is zero

use std::cmp::Ordering;

use rustc_hash::FxHashMap;

use super::mul::{FactorDict, Mul, fold_factor};
use super::{Expr, ExprKind, expr_cmp, is_exact_one};
use crate::core::number::{Number, NumberOps};

/// term → multiplicity
pub type TermDict = FxHashMap<Expr, Number>;

/// Payload of a sum node.
#[derive(Debug, PartialEq, Eq)]
pub struct Add {
    coef: Number,
    dict: TermDict,
}

impl Add {
    /// Constant part.
    #[inline]
    #[must_use]
    pub fn coef(&self) -> &Number {
        &self.coef
    }

    /// Non-constant terms with their multiplicities.
    #[inline]
    #[must_use]
    pub fn dict(&self) -> &TermDict {
        &self.dict
    }

    /// Terms in canonical order.
    #[must_use]
    pub fn sorted_terms(&self) -> Vec<(&Expr, &Number)> {
        let mut terms: Vec<_> = self.dict.iter().collect();
        terms.sort_by(|a, b| expr_cmp(a.0, b.0));
        terms
    }

    /// `mult*term` as a standalone expression.
    #[must_use]
    pub fn term_expr(term: &Expr, mult: &Number) -> Expr {
        if is_exact_one(mult) {
            return term.clone();
        }
        let mut coef = mult.clone();
        let mut dict = FactorDict::default();
        fold_factor(&mut coef, &mut dict, term);
        Mul::from_canonical(coef, dict)
    }

    /// Coefficient (unless exact zero) and every `mult*term`, sorted.
    #[must_use]
    pub fn args(&self) -> Vec<Expr> {
        let mut out = Vec::with_capacity(self.dict.len() + 1);
        if !self.coef.is_exact_zero() {
            out.push(Expr::from(self.coef.clone()));
        }
        let mut terms: Vec<Expr> = self
            .dict
            .iter()
            .map(|(t, m)| Self::term_expr(t, m))
            .collect();
        terms.sort();
        out.extend(terms);
        out
    }

    /// Canonical-form predicate for a prospective `(coef, dict)`.
    #[must_use]
    pub fn is_canonical(coef: &Number, dict: &TermDict) -> bool {
        if dict.is_empty() {
            return false;
        }
        if dict.len() == 1 && coef.is_zero() {
            return false;
        }
        dict.iter().all(|(term, mult)| {
            !mult.is_zero()
                && match term.kind() {
                    ExprKind::Number(_) | ExprKind::Add(_) => false,
                    ExprKind::Mul(m) => is_exact_one(m.coef()),
                    _ => true,
                }
        })
    }

    /// Builds a canonical sum from arbitrary `(term, multiplicity)` pairs.
    ///
    /// Duplicate terms are merged by summing multiplicities, zero entries are
    /// dropped, numeric terms fold into `coef`, nested sums are flattened and
    /// product coefficients move into the multiplicity. Degenerate results
    /// collapse to a number or to the single remaining term.
    pub fn from_dict<I>(coef: Number, terms: I) -> Expr
    where
        I: IntoIterator<Item = (Expr, Number)>,
    {
        let mut coef = coef;
        let mut dict = TermDict::default();
        for (term, mult) in terms {
            coef_dict_add_term(&mut coef, &mut dict, &mult, &term);
        }
        Self::from_canonical(coef, dict)
    }

    /// Builds from a dictionary that already satisfies every entry-level
    /// invariant, collapsing degenerate shapes.
    pub(crate) fn from_canonical(coef: Number, dict: TermDict) -> Expr {
        if dict.is_empty() {
            return Expr::from(coef);
        }
        if dict.len() == 1 && coef.is_zero() {
            let Some((term, mult)) = dict.into_iter().next() else {
                unreachable!("length checked above")
            };
            return Self::term_expr(&term, &mult);
        }
        debug_assert!(
            Self::is_canonical(&coef, &dict),
            "non-canonical sum: coef {coef}, {} terms",
            dict.len()
        );
        Expr::from_kind(ExprKind::Add(Add { coef, dict }))
    }

    /// Splits an expression into `(numeric coefficient, coefficient-free
    /// term)`.
    #[must_use]
    pub fn as_coef_term(expr: &Expr) -> (Number, Expr) {
        match expr.kind() {
            ExprKind::Number(n) => (n.clone(), Expr::from(Number::one())),
            ExprKind::Mul(m) if !is_exact_one(m.coef()) => (
                m.coef().clone(),
                Mul::from_canonical(Number::one(), m.dict().clone()),
            ),
            _ => (Number::one(), expr.clone()),
        }
    }

    /// `self * c` with `c` distributed over every term.
    pub(crate) fn scale(&self, c: &Number) -> Expr {
        let dict: TermDict = self
            .dict
            .iter()
            .map(|(t, m)| (t.clone(), m.mul(c)))
            .filter(|(_, m)| !m.is_zero())
            .collect();
        Self::from_canonical(self.coef.mul(c), dict)
    }

    pub(crate) fn compare(&self, other: &Self) -> Ordering {
        self.dict
            .len()
            .cmp(&other.dict.len())
            .then_with(|| self.coef.cmp(&other.coef))
            .then_with(|| {
                let (a, b) = (self.sorted_terms(), other.sorted_terms());
                a.iter()
                    .zip(&b)
                    .map(|((ta, ma), (tb, mb))| expr_cmp(ta, tb).then_with(|| ma.cmp(mb)))
                    .find(|o| o.is_ne())
                    .unwrap_or(Ordering::Equal)
            })
    }
}

/// Adds `mult*term` to `dict`, merging with an existing entry and erasing
/// it if the multiplicities cancel. `term` must already be a valid key.
pub(crate) fn dict_add_term(dict: &mut TermDict, mult: Number, term: &Expr) {
    if let Some(existing) = dict.get_mut(term) {
        let merged = existing.add(&mult);
        if merged.is_zero() {
            dict.remove(term);
        } else {
            *existing = merged;
        }
    } else if !mult.is_zero() {
        dict.insert(term.clone(), mult);
    }
}

/// Adds `mult*term` for an arbitrary canonical `term`: numbers go to the
/// coefficient, sums are flattened (scaled by `mult`), products contribute
/// their coefficient to the multiplicity.
pub(crate) fn coef_dict_add_term(
    coef: &mut Number,
    dict: &mut TermDict,
    mult: &Number,
    term: &Expr,
) {
    match term.kind() {
        ExprKind::Number(n) => *coef = coef.add(&mult.mul(n)),
        ExprKind::Add(a) => {
            if is_exact_one(mult) {
                *coef = coef.add(a.coef());
                for (t, m) in a.dict() {
                    dict_add_term(dict, m.clone(), t);
                }
            } else {
                *coef = coef.add(&a.coef().mul(mult));
                for (t, m) in a.dict() {
                    dict_add_term(dict, m.mul(mult), t);
                }
            }
        }
        _ => {
            let (c, t) = Add::as_coef_term(term);
            let m = if is_exact_one(&c) {
                mult.clone()
            } else {
                mult.mul(&c)
            };
            dict_add_term(dict, m, &t);
        }
    }
}

/// Sum of canonical expressions.
pub(crate) fn add_all<'a, I>(terms: I) -> Expr
where
    I: IntoIterator<Item = &'a Expr>,
{
    let mut coef = Number::zero();
    let mut dict = TermDict::default();
    let one = Number::one();
    for term in terms {
        coef_dict_add_term(&mut coef, &mut dict, &one, term);
    }
    Add::from_canonical(coef, dict)
}

impl Expr {
    /// Canonical n-ary sum.
    #[must_use]
    pub fn sum(terms: Vec<Expr>) -> Expr {
        add_all(&terms)
    }
}
