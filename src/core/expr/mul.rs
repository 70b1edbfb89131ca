//! Canonical products.
//!
//! A product is stored as `coef · Π base^exp` with a numeric `coef` and a
//! hash map from base to exponent. Canonical form:
//! - `coef` is never zero, the map is never empty, and a single factor with
//!   exact coefficient one is a power (or the bare base) instead
//! - a numeric coefficient never multiplies a lone sum; it is distributed
//!   (`2*(x + y)` is `2*x + 2*y`)
//! - no base is a product, and a power appears as a base only when it cannot
//!   be split (its own base is a product or a power), with exponent one
//! - exact numeric bases never carry an integer exponent (they fold into the
//!   coefficient); rational bases with a fractional exponent keep it in
//!   `(0, 1)`, moving the integral part into the coefficient
//! - inexact numbers never appear as bases with numeric exponents
//! - no exponent is zero

use std::cmp::Ordering;

use log::debug;
use rustc_hash::FxHashMap;

use super::pow::{Pow, pow};
use super::{Expr, ExprKind, add, expr_cmp, is_exact_one, mul};
use crate::core::error::Result;
use crate::core::number::{Number, NumberOps};

/// base → exponent
pub type FactorDict = FxHashMap<Expr, Expr>;

/// Payload of a product node.
#[derive(Debug, PartialEq, Eq)]
pub struct Mul {
    coef: Number,
    dict: FactorDict,
}

/// A power whose base is itself a product or a power. Splitting it into
/// `(base, exp)` would put a product (or power) key into a product, so it
/// is kept whole as a base with exponent one.
#[inline]
fn is_opaque_power(p: &Pow) -> bool {
    matches!(p.base().kind(), ExprKind::Mul(_) | ExprKind::Pow(_))
}

/// Splits a non-numeric factor into `(base, exp)`.
#[must_use]
pub fn as_base_exp(expr: &Expr) -> (Expr, Expr) {
    match expr.kind() {
        ExprKind::Pow(p) if !is_opaque_power(p) => (p.base().clone(), p.exp().clone()),
        _ => (expr.clone(), Expr::from(Number::one())),
    }
}

impl Mul {
    /// Numeric coefficient.
    #[inline]
    #[must_use]
    pub fn coef(&self) -> &Number {
        &self.coef
    }

    /// Bases with their exponents.
    #[inline]
    #[must_use]
    pub fn dict(&self) -> &FactorDict {
        &self.dict
    }

    /// Factors in canonical base order.
    #[must_use]
    pub fn sorted_factors(&self) -> Vec<(&Expr, &Expr)> {
        let mut factors: Vec<_> = self.dict.iter().collect();
        factors.sort_by(|a, b| expr_cmp(a.0, b.0));
        factors
    }

    /// `base^exp` as a standalone expression, for an entry of a canonical
    /// product.
    #[must_use]
    pub fn factor_expr(base: &Expr, exp: &Expr) -> Expr {
        if exp.is_one() {
            base.clone()
        } else {
            Pow::new_unchecked(base.clone(), exp.clone())
        }
    }

    /// Coefficient (unless exact one) and every `base^exp`, sorted.
    #[must_use]
    pub fn args(&self) -> Vec<Expr> {
        let mut out = Vec::with_capacity(self.dict.len() + 1);
        if !is_exact_one(&self.coef) {
            out.push(Expr::from(self.coef.clone()));
        }
        let mut factors: Vec<Expr> = self
            .dict
            .iter()
            .map(|(b, e)| Self::factor_expr(b, e))
            .collect();
        factors.sort();
        out.extend(factors);
        out
    }

    /// Canonical-form predicate for a prospective `(coef, dict)`.
    #[must_use]
    pub fn is_canonical(coef: &Number, dict: &FactorDict) -> bool {
        if coef.is_zero() || dict.is_empty() {
            return false;
        }
        if dict.len() == 1 {
            if is_exact_one(coef) {
                return false;
            }
            if let Some((base, exp)) = dict.iter().next()
                && exp.is_one()
                && matches!(base.kind(), ExprKind::Add(_))
            {
                return false;
            }
        }
        dict.iter().all(|(base, exp)| entry_is_canonical(base, exp))
    }

    /// Builds a canonical product `coef · Π base^exp` from arbitrary pairs.
    ///
    /// Each pair goes through [`pow`] first, so numeric powers evaluate and
    /// nested products and powers are merged.
    ///
    /// # Errors
    /// Whatever [`pow`] raises for a pair (e.g. `0^-1`).
    pub fn from_dict<I>(coef: Number, factors: I) -> Result<Expr>
    where
        I: IntoIterator<Item = (Expr, Expr)>,
    {
        let mut coef = coef;
        let mut dict = FactorDict::default();
        for (base, exp) in factors {
            let factor = pow(&base, &exp)?;
            fold_factor(&mut coef, &mut dict, &factor);
        }
        Ok(Self::from_canonical(coef, dict))
    }

    /// Builds from a dictionary whose entries are canonical, collapsing
    /// degenerate shapes.
    pub(crate) fn from_canonical(coef: Number, dict: FactorDict) -> Expr {
        if coef.is_zero() || dict.is_empty() {
            return Expr::from(coef);
        }
        if dict.len() == 1
            && let Some((base, exp)) = dict.iter().next()
        {
            if is_exact_one(&coef) {
                return Self::factor_expr(base, exp);
            }
            if exp.is_one()
                && let ExprKind::Add(a) = base.kind()
            {
                return a.scale(&coef);
            }
        }
        debug_assert!(
            Self::is_canonical(&coef, &dict),
            "non-canonical product: coef {coef}, {} factors",
            dict.len()
        );
        Expr::from_kind(ExprKind::Mul(Mul { coef, dict }))
    }

    /// Raises this product (the payload of `this`) to a numeric power,
    /// accumulating into `(coef, dict)`.
    ///
    /// Integer powers distribute over every factor. Other powers only split
    /// off a real coefficient's magnitude; the rest stays as one opaque power.
    pub(crate) fn power_num(
        &self,
        this: &Expr,
        coef: &mut Number,
        dict: &mut FactorDict,
        exp: &Number,
    ) -> Result<()> {
        if exp.is_zero() {
            // (x*y)^0.0 is 1.0
            if exp.is_inexact() {
                *coef = coef.mul(&Number::real_double(1.0));
            }
            return Ok(());
        }
        let exp_expr = Expr::from(exp.clone());
        if exp.is_integer() {
            let new_coef = pow(&Expr::from(self.coef.clone()), &exp_expr)?;
            fold_factor(coef, dict, &new_coef);
            for (base, e) in &self.dict {
                dict_add_term_new(coef, dict, mul(e, &exp_expr), base.clone());
            }
            return Ok(());
        }

        let unit_coef = self.coef.is_exact() && (self.coef.is_one() || self.coef.is_minus_one());
        let (new_coef, key) = if unit_coef || !(self.coef.is_negative() || self.coef.is_positive())
        {
            // (-x*y)^(1/2) and ((1 + 2*I)*x)^(1/2) stay whole
            (Expr::from(Number::one()), this.clone())
        } else if self.coef.is_negative() {
            // (-3*x*y)^(1/2) -> 3^(1/2)*(-x*y)^(1/2)
            (
                pow(&Expr::from(self.coef.neg()), &exp_expr)?,
                Self::from_canonical(Number::minus_one(), self.dict.clone()),
            )
        } else {
            // (3*x*y)^(1/2) -> 3^(1/2)*(x*y)^(1/2)
            (
                pow(&Expr::from(self.coef.clone()), &exp_expr)?,
                Self::from_canonical(Number::one(), self.dict.clone()),
            )
        };
        fold_factor(coef, dict, &new_coef);
        match key.kind() {
            ExprKind::Mul(_) | ExprKind::Pow(_) => dict_add_term_new(
                coef,
                dict,
                Expr::from(Number::one()),
                Pow::new_unchecked(key, exp_expr),
            ),
            _ => dict_add_term_new(coef, dict, exp_expr, key),
        }
        Ok(())
    }

    pub(crate) fn compare(&self, other: &Self) -> Ordering {
        self.dict
            .len()
            .cmp(&other.dict.len())
            .then_with(|| self.coef.cmp(&other.coef))
            .then_with(|| {
                let (a, b) = (self.sorted_factors(), other.sorted_factors());
                a.iter()
                    .zip(&b)
                    .map(|((ba, ea), (bb, eb))| expr_cmp(ba, bb).then_with(|| expr_cmp(ea, eb)))
                    .find(|o| o.is_ne())
                    .unwrap_or(Ordering::Equal)
            })
    }
}

fn entry_is_canonical(base: &Expr, exp: &Expr) -> bool {
    if exp.as_number().is_some_and(NumberOps::is_zero) {
        return false;
    }
    match base.kind() {
        ExprKind::Mul(_) => false,
        ExprKind::Pow(p) => is_opaque_power(p) && exp.is_one(),
        ExprKind::Number(b) => {
            if b.is_exact_zero() || is_exact_one(b) {
                return false;
            }
            match exp.as_number() {
                Some(e) if b.is_inexact() || e.is_inexact() => false,
                Some(Number::Integer(k)) => b.defers_power(k),
                _ => true,
            }
        }
        _ => true,
    }
}

/// Multiplies `base^exp` into `(coef, dict)` where `base` is a valid key
/// (not a number-times-something product, not a splittable power).
///
/// Exponents of an existing base are added. Exact numeric powers fold into
/// the coefficient, fractional exponents of rational bases are reduced into
/// `(0, 1)`, zero exponents erase the entry.
pub(crate) fn dict_add_term_new(coef: &mut Number, dict: &mut FactorDict, exp: Expr, base: Expr) {
    let exp = match dict.remove(&base) {
        Some(existing) => match (existing.as_number(), exp.as_number()) {
            (Some(a), Some(b)) => Expr::from(a.add(b)),
            _ => add(&existing, &exp),
        },
        None => exp,
    };
    insert_factor(coef, dict, exp, base);
}

/// Inserts `base^exp` for a base that is not currently in `dict`.
fn insert_factor(coef: &mut Number, dict: &mut FactorDict, exp: Expr, base: Expr) {
    if let Some(e) = exp.as_number() {
        if e.is_zero() {
            // x^0.0 is 1.0
            if e.is_inexact() {
                *coef = coef.mul(&Number::real_double(1.0));
            }
            return;
        }
        if let Some(b) = base.as_number()
            && fold_number_power(coef, dict, b, e)
        {
            return;
        }
        if let ExprKind::Pow(p) = base.kind()
            && e.is_integer()
            && !is_exact_one(e)
        {
            match pow(p.base(), &mul(p.exp(), &exp)) {
                Ok(factor) => {
                    fold_factor(coef, dict, &factor);
                    return;
                }
                Err(err) => debug!("keeping ({base})^({exp}) unexpanded: {err}"),
            }
        }
    }
    dict.insert(base, exp);
}

/// Folds `b^e` for numeric `b` and `e` into `(coef, dict)`. The key `b`
/// is not in `dict`. Returns `false` if the entry must stay as given.
///
/// Exact fractional powers go through [`pow`], so a merged exponent is
/// reduced exactly as a fresh power would be (`4^(1/4) * 4^(1/4)` is `2`).
fn fold_number_power(coef: &mut Number, dict: &mut FactorDict, b: &Number, e: &Number) -> bool {
    if b.is_exact_zero() {
        *coef = coef.mul(b);
        return true;
    }
    if is_exact_one(b) {
        return true;
    }
    if b.is_inexact() || e.is_inexact() || e.is_integer() {
        return match b.pow(e) {
            Ok(value) => {
                *coef = coef.mul(&value);
                true
            }
            Err(_) => false,
        };
    }
    let key = Expr::from(b.clone());
    let value = match pow(&key, &Expr::from(e.clone())) {
        Ok(value) => value,
        Err(err) => {
            debug!("keeping ({key})^({e}) unevaluated: {err}");
            return false;
        }
    };
    match value.kind() {
        ExprKind::Number(n) => *coef = coef.mul(n),
        ExprKind::Mul(m) => {
            *coef = coef.mul(m.coef());
            for (base, exp) in m.dict() {
                insert_reduced(coef, dict, &key, base.clone(), exp.clone());
            }
        }
        _ => {
            let (base, exp) = as_base_exp(&value);
            insert_reduced(coef, dict, &key, base, exp);
        }
    }
    true
}

/// Stores an entry produced by reducing the power of `key`. The reduced power
/// of `key` itself is final; any other base (e.g. `2` out of `(-2)^(1/2)`)
/// merges with what is already there.
fn insert_reduced(coef: &mut Number, dict: &mut FactorDict, key: &Expr, base: Expr, exp: Expr) {
    if base == *key {
        dict.insert(base, exp);
    } else {
        dict_add_term_new(coef, dict, exp, base);
    }
}

/// Multiplies an arbitrary canonical factor into `(coef, dict)`.
pub(crate) fn fold_factor(coef: &mut Number, dict: &mut FactorDict, factor: &Expr) {
    match factor.kind() {
        ExprKind::Number(n) => *coef = coef.mul(n),
        ExprKind::Mul(m) => {
            *coef = coef.mul(m.coef());
            for (base, exp) in m.dict() {
                dict_add_term_new(coef, dict, exp.clone(), base.clone());
            }
        }
        _ => {
            let (base, exp) = as_base_exp(factor);
            dict_add_term_new(coef, dict, exp, base);
        }
    }
}

/// Product of canonical expressions.
pub(crate) fn mul_all<'a, I>(factors: I) -> Expr
where
    I: IntoIterator<Item = &'a Expr>,
{
    let mut coef = Number::one();
    let mut dict = FactorDict::default();
    for factor in factors {
        fold_factor(&mut coef, &mut dict, factor);
    }
    Mul::from_canonical(coef, dict)
}

impl Expr {
    /// Canonical n-ary product.
    #[must_use]
    pub fn product(factors: Vec<Expr>) -> Expr {
        mul_all(&factors)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, reason = "Standard test relaxations")]
mod tests {
    use super::*;
    use crate::core::expr::{integer, rational, symbol};

    #[test]
    fn exponents_of_equal_bases_add() {
        let x = symbol("x");
        let x2 = pow(&x, &integer(2)).unwrap();
        let x3 = pow(&x, &integer(3)).unwrap();
        assert_eq!(&x2 * &x3, pow(&x, &integer(5)).unwrap());
        let x_inv = pow(&x, &integer(-1)).unwrap();
        assert_eq!(&x * &x_inv, integer(1));
    }

    #[test]
    fn coefficient_distributes_over_a_lone_sum() {
        let (x, y) = (symbol("x"), symbol("y"));
        let e = integer(2) * (&x + &y);
        let add = e.as_add().unwrap();
        assert_eq!(add.dict().get(&x), Some(&Number::integer(2)));
        assert_eq!(add.dict().get(&y), Some(&Number::integer(2)));
    }

    #[test]
    fn sum_factor_with_other_factors_stays_a_product() {
        let (x, y, z) = (symbol("x"), symbol("y"), symbol("z"));
        let e = &z * (&x + &y);
        let m = e.as_mul().unwrap();
        assert_eq!(m.dict().len(), 2);
    }

    #[test]
    fn surds_combine_into_the_coefficient() {
        let root2 = pow(&integer(2), &rational(1, 2).unwrap()).unwrap();
        assert_eq!(&root2 * &root2, integer(2));
        let root2_cubed = pow(&root2, &integer(3)).unwrap();
        let m = root2_cubed.as_mul().unwrap();
        assert_eq!(m.coef(), &Number::integer(2));
        assert_eq!(m.dict().get(&integer(2)), Some(&rational(1, 2).unwrap()));
    }

    #[test]
    fn merged_surd_exponents_reduce_like_fresh_powers() {
        let quarter = rational(1, 4).unwrap();
        let half = rational(1, 2).unwrap();
        let a = pow(&integer(4), &quarter).unwrap();
        let direct = pow(&integer(4), &half).unwrap();
        assert_eq!(direct, integer(2));
        assert_eq!(&a * &a, direct);
        assert_eq!((&a * &a).structural_hash(), direct.structural_hash());

        let root2 = pow(&integer(2), &half).unwrap();
        let root8 = pow(&integer(8), &half).unwrap();
        assert_eq!(&root2 * &root8, integer(4));

        // 2^(2/3) * 2^(2/3) = 2 * 2^(1/3)
        let cbrt4 = pow(&integer(2), &rational(2, 3).unwrap()).unwrap();
        let expected = integer(2) * pow(&integer(2), &rational(1, 3).unwrap()).unwrap();
        assert_eq!(&cbrt4 * &cbrt4, expected);

        let m = (&a * &a * &a).as_mul().map(|m| m.dict().len());
        assert_eq!(m, Some(1));
    }

    #[test]
    fn square_roots_of_opposite_signs_combine() {
        let half = rational(1, 2).unwrap();
        let r2 = pow(&integer(2), &half).unwrap();
        let r_neg2 = pow(&integer(-2), &half).unwrap();
        let i = Expr::from(crate::core::number::Complex::i());
        assert_eq!(&r2 * &r_neg2, integer(2) * i);
    }

    #[test]
    fn products_never_nest() {
        let (x, y, z) = (symbol("x"), symbol("y"), symbol("z"));
        let xy = &x * &y;
        let e = &xy * &z * integer(3);
        let m = e.as_mul().unwrap();
        assert_eq!(m.dict().len(), 3);
        assert!(m.dict().keys().all(|k| k.as_mul().is_none()));
    }

    #[test]
    fn fractional_power_of_product_is_opaque() {
        let (x, y) = (symbol("x"), symbol("y"));
        let half = rational(1, 2).unwrap();
        let sqrt_xy = pow(&(&x * &y), &half).unwrap();
        assert!(sqrt_xy.as_pow().is_some());
        let e = &sqrt_xy * &x;
        let m = e.as_mul().unwrap();
        assert!(Mul::is_canonical(m.coef(), m.dict()));
        assert_eq!(&sqrt_xy * &sqrt_xy, &x * &y);
    }

    #[test]
    fn power_of_product_splits_positive_coefficient() {
        let x = symbol("x");
        let half = rational(1, 2).unwrap();
        let e = pow(&(integer(4) * &x), &half).unwrap();
        assert_eq!(e, integer(2) * pow(&x, &half).unwrap());
    }

    #[test]
    fn zero_coefficient_absorbs() {
        let x = symbol("x");
        assert_eq!(integer(0) * &x, integer(0));
        assert_eq!(&x * integer(1), x);
    }

    #[test]
    fn from_dict_merges_duplicate_bases() {
        let x = symbol("x");
        let e = Mul::from_dict(
            Number::integer(3),
            vec![(x.clone(), integer(2)), (x.clone(), integer(-2))],
        )
        .unwrap();
        assert_eq!(e, integer(3));
    }

    #[test]
    fn canonical_predicate_rejects_bad_shapes() {
        let x = symbol("x");
        let mut dict = FactorDict::default();
        dict.insert(x.clone(), integer(1));
        assert!(!Mul::is_canonical(&Number::one(), &dict));
        assert!(Mul::is_canonical(&Number::integer(2), &dict));

        let mut dict = FactorDict::default();
        dict.insert(integer(2), integer(3));
        dict.insert(x.clone(), integer(1));
        assert!(!Mul::is_canonical(&Number::one(), &dict));

        let mut dict = FactorDict::default();
        dict.insert(x, integer(0));
        assert!(!Mul::is_canonical(&Number::integer(2), &dict));
    }
}
