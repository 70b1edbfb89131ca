//! Symbolic differentiation.
//!
//! [`diff`] walks the tree once with a memoizing visitor. Every result is
//! built through the canonical factories, so `diff(x^2 + x, x)` is already
//! `1 + 2*x` with no separate simplification pass.
//!
//! Kinds without a rule (currently `abs` of a non-constant argument) degrade
//! to an unevaluated `Derivative(expr, x)` instead of failing.

use log::debug;
use rustc_hash::FxHashMap;

use crate::core::expr::add_all;
use crate::core::traversal::has_symbol;
use crate::core::visitor::Visitor;
use crate::core::{
    Add, Derivative, Expr, ExprKind, FactorDict, Function, FunctionKind, FunctionSymbol, Mul,
    Number, Pow, Result, Subs, SymError, Symbol, cos, cosh, derivative, div, function_symbol,
    integer, log, mul, neg, pow, sin, sinh, sub, subs_node,
};
use crate::transform::{SubsMap, subs};

/// Derivative of `expr` with respect to the symbol `x`.
///
/// # Errors
/// Type error if `x` is not a symbol. Domain errors raised while building the
/// result (e.g. `log` of a base that evaluates to zero) are propagated.
///
/// # Example
/// ```
/// use symb_core::diff::diff;
/// use symb_core::{integer, pow, symbol};
///
/// let x = symbol("x");
/// let e = pow(&x, &integer(3)).unwrap();
/// assert_eq!(diff(&e, &x).unwrap(), integer(3) * pow(&x, &integer(2)).unwrap());
/// ```
pub fn diff(expr: &Expr, x: &Expr) -> Result<Expr> {
    let symbol = x.expect_symbol()?.clone();
    DiffVisitor::new(symbol, x.clone()).apply(expr)
}

impl Expr {
    /// Derivative with respect to `x`; see [`diff`].
    ///
    /// # Errors
    /// Same as [`diff`].
    pub fn diff(&self, x: &Expr) -> Result<Expr> {
        diff(self, x)
    }
}

struct DiffVisitor {
    symbol: Symbol,
    x: Expr,
    cache: FxHashMap<Expr, Expr>,
}

impl DiffVisitor {
    fn new(symbol: Symbol, x: Expr) -> Self {
        Self {
            symbol,
            x,
            cache: FxHashMap::default(),
        }
    }

    fn apply(&mut self, expr: &Expr) -> Result<Expr> {
        if let Some(hit) = self.cache.get(expr) {
            return Ok(hit.clone());
        }
        let out = if has_symbol(expr, &self.symbol) {
            match expr.accept(self) {
                Ok(d) => d,
                Err(err) if err.is_not_implemented() => {
                    debug!("leaving d/d{} of {expr} unevaluated: {err}", self.x);
                    derivative(expr, vec![self.x.clone()])?
                }
                Err(err) => return Err(err),
            }
        } else {
            integer(0)
        };
        self.cache.insert(expr.clone(), out.clone());
        Ok(out)
    }

    /// Fresh symbol `_x`, `__x`, ... not occurring in `expr`.
    fn dummy(expr: &Expr) -> Expr {
        let mut name = "x".to_owned();
        loop {
            name.insert(0, '_');
            let candidate = Symbol::new(&name);
            if !has_symbol(expr, &candidate) {
                return Expr::from(candidate);
            }
        }
    }
}

impl Visitor for DiffVisitor {
    type Output = Result<Expr>;

    fn visit_default(&mut self, expr: &Expr) -> Result<Expr> {
        Err(SymError::not_implemented(format!(
            "no differentiation rule for {:?}",
            expr.kind_tag()
        )))
    }

    fn visit_number(&mut self, _: &Expr, _: &Number) -> Result<Expr> {
        Ok(integer(0))
    }

    fn visit_symbol(&mut self, _: &Expr, s: &Symbol) -> Result<Expr> {
        Ok(integer(i64::from(*s == self.symbol)))
    }

    fn visit_add(&mut self, _: &Expr, add: &Add) -> Result<Expr> {
        let mut terms = Vec::with_capacity(add.dict().len());
        for (term, mult) in add.dict() {
            let d = self.apply(term)?;
            terms.push(mul(&Expr::from(mult.clone()), &d));
        }
        Ok(add_all(&terms))
    }

    fn visit_mul(&mut self, _: &Expr, m: &Mul) -> Result<Expr> {
        // Product rule over the factors; the coefficient is a constant
        let mut terms = Vec::with_capacity(m.dict().len());
        for (base, exp) in m.dict() {
            let d = self.apply(&Mul::factor_expr(base, exp))?;
            if d.is_zero() {
                continue;
            }
            let rest: FactorDict = m
                .dict()
                .iter()
                .filter(|(b, _)| *b != base)
                .map(|(b, e)| (b.clone(), e.clone()))
                .collect();
            terms.push(mul(&Mul::from_canonical(m.coef().clone(), rest), &d));
        }
        Ok(add_all(&terms))
    }

    fn visit_pow(&mut self, expr: &Expr, p: &Pow) -> Result<Expr> {
        let (base, exp) = (p.base(), p.exp());
        let db = self.apply(base)?;
        if exp.is_number() {
            // e * b^(e-1) * b'
            let lowered = pow(base, &sub(exp, &integer(1)))?;
            return Ok(mul(&mul(exp, &lowered), &db));
        }
        // b^e * (e' log(b) + e b'/b)
        let de = self.apply(exp)?;
        let from_exp = if de.is_zero() {
            integer(0)
        } else {
            mul(&de, &log(base)?)
        };
        let from_base = if db.is_zero() {
            integer(0)
        } else {
            mul(exp, &div(&db, base)?)
        };
        Ok(mul(expr, &(from_exp + from_base)))
    }

    fn visit_function(&mut self, _: &Expr, f: &Function) -> Result<Expr> {
        let u = f.arg();
        let du = self.apply(u)?;
        if du.is_zero() {
            return Ok(du);
        }
        let outer = match f.kind() {
            FunctionKind::Sin => cos(u),
            FunctionKind::Cos => neg(&sin(u)),
            FunctionKind::Tan => integer(1) + pow(&f.kind().apply(u)?, &integer(2))?,
            FunctionKind::Sinh => cosh(u),
            FunctionKind::Cosh => sinh(u),
            FunctionKind::Tanh => integer(1) - pow(&f.kind().apply(u)?, &integer(2))?,
            FunctionKind::Log => return div(&du, u),
            FunctionKind::Abs => {
                return Err(SymError::not_implemented(
                    "derivative of abs with a non-constant argument",
                ));
            }
        };
        Ok(mul(&outer, &du))
    }

    fn visit_function_symbol(&mut self, expr: &Expr, f: &FunctionSymbol) -> Result<Expr> {
        // f(.., x, ..) with x appearing once, as a bare argument
        let mut bare = 0;
        let mut elsewhere = false;
        for arg in f.args() {
            if *arg == self.x {
                bare += 1;
            } else if !self.apply(arg)?.is_zero() {
                elsewhere = true;
            }
        }
        if bare == 1 && !elsewhere {
            return derivative(expr, vec![self.x.clone()]);
        }

        // Chain rule through fresh dummy variables:
        // sum_i d(arg_i)/dx * Subs(Derivative(f(.., _x, ..), _x), _x = arg_i)
        let mut terms = Vec::new();
        for (i, arg) in f.args().iter().enumerate() {
            let t = self.apply(arg)?;
            if t.is_zero() {
                continue;
            }
            let dummy = Self::dummy(expr);
            let mut args = f.args().to_vec();
            args[i] = dummy.clone();
            let partial = derivative(&function_symbol(f.name(), args), vec![dummy.clone()])?;
            terms.push(mul(&t, &subs_node(&partial, vec![(dummy, arg.clone())])));
        }
        Ok(add_all(&terms))
    }

    fn visit_derivative(&mut self, _: &Expr, d: &Derivative) -> Result<Expr> {
        let inner = self.apply(d.arg())?;
        if inner.is_zero() {
            return Ok(inner);
        }
        let mut symbols = d.symbols().to_vec();
        let cycles =
            matches!(inner.kind(), ExprKind::Derivative(again) if again.arg() == d.arg());
        if symbols.contains(&self.x) || cycles {
            symbols.push(self.x.clone());
            return derivative(d.arg(), symbols);
        }
        // Differentiate the already-differentiated argument by the old
        // variables in turn
        let mut out = inner;
        for s in &symbols {
            out = diff(&out, s)?;
        }
        Ok(out)
    }

    fn visit_subs(&mut self, expr: &Expr, s: &Subs) -> Result<Expr> {
        let map: SubsMap = s.dict().iter().cloned().collect();
        let mut terms = Vec::new();
        if s.get(&self.x).is_none() {
            terms.push(subs(&self.apply(s.arg())?, &map)?);
        }
        for (key, value) in s.dict() {
            let t = self.apply(value)?;
            if t.is_zero() {
                continue;
            }
            if !key.is_symbol() {
                return derivative(expr, vec![self.x.clone()]);
            }
            let partial = subs(&diff(s.arg(), key)?, &map)?;
            terms.push(mul(&t, &partial));
        }
        Ok(add_all(&terms))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, reason = "Standard test relaxations")]
mod tests {
    use super::*;
    use crate::core::constants;
    use crate::core::{abs, exp, rational, symbol, tan};

    #[test]
    fn polynomial_rules() {
        let (x, y) = (symbol("x"), symbol("y"));
        let e = pow(&x, &integer(2)).unwrap() + &x * &y + integer(7);
        assert_eq!(diff(&e, &x).unwrap(), integer(2) * &x + &y);
        assert_eq!(diff(&e, &y).unwrap(), x.clone());
        assert_eq!(diff(&integer(5), &x).unwrap(), integer(0));
        assert_eq!(diff(&x, &x).unwrap(), integer(1));
    }

    #[test]
    fn variable_must_be_a_symbol() {
        let x = symbol("x");
        let err = diff(&x, &integer(2)).unwrap_err();
        assert!(matches!(err, SymError::Type { .. }));
    }

    #[test]
    fn chain_rule_through_functions() {
        let x = symbol("x");
        let x2 = pow(&x, &integer(2)).unwrap();
        assert_eq!(
            diff(&sin(&x2), &x).unwrap(),
            integer(2) * &x * cos(&x2)
        );
        assert_eq!(diff(&cos(&x), &x).unwrap(), -sin(&x));
        assert_eq!(
            diff(&log(&x).unwrap(), &x).unwrap(),
            pow(&x, &integer(-1)).unwrap()
        );
        assert_eq!(
            diff(&tan(&x), &x).unwrap(),
            integer(1) + pow(&tan(&x), &integer(2)).unwrap()
        );
    }

    #[test]
    fn symbolic_exponents() {
        let x = symbol("x");
        let ex = exp(&x);
        assert_eq!(diff(&ex, &x).unwrap(), ex);
        let xx = pow(&x, &x).unwrap();
        let expected = &xx * (log(&x).unwrap() + integer(1));
        assert_eq!(diff(&xx, &x).unwrap(), expected);
        // E is a constant
        assert_eq!(diff(&constants::e(), &x).unwrap(), integer(0));
    }

    #[test]
    fn square_root() {
        let x = symbol("x");
        let half = rational(1, 2).unwrap();
        let e = pow(&x, &half).unwrap();
        let expected = half * pow(&x, &rational(-1, 2).unwrap()).unwrap();
        assert_eq!(diff(&e, &x).unwrap(), expected);
    }

    #[test]
    fn undefined_functions_stay_unevaluated() {
        let (x, y) = (symbol("x"), symbol("y"));
        let f = function_symbol("f", vec![x.clone(), y.clone()]);
        assert_eq!(
            diff(&f, &x).unwrap(),
            derivative(&f, vec![x.clone()]).unwrap()
        );
        let g = function_symbol("g", vec![pow(&x, &integer(2)).unwrap()]);
        let dummy = symbol("_x");
        let expected = integer(2)
            * &x
            * subs_node(
                &derivative(&function_symbol("g", vec![dummy.clone()]), vec![dummy.clone()])
                    .unwrap(),
                vec![(dummy, pow(&x, &integer(2)).unwrap())],
            );
        assert_eq!(diff(&g, &x).unwrap(), expected);
    }

    #[test]
    fn repeated_differentiation_accumulates_symbols() {
        let (x, y) = (symbol("x"), symbol("y"));
        let f = function_symbol("f", vec![x.clone(), y.clone()]);
        let fx = diff(&f, &x).unwrap();
        let fxy = diff(&fx, &y).unwrap();
        assert_eq!(
            fxy,
            derivative(&f, vec![x.clone(), y.clone()]).unwrap()
        );
        let fxx = diff(&fx, &x).unwrap();
        assert_eq!(fxx, derivative(&f, vec![x.clone(), x.clone()]).unwrap());
    }

    #[test]
    fn abs_degrades_to_unevaluated_derivative() {
        let x = symbol("x");
        let e = abs(&x);
        assert_eq!(diff(&e, &x).unwrap(), derivative(&e, vec![x.clone()]).unwrap());
        assert_eq!(diff(&abs(&symbol("y")), &x).unwrap(), integer(0));
    }
}
