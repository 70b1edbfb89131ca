//! Function-like nodes and named constants.
//!
//! - [`Constant`] - named mathematical constants (`pi`, `E`, ...)
//! - [`Function`] - built-in one-argument functions, one kind tag per
//!   [`FunctionKind`]
//! - [`FunctionSymbol`] - an undefined function `f(a1, ..., an)`
//! - [`Derivative`] / [`Subs`] - unevaluated derivative and substitution
//!
//! The factories evaluate only trivial exact points (`sin(0) = 0`,
//! `log(1) = 0`, ...) and inexact numeric arguments. Everything else stays
//! symbolic.

use std::cmp::Ordering;
use std::fmt;

use num_complex::Complex64;

use crate::core::constants;
use crate::core::error::{Result, SymError};
use crate::core::expr::{Expr, ExprKind, TypeId, pow, sqrt};
use crate::core::number::{Number, NumberOps};
use crate::core::symbol::Symbol;

// =============================================================================
// CONSTANTS
// =============================================================================

/// Named mathematical constant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Constant {
    Pi,
    E,
    EulerGamma,
    Catalan,
    GoldenRatio,
}

impl Constant {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Pi => "pi",
            Self::E => "E",
            Self::EulerGamma => "EulerGamma",
            Self::Catalan => "Catalan",
            Self::GoldenRatio => "GoldenRatio",
        }
    }

    /// Double-precision value.
    #[must_use]
    pub fn value(self) -> f64 {
        match self {
            Self::Pi => std::f64::consts::PI,
            Self::E => std::f64::consts::E,
            Self::EulerGamma => 0.577_215_664_901_532_9,
            Self::Catalan => 0.915_965_594_177_219,
            Self::GoldenRatio => 1.618_033_988_749_895,
        }
    }
}

// Constants order by name
impl PartialOrd for Constant {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Constant {
    fn cmp(&self, other: &Self) -> Ordering {
        self.name().cmp(other.name())
    }
}

impl fmt::Display for Constant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// =============================================================================
// BUILT-IN ONE-ARGUMENT FUNCTIONS
// =============================================================================

/// Built-in function kinds. Each has its own [`TypeId`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FunctionKind {
    Sin,
    Cos,
    Tan,
    Sinh,
    Cosh,
    Tanh,
    Log,
    Abs,
}

impl FunctionKind {
    pub const ALL: [FunctionKind; 8] = [
        Self::Sin,
        Self::Cos,
        Self::Tan,
        Self::Sinh,
        Self::Cosh,
        Self::Tanh,
        Self::Log,
        Self::Abs,
    ];

    #[must_use]
    pub const fn tag(self) -> TypeId {
        match self {
            Self::Sin => TypeId::Sin,
            Self::Cos => TypeId::Cos,
            Self::Tan => TypeId::Tan,
            Self::Sinh => TypeId::Sinh,
            Self::Cosh => TypeId::Cosh,
            Self::Tanh => TypeId::Tanh,
            Self::Log => TypeId::Log,
            Self::Abs => TypeId::Abs,
        }
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Sin => "sin",
            Self::Cos => "cos",
            Self::Tan => "tan",
            Self::Sinh => "sinh",
            Self::Cosh => "cosh",
            Self::Tanh => "tanh",
            Self::Log => "log",
            Self::Abs => "abs",
        }
    }

    /// Canonical `self(arg)` through the kind's factory.
    ///
    /// # Errors
    /// Domain error for `log(0)`.
    pub fn apply(self, arg: &Expr) -> Result<Expr> {
        match self {
            Self::Sin => Ok(sin(arg)),
            Self::Cos => Ok(cos(arg)),
            Self::Tan => Ok(tan(arg)),
            Self::Sinh => Ok(sinh(arg)),
            Self::Cosh => Ok(cosh(arg)),
            Self::Tanh => Ok(tanh(arg)),
            Self::Log => log(arg),
            Self::Abs => Ok(abs(arg)),
        }
    }

    /// Real double-precision value. `None` when the result is not real
    /// (`log` of a negative number).
    #[must_use]
    pub fn eval_real(self, x: f64) -> Option<f64> {
        Some(match self {
            Self::Sin => x.sin(),
            Self::Cos => x.cos(),
            Self::Tan => x.tan(),
            Self::Sinh => x.sinh(),
            Self::Cosh => x.cosh(),
            Self::Tanh => x.tanh(),
            Self::Log if x < 0.0 => return None,
            Self::Log => x.ln(),
            Self::Abs => x.abs(),
        })
    }

    /// Complex double-precision value (principal branch for `log`).
    #[must_use]
    pub fn eval_complex(self, z: Complex64) -> Complex64 {
        match self {
            Self::Sin => z.sin(),
            Self::Cos => z.cos(),
            Self::Tan => z.tan(),
            Self::Sinh => z.sinh(),
            Self::Cosh => z.cosh(),
            Self::Tanh => z.tanh(),
            Self::Log => z.ln(),
            Self::Abs => Complex64::new(z.norm(), 0.0),
        }
    }

    /// Evaluates an inexact numeric argument.
    fn eval_inexact(self, n: &Number) -> Number {
        match n {
            Number::RealDouble(r) => match self.eval_real(r.value()) {
                Some(v) => Number::real_double(v),
                None => Number::complex_double(self.eval_complex(Complex64::new(r.value(), 0.0))),
            },
            other => {
                let z = self.eval_complex(other.to_complex64());
                if self == Self::Abs {
                    Number::real_double(z.re)
                } else {
                    Number::complex_double(z)
                }
            }
        }
    }
}

/// Payload of a built-in function node.
#[derive(Debug, PartialEq, Eq)]
pub struct Function {
    kind: FunctionKind,
    arg: Expr,
}

impl Function {
    #[inline]
    #[must_use]
    pub fn kind(&self) -> FunctionKind {
        self.kind
    }

    #[inline]
    #[must_use]
    pub fn arg(&self) -> &Expr {
        &self.arg
    }

    fn build(kind: FunctionKind, arg: &Expr) -> Expr {
        Expr::from_kind(ExprKind::Function(Function {
            kind,
            arg: arg.clone(),
        }))
    }
}

/// Shared shape of the trigonometric and hyperbolic factories: an exact
/// zero maps to `at_zero`, inexact numbers evaluate.
fn elementary(kind: FunctionKind, arg: &Expr, at_zero: i64) -> Expr {
    if let Some(n) = arg.as_number() {
        if n.is_exact_zero() {
            return Expr::from(at_zero);
        }
        if n.is_inexact() {
            return Expr::from(kind.eval_inexact(n));
        }
    }
    Function::build(kind, arg)
}

#[must_use]
pub fn sin(arg: &Expr) -> Expr {
    elementary(FunctionKind::Sin, arg, 0)
}

#[must_use]
pub fn cos(arg: &Expr) -> Expr {
    elementary(FunctionKind::Cos, arg, 1)
}

#[must_use]
pub fn tan(arg: &Expr) -> Expr {
    elementary(FunctionKind::Tan, arg, 0)
}

#[must_use]
pub fn sinh(arg: &Expr) -> Expr {
    elementary(FunctionKind::Sinh, arg, 0)
}

#[must_use]
pub fn cosh(arg: &Expr) -> Expr {
    elementary(FunctionKind::Cosh, arg, 1)
}

#[must_use]
pub fn tanh(arg: &Expr) -> Expr {
    elementary(FunctionKind::Tanh, arg, 0)
}

/// Natural logarithm.
///
/// # Errors
/// Domain error for an exact zero argument.
pub fn log(arg: &Expr) -> Result<Expr> {
    if let Some(n) = arg.as_number() {
        if n.is_exact_zero() {
            return Err(SymError::domain("log(0)"));
        }
        if n.is_exact() && n.is_one() {
            return Ok(constants::zero());
        }
        if n.is_inexact() {
            return Ok(Expr::from(FunctionKind::Log.eval_inexact(n)));
        }
    }
    if matches!(arg.kind(), ExprKind::Constant(Constant::E)) {
        return Ok(constants::one());
    }
    Ok(Function::build(FunctionKind::Log, arg))
}

/// Absolute value. Exact reals and exact complex numbers evaluate.
#[must_use]
pub fn abs(arg: &Expr) -> Expr {
    match arg.as_number() {
        Some(n @ (Number::Integer(_) | Number::Rational(_))) => {
            if n.is_negative() {
                Expr::from(n.neg())
            } else {
                arg.clone()
            }
        }
        Some(Number::Complex(c)) => {
            let (re, im) = (c.real_part(), c.imaginary_part());
            sqrt(&Expr::from(re.mul(&re).add(&im.mul(&im))))
        }
        Some(n) => Expr::from(FunctionKind::Abs.eval_inexact(n)),
        None => match arg.kind() {
            ExprKind::Function(f) if f.kind() == FunctionKind::Abs => arg.clone(),
            _ => Function::build(FunctionKind::Abs, arg),
        },
    }
}

/// `E^arg`. Inexact arguments evaluate.
#[must_use]
pub fn exp(arg: &Expr) -> Expr {
    if let Some(n) = arg.as_number()
        && n.is_inexact()
    {
        let z = n.to_complex64().exp();
        return Expr::from(if matches!(n, Number::RealDouble(_)) {
            Number::real_double(z.re)
        } else {
            Number::complex_double(z)
        });
    }
    // The base is a constant, so no zero-base domain check applies
    match pow(&constants::e(), arg) {
        Ok(e) => e,
        Err(err) => unreachable!("exponential cannot fail: {err}"),
    }
}

// =============================================================================
// UNDEFINED FUNCTIONS
// =============================================================================

/// Payload of an undefined function application `name(args...)`.
#[derive(Debug, PartialEq, Eq)]
pub struct FunctionSymbol {
    name: Symbol,
    args: Vec<Expr>,
}

impl FunctionSymbol {
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.name()
    }

    #[inline]
    #[must_use]
    pub fn args(&self) -> &[Expr] {
        &self.args
    }
}

/// Undefined function `name(args...)`.
#[must_use]
pub fn function_symbol(name: &str, args: Vec<Expr>) -> Expr {
    Expr::from_kind(ExprKind::FunctionSymbol(FunctionSymbol {
        name: Symbol::new(name),
        args,
    }))
}

// =============================================================================
// UNEVALUATED DERIVATIVE / SUBSTITUTION
// =============================================================================

/// Payload of an unevaluated derivative `d^n arg / ds1 ... dsn`.
#[derive(Debug, PartialEq, Eq)]
pub struct Derivative {
    arg: Expr,
    symbols: Vec<Expr>,
}

impl Derivative {
    #[inline]
    #[must_use]
    pub fn arg(&self) -> &Expr {
        &self.arg
    }

    /// Differentiation variables as a sorted multiset.
    #[inline]
    #[must_use]
    pub fn symbols(&self) -> &[Expr] {
        &self.symbols
    }
}

/// Unevaluated derivative of `arg` with respect to `symbols` (with
/// repetition for higher orders). An empty list returns `arg`.
///
/// # Errors
/// Type error if any variable is not a symbol.
pub fn derivative(arg: &Expr, symbols: Vec<Expr>) -> Result<Expr> {
    for s in &symbols {
        s.expect_symbol()?;
    }
    if symbols.is_empty() {
        return Ok(arg.clone());
    }
    let mut symbols = symbols;
    symbols.sort();
    Ok(Expr::from_kind(ExprKind::Derivative(Derivative {
        arg: arg.clone(),
        symbols,
    })))
}

/// Payload of an unevaluated substitution `arg |_{k1 = v1, ...}`.
#[derive(Debug, PartialEq, Eq)]
pub struct Subs {
    arg: Expr,
    dict: Vec<(Expr, Expr)>,
}

impl Subs {
    #[inline]
    #[must_use]
    pub fn arg(&self) -> &Expr {
        &self.arg
    }

    /// Replacement pairs sorted by key.
    #[inline]
    #[must_use]
    pub fn dict(&self) -> &[(Expr, Expr)] {
        &self.dict
    }

    /// Replacement value for `key`, if any.
    #[must_use]
    pub fn get(&self, key: &Expr) -> Option<&Expr> {
        self.dict
            .binary_search_by(|(k, _)| k.cmp(key))
            .ok()
            .map(|i| &self.dict[i].1)
    }
}

/// Unevaluated substitution node. Identity pairs are dropped, a repeated key
/// keeps its last value, and an empty mapping returns `arg`.
#[must_use]
pub fn subs_node(arg: &Expr, pairs: Vec<(Expr, Expr)>) -> Expr {
    let mut dict: Vec<(Expr, Expr)> = Vec::with_capacity(pairs.len());
    for (k, v) in pairs {
        if k == v {
            continue;
        }
        match dict.iter_mut().find(|(existing, _)| *existing == k) {
            Some(slot) => slot.1 = v,
            None => dict.push((k, v)),
        }
    }
    if dict.is_empty() {
        return arg.clone();
    }
    dict.sort_by(|a, b| a.0.cmp(&b.0));
    Expr::from_kind(ExprKind::Subs(Subs {
        arg: arg.clone(),
        dict,
    }))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, reason = "Standard test relaxations")]
mod tests {
    use super::*;
    use crate::core::expr::{complex, integer, rational, real_double, symbol};

    #[test]
    fn trivial_points_evaluate() {
        let zero = integer(0);
        assert_eq!(sin(&zero), integer(0));
        assert_eq!(cos(&zero), integer(1));
        assert_eq!(tanh(&zero), integer(0));
        assert_eq!(cosh(&zero), integer(1));
        assert_eq!(log(&integer(1)).unwrap(), integer(0));
        assert_eq!(log(&constants::e()).unwrap(), integer(1));
    }

    #[test]
    fn log_of_zero_is_a_domain_error() {
        assert!(matches!(log(&integer(0)), Err(SymError::Domain(_))));
    }

    #[test]
    fn symbolic_arguments_stay_unevaluated() {
        let x = symbol("x");
        let s = sin(&x);
        assert_eq!(s.kind_tag(), TypeId::Sin);
        assert_eq!(sin(&integer(1)).kind_tag(), TypeId::Sin);
        assert_ne!(s, cos(&x));
    }

    #[test]
    fn inexact_arguments_evaluate() {
        assert_eq!(cos(&real_double(0.0)), real_double(1.0));
        assert_eq!(log(&real_double(1.0)).unwrap(), real_double(0.0));
        let l = log(&real_double(-1.0)).unwrap();
        assert_eq!(l.kind_tag(), TypeId::ComplexDouble);
    }

    #[test]
    fn abs_of_exact_numbers() {
        assert_eq!(abs(&integer(-3)), integer(3));
        assert_eq!(abs(&rational(-1, 2).unwrap()), rational(1, 2).unwrap());
        let z = complex(Number::integer(3), Number::integer(4)).unwrap();
        assert_eq!(abs(&z), integer(5));
        let x = symbol("x");
        assert_eq!(abs(&abs(&x)), abs(&x));
    }

    #[test]
    fn exp_is_a_power_of_e() {
        let x = symbol("x");
        let e = exp(&x);
        let p = e.as_pow().unwrap();
        assert_eq!(p.base(), &constants::e());
        assert_eq!(exp(&integer(0)), integer(1));
        assert_eq!(exp(&integer(1)), constants::e());
    }

    #[test]
    fn derivative_requires_symbols() {
        let f = function_symbol("f", vec![symbol("x")]);
        let err = derivative(&f, vec![integer(2)]).unwrap_err();
        assert!(matches!(err, SymError::Type { found: TypeId::Integer, .. }));
        let d = derivative(&f, vec![symbol("y"), symbol("x")]).unwrap();
        let ExprKind::Derivative(d) = d.kind() else {
            panic!("expected a derivative");
        };
        assert_eq!(d.symbols(), &[symbol("x"), symbol("y")]);
        assert_eq!(derivative(&f, vec![]).unwrap(), f);
    }

    #[test]
    fn subs_node_normalizes_pairs() {
        let (x, y, z) = (symbol("x"), symbol("y"), symbol("z"));
        let f = function_symbol("f", vec![x.clone(), y.clone()]);
        assert_eq!(subs_node(&f, vec![(x.clone(), x.clone())]), f);
        let a = subs_node(&f, vec![(y.clone(), z.clone()), (x.clone(), z.clone())]);
        let b = subs_node(&f, vec![(x.clone(), z.clone()), (y.clone(), z.clone())]);
        assert_eq!(a, b);
        let ExprKind::Subs(s) = a.kind() else {
            panic!("expected a substitution");
        };
        assert_eq!(s.get(&x), Some(&z));
        assert_eq!(s.get(&z), None);
    }

    #[test]
    fn constants_order_by_name() {
        assert!(Constant::E < Constant::Pi);
        assert!(Constant::Catalan < Constant::EulerGamma);
    }
}
