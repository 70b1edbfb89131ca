//! Double-precision numeric evaluation.
//!
//! [`eval_double`] and [`eval_complex_double`] fold a fully numeric tree
//! (numbers, constants, sums, products, powers, built-in functions) into an
//! `f64` or a [`Complex64`]. Both run the same visitor, parameterized by a
//! [`Scalar`] type that supplies the arithmetic.
//!
//! ```
//! use symb_core::evaluator::eval_double;
//! use symb_core::{constants, integer, sin};
//!
//! let e = sin(&constants::pi()) + integer(2);
//! assert!((eval_double(&e).unwrap() - 2.0).abs() < 1e-12);
//! ```

use num_complex::Complex64;

use crate::core::visitor::Visitor;
use crate::core::{
    Add, Constant, Expr, Function, FunctionKind, Mul, Number, Pow, Result, SymError, Symbol,
};

/// Evaluates `expr` as a real double.
///
/// # Errors
/// - `NotImplemented` for free symbols and for undefined functions,
///   unevaluated derivatives and substitutions
/// - `Domain` when the value is not real: an imaginary number, `log` of a
///   negative value, or a negative base raised to a fractional power
pub fn eval_double(expr: &Expr) -> Result<f64> {
    expr.accept(&mut Evaluator::<f64>::default())
}

/// Evaluates `expr` as a complex double, using principal branches.
///
/// # Errors
/// `NotImplemented` for free symbols and for undefined functions,
/// unevaluated derivatives and substitutions.
pub fn eval_complex_double(expr: &Expr) -> Result<Complex64> {
    expr.accept(&mut Evaluator::<Complex64>::default())
}

impl Expr {
    /// See [`eval_double`].
    ///
    /// # Errors
    /// Same as [`eval_double`].
    pub fn eval_double(&self) -> Result<f64> {
        eval_double(self)
    }

    /// See [`eval_complex_double`].
    ///
    /// # Errors
    /// Same as [`eval_complex_double`].
    pub fn eval_complex_double(&self) -> Result<Complex64> {
        eval_complex_double(self)
    }
}

// =============================================================================
// Scalar arithmetic
// =============================================================================

/// Target field of an evaluation.
pub trait Scalar: Copy + std::ops::Add<Output = Self> + std::ops::Mul<Output = Self> {
    fn zero() -> Self;
    fn one() -> Self;
    fn from_number(n: &Number) -> Result<Self>;
    fn from_constant(c: Constant) -> Self;
    fn power(self, exp: Self) -> Result<Self>;
    fn function(kind: FunctionKind, x: Self) -> Result<Self>;
}

impl Scalar for f64 {
    fn zero() -> Self {
        0.0
    }

    fn one() -> Self {
        1.0
    }

    fn from_number(n: &Number) -> Result<Self> {
        n.to_f64()
            .ok_or_else(|| SymError::domain(format!("{n} is not real")))
    }

    fn from_constant(c: Constant) -> Self {
        c.value()
    }

    fn power(self, exp: Self) -> Result<Self> {
        if self < 0.0 && exp.fract() != 0.0 {
            return Err(SymError::domain(format!(
                "({self})^({exp}) is not real"
            )));
        }
        if exp.fract() == 0.0 && exp.abs() <= f64::from(i32::MAX) {
            #[allow(clippy::cast_possible_truncation, reason = "integral and in range")]
            return Ok(self.powi(exp as i32));
        }
        Ok(self.powf(exp))
    }

    fn function(kind: FunctionKind, x: Self) -> Result<Self> {
        kind.eval_real(x)
            .ok_or_else(|| SymError::domain(format!("{}({x}) is not real", kind.name())))
    }
}

impl Scalar for Complex64 {
    fn zero() -> Self {
        Complex64::new(0.0, 0.0)
    }

    fn one() -> Self {
        Complex64::new(1.0, 0.0)
    }

    fn from_number(n: &Number) -> Result<Self> {
        Ok(n.to_complex64())
    }

    fn from_constant(c: Constant) -> Self {
        Complex64::new(c.value(), 0.0)
    }

    fn power(self, exp: Self) -> Result<Self> {
        if exp.im == 0.0 && exp.re.fract() == 0.0 && exp.re.abs() <= f64::from(i32::MAX) {
            #[allow(clippy::cast_possible_truncation, reason = "integral and in range")]
            return Ok(self.powi(exp.re as i32));
        }
        Ok(self.powc(exp))
    }

    fn function(kind: FunctionKind, x: Self) -> Result<Self> {
        Ok(kind.eval_complex(x))
    }
}

// =============================================================================
// Visitor
// =============================================================================

#[derive(Default)]
struct Evaluator<T> {
    _scalar: std::marker::PhantomData<T>,
}

impl<T: Scalar> Evaluator<T> {
    fn eval(&mut self, expr: &Expr) -> Result<T> {
        expr.accept(self)
    }
}

impl<T: Scalar> Visitor for Evaluator<T> {
    type Output = Result<T>;

    fn visit_default(&mut self, expr: &Expr) -> Result<T> {
        Err(SymError::not_implemented(format!(
            "cannot evaluate {expr} numerically"
        )))
    }

    fn visit_number(&mut self, _: &Expr, n: &Number) -> Result<T> {
        T::from_number(n)
    }

    fn visit_constant(&mut self, _: &Expr, c: &Constant) -> Result<T> {
        Ok(T::from_constant(*c))
    }

    fn visit_symbol(&mut self, _: &Expr, s: &Symbol) -> Result<T> {
        Err(SymError::not_implemented(format!(
            "symbol {} has no value",
            s.name()
        )))
    }

    fn visit_add(&mut self, _: &Expr, add: &Add) -> Result<T> {
        let mut total = T::from_number(add.coef())?;
        for (term, mult) in add.dict() {
            total = total + T::from_number(mult)? * self.eval(term)?;
        }
        Ok(total)
    }

    fn visit_mul(&mut self, _: &Expr, m: &Mul) -> Result<T> {
        let mut product = T::from_number(m.coef())?;
        for (base, exp) in m.dict() {
            product = product * self.eval(base)?.power(self.eval(exp)?)?;
        }
        Ok(product)
    }

    fn visit_pow(&mut self, _: &Expr, p: &Pow) -> Result<T> {
        self.eval(p.base())?.power(self.eval(p.exp())?)
    }

    fn visit_function(&mut self, _: &Expr, f: &Function) -> Result<T> {
        T::function(f.kind(), self.eval(f.arg())?)
    }
}
