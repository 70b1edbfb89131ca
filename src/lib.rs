//! Canonical Symbolic Expressions
//!
//! Immutable, shared expression trees kept in one unique normalized form,
//! plus an open set of operations over them.
//!
//! # Features
//! - **Canonical factories**: `x + x` is `2*x`, `x^2 * x^3` is `x^5`,
//!   `2^-1` is `1/2` the moment it is built
//! - **Structural equality, hashing and a total order** usable as map keys
//! - **Visitor dispatch** over a closed kind set with per-group defaults
//! - **Rewrite skeletons**: bottom-up rewrite, generic transform, substitution
//! - **Consumers**: differentiation, numeric evaluation, string printing
//!
//! # Usage
//! ```
//! use symb_core::{diff, integer, pow, subs, symbol, SubsMap};
//!
//! let (x, y) = (symbol("x"), symbol("y"));
//! assert_eq!(&x + &x, integer(2) * &x);
//!
//! let e = pow(&x, &integer(3)).unwrap() + &x * &y;
//! assert_eq!(diff(&e, &y).unwrap(), x.clone());
//!
//! let map = SubsMap::from_iter([(x.clone(), y.clone())]);
//! assert_eq!(subs(&(&x + &y), &map).unwrap(), integer(2) * &y);
//! assert_eq!((&x - &y).to_string(), "x - y");
//! ```
//!
//! # Reference counting
//! With the default `thread-safe` feature nodes are `Arc`-backed and may be
//! shared across threads. Disabling it switches to `Rc`.

mod core;
pub mod diff;
pub mod evaluator;
pub mod transform;

#[cfg(test)]
mod tests;

pub use crate::core::{constants, number, traversal, visitor};

// Re-export key types for easier usage
pub use crate::core::{
    Add, Complex, ComplexDouble, Constant, Derivative, Expr, ExprKind, FactorDict, Function,
    FunctionKind, FunctionSymbol, Integer, Mul, Number, NumberOps, Pow, Rational, RealDouble,
    Result, Subs, SymError, Symbol, TermDict, TypeId, interned_name_count,
};
pub use crate::core::{
    abs, add, complex, cos, cosh, derivative, div, exp, expr_cmp, function_symbol, integer, log,
    mul, neg, pow, rational, real_double, root, sin, sinh, sqrt, sub, subs_node, symbol, tan,
    tanh,
};
pub use crate::core::traversal::{free_symbols, has_symbol, postorder, preorder};
pub use diff::diff;
pub use evaluator::{eval_complex_double, eval_double};
pub use transform::{SubsMap, Substitution, bottom_up, expand, expand_as_exp, msubs, subs, transform};
