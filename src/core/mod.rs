//! Core types for canonical symbolic expressions
//!
//! This module contains the fundamental types:
//! - `Expr` / `ExprKind` / `TypeId` - shared immutable expression nodes
//! - `Number` and its concrete kinds - the numeric tower
//! - `Symbol` - interned names
//! - Canonical factories (`add`, `mul`, `pow`, ...) and the `Add`/`Mul`/`Pow`
//!   canonicalizers
//! - Visitor protocol, traversals and the string printer

pub mod constants;
mod display;
pub(crate) mod error;
pub(crate) mod expr;
pub(crate) mod functions;
pub mod number;
mod operators;
pub(crate) mod symbol;
pub mod traversal;
pub mod visitor;

/// Shared ownership pointer behind every [`Expr`].
///
/// Atomic reference counting with the `thread-safe` feature (the default),
/// plain reference counting without it.
#[cfg(feature = "thread-safe")]
pub(crate) type Rcp<T> = std::sync::Arc<T>;

#[cfg(not(feature = "thread-safe"))]
pub(crate) type Rcp<T> = std::rc::Rc<T>;

// Public re-exports (for external API)
pub use error::{Result, SymError};
pub use expr::{
    Add, Expr, ExprKind, FactorDict, Mul, Pow, TermDict, TypeId, add, complex, div, expr_cmp,
    integer, mul, neg, pow, rational, real_double, root, sqrt, sub, symbol,
};
pub use functions::{
    Constant, Derivative, Function, FunctionKind, FunctionSymbol, Subs, abs, cos, cosh, derivative,
    exp, function_symbol, log, sin, sinh, subs_node, tan, tanh,
};
pub use number::{Complex, ComplexDouble, Integer, Number, NumberOps, Rational, RealDouble};
pub use symbol::{Symbol, interned_name_count};
