//! Process-wide numeric singletons.
//!
//! One lazily built table holds the shared `0`, `1`, `-1`, `2`, `1/2`, `I`
//! and the named constants. Factories hand out clones of these handles, so
//! every canonical `0` in the process is the same allocation.
//!
//! # Lifetime
//!
//! With the `thread-safe` feature the table is a `LazyLock` static: it is
//! built on first use and never torn down. Without it the table is a
//! thread-local (`Rc` handles cannot cross threads); it is built on first use
//! in each thread and dropped at thread exit. Fields drop in declaration
//! order, which is the reverse of the order they are built in below, so no
//! singleton outlives one it was built from.

use crate::core::expr::{Expr, ExprKind};
use crate::core::functions::Constant;
use crate::core::number::{Complex, Number};

/// The singleton table. Declaration order is the teardown order.
pub struct Constants {
    pub golden_ratio: Expr,
    pub catalan: Expr,
    pub euler_gamma: Expr,
    pub e: Expr,
    pub pi: Expr,
    pub i: Expr,
    pub half: Expr,
    pub two: Expr,
    pub minus_one: Expr,
    pub one: Expr,
    pub zero: Expr,
}

impl Constants {
    // `Expr::from(Number)` maps 0/1/-1 onto this table, so the table itself
    // must build its nodes directly.
    fn new() -> Self {
        let number = |n: Number| Expr::from_kind(ExprKind::Number(n));
        let constant = |c: Constant| Expr::from_kind(ExprKind::Constant(c));

        let zero = number(Number::zero());
        let one = number(Number::one());
        let minus_one = number(Number::minus_one());
        let two = number(Number::integer(2));
        let half = match Number::rational(1, 2) {
            Ok(n) => number(n),
            Err(err) => unreachable!("1/2 is a valid rational: {err}"),
        };
        let i = number(Complex::i());
        let pi = constant(Constant::Pi);
        let e = constant(Constant::E);
        let euler_gamma = constant(Constant::EulerGamma);
        let catalan = constant(Constant::Catalan);
        let golden_ratio = constant(Constant::GoldenRatio);

        Self {
            golden_ratio,
            catalan,
            euler_gamma,
            e,
            pi,
            i,
            half,
            two,
            minus_one,
            one,
            zero,
        }
    }
}

#[cfg(feature = "thread-safe")]
static CONSTANTS: std::sync::LazyLock<Constants> = std::sync::LazyLock::new(Constants::new);

#[cfg(not(feature = "thread-safe"))]
thread_local! {
    static CONSTANTS: Constants = Constants::new();
}

/// Runs `f` with the singleton table.
#[cfg(feature = "thread-safe")]
pub fn with_constants<R>(f: impl FnOnce(&Constants) -> R) -> R {
    f(&CONSTANTS)
}

/// Runs `f` with the singleton table.
#[cfg(not(feature = "thread-safe"))]
pub fn with_constants<R>(f: impl FnOnce(&Constants) -> R) -> R {
    CONSTANTS.with(f)
}

macro_rules! singleton_accessors {
    ($($(#[$doc:meta])* $name:ident),* $(,)?) => {
        $(
            $(#[$doc])*
            #[must_use]
            pub fn $name() -> Expr {
                with_constants(|c| c.$name.clone())
            }
        )*
    };
}

singleton_accessors! {
    /// Exact `0`.
    zero,
    /// Exact `1`.
    one,
    /// Exact `-1`.
    minus_one,
    two,
    /// Exact `1/2`.
    half,
    /// The imaginary unit.
    i,
    pi,
    /// Euler's number.
    e,
    euler_gamma,
    catalan,
    golden_ratio,
}
