//! Dispatch protocol for operations over expression nodes.
//!
//! An operation implements [`Visitor`]: one required
//! [`visit_default`](Visitor::visit_default) entry plus one optional entry per
//! node kind. `expr.accept(&mut v)` selects the entry for the node's kind.
//! Unspecialized entries forward upwards:
//!
//! ```text
//! visit_integer ─┐
//! visit_rational ├─► visit_number ───► visit_default
//! ...           ─┘
//! visit_sin     ─┐
//! visit_log      ├─► visit_function ─► visit_default
//! ...           ─┘
//! visit_symbol, visit_add, visit_mul, ... ──► visit_default
//! ```
//!
//! so a visitor only writes the kinds it specializes, and every kind always
//! reaches some entry.
//!
//! # Example
//! ```
//! use symb_core::visitor::Visitor;
//! use symb_core::{Expr, Add, symbol, integer};
//!
//! /// Counts the terms of a top-level sum.
//! struct Terms;
//!
//! impl Visitor for Terms {
//!     type Output = usize;
//!     fn visit_default(&mut self, _: &Expr) -> usize { 1 }
//!     fn visit_add(&mut self, _: &Expr, add: &Add) -> usize { add.dict().len() }
//! }
//!
//! let x = symbol("x");
//! assert_eq!((&x + integer(1)).accept(&mut Terms), 1);
//! assert_eq!((&x + symbol("y")).accept(&mut Terms), 2);
//! ```

use crate::core::expr::{Add, Expr, ExprKind, Mul, Pow};
use crate::core::functions::{Constant, Derivative, Function, FunctionKind, FunctionSymbol, Subs};
use crate::core::number::{Complex, ComplexDouble, Integer, Number, Rational, RealDouble};
use crate::core::symbol::Symbol;

/// Generates the [`Visitor`] trait and [`Expr::accept`] from one kind list,
/// so adding a kind is a one-line change here.
macro_rules! define_visitor {
    (
        numbers { $($num_method:ident => $num_variant:ident($num_ty:ty)),* $(,)? }
        functions { $($fn_method:ident => $fn_kind:ident),* $(,)? }
        nodes { $($node_method:ident => $node_variant:ident($node_ty:ty)),* $(,)? }
    ) => {
        /// An operation over expression nodes. See the [module docs](self).
        pub trait Visitor {
            type Output;

            /// Fallback for every kind without a more specific entry.
            fn visit_default(&mut self, expr: &Expr) -> Self::Output;

            /// Group entry for the numeric kinds.
            fn visit_number(&mut self, expr: &Expr, number: &Number) -> Self::Output {
                let _ = number;
                self.visit_default(expr)
            }

            /// Group entry for the built-in one-argument functions.
            fn visit_function(&mut self, expr: &Expr, function: &Function) -> Self::Output {
                let _ = function;
                self.visit_default(expr)
            }

            $(
                fn $num_method(&mut self, expr: &Expr, value: &$num_ty) -> Self::Output {
                    let _ = value;
                    self.visit_number(expr, expr.number_unchecked())
                }
            )*

            $(
                fn $fn_method(&mut self, expr: &Expr, function: &Function) -> Self::Output {
                    self.visit_function(expr, function)
                }
            )*

            $(
                fn $node_method(&mut self, expr: &Expr, node: &$node_ty) -> Self::Output {
                    let _ = node;
                    self.visit_default(expr)
                }
            )*
        }

        impl Expr {
            /// Single dispatch on the node kind.
            pub fn accept<V: Visitor + ?Sized>(&self, visitor: &mut V) -> V::Output {
                match self.kind() {
                    $(ExprKind::Number(Number::$num_variant(value)) => visitor.$num_method(self, value),)*
                    ExprKind::Function(f) => match f.kind() {
                        $(FunctionKind::$fn_kind => visitor.$fn_method(self, f),)*
                    },
                    $(ExprKind::$node_variant(node) => visitor.$node_method(self, node),)*
                }
            }
        }
    };
}

define_visitor! {
    numbers {
        visit_integer => Integer(Integer),
        visit_rational => Rational(Rational),
        visit_complex => Complex(Complex),
        visit_real_double => RealDouble(RealDouble),
        visit_complex_double => ComplexDouble(ComplexDouble),
    }
    functions {
        visit_sin => Sin,
        visit_cos => Cos,
        visit_tan => Tan,
        visit_sinh => Sinh,
        visit_cosh => Cosh,
        visit_tanh => Tanh,
        visit_log => Log,
        visit_abs => Abs,
    }
    nodes {
        visit_symbol => Symbol(Symbol),
        visit_constant => Constant(Constant),
        visit_add => Add(Add),
        visit_mul => Mul(Mul),
        visit_pow => Pow(Pow),
        visit_function_symbol => FunctionSymbol(FunctionSymbol),
        visit_derivative => Derivative(Derivative),
        visit_subs => Subs(Subs),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, reason = "Standard test relaxations")]
mod tests {
    use super::*;
    use crate::core::expr::{TypeId, integer, rational, real_double, symbol};
    use crate::core::functions::{log, sin};

    /// Records which entry handled the node.
    struct Route;

    impl Visitor for Route {
        type Output = &'static str;

        fn visit_default(&mut self, _: &Expr) -> &'static str {
            "default"
        }

        fn visit_number(&mut self, _: &Expr, _: &Number) -> &'static str {
            "number"
        }

        fn visit_rational(&mut self, _: &Expr, _: &Rational) -> &'static str {
            "rational"
        }

        fn visit_function(&mut self, _: &Expr, _: &Function) -> &'static str {
            "function"
        }

        fn visit_log(&mut self, _: &Expr, _: &Function) -> &'static str {
            "log"
        }
    }

    #[test]
    fn most_specific_entry_wins() {
        let x = symbol("x");
        assert_eq!(rational(1, 2).unwrap().accept(&mut Route), "rational");
        assert_eq!(log(&x).unwrap().accept(&mut Route), "log");
    }

    #[test]
    fn unspecialized_kinds_forward_to_group_then_default() {
        let x = symbol("x");
        assert_eq!(integer(3).accept(&mut Route), "number");
        assert_eq!(real_double(1.5).accept(&mut Route), "number");
        assert_eq!(sin(&x).accept(&mut Route), "function");
        assert_eq!(x.accept(&mut Route), "default");
        assert_eq!((&x + integer(1)).accept(&mut Route), "default");
    }

    /// Reports the tag seen through each leaf entry.
    struct Tags;

    impl Visitor for Tags {
        type Output = TypeId;

        fn visit_default(&mut self, expr: &Expr) -> TypeId {
            expr.kind_tag()
        }
    }

    #[test]
    fn default_only_visitor_handles_every_kind() {
        let x = symbol("x");
        let samples = [integer(2), x.clone(), &x * &x, &x + integer(1), sin(&x)];
        for e in samples {
            assert_eq!(e.accept(&mut Tags), e.kind_tag());
        }
    }
}
