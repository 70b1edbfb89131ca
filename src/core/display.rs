//! String printer.
//!
//! Plain infix notation, written as a [`Visitor`]:
//! - sums put the constant first, then terms in canonical order, with
//!   ` - ` for negative multiplicities: `3 + 2*x - y`
//! - products put the coefficient first: `-x*y`, `(1/2)*x`
//! - powers use `^` and parenthesize compound operands: `(x + 1)^2`,
//!   `x^(-1)`, `2^(1/2)`
//! - functions print as calls: `sin(x)`, `f(x, y)`,
//!   `Derivative(f(x), x)`, `Subs(g(x), (x), (y))`

use std::fmt;

use crate::core::expr::{Add, Expr, ExprKind, Mul, Pow, is_exact_one};
use crate::core::functions::{Constant, Derivative, Function, FunctionSymbol, Subs};
use crate::core::number::{Number, NumberOps};
use crate::core::symbol::Symbol;
use crate::core::visitor::Visitor;

/// Renders an expression as a string.
pub(crate) struct StrPrinter;

impl StrPrinter {
    fn print(&mut self, expr: &Expr) -> String {
        expr.accept(self)
    }

    fn print_list(&mut self, items: &[Expr]) -> String {
        items
            .iter()
            .map(|e| self.print(e))
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Operand of `^`: anything but a bare atom is parenthesized.
    fn pow_operand(&mut self, expr: &Expr) -> String {
        let s = self.print(expr);
        let bare = match expr.kind() {
            ExprKind::Number(Number::Integer(_)) => !expr_is_negative(expr),
            ExprKind::Number(Number::RealDouble(_)) => !expr_is_negative(expr),
            ExprKind::Number(_) | ExprKind::Add(_) | ExprKind::Mul(_) | ExprKind::Pow(_) => false,
            _ => true,
        };
        if bare { s } else { format!("({s})") }
    }

    fn power(&mut self, base: &Expr, exp: &Expr) -> String {
        format!("{}^{}", self.pow_operand(base), self.pow_operand(exp))
    }

    /// Factor of a product: only sums need parentheses.
    fn factor(&mut self, base: &Expr, exp: &Expr) -> String {
        if exp.is_one() {
            let s = self.print(base);
            if matches!(base.kind(), ExprKind::Add(_)) {
                format!("({s})")
            } else {
                s
            }
        } else {
            self.power(base, exp)
        }
    }
}

fn expr_is_negative(expr: &Expr) -> bool {
    expr.as_number().is_some_and(NumberOps::is_negative)
}

/// Coefficient in front of a product.
fn coef_string(coef: &Number) -> String {
    match coef {
        Number::Rational(_) | Number::ComplexDouble(_) => format!("({coef})"),
        Number::Complex(c) if !c.is_pure_imaginary() => format!("({coef})"),
        _ => coef.to_string(),
    }
}

impl Visitor for StrPrinter {
    type Output = String;

    fn visit_default(&mut self, expr: &Expr) -> String {
        unreachable!("printer covers every kind, got {:?}", expr.kind_tag())
    }

    fn visit_number(&mut self, _: &Expr, number: &Number) -> String {
        number.to_string()
    }

    fn visit_symbol(&mut self, _: &Expr, symbol: &Symbol) -> String {
        symbol.name().to_owned()
    }

    fn visit_constant(&mut self, _: &Expr, constant: &Constant) -> String {
        constant.name().to_owned()
    }

    fn visit_add(&mut self, _: &Expr, add: &Add) -> String {
        let mut out = String::new();
        if !add.coef().is_exact_zero() {
            out.push_str(&add.coef().to_string());
        }
        for (term, mult) in add.sorted_terms() {
            if out.is_empty() {
                out.push_str(&self.print(&Add::term_expr(term, mult)));
            } else if mult.is_negative() {
                out.push_str(" - ");
                out.push_str(&self.print(&Add::term_expr(term, &mult.neg())));
            } else {
                out.push_str(" + ");
                out.push_str(&self.print(&Add::term_expr(term, mult)));
            }
        }
        out
    }

    fn visit_mul(&mut self, _: &Expr, mul: &Mul) -> String {
        let coef = mul.coef();
        let mut out = if coef.is_exact() && coef.is_minus_one() {
            "-".to_owned()
        } else if is_exact_one(coef) {
            String::new()
        } else {
            format!("{}*", coef_string(coef))
        };
        let factors: Vec<String> = mul
            .sorted_factors()
            .into_iter()
            .map(|(b, e)| self.factor(b, e))
            .collect();
        out.push_str(&factors.join("*"));
        out
    }

    fn visit_pow(&mut self, _: &Expr, pow: &Pow) -> String {
        self.power(pow.base(), pow.exp())
    }

    fn visit_function(&mut self, _: &Expr, function: &Function) -> String {
        format!("{}({})", function.kind().name(), self.print(function.arg()))
    }

    fn visit_function_symbol(&mut self, _: &Expr, f: &FunctionSymbol) -> String {
        format!("{}({})", f.name(), self.print_list(f.args()))
    }

    fn visit_derivative(&mut self, _: &Expr, d: &Derivative) -> String {
        format!(
            "Derivative({}, {})",
            self.print(d.arg()),
            self.print_list(d.symbols())
        )
    }

    fn visit_subs(&mut self, _: &Expr, s: &Subs) -> String {
        let keys: Vec<Expr> = s.dict().iter().map(|(k, _)| k.clone()).collect();
        let values: Vec<Expr> = s.dict().iter().map(|(_, v)| v.clone()).collect();
        format!(
            "Subs({}, ({}), ({}))",
            self.print(s.arg()),
            self.print_list(&keys),
            self.print_list(&values)
        )
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.accept(&mut StrPrinter))
    }
}
