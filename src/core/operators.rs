//! Arithmetic operators on [`Expr`].
//!
//! `+`, `-`, `*` and unary `-` go through the canonical factories and never
//! fail. Division and powers can fail (division by zero), so they stay
//! functions: [`div`](crate::div), [`Expr::pow`].

use std::ops::{Add, Mul, Neg, Sub};

use crate::core::expr::{self, Expr};

// ===== Macro for generating operator implementations =====
// Every combination of owned/borrowed operands, plus integer literals

macro_rules! impl_binary_ops {
    ($lhs:ty, $rhs:ty, $to_lhs:expr, $to_rhs:expr) => {
        impl Add<$rhs> for $lhs {
            type Output = Expr;
            fn add(self, rhs: $rhs) -> Expr {
                expr::add(&$to_lhs(self), &$to_rhs(rhs))
            }
        }
        impl Sub<$rhs> for $lhs {
            type Output = Expr;
            fn sub(self, rhs: $rhs) -> Expr {
                expr::sub(&$to_lhs(self), &$to_rhs(rhs))
            }
        }
        impl Mul<$rhs> for $lhs {
            type Output = Expr;
            fn mul(self, rhs: $rhs) -> Expr {
                expr::mul(&$to_lhs(self), &$to_rhs(rhs))
            }
        }
    };
}

impl_binary_ops!(Expr, Expr, |s: Expr| s, |r: Expr| r);
impl_binary_ops!(Expr, &Expr, |s: Expr| s, |r: &Expr| r.clone());
impl_binary_ops!(&Expr, Expr, |s: &Expr| s.clone(), |r: Expr| r);
impl_binary_ops!(&Expr, &Expr, |s: &Expr| s.clone(), |r: &Expr| r.clone());

impl_binary_ops!(Expr, i64, |s: Expr| s, Expr::from);
impl_binary_ops!(&Expr, i64, |s: &Expr| s.clone(), Expr::from);
impl_binary_ops!(i64, Expr, Expr::from, |r: Expr| r);
impl_binary_ops!(i64, &Expr, Expr::from, |r: &Expr| r.clone());

impl Neg for Expr {
    type Output = Expr;
    fn neg(self) -> Expr {
        expr::neg(&self)
    }
}

impl Neg for &Expr {
    type Output = Expr;
    fn neg(self) -> Expr {
        expr::neg(self)
    }
}
