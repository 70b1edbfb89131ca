//! Expression nodes.
//!
//! This module defines:
//! - `Expr` - a cheap-to-clone shared handle to an immutable node
//! - `ExprKind` - the payload of a node (Number, Symbol, Add, Mul, ...)
//! - `TypeId` - the kind tag, which is also the first key of the total order
//!
//! # Architecture
//!
//! ## Sharing
//! Nodes are immutable once built and are shared by reference count, so an
//! expression is a DAG: `x` inside `x + sin(x)` is one allocation referenced
//! twice. Rewrites reuse every untouched subtree.
//!
//! ## Canonical form
//! Nodes are only produced by the canonical factories (`add`, `mul`, `pow`,
//! `Add::from_dict`, ...). Structurally equal input always yields a
//! structurally equal node, so equality and hashing never need to
//! canonicalize on the fly.
//!
//! ## Structural hashing
//! Each node carries a hash computed once at construction. Equality rejects
//! on hash mismatch before walking any structure.
//!
//! # Usage
//!
//! ```
//! use symb_core::{integer, symbol};
//!
//! let x = symbol("x");
//! let e = &x + &x + integer(3);
//! assert_eq!(e.to_string(), "3 + 2*x");
//! ```

// Submodules
mod add;
mod constructors;
mod hash;
mod mul;
mod ordering;
mod pow;

use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::Deref;

use crate::core::Rcp;
use crate::core::error::{Result, SymError};
use crate::core::functions::{Constant, Derivative, Function, FunctionSymbol, Subs};
use crate::core::number::{Number, NumberOps};
use crate::core::symbol::Symbol;

pub use add::{Add, TermDict};
pub use constructors::{
    add, complex, div, integer, mul, neg, rational, real_double, root, sqrt, sub, symbol,
};
pub use mul::{FactorDict, Mul};
pub use ordering::expr_cmp;
pub use pow::{Pow, pow};

pub(crate) use add::{add_all, coef_dict_add_term};
pub(crate) use mul::{as_base_exp, dict_add_term_new, fold_factor};

// =============================================================================
// KIND TAGS
// =============================================================================

/// Kind tag of a node.
///
/// The declaration order is fixed and is the primary key of the total order
/// over expressions. Number kinds come first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum TypeId {
    Integer,
    Rational,
    Complex,
    RealDouble,
    ComplexDouble,
    Symbol,
    Constant,
    Mul,
    Add,
    Pow,
    Sin,
    Cos,
    Tan,
    Sinh,
    Cosh,
    Tanh,
    Log,
    Abs,
    FunctionSymbol,
    Derivative,
    Subs,
}

impl TypeId {
    /// Number of kinds.
    pub const COUNT: usize = TypeId::Subs as usize + 1;

    /// Every kind in tag order.
    pub const ALL: [TypeId; TypeId::COUNT] = [
        TypeId::Integer,
        TypeId::Rational,
        TypeId::Complex,
        TypeId::RealDouble,
        TypeId::ComplexDouble,
        TypeId::Symbol,
        TypeId::Constant,
        TypeId::Mul,
        TypeId::Add,
        TypeId::Pow,
        TypeId::Sin,
        TypeId::Cos,
        TypeId::Tan,
        TypeId::Sinh,
        TypeId::Cosh,
        TypeId::Tanh,
        TypeId::Log,
        TypeId::Abs,
        TypeId::FunctionSymbol,
        TypeId::Derivative,
        TypeId::Subs,
    ];

    #[inline]
    #[must_use]
    pub fn is_number(self) -> bool {
        self <= TypeId::ComplexDouble
    }
}

// =============================================================================
// EXPR - shared handle
// =============================================================================

/// A canonical symbolic expression.
///
/// Cloning is a reference-count increment. The node behind the handle never
/// changes.
#[derive(Clone)]
pub struct Expr(Rcp<Node>);

/// Heap node: pre-computed structural hash plus payload.
pub(crate) struct Node {
    hash: u64,
    kind: ExprKind,
}

/// Payload of an expression node.
#[derive(Debug, PartialEq, Eq)]
pub enum ExprKind {
    /// Any numeric kind; the concrete kind decides the tag.
    Number(Number),
    Symbol(Symbol),
    Constant(Constant),
    /// `coef + Σ mult·term`
    Add(Add),
    /// `coef · Π base^exp`
    Mul(Mul),
    Pow(Pow),
    /// Built-in one-argument function; the function kind decides the tag.
    Function(Function),
    FunctionSymbol(FunctionSymbol),
    Derivative(Derivative),
    Subs(Subs),
}

impl ExprKind {
    /// Kind tag of this payload.
    #[must_use]
    pub fn tag(&self) -> TypeId {
        match self {
            ExprKind::Number(n) => match n {
                Number::Integer(_) => TypeId::Integer,
                Number::Rational(_) => TypeId::Rational,
                Number::Complex(_) => TypeId::Complex,
                Number::RealDouble(_) => TypeId::RealDouble,
                Number::ComplexDouble(_) => TypeId::ComplexDouble,
            },
            ExprKind::Symbol(_) => TypeId::Symbol,
            ExprKind::Constant(_) => TypeId::Constant,
            ExprKind::Add(_) => TypeId::Add,
            ExprKind::Mul(_) => TypeId::Mul,
            ExprKind::Pow(_) => TypeId::Pow,
            ExprKind::Function(f) => f.kind().tag(),
            ExprKind::FunctionSymbol(_) => TypeId::FunctionSymbol,
            ExprKind::Derivative(_) => TypeId::Derivative,
            ExprKind::Subs(_) => TypeId::Subs,
        }
    }
}

impl Expr {
    /// Wraps a payload into a fresh node. Only canonical payloads may reach
    /// this point; the kind-specific constructors check that in debug builds.
    pub(crate) fn from_kind(kind: ExprKind) -> Self {
        let hash = hash::compute_expr_hash(&kind);
        Expr(Rcp::new(Node { hash, kind }))
    }

    #[inline]
    #[must_use]
    pub fn kind(&self) -> &ExprKind {
        &self.0.kind
    }

    /// Kind tag of the node.
    #[inline]
    #[must_use]
    pub fn kind_tag(&self) -> TypeId {
        self.0.kind.tag()
    }

    /// Structural hash, computed once at construction.
    ///
    /// Equal expressions have equal hashes; the combination over `Add`/`Mul`
    /// entries is order independent.
    #[inline]
    #[must_use]
    pub fn structural_hash(&self) -> u64 {
        self.0.hash
    }

    /// `true` if both handles point at the same node.
    #[inline]
    #[must_use]
    pub fn ptr_eq(a: &Expr, b: &Expr) -> bool {
        Rcp::ptr_eq(&a.0, &b.0)
    }

    /// Number of handles currently sharing this node.
    #[must_use]
    pub fn use_count(&self) -> usize {
        Rcp::strong_count(&self.0)
    }

    // -------------------------------------------------------------------------
    // Kind queries
    // -------------------------------------------------------------------------

    #[inline]
    #[must_use]
    pub fn is_number(&self) -> bool {
        matches!(self.kind(), ExprKind::Number(_))
    }

    #[inline]
    #[must_use]
    pub fn as_number(&self) -> Option<&Number> {
        match self.kind() {
            ExprKind::Number(n) => Some(n),
            _ => None,
        }
    }

    /// Number payload of a node already known to be numeric.
    pub(crate) fn number_unchecked(&self) -> &Number {
        match self.kind() {
            ExprKind::Number(n) => n,
            other => unreachable!("numeric visitor entry reached with {:?}", other.tag()),
        }
    }

    #[must_use]
    pub fn as_symbol(&self) -> Option<&Symbol> {
        match self.kind() {
            ExprKind::Symbol(s) => Some(s),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_symbol(&self) -> bool {
        self.as_symbol().is_some()
    }

    #[must_use]
    pub fn as_add(&self) -> Option<&Add> {
        match self.kind() {
            ExprKind::Add(a) => Some(a),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_mul(&self) -> Option<&Mul> {
        match self.kind() {
            ExprKind::Mul(m) => Some(m),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_pow(&self) -> Option<&Pow> {
        match self.kind() {
            ExprKind::Pow(p) => Some(p),
            _ => None,
        }
    }

    /// Exact zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.as_number().is_some_and(NumberOps::is_exact_zero)
    }

    /// Exact one.
    #[must_use]
    pub fn is_one(&self) -> bool {
        self.as_number().is_some_and(is_exact_one)
    }

    /// Exact minus one.
    #[must_use]
    pub fn is_minus_one(&self) -> bool {
        self.as_number()
            .is_some_and(|n| n.is_exact() && n.is_minus_one())
    }

    /// The symbol's name, if this is a symbol.
    #[must_use]
    pub fn symbol_name(&self) -> Option<&str> {
        self.as_symbol().map(Symbol::name)
    }

    /// Requires a symbol node.
    ///
    /// # Errors
    /// Type error for any other kind.
    pub fn expect_symbol(&self) -> Result<&Symbol> {
        self.as_symbol().ok_or(SymError::Type {
            expected: "Symbol",
            found: self.kind_tag(),
        })
    }

    // -------------------------------------------------------------------------
    // Children
    // -------------------------------------------------------------------------

    /// Ordered child handles.
    ///
    /// - `Add`: the coefficient (unless exact zero) then every `mult*term`,
    ///   sorted by [`expr_cmp`]
    /// - `Mul`: the coefficient (unless exact one) then every `base^exp`,
    ///   sorted
    /// - `Pow`: `[base, exp]`
    /// - functions: their arguments
    /// - `Derivative`: `[arg, symbols...]`
    /// - `Subs`: `[arg, keys..., values...]`
    /// - atoms: empty
    #[must_use]
    pub fn children(&self) -> Vec<Expr> {
        match self.kind() {
            ExprKind::Number(_) | ExprKind::Symbol(_) | ExprKind::Constant(_) => Vec::new(),
            ExprKind::Add(a) => a.args(),
            ExprKind::Mul(m) => m.args(),
            ExprKind::Pow(p) => vec![p.base().clone(), p.exp().clone()],
            ExprKind::Function(f) => vec![f.arg().clone()],
            ExprKind::FunctionSymbol(f) => f.args().to_vec(),
            ExprKind::Derivative(d) => {
                let mut out = Vec::with_capacity(d.symbols().len() + 1);
                out.push(d.arg().clone());
                out.extend(d.symbols().iter().cloned());
                out
            }
            ExprKind::Subs(s) => {
                let mut out = Vec::with_capacity(2 * s.dict().len() + 1);
                out.push(s.arg().clone());
                out.extend(s.dict().iter().map(|(k, _)| k.clone()));
                out.extend(s.dict().iter().map(|(_, v)| v.clone()));
                out
            }
        }
    }

    /// Rebuilds a node of the same kind from replacement children, in the
    /// layout returned by [`children`](Self::children), through the
    /// canonical factories.
    ///
    /// # Errors
    /// Whatever the kind's factory raises (e.g. a domain error from `pow`).
    pub fn with_children(&self, children: Vec<Expr>) -> Result<Expr> {
        match self.kind() {
            ExprKind::Number(_) | ExprKind::Symbol(_) | ExprKind::Constant(_) => {
                debug_assert!(children.is_empty(), "atoms have no children");
                Ok(self.clone())
            }
            ExprKind::Add(_) => Ok(Expr::sum(children)),
            ExprKind::Mul(_) => Ok(Expr::product(children)),
            ExprKind::Pow(_) => {
                let [base, exp] = <[Expr; 2]>::try_from(children).map_err(|_| {
                    SymError::Domain("power takes exactly two children".to_owned())
                })?;
                pow(&base, &exp)
            }
            ExprKind::Function(f) => {
                let [arg] = <[Expr; 1]>::try_from(children).map_err(|_| {
                    SymError::Domain(format!("{} takes exactly one argument", f.kind().name()))
                })?;
                f.kind().apply(&arg)
            }
            ExprKind::FunctionSymbol(f) => Ok(crate::core::functions::function_symbol(
                f.name(),
                children,
            )),
            ExprKind::Derivative(_) => {
                let mut it = children.into_iter();
                let arg = it.next().ok_or_else(|| {
                    SymError::Domain("derivative needs an argument".to_owned())
                })?;
                crate::core::functions::derivative(&arg, it.collect())
            }
            ExprKind::Subs(s) => {
                let n = s.dict().len();
                if children.len() != 2 * n + 1 {
                    return Err(SymError::Domain(
                        "substitution child count mismatch".to_owned(),
                    ));
                }
                let mut it = children.into_iter();
                let Some(arg) = it.next() else {
                    unreachable!("length checked above")
                };
                let keys: Vec<Expr> = it.by_ref().take(n).collect();
                let pairs = keys.into_iter().zip(it).collect();
                Ok(crate::core::functions::subs_node(&arg, pairs))
            }
        }
    }
}

/// Exact `1`; an inexact `1.0` is not an identity for canonicalization.
#[inline]
pub(crate) fn is_exact_one(n: &Number) -> bool {
    n.is_exact() && n.is_one()
}

// =============================================================================
// EQUALITY / HASHING
// =============================================================================

impl Deref for Expr {
    type Target = ExprKind;

    #[inline]
    fn deref(&self) -> &ExprKind {
        &self.0.kind
    }
}

impl PartialEq for Expr {
    fn eq(&self, other: &Self) -> bool {
        if Expr::ptr_eq(self, other) {
            return true;
        }
        // Hash mismatch means structurally different
        if self.0.hash != other.0.hash {
            return false;
        }
        self.0.kind == other.0.kind
    }
}

impl Eq for Expr {}

impl Hash for Expr {
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.0.hash);
    }
}

impl fmt::Debug for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Expr({self})")
    }
}

impl From<Number> for Expr {
    fn from(n: Number) -> Self {
        match n.to_i64() {
            Some(0) => crate::core::constants::zero(),
            Some(1) => crate::core::constants::one(),
            Some(-1) => crate::core::constants::minus_one(),
            _ => Expr::from_kind(ExprKind::Number(n)),
        }
    }
}

impl From<i64> for Expr {
    fn from(value: i64) -> Self {
        Expr::from(Number::integer(value))
    }
}

impl From<f64> for Expr {
    fn from(value: f64) -> Self {
        Expr::from(Number::real_double(value))
    }
}

impl From<Symbol> for Expr {
    fn from(s: Symbol) -> Self {
        Expr::from_kind(ExprKind::Symbol(s))
    }
}

impl From<&str> for Expr {
    fn from(name: &str) -> Self {
        Expr::from(Symbol::new(name))
    }
}
