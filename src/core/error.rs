//! Error taxonomy for canonical construction and rewriting.
//!
//! Three recoverable kinds are distinguished:
//! - [`SymError::NotImplemented`]: an operation has no rule for the given
//!   kinds. Callers may catch it and degrade to an unevaluated node.
//! - [`SymError::Domain`]: mathematically undefined input (division by an
//!   exact zero, zeroth root, `log(0)`).
//! - [`SymError::Type`]: a node of the wrong kind was supplied where a
//!   specific kind is required (e.g. a non-symbol as a derivative variable).
//!
//! Violations of the canonical-form invariants are programming errors and are
//! checked with `debug_assert!` at node construction instead.

use thiserror::Error;

use crate::core::expr::TypeId;

/// Errors raised by factories, number arithmetic and rewriting visitors.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum SymError {
    /// No rule exists for this combination of kinds.
    #[error("not implemented: {0}")]
    NotImplemented(String),

    /// The operation is undefined for the given input.
    #[error("domain error: {0}")]
    Domain(String),

    /// A node of kind `found` was given where `expected` is required.
    #[error("type error: expected {expected}, found {found:?}")]
    Type {
        /// Human readable description of the accepted kind(s).
        expected: &'static str,
        /// Kind tag of the offending node.
        found: TypeId,
    },
}

impl SymError {
    pub(crate) fn not_implemented(what: impl Into<String>) -> Self {
        Self::NotImplemented(what.into())
    }

    pub(crate) fn domain(what: impl Into<String>) -> Self {
        Self::Domain(what.into())
    }

    pub(crate) fn division_by_zero() -> Self {
        Self::Domain("division by zero".to_owned())
    }

    /// `true` for errors a caller may recover from by leaving the input
    /// unevaluated.
    #[must_use]
    pub fn is_not_implemented(&self) -> bool {
        matches!(self, Self::NotImplemented(_))
    }
}

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, SymError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_failure() {
        assert_eq!(
            SymError::division_by_zero().to_string(),
            "domain error: division by zero"
        );
        let err = SymError::Type {
            expected: "Symbol",
            found: TypeId::Add,
        };
        assert_eq!(err.to_string(), "type error: expected Symbol, found Add");
        assert!(SymError::not_implemented("x").is_not_implemented());
        assert!(!SymError::domain("x").is_not_implemented());
    }
}
