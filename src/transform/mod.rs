//! Tree rewrites built on the canonical factories.
//!
//! - [`map_children`], [`transform`], [`bottom_up`]: generic recursion that
//!   rebuilds a node only when a child changed
//! - [`subs`], [`msubs`], [`Substitution`]: structural substitution
//! - [`expand`]: products distributed over sums, integer powers of sums
//!   multiplied out
//! - [`expand_as_exp`]: trigonometric and hyperbolic functions as powers of `E`

mod bottom_up;
mod expand;
mod expand_exp;
mod subs;

pub use bottom_up::{bottom_up, map_children, transform};
pub use expand::expand;
pub use expand_exp::expand_as_exp;
pub use subs::{Substitution, SubsMap, msubs, subs};
