//! Constraints built from comparisons of expressions.

pub mod constraint;

pub use constraint::{Constraint, ConstraintExt, ConstraintKind};
