//! Expression types and creation utilities.
//!
//! This module provides the graph nodes that optimization problems are built from:
//! - `Expr` - handle to an immutable node with memoized DCP attributes
//! - `Shape` - two-dimensional shape information and broadcasting rules
//! - `IndexKey` - keys for indexing and slicing
//! - Variable creation via `variable()` and `VariableBuilder`
//! - Constant creation via `constant()` and related functions

pub mod constant;
pub mod expression;
pub mod index;
pub mod shape;
pub mod variable;

// Re-export main types
pub use constant::{
    cast_to_expression, constant, constant_dmatrix, constant_matrix, constant_sparse,
    constant_vec, eye, ones, try_constant, zeros,
};
pub use expression::{Array, ConstantData, Entries, Expr, ExprId, ExprKind, VariableData};
pub use index::{AxisRange, IndexKey, IndexSpec, Selector};
pub use shape::Shape;
pub use variable::{named_variable, nonneg_variable, nonpos_variable, variable, VariableBuilder};
