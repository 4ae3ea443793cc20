//! # dcpgraph
//!
//! Expression graphs for convex optimization with Disciplined Convex
//! Programming (DCP) attribute inference.
//!
//! Every node of the graph carries a curvature, a sign and a shape, derived
//! once from its children when the node is built. Illegal compositions are
//! rejected at build time, so a graph that exists is well formed; whether it
//! is DCP-compliant is answered by `is_dcp()`. Lowering the graph to solver
//! form is left to a downstream canonicalizer.
//!
//! ## Quick Start
//!
//! ```
//! use dcpgraph::prelude::*;
//!
//! let x = variable(3);
//! let a = constant_matrix(vec![1.0, 0.0, 0.0, 1.0, 2.0, 2.0], 2, 3);
//!
//! // Constant factors go on the left; `x * a` is rewritten to keep it there.
//! let residual = &a * &x - 1.0;
//! assert!(residual.is_affine());
//! assert_eq!(residual.size(), (2, 1));
//!
//! // Comparisons build constraints, not booleans.
//! let c = residual.leq(0.0)?;
//! assert!(c.is_dcp());
//!
//! // Two non-constants cannot be multiplied.
//! assert!(x.try_mul(&x).is_err());
//! # Ok::<(), dcpgraph::DcpError>(())
//! ```
//!
//! ## DCP Rules
//!
//! - Addition: shapes match or one side is a scalar; curvatures and signs add
//! - Negation: flips convex/concave and positive/negative
//! - Multiplication: one factor must be constant; its sign scales the other
//! - Division: only by a scalar constant
//! - Transpose and indexing: curvature and sign pass through; scalars are
//!   returned unchanged
//! - **Equality constraints** require an **affine** residual
//! - **Inequality constraints** (`<=`) require a **convex** residual
//!
//! ## Architecture
//!
//! - **Expression graph**: `Expr` handles to immutable, shareable nodes
//! - **Lattices**: `Sign` and `Curvature` with total composition rules
//! - **Attributes**: `DcpAttributes` memoized per node
//! - **Hand-off**: `Problem` bundles an objective and constraints for
//!   canonicalization

pub mod atoms;
pub mod constraints;
pub mod dcp;
pub mod error;
pub mod expr;
pub mod problem;

/// Prelude module for convenient imports.
///
/// ```
/// use dcpgraph::prelude::*;
/// ```
pub mod prelude {
    // Expression types
    pub use crate::expr::{
        cast_to_expression, constant, constant_dmatrix, constant_matrix, constant_sparse,
        constant_vec, eye, named_variable, nonneg_variable, nonpos_variable, ones, try_constant,
        variable, zeros, Array, Expr, ExprId, ExprKind, IndexKey, Selector, Shape,
        VariableBuilder,
    };

    // Atoms
    pub use crate::atoms::{index, transpose};

    // Constraints
    pub use crate::constraints::{Constraint, ConstraintExt, ConstraintKind};

    // DCP
    pub use crate::dcp::{Curvature, DcpAttributes, Sign};

    // Problem
    pub use crate::problem::{Objective, Problem, ProblemBuilder};

    // Errors
    pub use crate::error::{DcpError, Result};
}

// Re-export main types at crate root
pub use error::{DcpError, Result};
pub use expr::Expr;
pub use problem::Problem;
