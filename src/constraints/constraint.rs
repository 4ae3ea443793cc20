//! Constraint types for optimization problems.
//!
//! A constraint is built from a comparison of two expressions:
//! - Equality: lhs == rhs
//! - Inequality: lhs <= rhs
//!
//! `lhs >= rhs` is stored as the inequality `rhs <= lhs`. Both operands are
//! cast to expressions and must have compatible shapes; the residual
//! `lhs - rhs` is built at construction and handed to the canonicalizer.

use tracing::debug;

use crate::error::Result;
use crate::expr::{cast_to_expression, Expr, ExprId, Shape};

/// Which comparison produced a constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConstraintKind {
    /// lhs == rhs. Maps to the zero cone.
    Equality,
    /// lhs <= rhs. Maps to the nonnegative orthant.
    Inequality,
}

/// A constraint in an optimization problem.
#[derive(Debug, Clone)]
pub struct Constraint {
    kind: ConstraintKind,
    lhs: Expr,
    rhs: Expr,
    expr: Expr,
}

impl Constraint {
    fn new(kind: ConstraintKind, lhs: Expr, rhs: Expr) -> Result<Self> {
        let expr = lhs.try_sub(&rhs)?;
        debug!(
            ?kind,
            lhs = %lhs,
            rhs = %rhs,
            shape = %expr.shape(),
            "built constraint"
        );
        Ok(Constraint {
            kind,
            lhs,
            rhs,
            expr,
        })
    }

    /// Create an equality constraint: lhs == rhs.
    pub fn equality(lhs: impl Into<Expr>, rhs: impl Into<Expr>) -> Result<Self> {
        Constraint::new(
            ConstraintKind::Equality,
            cast_to_expression(lhs),
            cast_to_expression(rhs),
        )
    }

    /// Create an inequality constraint: lhs <= rhs.
    pub fn leq(lhs: impl Into<Expr>, rhs: impl Into<Expr>) -> Result<Self> {
        Constraint::new(
            ConstraintKind::Inequality,
            cast_to_expression(lhs),
            cast_to_expression(rhs),
        )
    }

    /// Create an inequality constraint: lhs >= rhs, stored as rhs <= lhs.
    pub fn geq(lhs: impl Into<Expr>, rhs: impl Into<Expr>) -> Result<Self> {
        Constraint::leq(rhs, lhs)
    }

    /// Which comparison this is.
    pub fn kind(&self) -> ConstraintKind {
        self.kind
    }

    /// Check if this is an equality constraint.
    pub fn is_equality(&self) -> bool {
        self.kind == ConstraintKind::Equality
    }

    /// Check if this is an inequality constraint.
    pub fn is_inequality(&self) -> bool {
        self.kind == ConstraintKind::Inequality
    }

    /// The left operand.
    pub fn lhs(&self) -> &Expr {
        &self.lhs
    }

    /// The right operand.
    pub fn rhs(&self) -> &Expr {
        &self.rhs
    }

    /// The residual `lhs - rhs`.
    pub fn expr(&self) -> &Expr {
        &self.expr
    }

    /// Shape of the residual.
    pub fn shape(&self) -> Shape {
        self.expr.shape()
    }

    /// Check if this constraint is DCP-compliant.
    ///
    /// - Equality: the residual must be affine
    /// - Inequality: the residual must be convex (convex <= concave)
    pub fn is_dcp(&self) -> bool {
        match self.kind {
            ConstraintKind::Equality => self.expr.is_affine(),
            ConstraintKind::Inequality => self.expr.is_convex(),
        }
    }

    /// Whether both constraints compare the same operand nodes the same way.
    pub fn same_structure(&self, other: &Constraint) -> bool {
        self.kind == other.kind && self.lhs.ptr_eq(&other.lhs) && self.rhs.ptr_eq(&other.rhs)
    }

    /// The two operands, in order.
    pub fn expressions(&self) -> [&Expr; 2] {
        [&self.lhs, &self.rhs]
    }

    /// Get all variable IDs in this constraint.
    pub fn variables(&self) -> Vec<ExprId> {
        self.expr.variables()
    }
}

/// Extension trait for creating constraints from expressions.
///
/// These are named methods rather than `PartialEq`/`PartialOrd` impls so that
/// `==` on expressions keeps meaning node identity.
pub trait ConstraintExt {
    /// Create equality constraint: self == rhs.
    fn equals(&self, rhs: impl Into<Expr>) -> Result<Constraint>;

    /// Create inequality constraint: self <= rhs.
    fn leq(&self, rhs: impl Into<Expr>) -> Result<Constraint>;

    /// Create inequality constraint: self >= rhs, i.e. rhs <= self.
    fn geq(&self, rhs: impl Into<Expr>) -> Result<Constraint>;
}

impl ConstraintExt for Expr {
    fn equals(&self, rhs: impl Into<Expr>) -> Result<Constraint> {
        Constraint::equality(self, rhs)
    }

    fn leq(&self, rhs: impl Into<Expr>) -> Result<Constraint> {
        Constraint::leq(self, rhs)
    }

    fn geq(&self, rhs: impl Into<Expr>) -> Result<Constraint> {
        Constraint::geq(self, rhs)
    }
}
