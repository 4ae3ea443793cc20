//! The validated graph handed to a canonicalizer.
//!
//! A `Problem` is an objective plus constraints. Nothing here lowers it to
//! solver form; `check_dcp` confirms it may be lowered, and the accessors
//! expose what a canonicalizer needs.
//!
//! ```
//! use dcpgraph::prelude::*;
//!
//! let x = nonneg_variable(3);
//! let cost = constant_matrix(vec![1.0, 2.0, 3.0], 1, 3);
//! let problem = Problem::minimize(&cost * &x)
//!     .subject_to([x.leq(1.0)?])
//!     .build();
//! problem.check_dcp()?;
//! # Ok::<(), DcpError>(())
//! ```

use std::collections::BTreeMap;

use tracing::debug;

use crate::constraints::Constraint;
use crate::error::{DcpError, Result};
use crate::expr::{cast_to_expression, Expr, ExprId, ExprKind, Shape};

/// Direction of optimization.
#[derive(Debug, Clone)]
pub enum Objective {
    Minimize(Expr),
    Maximize(Expr),
}

impl Objective {
    pub fn expr(&self) -> &Expr {
        match self {
            Objective::Minimize(e) | Objective::Maximize(e) => e,
        }
    }

    pub fn is_minimize(&self) -> bool {
        matches!(self, Objective::Minimize(_))
    }

    /// Minimize needs a convex objective, maximize a concave one.
    pub fn is_dcp(&self) -> bool {
        match self {
            Objective::Minimize(e) => e.is_convex(),
            Objective::Maximize(e) => e.is_concave(),
        }
    }

    /// The expression to minimize: maximizing `f` is minimizing `-f`.
    pub fn as_minimization(&self) -> Expr {
        match self {
            Objective::Minimize(e) => e.clone(),
            Objective::Maximize(e) => e.negate(),
        }
    }
}

/// An objective together with the constraints it is subject to.
#[derive(Debug, Clone)]
pub struct Problem {
    pub objective: Objective,
    pub constraints: Vec<Constraint>,
}

impl Problem {
    pub fn new(objective: Objective, constraints: Vec<Constraint>) -> Self {
        Problem {
            objective,
            constraints,
        }
    }

    pub fn minimize(expr: impl Into<Expr>) -> ProblemBuilder {
        ProblemBuilder::new(Objective::Minimize(cast_to_expression(expr)))
    }

    pub fn maximize(expr: impl Into<Expr>) -> ProblemBuilder {
        ProblemBuilder::new(Objective::Maximize(cast_to_expression(expr)))
    }

    /// True when the objective and every constraint are DCP.
    pub fn is_dcp(&self) -> bool {
        self.objective.is_dcp() && self.constraints.iter().all(Constraint::is_dcp)
    }

    /// Like [`Problem::is_dcp`], but names the first offending part.
    pub fn check_dcp(&self) -> Result<()> {
        debug!(
            constraints = self.constraints.len(),
            "checking problem for DCP compliance"
        );
        if !self.objective.is_dcp() {
            let (verb, needed) = if self.objective.is_minimize() {
                ("minimize", "convex")
            } else {
                ("maximize", "concave")
            };
            return Err(DcpError::NotDcp(format!(
                "cannot {verb} {} objective `{}`; it must be {needed}",
                self.objective.expr().curvature(),
                self.objective.expr()
            )));
        }
        if let Some((i, c)) = self.constraints.iter().enumerate().find(|(_, c)| !c.is_dcp()) {
            return Err(DcpError::NotDcp(format!(
                "constraint {i} ({:?} on `{}` and `{}`) has {} residual",
                c.kind(),
                c.lhs(),
                c.rhs(),
                c.expr().curvature()
            )));
        }
        Ok(())
    }

    /// Every expression the problem references: the objective, then each
    /// constraint residual.
    pub fn expressions(&self) -> impl Iterator<Item = &Expr> {
        std::iter::once(self.objective.expr()).chain(self.constraints.iter().map(Constraint::expr))
    }

    /// Distinct variables, ordered by id.
    pub fn variables(&self) -> Vec<ExprId> {
        self.variable_shapes().into_keys().collect()
    }

    /// Distinct variables with their shapes, ordered by id.
    pub fn variable_shapes(&self) -> BTreeMap<ExprId, Shape> {
        let mut shapes = BTreeMap::new();
        for root in self.expressions() {
            root.walk(&mut |e| {
                if let ExprKind::Variable(v) = e.kind() {
                    shapes.insert(e.id(), v.shape);
                }
            });
        }
        shapes
    }
}

/// Collects constraints for a [`Problem`].
#[derive(Debug, Clone)]
pub struct ProblemBuilder {
    objective: Objective,
    constraints: Vec<Constraint>,
}

impl ProblemBuilder {
    fn new(objective: Objective) -> Self {
        ProblemBuilder {
            objective,
            constraints: Vec::new(),
        }
    }

    pub fn subject_to(mut self, constraints: impl IntoIterator<Item = Constraint>) -> Self {
        self.constraints.extend(constraints);
        self
    }

    pub fn constraint(mut self, constraint: Constraint) -> Self {
        self.constraints.push(constraint);
        self
    }

    pub fn build(self) -> Problem {
        Problem::new(self.objective, self.constraints)
    }
}
