//! Affine atoms and operator overloading.
//!
//! Each constructor here both builds a node and validates it: the node's
//! attributes are derived from its operands, and an illegal composition is
//! rejected before any node exists. The `try_*` methods return the error;
//! the `std::ops` operators panic with it, the same way nalgebra operators
//! panic on mismatched dimensions.

use std::ops::{Add, Div, Mul, Neg, Sub};

use tracing::{debug, warn};

use crate::error::{DcpError, Result};
use crate::expr::{cast_to_expression, Expr, ExprKind, IndexKey, IndexSpec};

impl Expr {
    /// The sum `self + other`.
    ///
    /// Shapes must match, or one side must be a scalar.
    pub fn try_add(&self, other: impl Into<Expr>) -> Result<Expr> {
        let other = cast_to_expression(other);
        let attrs = self.attrs().add(other.attrs())?;
        Ok(Expr::from_parts(ExprKind::Add(self.clone(), other), attrs))
    }

    /// The difference `self - other`, built as `self + (-other)`.
    pub fn try_sub(&self, other: impl Into<Expr>) -> Result<Expr> {
        let other = cast_to_expression(other);
        self.try_add(other.negate())
    }

    /// The negation `-self`.
    pub fn negate(&self) -> Expr {
        Expr::from_parts(ExprKind::Neg(self.clone()), self.attrs().negate())
    }

    /// The product `self * other`.
    ///
    /// At least one factor must be constant. The constant factor always ends
    /// up on the left of the `Mul` node: when `self` is the non-constant
    /// one, the product is built as `(other.T * self.T).T`.
    pub fn try_mul(&self, other: impl Into<Expr>) -> Result<Expr> {
        let other = cast_to_expression(other);
        if !self.is_constant() && !other.is_constant() {
            return Err(DcpError::NonConstantProduct);
        }
        if !self.is_constant() {
            // Report mismatches in the caller's operand order
            self.shape().combine_mul(&other.shape())?;
            debug!(
                lhs = %self.shape(),
                rhs = %other.shape(),
                "moving constant factor to the left"
            );
            return Ok(other.t().try_mul(self.t())?.t());
        }
        let attrs = self.attrs().mul(other.attrs())?;
        Ok(Expr::from_parts(ExprKind::Mul(self.clone(), other), attrs))
    }

    /// The quotient `self / other`. The divisor must be a scalar constant.
    pub fn try_div(&self, other: impl Into<Expr>) -> Result<Expr> {
        let other = cast_to_expression(other);
        if !(other.is_constant() && other.is_scalar()) {
            return Err(DcpError::InvalidDivisor);
        }
        if other.is_zero() {
            warn!(divisor = %other, "dividing by a zero constant");
        }
        let attrs = self.attrs().div(other.attrs());
        Ok(Expr::from_parts(ExprKind::Div(self.clone(), other), attrs))
    }

    /// The transpose. A scalar is its own transpose and is returned as is.
    pub fn t(&self) -> Expr {
        if self.is_scalar() {
            return self.clone();
        }
        Expr::from_parts(ExprKind::Transpose(self.clone()), self.attrs().transpose())
    }

    /// Index or slice the expression.
    ///
    /// A scalar returns itself for any key. Otherwise the key is resolved
    /// against the shape; out-of-range indices and empty slices fail.
    pub fn try_index(&self, key: impl Into<IndexKey>) -> Result<Expr> {
        if self.is_scalar() {
            return Ok(self.clone());
        }
        let spec = key.into().resolve(&self.shape())?;
        Ok(self.select(spec))
    }

    /// The scalar entry at `(row, col)`, which must be in bounds.
    pub(crate) fn element(&self, row: usize, col: usize) -> Expr {
        if self.is_scalar() {
            return self.clone();
        }
        debug_assert!(row < self.shape().rows() && col < self.shape().cols());
        self.select(IndexSpec::element(row, col))
    }

    fn select(&self, spec: IndexSpec) -> Expr {
        let attrs = self.attrs().select(spec.shape());
        Expr::from_parts(ExprKind::Index(self.clone(), spec), attrs)
    }
}

#[track_caller]
fn built(result: Result<Expr>) -> Expr {
    match result {
        Ok(expr) => expr,
        Err(e) => panic!("{e}"),
    }
}

// ============================================================================
// Operator overloading for Expr
// ============================================================================

impl Neg for Expr {
    type Output = Expr;

    fn neg(self) -> Expr {
        self.negate()
    }
}

impl Neg for &Expr {
    type Output = Expr;

    fn neg(self) -> Expr {
        self.negate()
    }
}

/// Implements a binary operator for `Expr`/`&Expr` against anything castable,
/// plus the reflected forms with a numeric left operand.
macro_rules! impl_binary_op {
    ($trait:ident, $method:ident, $builder:ident) => {
        impl<R: Into<Expr>> $trait<R> for Expr {
            type Output = Expr;

            #[track_caller]
            fn $method(self, rhs: R) -> Expr {
                built(self.$builder(rhs))
            }
        }

        impl<R: Into<Expr>> $trait<R> for &Expr {
            type Output = Expr;

            #[track_caller]
            fn $method(self, rhs: R) -> Expr {
                built(self.$builder(rhs))
            }
        }

        impl_binary_op!(@reflected $trait, $method, $builder, f64, Expr);
        impl_binary_op!(@reflected $trait, $method, $builder, f64, &Expr);
        impl_binary_op!(@reflected $trait, $method, $builder, i32, Expr);
        impl_binary_op!(@reflected $trait, $method, $builder, i32, &Expr);
    };
    (@reflected $trait:ident, $method:ident, $builder:ident, $lhs:ty, $rhs:ty) => {
        impl $trait<$rhs> for $lhs {
            type Output = Expr;

            #[track_caller]
            fn $method(self, rhs: $rhs) -> Expr {
                built(cast_to_expression(self).$builder(rhs))
            }
        }
    };
}

impl_binary_op!(Add, add, try_add);
impl_binary_op!(Sub, sub, try_sub);
impl_binary_op!(Mul, mul, try_mul);
impl_binary_op!(Div, div, try_div);

// ============================================================================
// Affine atom functions
// ============================================================================

/// Transpose an expression.
pub fn transpose(expr: &Expr) -> Expr {
    expr.t()
}

/// Index into an expression.
pub fn index(expr: &Expr, key: impl Into<IndexKey>) -> Result<Expr> {
    expr.try_index(key)
}
