//! Constant expression creation and casting of numeric values.

use nalgebra::DMatrix;
use nalgebra_sparse::CscMatrix;

use crate::dcp::{Curvature, DcpAttributes};
use crate::error::Result;

use super::expression::{Array, ConstantData, Expr, ExprKind};
use super::shape::Shape;

/// Create a constant expression from any numeric value.
///
/// The sign is classified from the entries and the shape from the
/// dimensions. Fails if the value has an empty dimension.
pub fn try_constant(value: impl Into<Array>) -> Result<Expr> {
    let value = value.into();
    let attrs = DcpAttributes::new(Curvature::Constant, value.sign(), value.shape()?);
    Ok(Expr::from_parts(ExprKind::Constant(ConstantData { value }), attrs))
}

fn build(value: Array) -> Expr {
    match try_constant(value) {
        Ok(expr) => expr,
        Err(e) => panic!("{e}"),
    }
}

/// Create a constant expression from a scalar.
pub fn constant(value: f64) -> Expr {
    build(Array::Scalar(value))
}

/// Create a constant column vector.
///
/// # Panics
///
/// Panics if `values` is empty.
pub fn constant_vec(values: Vec<f64>) -> Expr {
    build(Array::from_vec(values))
}

/// Create a constant matrix from column-major data.
///
/// # Panics
///
/// Panics if a dimension is zero or `values.len() != rows * cols`.
pub fn constant_matrix(values: Vec<f64>, rows: usize, cols: usize) -> Expr {
    build(Array::Dense(DMatrix::from_vec(rows, cols, values)))
}

/// Create a constant expression from a nalgebra DMatrix.
///
/// # Panics
///
/// Panics if the matrix has an empty dimension.
pub fn constant_dmatrix(matrix: DMatrix<f64>) -> Expr {
    build(Array::Dense(matrix))
}

/// Create a constant expression from a sparse CSC matrix.
///
/// # Panics
///
/// Panics if the matrix has an empty dimension.
pub fn constant_sparse(matrix: CscMatrix<f64>) -> Expr {
    build(Array::Sparse(matrix))
}

/// Create a zero constant with the given shape.
pub fn zeros(shape: impl Into<Shape>) -> Expr {
    let shape = shape.into();
    if shape.is_scalar() {
        constant(0.0)
    } else {
        constant_dmatrix(DMatrix::zeros(shape.rows(), shape.cols()))
    }
}

/// Create a ones constant with the given shape.
pub fn ones(shape: impl Into<Shape>) -> Expr {
    let shape = shape.into();
    if shape.is_scalar() {
        constant(1.0)
    } else {
        constant_dmatrix(DMatrix::from_element(shape.rows(), shape.cols(), 1.0))
    }
}

/// Create an identity matrix constant.
pub fn eye(n: usize) -> Expr {
    constant_dmatrix(DMatrix::identity(n, n))
}

/// Convert an operand to an expression, wrapping numeric values as constants.
///
/// Every binary operator and comparison casts its operands through this.
pub fn cast_to_expression(value: impl Into<Expr>) -> Expr {
    value.into()
}

impl From<f64> for Expr {
    fn from(value: f64) -> Self {
        constant(value)
    }
}

impl From<i32> for Expr {
    fn from(value: i32) -> Self {
        constant(value as f64)
    }
}

impl From<Vec<f64>> for Expr {
    fn from(values: Vec<f64>) -> Self {
        constant_vec(values)
    }
}

impl From<DMatrix<f64>> for Expr {
    fn from(matrix: DMatrix<f64>) -> Self {
        constant_dmatrix(matrix)
    }
}

impl From<CscMatrix<f64>> for Expr {
    fn from(matrix: CscMatrix<f64>) -> Self {
        constant_sparse(matrix)
    }
}

impl From<Array> for Expr {
    fn from(value: Array) -> Self {
        build(value)
    }
}

impl From<&Expr> for Expr {
    fn from(expr: &Expr) -> Self {
        expr.clone()
    }
}
