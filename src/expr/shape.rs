//! Shape representation for expressions.
//!
//! Every expression is two-dimensional:
//! - `(1, 1)` is a scalar
//! - `(n, 1)` is a column vector of length n
//! - `(m, n)` is an m x n matrix
//!
//! Scalars broadcast against any shape in elementwise operations.

use std::fmt;

use crate::error::{DcpError, Result};

/// Shape of an expression. Both dimensions are at least 1.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Shape {
    rows: usize,
    cols: usize,
}

impl Shape {
    /// Create a shape, rejecting zero dimensions.
    pub fn new(rows: usize, cols: usize) -> Result<Self> {
        if rows == 0 || cols == 0 {
            return Err(DcpError::InvalidShape { rows, cols });
        }
        Ok(Shape { rows, cols })
    }

    /// Create a scalar shape.
    pub const fn scalar() -> Self {
        Shape { rows: 1, cols: 1 }
    }

    /// Create a column vector shape.
    ///
    /// # Panics
    ///
    /// Panics if `n` is zero.
    pub fn vector(n: usize) -> Self {
        Shape::matrix(n, 1)
    }

    /// Create a matrix shape.
    ///
    /// # Panics
    ///
    /// Panics if either dimension is zero. Use [`Shape::new`] for a fallible
    /// constructor.
    pub fn matrix(m: usize, n: usize) -> Self {
        match Shape::new(m, n) {
            Ok(shape) => shape,
            Err(e) => panic!("{e}"),
        }
    }

    /// Number of rows.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// The `(rows, cols)` pair.
    pub fn size(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Total number of entries.
    pub fn numel(&self) -> usize {
        self.rows * self.cols
    }

    /// Check if this is a scalar.
    pub fn is_scalar(&self) -> bool {
        self.rows == 1 && self.cols == 1
    }

    /// Check if this is a column vector (scalars included).
    pub fn is_vector(&self) -> bool {
        self.cols == 1
    }

    /// Get the transposed shape.
    pub fn transpose(&self) -> Self {
        Shape {
            rows: self.cols,
            cols: self.rows,
        }
    }

    /// Result shape of an elementwise operation (addition, comparison).
    ///
    /// Shapes must match exactly unless one of them is a scalar, in which case
    /// the other shape wins.
    pub fn combine_elementwise(&self, other: &Shape) -> Result<Shape> {
        if self == other || other.is_scalar() {
            Ok(*self)
        } else if self.is_scalar() {
            Ok(*other)
        } else {
            Err(DcpError::ShapeMismatch {
                op: "elementwise operation",
                lhs: *self,
                rhs: *other,
            })
        }
    }

    /// Result shape of a matrix product: `(m, n) x (n, p) -> (m, p)`.
    pub fn combine_matmul(&self, other: &Shape) -> Result<Shape> {
        if self.cols == other.rows {
            Ok(Shape {
                rows: self.rows,
                cols: other.cols,
            })
        } else {
            Err(DcpError::ShapeMismatch {
                op: "matrix multiplication",
                lhs: *self,
                rhs: *other,
            })
        }
    }

    /// Result shape of `self * other` where one side may be a scalar factor.
    pub fn combine_mul(&self, other: &Shape) -> Result<Shape> {
        if self.is_scalar() {
            Ok(*other)
        } else if other.is_scalar() {
            Ok(*self)
        } else {
            self.combine_matmul(other)
        }
    }
}

impl Default for Shape {
    fn default() -> Self {
        Shape::scalar()
    }
}

impl fmt::Debug for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Shape({}, {})", self.rows, self.cols)
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.rows, self.cols)
    }
}

// Conversion traits
impl From<()> for Shape {
    fn from(_: ()) -> Self {
        Shape::scalar()
    }
}

impl From<usize> for Shape {
    fn from(n: usize) -> Self {
        Shape::vector(n)
    }
}

impl From<(usize,)> for Shape {
    fn from((n,): (usize,)) -> Self {
        Shape::vector(n)
    }
}

impl From<(usize, usize)> for Shape {
    fn from((m, n): (usize, usize)) -> Self {
        Shape::matrix(m, n)
    }
}
