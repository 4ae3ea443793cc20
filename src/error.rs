//! Error types for dcpgraph.

use thiserror::Error;

use crate::expr::Shape;

/// Error type for expression construction and DCP checks.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DcpError {
    /// Operand shapes are incompatible for the operation.
    #[error("Incompatible dimensions for {op}: {lhs} and {rhs}")]
    ShapeMismatch {
        op: &'static str,
        lhs: Shape,
        rhs: Shape,
    },

    /// A shape with a zero dimension was requested.
    #[error("Invalid shape ({rows}, {cols}): dimensions must be at least 1")]
    InvalidShape { rows: usize, cols: usize },

    /// A single index falls outside its dimension.
    #[error("Index {index} is out of bounds for axis {axis} with size {dim}")]
    IndexOutOfBounds {
        index: usize,
        dim: usize,
        axis: usize,
    },

    /// A slice selects no entries along an axis.
    #[error("Index selects no entries along axis {axis}")]
    EmptySelection { axis: usize },

    /// A slice step of zero.
    #[error("Slice step cannot be zero")]
    ZeroStep,

    /// Both factors of a product are non-constant.
    #[error("Cannot multiply two non-constants.")]
    NonConstantProduct,

    /// The divisor is not a scalar constant.
    #[error("Can only divide by a scalar constant.")]
    InvalidDivisor,

    /// Problem is not DCP-compliant.
    #[error("Problem is not DCP: {0}")]
    NotDcp(String),
}

impl DcpError {
    /// Shape incompatibilities raised while building a node.
    pub fn is_shape_error(&self) -> bool {
        matches!(
            self,
            DcpError::ShapeMismatch { .. }
                | DcpError::InvalidShape { .. }
                | DcpError::IndexOutOfBounds { .. }
                | DcpError::EmptySelection { .. }
                | DcpError::ZeroStep
        )
    }

    /// Algebraic legality violations raised while building a node.
    pub fn is_composition_error(&self) -> bool {
        matches!(
            self,
            DcpError::NonConstantProduct | DcpError::InvalidDivisor
        )
    }
}

/// Result type for dcpgraph operations.
pub type Result<T> = std::result::Result<T, DcpError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            DcpError::NonConstantProduct.to_string(),
            "Cannot multiply two non-constants."
        );
        assert_eq!(
            DcpError::InvalidDivisor.to_string(),
            "Can only divide by a scalar constant."
        );
        let err = DcpError::ShapeMismatch {
            op: "addition",
            lhs: Shape::matrix(2, 3),
            rhs: Shape::matrix(3, 2),
        };
        assert_eq!(
            err.to_string(),
            "Incompatible dimensions for addition: (2, 3) and (3, 2)"
        );
    }

    #[test]
    fn test_error_classes() {
        assert!(DcpError::ZeroStep.is_shape_error());
        assert!(!DcpError::ZeroStep.is_composition_error());
        assert!(DcpError::InvalidDivisor.is_composition_error());
        assert!(!DcpError::NotDcp("x".into()).is_shape_error());
        assert!(!DcpError::NotDcp("x".into()).is_composition_error());
    }
}
