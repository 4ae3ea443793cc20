//! The per-node attribute bundle.
//!
//! `DcpAttributes` is derived once when a node is built and stored alongside
//! it. The composition functions here are the only place where the curvature,
//! sign and shape rules for the affine operators meet.

use crate::error::Result;
use crate::expr::Shape;

use super::curvature::{add_curvature, scalar_mul_curvature, Curvature};
use super::sign::{add_sign, mul_sign, Sign};

/// Curvature, sign and shape of one expression node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DcpAttributes {
    pub curvature: Curvature,
    pub sign: Sign,
    pub shape: Shape,
}

impl DcpAttributes {
    pub fn new(curvature: Curvature, sign: Sign, shape: Shape) -> Self {
        DcpAttributes {
            curvature,
            sign,
            shape,
        }
    }

    /// Attributes of `self + other`.
    pub fn add(&self, other: &DcpAttributes) -> Result<DcpAttributes> {
        let shape = self.shape.combine_elementwise(&other.shape)?;
        Ok(DcpAttributes {
            curvature: add_curvature(self.curvature, other.curvature),
            sign: add_sign(self.sign, other.sign),
            shape,
        })
    }

    /// Attributes of `-self`.
    pub fn negate(&self) -> DcpAttributes {
        DcpAttributes {
            curvature: self.curvature.negate(),
            sign: self.sign.negate(),
            shape: self.shape,
        }
    }

    /// Attributes of `self * other` where `self` is the constant factor.
    pub fn mul(&self, other: &DcpAttributes) -> Result<DcpAttributes> {
        let shape = self.shape.combine_mul(&other.shape)?;
        Ok(DcpAttributes {
            curvature: scalar_mul_curvature(self.sign, other.curvature),
            sign: mul_sign(self.sign, other.sign),
            shape,
        })
    }

    /// Attributes of `self / divisor` where `divisor` is a scalar constant.
    pub fn div(&self, divisor: &DcpAttributes) -> DcpAttributes {
        let reciprocal = divisor.sign.reciprocal();
        DcpAttributes {
            curvature: scalar_mul_curvature(reciprocal, self.curvature),
            sign: mul_sign(self.sign, reciprocal),
            shape: self.shape,
        }
    }

    /// Attributes of the transpose.
    pub fn transpose(&self) -> DcpAttributes {
        DcpAttributes {
            shape: self.shape.transpose(),
            ..*self
        }
    }

    /// Attributes of a selection with the given result shape.
    pub fn select(&self, shape: Shape) -> DcpAttributes {
        DcpAttributes { shape, ..*self }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attrs(curvature: Curvature, sign: Sign, shape: (usize, usize)) -> DcpAttributes {
        DcpAttributes::new(curvature, sign, shape.into())
    }

    #[test]
    fn test_add_attributes() {
        let a = attrs(Curvature::Convex, Sign::Positive, (3, 1));
        let b = attrs(Curvature::Constant, Sign::Positive, (1, 1));
        let sum = a.add(&b).unwrap();
        assert_eq!(sum, attrs(Curvature::Convex, Sign::Positive, (3, 1)));

        let c = attrs(Curvature::Affine, Sign::Unknown, (2, 1));
        assert!(a.add(&c).is_err());
    }

    #[test]
    fn test_negate_attributes() {
        let a = attrs(Curvature::Convex, Sign::Positive, (2, 2));
        assert_eq!(a.negate(), attrs(Curvature::Concave, Sign::Negative, (2, 2)));
        assert_eq!(a.negate().negate(), a);
    }

    #[test]
    fn test_mul_attributes() {
        let k = attrs(Curvature::Constant, Sign::Negative, (1, 1));
        let x = attrs(Curvature::Convex, Sign::Positive, (4, 2));
        assert_eq!(
            k.mul(&x).unwrap(),
            attrs(Curvature::Concave, Sign::Negative, (4, 2))
        );

        let a = attrs(Curvature::Constant, Sign::Unknown, (3, 4));
        let y = attrs(Curvature::Affine, Sign::Unknown, (4, 1));
        assert_eq!(
            a.mul(&y).unwrap(),
            attrs(Curvature::Unknown, Sign::Unknown, (3, 1))
        );
        assert!(a.mul(&attrs(Curvature::Affine, Sign::Unknown, (3, 1))).is_err());
    }

    #[test]
    fn test_div_attributes() {
        let x = attrs(Curvature::Convex, Sign::Positive, (3, 1));
        let neg = attrs(Curvature::Constant, Sign::Negative, (1, 1));
        assert_eq!(x.div(&neg), attrs(Curvature::Concave, Sign::Negative, (3, 1)));

        let zero = attrs(Curvature::Constant, Sign::Zero, (1, 1));
        assert_eq!(x.div(&zero), attrs(Curvature::Unknown, Sign::Unknown, (3, 1)));
    }

    #[test]
    fn test_transpose_and_select() {
        let x = attrs(Curvature::Concave, Sign::Negative, (2, 5));
        assert_eq!(x.transpose(), attrs(Curvature::Concave, Sign::Negative, (5, 2)));
        assert_eq!(
            x.select(Shape::scalar()),
            attrs(Curvature::Concave, Sign::Negative, (1, 1))
        );
    }
}
