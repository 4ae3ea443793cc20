//! Variable leaves.
//!
//! A variable is always affine. Its sign is whatever was declared when it
//! was built, which lets a nonnegative variable flow through sign analysis.

use crate::dcp::{Curvature, DcpAttributes, Sign};

use super::expression::{Expr, ExprKind, VariableData};
use super::shape::Shape;

/// Builder for variables with a name or a declared sign.
///
/// ```
/// use dcpgraph::expr::VariableBuilder;
///
/// let w = VariableBuilder::matrix(3, 2).name("w").nonneg().build();
/// assert!(w.is_positive());
/// assert_eq!(w.to_string(), "w");
/// ```
#[derive(Debug, Clone)]
pub struct VariableBuilder {
    shape: Shape,
    name: Option<String>,
    sign: Sign,
}

impl VariableBuilder {
    pub fn new(shape: impl Into<Shape>) -> Self {
        VariableBuilder {
            shape: shape.into(),
            name: None,
            sign: Sign::Unknown,
        }
    }

    pub fn scalar() -> Self {
        Self::new(Shape::scalar())
    }

    /// An `n x 1` column.
    pub fn vector(n: usize) -> Self {
        Self::new(Shape::vector(n))
    }

    pub fn matrix(rows: usize, cols: usize) -> Self {
        Self::new(Shape::matrix(rows, cols))
    }

    /// Name used when the expression is displayed.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Declare every entry `>= 0`. Replaces an earlier `nonpos`.
    pub fn nonneg(mut self) -> Self {
        self.sign = Sign::Positive;
        self
    }

    /// Declare every entry `<= 0`. Replaces an earlier `nonneg`.
    pub fn nonpos(mut self) -> Self {
        self.sign = Sign::Negative;
        self
    }

    pub fn build(self) -> Expr {
        let attrs = DcpAttributes::new(Curvature::Affine, self.sign, self.shape);
        let data = VariableData {
            shape: self.shape,
            name: self.name,
            sign: self.sign,
        };
        Expr::from_parts(ExprKind::Variable(data), attrs)
    }
}

/// A variable of the given shape with no declared sign.
///
/// # Examples
///
/// ```
/// use dcpgraph::expr::variable;
///
/// let x = variable(());
/// assert!(x.is_scalar());
///
/// let y = variable(5);
/// assert_eq!(y.size(), (5, 1));
///
/// let z = variable((3, 4));
/// assert_eq!(z.size(), (3, 4));
/// ```
pub fn variable(shape: impl Into<Shape>) -> Expr {
    VariableBuilder::new(shape).build()
}

pub fn named_variable(name: impl Into<String>, shape: impl Into<Shape>) -> Expr {
    VariableBuilder::new(shape).name(name).build()
}

pub fn nonneg_variable(shape: impl Into<Shape>) -> Expr {
    VariableBuilder::new(shape).nonneg().build()
}

pub fn nonpos_variable(shape: impl Into<Shape>) -> Expr {
    VariableBuilder::new(shape).nonpos().build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_records_declarations() {
        let x = VariableBuilder::vector(5).name("x").nonneg().build();

        let ExprKind::Variable(v) = x.kind() else {
            panic!("Expected Variable");
        };
        assert_eq!(v.shape, Shape::vector(5));
        assert_eq!(v.name.as_deref(), Some("x"));
        assert_eq!(v.sign, Sign::Positive);
        assert_eq!(x.sign(), Sign::Positive);
        assert!(x.is_variable());
    }

    #[test]
    fn test_plain_variable_is_affine_unknown() {
        let x = variable((3, 4));
        assert_eq!(x.shape(), Shape::matrix(3, 4));
        assert_eq!(x.curvature(), Curvature::Affine);
        assert_eq!(x.sign(), Sign::Unknown);
    }

    #[test]
    fn test_last_declaration_wins() {
        assert_eq!(nonneg_variable(2).sign(), Sign::Positive);
        assert_eq!(nonpos_variable(2).sign(), Sign::Negative);

        let x = VariableBuilder::scalar().nonneg().nonpos().build();
        assert_eq!(x.sign(), Sign::Negative);
    }

    #[test]
    fn test_named_variable() {
        let x = named_variable("weights", (2, 2));
        assert_eq!(x.name(), "weights");
        assert_eq!(x.size(), (2, 2));
    }

    #[test]
    fn test_each_build_is_a_new_variable() {
        let builder = VariableBuilder::vector(3);
        let a = builder.clone().build();
        let b = builder.build();
        assert_ne!(a.id(), b.id());
        assert_ne!(a, b);
    }
}
