//! End-to-end tests for graph construction and DCP attribute inference.

use dcpgraph::expr::IndexSpec;
use dcpgraph::prelude::*;

// ============================================================================
// Shapes and structural identities
// ============================================================================

#[test]
fn test_transpose_is_involution() {
    let x = variable((3, 4));
    let tt = x.t().t();
    assert_eq!(tt.shape(), x.shape());
    assert_eq!(tt.curvature(), x.curvature());
    assert_eq!(tt.sign(), x.sign());
}

#[test]
fn test_scalar_transpose_and_index_return_same_node() {
    let x = nonneg_variable(());
    assert!(x.t().ptr_eq(&x));
    assert!(x.try_index(0).unwrap().ptr_eq(&x));
    assert!(x.try_index((.., ..)).unwrap().ptr_eq(&x));

    let c = constant(3.0);
    assert!(transpose(&c).ptr_eq(&c));
    assert!(index(&c, (5, 5)).unwrap().ptr_eq(&c));
}

#[test]
fn test_index_and_slice_shapes() {
    let x = variable((4, 5));
    assert_eq!(x.try_index((1, 2)).unwrap().size(), (1, 1));
    assert_eq!(x.try_index((1..3, ..)).unwrap().size(), (2, 5));
    assert_eq!(x.try_index((.., 3..)).unwrap().size(), (4, 2));
    assert_eq!(
        x.try_index((Selector::step(0, 4, 2), 0)).unwrap().size(),
        (2, 1)
    );

    assert!(x.try_index((4, 0)).is_err());
    assert!(x.try_index((2..2, 0)).is_err());
}

#[test]
fn test_single_index_follows_vector_axis() {
    let col = variable(5);
    let row = col.t();

    let entry = row.try_index(3).unwrap();
    assert!(entry.is_scalar());
    match entry.kind() {
        ExprKind::Index(parent, spec) => {
            assert!(parent.ptr_eq(&row));
            assert_eq!(*spec, IndexSpec::element(0, 3));
        }
        other => panic!("Expected Index, got {}", other.tag()),
    }
    assert_eq!(row.try_index(1..4).unwrap().size(), (1, 3));

    assert_eq!(col.try_index(3).unwrap().size(), (1, 1));
    assert_eq!(col.try_index(1..4).unwrap().size(), (3, 1));
}

#[test]
fn test_double_negation_preserves_attributes() {
    let exprs = [
        variable(3),
        nonneg_variable(3),
        nonpos_variable((2, 2)),
        constant_vec(vec![1.0, -2.0]),
        zeros(4),
    ];
    for e in &exprs {
        let back = -(-e);
        assert_eq!(back.curvature(), e.curvature());
        assert_eq!(back.sign(), e.sign());
        assert_eq!(back.shape(), e.shape());
    }
}

// ============================================================================
// Sign arithmetic through constants
// ============================================================================

#[test]
fn test_sign_addition_cases() {
    let pos = constant(2.0);
    let neg = constant(-3.0);
    let zero = constant(0.0);
    let unknown = constant_vec(vec![1.0, -1.0]);

    assert_eq!((&pos + &pos).sign(), Sign::Positive);
    assert_eq!((&neg + &neg).sign(), Sign::Negative);
    assert_eq!((&pos + &neg).sign(), Sign::Unknown);
    assert_eq!((&zero + &pos).sign(), Sign::Positive);
    assert_eq!((&neg + &zero).sign(), Sign::Negative);
    assert_eq!((&unknown + &pos).sign(), Sign::Unknown);
    assert_eq!((&unknown + &unknown).sign(), Sign::Unknown);
    assert_eq!((&zero + &unknown).sign(), Sign::Unknown);
}

#[test]
fn test_add_then_subtract_does_not_recover_sign() {
    let x = variable(3);
    let y = (&x + 2.0) - 2.0;
    assert_eq!(y.curvature(), Curvature::Affine);
    assert_eq!(y.sign(), Sign::Unknown);

    // A declared sign is not recovered either
    let p = nonneg_variable(3);
    let q = (&p + 2.0) - 2.0;
    assert_eq!(q.sign(), Sign::Unknown);
    assert!(q.is_affine());
}

// ============================================================================
// Multiplication and division
// ============================================================================

#[test]
fn test_variable_times_variable_fails() {
    let x = variable(3);
    let y = variable(3);
    let err = x.try_mul(&y).unwrap_err();
    assert!(err.is_composition_error());
    assert_eq!(err.to_string(), "Cannot multiply two non-constants.");
}

#[test]
#[should_panic(expected = "Cannot multiply two non-constants.")]
fn test_variable_times_variable_operator_panics() {
    let x = variable(());
    let _ = &x * &x;
}

#[test]
fn test_constant_times_variable_either_order() {
    let x = nonneg_variable((3, 2));
    for k in [2.0, -2.0, 0.0] {
        let left = k * &x;
        let right = &x * k;
        assert_eq!(left.shape(), right.shape());
        assert_eq!(left.curvature(), right.curvature());
        assert_eq!(left.sign(), right.sign());
    }

    let a = constant_matrix(vec![1.0; 6], 2, 3);
    let y = variable((3, 4));
    let b = constant_matrix(vec![1.0; 8], 4, 2);
    assert_eq!((&a * &y).size(), (2, 4));
    assert_eq!((&y * &b).size(), (3, 2));
    assert!((&a * &y * &b).is_affine());
}

#[test]
fn test_integer_operands() {
    let x = variable(2);
    let y = 3 * &x + 1;
    assert!(y.is_affine());
    assert_eq!(y.shape(), Shape::vector(2));
    assert_eq!((&x / 2).shape(), Shape::vector(2));
}

#[test]
fn test_division_rules() {
    let x = nonneg_variable(3);

    let err = x.try_div(constant_vec(vec![1.0, 2.0, 3.0])).unwrap_err();
    assert_eq!(err, DcpError::InvalidDivisor);
    assert_eq!(err.to_string(), "Can only divide by a scalar constant.");

    let half = &x / 2.0;
    assert_eq!(half.curvature(), x.curvature());
    assert_eq!(half.sign(), Sign::Positive);

    let flipped = &x / -2.0;
    assert!(flipped.is_affine());
    assert_eq!(flipped.sign(), Sign::Negative);
}

#[test]
fn test_unknown_sign_scaling_is_not_dcp() {
    let x = variable(());
    let scaled = constant_vec(vec![1.0, -1.0]) * &x;
    assert_eq!(scaled.curvature(), Curvature::Unknown);
    assert!(!scaled.is_dcp());

    // A constant of unknown sign times a constant is still constant
    let c = constant_vec(vec![1.0, -1.0]) * constant(4.0);
    assert!(c.is_constant());
}

// ============================================================================
// Iteration
// ============================================================================

#[test]
fn test_iteration_is_column_major() {
    let x = variable((2, 3));
    assert_eq!(x.len(), Some(6));

    let entries: Vec<Expr> = x.iter().collect();
    assert_eq!(entries.len(), 6);

    let expected = [(0, 0), (1, 0), (0, 1), (1, 1), (0, 2), (1, 2)];
    for (entry, (row, col)) in entries.iter().zip(expected) {
        match entry.kind() {
            ExprKind::Index(parent, spec) => {
                assert!(parent.ptr_eq(&x));
                assert_eq!(*spec, IndexSpec::element(row, col));
            }
            other => panic!("Expected Index, got {}", other.tag()),
        }
        assert!(entry.is_scalar());
        assert!(entry.is_affine());
    }
}

#[test]
fn test_iteration_restarts() {
    let x = variable(3);
    assert_eq!(x.iter().count(), 3);
    assert_eq!((&x).into_iter().count(), 3);

    let s = variable(());
    assert_eq!(s.len(), None);
    let only: Vec<Expr> = s.iter().collect();
    assert_eq!(only.len(), 1);
    assert!(only[0].ptr_eq(&s));
}

// ============================================================================
// Constraints
// ============================================================================

#[test]
fn test_equals_builds_equality() {
    let x = variable(3);
    let c = x.equals(constant_vec(vec![1.0, 2.0, 3.0])).unwrap();
    assert_eq!(c.kind(), ConstraintKind::Equality);
    assert!(c.is_dcp());
    assert!(c.lhs().ptr_eq(&x));
}

#[test]
fn test_geq_matches_swapped_leq() {
    let x = variable(2);
    let b = constant_vec(vec![0.5, 1.5]);
    let ge = x.geq(&b).unwrap();
    let le = b.leq(&x).unwrap();
    assert!(ge.same_structure(&le));
    assert!(ge.is_inequality());
    assert!(ge.is_dcp());
}

#[test]
fn test_constraint_shape_mismatch() {
    let x = variable(3);
    let err = x.leq(variable(2)).unwrap_err();
    assert!(err.is_shape_error());
}

#[test]
fn test_problem_from_constraints() {
    let x = nonneg_variable(3);
    let a = constant_matrix(vec![1.0, 2.0, 3.0], 1, 3);
    let problem = Problem::minimize(&a * &x)
        .subject_to([x.leq(1.0).unwrap(), (&a * &x).geq(0.5).unwrap()])
        .build();

    assert!(problem.is_dcp());
    assert!(problem.check_dcp().is_ok());
    assert_eq!(problem.variables(), vec![x.id()]);
}
