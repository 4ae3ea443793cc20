//! The curvature lattice.
//!
//! Curvatures are partially ordered by how much they promise:
//! `Constant < Affine < {Convex, Concave} < Unknown`, with `Convex` and
//! `Concave` incomparable. The predicates below are all phrased against that
//! order. Composition never fails; anything that cannot be certified
//! becomes `Unknown`.

use std::cmp::Ordering;
use std::fmt;

use super::sign::Sign;

/// Curvature of an expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Curvature {
    Constant,
    /// Both convex and concave.
    Affine,
    Convex,
    Concave,
    /// Not certifiable; the expression is not DCP.
    Unknown,
}

impl Curvature {
    pub const ALL: [Curvature; 5] = [
        Curvature::Constant,
        Curvature::Affine,
        Curvature::Convex,
        Curvature::Concave,
        Curvature::Unknown,
    ];

    fn rank(self) -> u8 {
        match self {
            Curvature::Constant => 0,
            Curvature::Affine => 1,
            Curvature::Convex | Curvature::Concave => 2,
            Curvature::Unknown => 3,
        }
    }

    pub fn is_constant(self) -> bool {
        self == Curvature::Constant
    }

    pub fn is_affine(self) -> bool {
        self <= Curvature::Affine
    }

    pub fn is_convex(self) -> bool {
        self <= Curvature::Convex
    }

    pub fn is_concave(self) -> bool {
        self <= Curvature::Concave
    }

    /// Anything but `Unknown`.
    pub fn is_dcp(self) -> bool {
        self != Curvature::Unknown
    }

    /// Curvature of `-f`: convex and concave swap.
    pub fn negate(self) -> Self {
        match self {
            Curvature::Convex => Curvature::Concave,
            Curvature::Concave => Curvature::Convex,
            fixed => fixed,
        }
    }
}

impl PartialOrd for Curvature {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        if self == other {
            return Some(Ordering::Equal);
        }
        match self.rank().cmp(&other.rank()) {
            // Equal rank with distinct values: convex against concave
            Ordering::Equal => None,
            ord => Some(ord),
        }
    }
}

/// Curvature of `a + b`.
pub fn add_curvature(a: Curvature, b: Curvature) -> Curvature {
    use Curvature::*;
    match (a, b) {
        (Constant, c) | (c, Constant) => c,
        (Affine, c) | (c, Affine) => c,
        (a, b) if a == b => a,
        _ => Unknown,
    }
}

/// Curvature of `k * f` for a constant `k` whose sign is `scalar`.
///
/// A zero factor makes the product constant whatever `f` is. A factor of
/// unknown sign keeps a constant constant and loses everything else.
pub fn scalar_mul_curvature(scalar: Sign, expr_curv: Curvature) -> Curvature {
    match scalar {
        Sign::Zero => Curvature::Constant,
        Sign::Positive => expr_curv,
        Sign::Negative => expr_curv.negate(),
        Sign::Unknown if expr_curv.is_constant() => Curvature::Constant,
        Sign::Unknown => Curvature::Unknown,
    }
}

impl std::ops::Neg for Curvature {
    type Output = Curvature;

    fn neg(self) -> Curvature {
        self.negate()
    }
}

impl std::ops::Add for Curvature {
    type Output = Curvature;

    fn add(self, rhs: Curvature) -> Curvature {
        add_curvature(self, rhs)
    }
}

impl fmt::Display for Curvature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Curvature::Constant => "CONSTANT",
            Curvature::Affine => "AFFINE",
            Curvature::Convex => "CONVEX",
            Curvature::Concave => "CONCAVE",
            Curvature::Unknown => "UNKNOWN",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use Curvature::*;

    #[test]
    fn test_membership() {
        let table = [
            // (curvature, affine, convex, concave, dcp)
            (Constant, true, true, true, true),
            (Affine, true, true, true, true),
            (Convex, false, true, false, true),
            (Concave, false, false, true, true),
            (Unknown, false, false, false, false),
        ];
        for (c, affine, convex, concave, dcp) in table {
            assert_eq!(c.is_affine(), affine, "{c}");
            assert_eq!(c.is_convex(), convex, "{c}");
            assert_eq!(c.is_concave(), concave, "{c}");
            assert_eq!(c.is_dcp(), dcp, "{c}");
        }
        assert!(Constant.is_constant());
        assert!(!Affine.is_constant());
    }

    #[test]
    fn test_partial_order() {
        assert!(Constant < Affine);
        assert!(Affine < Convex);
        assert!(Affine < Concave);
        assert!(Concave < Unknown);
        assert_eq!(Convex.partial_cmp(&Concave), None);
        assert!(!(Convex <= Concave) && !(Concave <= Convex));
    }

    #[test]
    fn test_negation_swaps_convexity() {
        assert_eq!(-Convex, Concave);
        assert_eq!(-Concave, Convex);
        for c in [Constant, Affine, Unknown] {
            assert_eq!(c.negate(), c);
        }
    }

    #[test]
    fn test_addition() {
        assert_eq!(Convex + Convex, Convex);
        assert_eq!(Concave + Affine, Concave);
        assert_eq!(Affine + Affine, Affine);
        assert_eq!(Convex + Concave, Unknown);
        for c in Curvature::ALL {
            assert_eq!(add_curvature(Constant, c), c);
            assert_eq!(add_curvature(c, Unknown), Unknown);
        }
    }

    #[test]
    fn test_scaling() {
        assert_eq!(scalar_mul_curvature(Sign::Positive, Convex), Convex);
        assert_eq!(scalar_mul_curvature(Sign::Negative, Convex), Concave);
        assert_eq!(scalar_mul_curvature(Sign::Negative, Affine), Affine);
        assert_eq!(scalar_mul_curvature(Sign::Zero, Unknown), Constant);
        assert_eq!(scalar_mul_curvature(Sign::Unknown, Affine), Unknown);
        assert_eq!(scalar_mul_curvature(Sign::Unknown, Constant), Constant);
    }

    #[test]
    fn test_display() {
        assert_eq!(Concave.to_string(), "CONCAVE");
        assert_eq!(Unknown.to_string(), "UNKNOWN");
    }
}
