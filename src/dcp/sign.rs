//! The sign lattice.
//!
//! One sign describes every entry of an expression. `Positive` and
//! `Negative` are non-strict (`>= 0` and `<= 0`), so `Zero` satisfies both.

use std::fmt;

/// Sign of an expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sign {
    /// Identically zero.
    Zero,
    /// Entrywise `>= 0`.
    Positive,
    /// Entrywise `<= 0`.
    Negative,
    Unknown,
}

impl Sign {
    pub const ALL: [Sign; 4] = [Sign::Zero, Sign::Positive, Sign::Negative, Sign::Unknown];

    pub fn is_zero(self) -> bool {
        self == Sign::Zero
    }

    /// Nonnegative, zero included.
    pub fn is_positive(self) -> bool {
        matches!(self, Sign::Positive | Sign::Zero)
    }

    /// Nonpositive, zero included.
    pub fn is_negative(self) -> bool {
        matches!(self, Sign::Negative | Sign::Zero)
    }

    pub fn negate(self) -> Self {
        match self {
            Sign::Positive => Sign::Negative,
            Sign::Negative => Sign::Positive,
            fixed => fixed,
        }
    }

    /// Sign of `1 / s`. Zero has no reciprocal, so it maps to `Unknown`.
    pub fn reciprocal(self) -> Self {
        if self.is_zero() {
            Sign::Unknown
        } else {
            self
        }
    }

    /// Classify numeric entries from whether all are `>= 0` and all `<= 0`.
    pub fn from_entries(nonneg: bool, nonpos: bool) -> Self {
        match (nonneg, nonpos) {
            (true, true) => Sign::Zero,
            (true, false) => Sign::Positive,
            (false, true) => Sign::Negative,
            (false, false) => Sign::Unknown,
        }
    }
}

/// Sign of `a + b`.
pub fn add_sign(a: Sign, b: Sign) -> Sign {
    use Sign::*;
    match (a, b) {
        (Zero, s) | (s, Zero) => s,
        (a, b) if a == b => a,
        _ => Unknown,
    }
}

/// Sign of `a * b`. Zero absorbs even an unknown factor.
pub fn mul_sign(a: Sign, b: Sign) -> Sign {
    use Sign::*;
    match (a, b) {
        (Zero, _) | (_, Zero) => Zero,
        (Unknown, _) | (_, Unknown) => Unknown,
        (a, b) if a == b => Positive,
        _ => Negative,
    }
}

impl std::ops::Neg for Sign {
    type Output = Sign;

    fn neg(self) -> Sign {
        self.negate()
    }
}

impl std::ops::Add for Sign {
    type Output = Sign;

    fn add(self, rhs: Sign) -> Sign {
        add_sign(self, rhs)
    }
}

impl std::ops::Mul for Sign {
    type Output = Sign;

    fn mul(self, rhs: Sign) -> Sign {
        mul_sign(self, rhs)
    }
}

impl fmt::Display for Sign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Sign::Zero => "ZERO",
            Sign::Positive => "POSITIVE",
            Sign::Negative => "NEGATIVE",
            Sign::Unknown => "UNKNOWN",
        })
    }
}
