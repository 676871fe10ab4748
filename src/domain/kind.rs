// ============================================================================
// Tower Kinds
// Promotion ranking of the numeric tower
// ============================================================================

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Coarse type tag governing promotion order.
///
/// Ordered by promotion rank: `Integer < Rational < Real < Complex`.
/// Automatic coercion only ever moves up this order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum TowerKind {
    Integer,
    Rational,
    Real,
    Complex,
}

impl TowerKind {
    /// All kinds in promotion order
    pub const ALL: [TowerKind; 4] = [
        TowerKind::Integer,
        TowerKind::Rational,
        TowerKind::Real,
        TowerKind::Complex,
    ];

    #[inline]
    pub const fn rank(self) -> u8 {
        match self {
            TowerKind::Integer => 0,
            TowerKind::Rational => 1,
            TowerKind::Real => 2,
            TowerKind::Complex => 3,
        }
    }

    /// Kind both operands promote to for a binary operation
    #[inline]
    pub fn common(self, other: Self) -> Self {
        self.max(other)
    }

    /// Integer and Rational are exact by construction
    #[inline]
    pub const fn is_exact_kind(self) -> bool {
        matches!(self, TowerKind::Integer | TowerKind::Rational)
    }
}

impl fmt::Display for TowerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TowerKind::Integer => "Integer",
            TowerKind::Rational => "Rational",
            TowerKind::Real => "Real",
            TowerKind::Complex => "Complex",
        };
        write!(f, "{}", name)
    }
}

/// Result of the `sign` operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Sign {
    Negative,
    Zero,
    Positive,
}

impl Sign {
    pub fn of_ordering(ordering: std::cmp::Ordering) -> Self {
        match ordering {
            std::cmp::Ordering::Less => Sign::Negative,
            std::cmp::Ordering::Equal => Sign::Zero,
            std::cmp::Ordering::Greater => Sign::Positive,
        }
    }

    pub fn flip(self) -> Self {
        match self {
            Sign::Negative => Sign::Positive,
            Sign::Zero => Sign::Zero,
            Sign::Positive => Sign::Negative,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rank_order() {
        assert!(TowerKind::Integer < TowerKind::Rational);
        assert!(TowerKind::Rational < TowerKind::Real);
        assert!(TowerKind::Real < TowerKind::Complex);
        for pair in TowerKind::ALL.windows(2) {
            assert!(pair[0].rank() < pair[1].rank());
        }
    }

    #[test]
    fn test_common_kind() {
        assert_eq!(
            TowerKind::Integer.common(TowerKind::Real),
            TowerKind::Real
        );
        assert_eq!(
            TowerKind::Complex.common(TowerKind::Rational),
            TowerKind::Complex
        );
        assert_eq!(
            TowerKind::Rational.common(TowerKind::Rational),
            TowerKind::Rational
        );
    }

    #[test]
    fn test_sign_helpers() {
        assert_eq!(Sign::of_ordering(std::cmp::Ordering::Less), Sign::Negative);
        assert_eq!(Sign::Positive.flip(), Sign::Negative);
        assert_eq!(Sign::Zero.flip(), Sign::Zero);
    }
}
