// ============================================================================
// Coercion Resolver
// Promotes mixed-kind operands to their common kind
// ============================================================================

use super::complex::Complex;
use super::integer::Integer;
use super::kind::TowerKind;
use super::number::Number;
use super::rational::Rational;
use super::real::Real;
use crate::interfaces::TowerOps;
use crate::numeric::TowerResult;

/// A pair of operands promoted to the same kind.
///
/// Matching on this type is exhaustive over the four kinds, so a binary
/// operation never needs a fallback arm for mismatched operands.
#[derive(Debug, Clone, PartialEq)]
pub enum Homogeneous {
    Integer(Integer, Integer),
    Rational(Rational, Rational),
    Real(Real, Real),
    Complex(Complex, Complex),
}

impl Homogeneous {
    pub fn kind(&self) -> TowerKind {
        match self {
            Homogeneous::Integer(..) => TowerKind::Integer,
            Homogeneous::Rational(..) => TowerKind::Rational,
            Homogeneous::Real(..) => TowerKind::Real,
            Homogeneous::Complex(..) => TowerKind::Complex,
        }
    }

    /// Back into a pair of `Number`s
    pub fn into_numbers(self) -> (Number, Number) {
        match self {
            Homogeneous::Integer(a, b) => (a.into(), b.into()),
            Homogeneous::Rational(a, b) => (a.into(), b.into()),
            Homogeneous::Real(a, b) => (a.into(), b.into()),
            Homogeneous::Complex(a, b) => (a.into(), b.into()),
        }
    }
}

/// Kind both operands promote to: the higher of the two ranks.
#[inline]
pub fn common_kind(a: &Number, b: &Number) -> TowerKind {
    a.kind().common(b.kind())
}

/// Promote both operands to [`common_kind`].
///
/// Only upward conversions happen here, so the coercions cannot fail for
/// finite operands; any error from a lower layer is propagated as-is.
pub fn homogenize(a: &Number, b: &Number) -> TowerResult<Homogeneous> {
    Ok(match common_kind(a, b) {
        TowerKind::Integer => Homogeneous::Integer(a.to_integer()?, b.to_integer()?),
        TowerKind::Rational => Homogeneous::Rational(a.to_rational()?, b.to_rational()?),
        TowerKind::Real => Homogeneous::Real(a.to_real()?, b.to_real()?),
        TowerKind::Complex => Homogeneous::Complex(a.to_complex(), b.to_complex()),
    })
}

/// Promote both operands and return them as `Number`s of one kind.
pub fn promote_pair(a: &Number, b: &Number) -> TowerResult<(Number, Number)> {
    homogenize(a, b).map(Homogeneous::into_numbers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::numeric::PrecisionPolicy;

    fn parse(literal: &str) -> Number {
        Number::parse(literal, PrecisionPolicy::unlimited()).unwrap()
    }

    #[test]
    fn test_common_kind_is_max_rank() {
        let samples = [parse("3"), parse("1/3"), parse("0.5")];
        for a in &samples {
            for b in &samples {
                assert_eq!(common_kind(a, b), a.kind().max(b.kind()));
            }
        }
    }

    #[test]
    fn test_homogenize_integer_and_rational() {
        let pair = homogenize(&parse("2"), &parse("1/2")).unwrap();
        assert_eq!(pair.kind(), TowerKind::Rational);
        let (a, b) = pair.into_numbers();
        assert_eq!(a.to_string(), "2");
        assert_eq!(b.to_string(), "1/2");
    }

    #[test]
    fn test_promote_pair_to_complex() {
        let i = Number::Complex(Complex::imaginary_unit(PrecisionPolicy::unlimited()));
        let (a, b) = promote_pair(&parse("1/4"), &i).unwrap();
        assert_eq!(a.kind(), TowerKind::Complex);
        assert_eq!(b, i);
        assert_eq!(a.to_string(), "0.25 + 0i");
    }

    #[test]
    fn test_promotion_is_order_independent() {
        let (a1, b1) = promote_pair(&parse("7"), &parse("2.5")).unwrap();
        let (b2, a2) = promote_pair(&parse("2.5"), &parse("7")).unwrap();
        assert_eq!(a1, a2);
        assert_eq!(b1, b2);
    }
}
