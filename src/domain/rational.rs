// ============================================================================
// Rational Kind
// Exact fractions in lowest terms
// ============================================================================

use super::complex::Complex;
use super::integer::Integer;
use super::kind::{Sign, TowerKind};
use super::number::Number;
use super::real::Real;
use crate::interfaces::TowerOps;
use crate::numeric::{pow10, BigDecimal, PrecisionPolicy, Scalar, TowerError, TowerResult};
use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{One, Signed, Zero};
use std::cmp::Ordering;
use std::fmt;

/// Exact ratio of two integers, always kept in lowest terms with a positive
/// denominator.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Rational {
    value: BigRational,
    policy: PrecisionPolicy,
}

impl Rational {
    /// Build `numerator / denominator`, reduced.
    ///
    /// # Errors
    /// Returns `DivisionByZero` for a zero denominator.
    pub fn new(
        numerator: impl Into<BigInt>,
        denominator: impl Into<BigInt>,
        policy: PrecisionPolicy,
    ) -> TowerResult<Self> {
        let denominator = denominator.into();
        if denominator.is_zero() {
            return Err(TowerError::DivisionByZero);
        }
        Ok(Self {
            value: BigRational::new(numerator.into(), denominator),
            policy,
        })
    }

    pub fn from_integer(value: BigInt, policy: PrecisionPolicy) -> Self {
        Self {
            value: BigRational::from_integer(value),
            policy,
        }
    }

    pub fn from_ratio(value: BigRational, policy: PrecisionPolicy) -> Self {
        Self { value, policy }
    }

    /// Exact rational value of a finite decimal
    pub fn from_decimal(value: &BigDecimal, policy: PrecisionPolicy) -> Self {
        let scale = value.scale();
        let ratio = if scale >= 0 {
            BigRational::new(
                value.unscaled().clone(),
                pow10(scale as u64),
            )
        } else {
            BigRational::from_integer(
                value.unscaled() * pow10(scale.unsigned_abs()),
            )
        };
        Self::from_ratio(ratio, policy)
    }

    #[inline]
    pub fn value(&self) -> &BigRational {
        &self.value
    }

    #[inline]
    pub fn numerator(&self) -> &BigInt {
        self.value.numer()
    }

    #[inline]
    pub fn denominator(&self) -> &BigInt {
        self.value.denom()
    }

    #[inline]
    pub fn is_integral(&self) -> bool {
        self.value.is_integer()
    }

    #[inline]
    pub fn is_negative(&self) -> bool {
        self.value.is_negative()
    }

    // ========================================================================
    // Typed Arithmetic
    // ========================================================================

    pub fn checked_add(&self, rhs: &Self) -> Self {
        Self::from_ratio(&self.value + &rhs.value, self.policy.reconcile(&rhs.policy))
    }

    pub fn checked_sub(&self, rhs: &Self) -> Self {
        Self::from_ratio(&self.value - &rhs.value, self.policy.reconcile(&rhs.policy))
    }

    pub fn checked_mul(&self, rhs: &Self) -> Self {
        Self::from_ratio(&self.value * &rhs.value, self.policy.reconcile(&rhs.policy))
    }

    /// # Errors
    /// Returns `DivisionByZero` if `rhs` is zero.
    pub fn checked_div(&self, rhs: &Self) -> TowerResult<Self> {
        if rhs.value.is_zero() {
            return Err(TowerError::DivisionByZero);
        }
        Ok(Self::from_ratio(
            &self.value / &rhs.value,
            self.policy.reconcile(&rhs.policy),
        ))
    }

    pub fn abs(&self) -> Self {
        Self::from_ratio(self.value.abs(), self.policy)
    }

    // ========================================================================
    // Conversions
    // ========================================================================

    /// # Errors
    /// Returns `Coercion` unless the denominator is one.
    pub fn to_integer(&self) -> TowerResult<Integer> {
        if !self.is_integral() {
            return Err(TowerError::Coercion {
                from: TowerKind::Rational,
                to: TowerKind::Integer,
            });
        }
        Ok(Integer::new(self.value.to_integer(), self.policy))
    }

    /// Decimal expansion under the policy; inexact when the expansion does
    /// not terminate within the policy's digits.
    pub fn to_real(&self) -> Real {
        let numerator = BigDecimal::from_bigint(self.numerator().clone());
        let denominator = BigDecimal::from_bigint(self.denominator().clone());
        let (quotient, inexact) =
            numerator.div_by_nonzero(&denominator, self.policy.digits(), self.policy.rounding());
        Real::from_scalar(Scalar::with_exactness(quotient, !inexact, self.policy))
    }

    pub fn to_complex(&self) -> Complex {
        Complex::from_real(self.to_real())
    }

    /// Exact square root of |self| when numerator and denominator are both
    /// perfect squares.
    fn exact_sqrt_of_magnitude(&self) -> Option<Self> {
        let numerator = self.numerator().abs();
        let denominator = self.denominator().clone();
        let n_root = numerator.sqrt();
        let d_root = denominator.sqrt();
        if &n_root * &n_root == numerator && &d_root * &d_root == denominator {
            Some(Self::from_ratio(BigRational::new(n_root, d_root), self.policy))
        } else {
            None
        }
    }
}

impl TowerOps for Rational {
    fn kind(&self) -> TowerKind {
        TowerKind::Rational
    }

    fn policy(&self) -> PrecisionPolicy {
        self.policy
    }

    fn with_policy(&self, policy: PrecisionPolicy) -> Self {
        Self::from_ratio(self.value.clone(), policy)
    }

    fn is_exact(&self) -> bool {
        true
    }

    fn is_zero(&self) -> bool {
        self.value.is_zero()
    }

    fn add(&self, rhs: &Self) -> TowerResult<Self> {
        Ok(self.checked_add(rhs))
    }

    fn subtract(&self, rhs: &Self) -> TowerResult<Self> {
        Ok(self.checked_sub(rhs))
    }

    fn multiply(&self, rhs: &Self) -> TowerResult<Self> {
        Ok(self.checked_mul(rhs))
    }

    fn divide(&self, rhs: &Self) -> TowerResult<Number> {
        self.checked_div(rhs).map(Number::Rational)
    }

    fn negate(&self) -> Self {
        Self::from_ratio(-&self.value, self.policy)
    }

    fn invert(&self) -> TowerResult<Number> {
        if self.value.is_zero() {
            return Err(TowerError::Domain {
                operation: "invert",
                reason: "zero has no multiplicative inverse",
            });
        }
        Ok(Number::Rational(Self::from_ratio(
            self.value.recip(),
            self.policy,
        )))
    }

    fn magnitude(&self) -> TowerResult<Number> {
        Ok(Number::Rational(self.abs()))
    }

    fn sign(&self) -> TowerResult<Sign> {
        Ok(Sign::of_ordering(self.value.cmp(&BigRational::zero())))
    }

    fn compare(&self, rhs: &Self) -> TowerResult<Ordering> {
        Ok(self.value.cmp(&rhs.value))
    }

    fn sqrt(&self) -> TowerResult<Number> {
        let exact = self.exact_sqrt_of_magnitude();
        if !self.is_negative() {
            if let Some(root) = exact {
                return Ok(Number::Rational(root));
            }
        }
        let root = match exact {
            Some(root) => root.to_real(),
            None => self.abs().to_real().checked_sqrt()?,
        };
        if self.is_negative() {
            Ok(Number::Complex(Complex::imaginary(root)))
        } else {
            Ok(Number::Real(root))
        }
    }

    fn coerce_to(&self, kind: TowerKind) -> TowerResult<Number> {
        match kind {
            TowerKind::Integer => self.to_integer().map(Number::Integer),
            TowerKind::Rational => Ok(Number::Rational(self.clone())),
            TowerKind::Real => Ok(Number::Real(self.to_real())),
            TowerKind::Complex => Ok(Number::Complex(self.to_complex())),
        }
    }

    fn into_number(self) -> Number {
        Number::Rational(self)
    }
}

impl fmt::Display for Rational {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.value.denom().is_one() {
            write!(f, "{}", self.value.numer())
        } else {
            write!(f, "{}/{}", self.value.numer(), self.value.denom())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::numeric::RoundingRule;

    fn ratio(n: i64, d: i64) -> Rational {
        Rational::new(n, d, PrecisionPolicy::unlimited()).unwrap()
    }

    #[test]
    fn test_lowest_terms() {
        let r = ratio(6, -8);
        assert_eq!(r.numerator(), &BigInt::from(-3));
        assert_eq!(r.denominator(), &BigInt::from(4));
        assert_eq!(r.to_string(), "-3/4");
    }

    #[test]
    fn test_zero_denominator() {
        assert_eq!(
            Rational::new(1, 0, PrecisionPolicy::unlimited()),
            Err(TowerError::DivisionByZero)
        );
    }

    #[test]
    fn test_arithmetic_is_exact() {
        let sum = ratio(1, 3).checked_add(&ratio(1, 6));
        assert_eq!(sum, ratio(1, 2));
        let product = ratio(2, 3).checked_mul(&ratio(3, 4));
        assert_eq!(product, ratio(1, 2));
        assert_eq!(
            ratio(1, 2).checked_div(&ratio(0, 1)),
            Err(TowerError::DivisionByZero)
        );
    }

    #[test]
    fn test_downward_coercion() {
        assert_eq!(
            ratio(8, 4).coerce_to(TowerKind::Integer).unwrap().to_string(),
            "2"
        );
        assert_eq!(
            ratio(1, 3).coerce_to(TowerKind::Integer),
            Err(TowerError::Coercion {
                from: TowerKind::Rational,
                to: TowerKind::Integer
            })
        );
    }

    #[test]
    fn test_to_real_respects_policy() {
        let policy = PrecisionPolicy::new(5, RoundingRule::HalfUp);
        let real = Rational::new(2, 3, policy).unwrap().to_real();
        assert_eq!(real.to_string(), "0.66667");
        assert!(!real.is_exact());

        let exact = Rational::new(1, 8, policy).unwrap().to_real();
        assert_eq!(exact.to_string(), "0.125");
        assert!(exact.is_exact());

        let zero = ratio(0, 7).to_real();
        assert!(zero.is_zero() && zero.is_exact());
        let negative = ratio(-1, 3).to_real();
        assert!(negative.is_negative() && !negative.is_exact());
        assert_eq!(negative.decimal().unwrap().precision(), 34);
    }

    #[test]
    fn test_from_decimal() {
        let d: BigDecimal = "-1.25".parse().unwrap();
        let r = Rational::from_decimal(&d, PrecisionPolicy::unlimited());
        assert_eq!(r, ratio(-5, 4));
    }

    #[test]
    fn test_sqrt() {
        assert_eq!(ratio(9, 4).sqrt().unwrap(), Number::Rational(ratio(3, 2)));
        let imaginary = ratio(-1, 4).sqrt().unwrap();
        assert_eq!(imaginary.kind(), TowerKind::Complex);
        assert_eq!(imaginary.to_string(), "0 + 0.5i");
        assert_eq!(ratio(1, 2).sqrt().unwrap().kind(), TowerKind::Real);
    }

    #[test]
    fn test_invert_and_sign() {
        assert_eq!(ratio(-2, 3).invert().unwrap(), Number::Rational(ratio(-3, 2)));
        assert_eq!(ratio(-2, 3).sign().unwrap(), Sign::Negative);
        assert!(ratio(0, 5).invert().is_err());
    }
}
