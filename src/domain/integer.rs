// ============================================================================
// Integer Kind
// Exact arbitrary-size integers at the bottom of the tower
// ============================================================================

use super::complex::Complex;
use super::kind::{Sign, TowerKind};
use super::number::Number;
use super::rational::Rational;
use super::real::Real;
use crate::interfaces::TowerOps;
use crate::numeric::{BigDecimal, PrecisionPolicy, Scalar, TowerError, TowerResult};
use num_bigint::BigInt;
use num_integer::Integer as _;
use num_traits::{One, Signed, ToPrimitive, Zero};
use std::cmp::Ordering;
use std::fmt;

/// Exact integer of unbounded size.
///
/// Integers are never rounded; the carried policy only matters once the
/// value is promoted to `Real`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Integer {
    value: BigInt,
    policy: PrecisionPolicy,
}

impl Integer {
    pub fn new(value: impl Into<BigInt>, policy: PrecisionPolicy) -> Self {
        Self {
            value: value.into(),
            policy,
        }
    }

    pub fn from_i64(value: i64, policy: PrecisionPolicy) -> Self {
        Self::new(value, policy)
    }

    pub fn zero(policy: PrecisionPolicy) -> Self {
        Self::new(BigInt::zero(), policy)
    }

    pub fn one(policy: PrecisionPolicy) -> Self {
        Self::new(BigInt::one(), policy)
    }

    #[inline]
    pub fn value(&self) -> &BigInt {
        &self.value
    }

    #[inline]
    pub fn is_negative(&self) -> bool {
        self.value.is_negative()
    }

    #[inline]
    pub fn is_one(&self) -> bool {
        self.value.is_one()
    }

    /// Native value, if it fits.
    ///
    /// # Errors
    /// Returns `Overflow` when the value exceeds `i64`.
    pub fn to_i64(&self) -> TowerResult<i64> {
        self.value.to_i64().ok_or(TowerError::Overflow)
    }

    // ========================================================================
    // Typed Arithmetic
    // ========================================================================

    pub fn checked_add(&self, rhs: &Self) -> Self {
        Self::new(&self.value + &rhs.value, self.policy.reconcile(&rhs.policy))
    }

    pub fn checked_sub(&self, rhs: &Self) -> Self {
        Self::new(&self.value - &rhs.value, self.policy.reconcile(&rhs.policy))
    }

    pub fn checked_mul(&self, rhs: &Self) -> Self {
        Self::new(&self.value * &rhs.value, self.policy.reconcile(&rhs.policy))
    }

    /// Exact quotient: an `Integer` when `rhs` divides `self`, otherwise a
    /// `Rational`.
    ///
    /// # Errors
    /// Returns `DivisionByZero` if `rhs` is zero.
    pub fn checked_div(&self, rhs: &Self) -> TowerResult<Number> {
        if rhs.value.is_zero() {
            return Err(TowerError::DivisionByZero);
        }
        let policy = self.policy.reconcile(&rhs.policy);
        let (quotient, remainder) = self.value.div_rem(&rhs.value);
        if remainder.is_zero() {
            Ok(Number::Integer(Self::new(quotient, policy)))
        } else {
            Rational::new(self.value.clone(), rhs.value.clone(), policy).map(Number::Rational)
        }
    }

    pub fn abs(&self) -> Self {
        Self::new(self.value.abs(), self.policy)
    }

    // ========================================================================
    // Upward Conversions
    // ========================================================================

    pub fn to_rational(&self) -> Rational {
        Rational::from_integer(self.value.clone(), self.policy)
    }

    pub fn to_real(&self) -> Real {
        Real::from_scalar(Scalar::new(
            BigDecimal::from_bigint(self.value.clone()),
            self.policy,
        ))
    }

    pub fn to_complex(&self) -> Complex {
        Complex::from_real(self.to_real())
    }

    /// Square root of |self|: an `Integer` for perfect squares, otherwise an
    /// inexact `Real` at the policy's precision.
    fn sqrt_of_magnitude(&self) -> TowerResult<Number> {
        let magnitude = self.value.abs();
        let root = magnitude.sqrt();
        if &root * &root == magnitude {
            return Ok(Number::Integer(Self::new(root, self.policy)));
        }
        self.abs().to_real().checked_sqrt().map(Number::Real)
    }
}

impl TowerOps for Integer {
    fn kind(&self) -> TowerKind {
        TowerKind::Integer
    }

    fn policy(&self) -> PrecisionPolicy {
        self.policy
    }

    fn with_policy(&self, policy: PrecisionPolicy) -> Self {
        Self::new(self.value.clone(), policy)
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
        self.checked_div(rhs)
    }

    fn negate(&self) -> Self {
        Self::new(-&self.value, self.policy)
    }

    fn invert(&self) -> TowerResult<Number> {
        if self.value.is_zero() {
            return Err(TowerError::Domain {
                operation: "invert",
                reason: "zero has no multiplicative inverse",
            });
        }
        Self::one(self.policy).checked_div(self)
    }

    fn magnitude(&self) -> TowerResult<Number> {
        Ok(Number::Integer(self.abs()))
    }

    fn sign(&self) -> TowerResult<Sign> {
        Ok(Sign::of_ordering(self.value.cmp(&BigInt::zero())))
    }

    fn compare(&self, rhs: &Self) -> TowerResult<Ordering> {
        Ok(self.value.cmp(&rhs.value))
    }

    fn sqrt(&self) -> TowerResult<Number> {
        let root = self.sqrt_of_magnitude()?;
        if self.is_negative() {
            Ok(Number::Complex(Complex::imaginary(root.to_real()?)))
        } else {
            Ok(root)
        }
    }

    fn coerce_to(&self, kind: TowerKind) -> TowerResult<Number> {
        Ok(match kind {
            TowerKind::Integer => Number::Integer(self.clone()),
            TowerKind::Rational => Number::Rational(self.to_rational()),
            TowerKind::Real => Number::Real(self.to_real()),
            TowerKind::Complex => Number::Complex(self.to_complex()),
        })
    }

    fn into_number(self) -> Number {
        Number::Integer(self)
    }
}

impl fmt::Display for Integer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}
